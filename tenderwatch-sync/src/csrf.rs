//! Cookie lookup for the CSRF header.

use percent_encoding::percent_decode_str;

/// Header the server reads the CSRF token from.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Value of cookie `name` in a `Cookie` header string, percent-decoded.
///
/// Pairs are split on `;` and trimmed; the first pair starting with
/// `name=` wins. Returns `None` when the cookie is absent or its value is
/// not valid UTF-8 after decoding.
pub fn cookie_value(cookie_header: &str, name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    cookie_header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
        .and_then(|raw| percent_decode_str(raw).decode_utf8().ok())
        .map(|value| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("csrftoken=abc123", Some("abc123"))]
    #[case("sessionid=s1; csrftoken=abc123", Some("abc123"))]
    #[case("  csrftoken=abc123 ;theme=dark", Some("abc123"))]
    #[case("csrftoken=a%2Fb%3D", Some("a/b="))]
    #[case("csrftoken=", Some(""))]
    #[case("xcsrftoken=nope", None)]
    #[case("csrftokenx=nope", None)]
    #[case("sessionid=s1", None)]
    #[case("", None)]
    fn finds_named_cookie(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(
            cookie_value(header, "csrftoken").as_deref(),
            expected,
            "header: {header:?}"
        );
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(
            cookie_value("csrftoken=first; csrftoken=second", "csrftoken").as_deref(),
            Some("first")
        );
    }
}
