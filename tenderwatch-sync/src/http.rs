//! [`TenderBackend`] over HTTP.
//!
//! Requests are made with a blocking `ureq` agent on tokio's blocking pool,
//! so callers get an ordinary future and the agent's connection pool is
//! shared between calls. Every request carries the configured cookie
//! header and, when the CSRF cookie is present, the `X-CSRFToken` header.

use std::sync::Arc;
use std::time::Duration;

use tenderwatch_core::{FollowerPayload, TagName, TenderId, UserRecord};

use crate::backend::TenderBackend;
use crate::config::{ClientConfig, Endpoint};
use crate::csrf::{cookie_value, CSRF_HEADER};
use crate::SyncError;

/// Longest server error body kept in [`SyncError::Http`].
const MAX_ERROR_BODY: usize = 512;

#[derive(Clone)]
pub struct HttpBackend {
    agent: ureq::Agent,
    config: Arc<ClientConfig>,
    csrf_token: Option<String>,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        let csrf_token = config
            .cookie
            .as_deref()
            .and_then(|cookie| cookie_value(cookie, &config.csrf_cookie));
        if config.cookie.is_some() && csrf_token.is_none() {
            tracing::warn!(
                cookie = %config.csrf_cookie,
                "CSRF cookie missing; POST requests will likely be rejected"
            );
        }
        Self {
            agent,
            config: Arc::new(config),
            csrf_token,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        let mut request = self.agent.request(method, url);
        if let Some(cookie) = self.config.cookie.as_deref() {
            request = request.set("Cookie", cookie);
        }
        if let Some(token) = self.csrf_token.as_deref() {
            request = request.set(CSRF_HEADER, token);
        }
        request
    }

    /// POST a form and return the response body as text.
    async fn post_form(
        &self,
        endpoint: Endpoint,
        tender: TenderId,
        fields: Vec<(&'static str, String)>,
    ) -> Result<String, SyncError> {
        let url = self.config.url_for(endpoint, tender);
        let request = self.request("POST", &url);
        run_blocking(move || {
            let pairs: Vec<(&str, &str)> = fields
                .iter()
                .map(|(name, value)| (*name, value.as_str()))
                .collect();
            let response = check(&url, request.send_form(&pairs))?;
            read_text(&url, response)
        })
        .await
    }
}

impl TenderBackend for HttpBackend {
    async fn fetch_users(&self, tender: TenderId) -> Result<Vec<UserRecord>, SyncError> {
        let url = self.config.url_for(Endpoint::Followers, tender);
        let request = self.request("GET", &url).set("Accept", "application/json");
        let users = run_blocking(move || {
            let response = check(&url, request.call())?;
            response
                .into_json::<Vec<UserRecord>>()
                .map_err(|source| SyncError::Decode { url, source })
        })
        .await?;
        tracing::debug!(%tender, users = users.len(), "fetched follower listing");
        Ok(users)
    }

    async fn save_followers(
        &self,
        tender: TenderId,
        payload: &FollowerPayload,
    ) -> Result<(), SyncError> {
        let url = self.config.url_for(Endpoint::Followers, tender);
        let body = serde_json::to_value(payload)?;
        let request = self.request("POST", &url);
        run_blocking(move || {
            let response = check(&url, request.send_json(body))?;
            read_text(&url, response).map(|_| ())
        })
        .await
    }

    async fn set_favourite(&self, tender: TenderId, favourite: bool) -> Result<(), SyncError> {
        self.post_form(
            Endpoint::Favourite,
            tender,
            vec![("favourite", form_bool(favourite))],
        )
        .await
        .map(|_| ())
    }

    async fn set_seen(&self, tender: TenderId, seen: bool) -> Result<(), SyncError> {
        self.post_form(Endpoint::Seen, tender, vec![("seen", form_bool(seen))])
            .await
            .map(|_| ())
    }

    async fn add_tag(&self, tender: TenderId, tag: &TagName) -> Result<(), SyncError> {
        self.post_form(
            Endpoint::Tag,
            tender,
            vec![("tag_name", tag.as_str().to_string())],
        )
        .await
        .map(|_| ())
    }

    async fn delete_tender(&self, tender: TenderId) -> Result<String, SyncError> {
        let redirect = self.post_form(Endpoint::Delete, tender, vec![]).await?;
        Ok(redirect.trim().to_string())
    }
}

fn form_bool(value: bool) -> String {
    value.to_string()
}

async fn run_blocking<T, F>(work: F) -> Result<T, SyncError>
where
    F: FnOnce() -> Result<T, SyncError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| SyncError::Join(err.to_string()))?
}

fn check(
    url: &str,
    result: Result<ureq::Response, ureq::Error>,
) -> Result<ureq::Response, SyncError> {
    match result {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(status, response)) => {
            let body = error_body(response.into_string());
            Err(SyncError::Http {
                url: url.to_string(),
                status,
                body,
            })
        }
        Err(ureq::Error::Transport(transport)) => Err(SyncError::Transport {
            url: url.to_string(),
            message: transport.to_string(),
        }),
    }
}

/// Server error body for [`SyncError::Http`], truncated; a body that cannot
/// be read is reported as such instead of silently becoming empty.
fn error_body(read: std::io::Result<String>) -> String {
    let mut body = read.unwrap_or_else(|e| format!("<unreadable body: {e}>"));
    truncate_at_char_boundary(&mut body, MAX_ERROR_BODY);
    body
}

fn read_text(url: &str, response: ureq::Response) -> Result<String, SyncError> {
    response.into_string().map_err(|source| SyncError::Decode {
        url: url.to_string(),
        source,
    })
}

fn truncate_at_char_boundary(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut cut = max;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
}
