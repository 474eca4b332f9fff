use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::Command;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn tenderwatch_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tenderwatch"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env_remove("RUST_LOG");
    cmd
}

/// Request line and body of one request seen by the stub server.
type Seen = (String, String);

/// Answer `responses.len()` sequential requests, one connection each.
fn serve_sequence(responses: Vec<(&'static str, String)>) -> (String, mpsc::Receiver<Seen>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for (status, body) in responses {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("request line");

            let mut length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).expect("header line");
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.trim().eq_ignore_ascii_case("content-length") {
                        length = value.trim().parse().unwrap_or(0);
                    }
                }
            }
            let mut raw = vec![0u8; length];
            reader.read_exact(&mut raw).expect("body");

            let mut stream = stream;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).expect("write response");
            let _ = tx.send((
                request_line.trim_end().to_string(),
                String::from_utf8_lossy(&raw).into_owned(),
            ));
        }
    });

    (format!("http://{addr}"), rx)
}

fn listing() -> String {
    r#"[{"id": 1, "username": "ana", "email": "ana@example.org", "is_follower": true},
        {"id": 2, "username": "ben", "is_follower": true},
        {"id": 3, "username": "cy", "email": null, "is_follower": false}]"#
        .to_string()
}

// ---------------------------------------------------------------------------
// Argument validation (no server needed)
// ---------------------------------------------------------------------------

#[test]
fn help_lists_commands() {
    let home = TempDir::new().expect("home");
    tenderwatch_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("followers"))
        .stdout(contains("favourite"))
        .stdout(contains("tag"))
        .stdout(contains("delete"));
}

#[test]
fn non_numeric_tender_is_rejected() {
    let home = TempDir::new().expect("home");
    tenderwatch_cmd(home.path())
        .args(["followers", "list", "abc"])
        .assert()
        .failure()
        .stderr(contains("not a number"));
}

#[test]
fn same_user_in_add_and_remove_is_rejected() {
    let home = TempDir::new().expect("home");
    tenderwatch_cmd(home.path())
        .args(["followers", "edit", "5", "--add", "3", "--remove", "3"])
        .assert()
        .failure()
        .stderr(contains("both --add and --remove"));
}

#[test]
fn delete_requires_confirmation() {
    let home = TempDir::new().expect("home");
    tenderwatch_cmd(home.path())
        .args(["delete", "5"])
        .assert()
        .failure()
        .stderr(contains("without --yes"));
}

#[test]
fn bad_switch_value_is_rejected() {
    let home = TempDir::new().expect("home");
    tenderwatch_cmd(home.path())
        .args(["favourite", "5", "maybe"])
        .assert()
        .failure()
        .stderr(contains("expected: on, off"));
}

#[test]
fn missing_config_points_at_init() {
    let home = TempDir::new().expect("home");
    tenderwatch_cmd(home.path())
        .args(["followers", "list", "5"])
        .assert()
        .failure()
        .stderr(contains("config init"));
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn config_init_then_show_redacts_cookie() {
    let home = TempDir::new().expect("home");
    tenderwatch_cmd(home.path())
        .args([
            "config",
            "init",
            "--base-url",
            "https://tenders.example.org",
            "--cookie",
            "sessionid=secret; csrftoken=tok",
            "--user-id",
            "3",
        ])
        .assert()
        .success()
        .stdout(contains("config.yaml"));

    assert!(home.path().join(".tenderwatch/config.yaml").exists());

    tenderwatch_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("https://tenders.example.org"))
        .stdout(contains("<set>"))
        .stdout(contains("user_id:     3"))
        .stdout(contains("secret").not());
}

#[test]
fn config_init_rejects_zero_timeout() {
    let home = TempDir::new().expect("home");
    tenderwatch_cmd(home.path())
        .args([
            "config",
            "init",
            "--base-url",
            "http://localhost:8000",
            "--timeout-secs",
            "0",
        ])
        .assert()
        .failure()
        .stderr(contains("timeout_secs must be at least 1"));
    assert!(!home.path().join(".tenderwatch/config.yaml").exists());
}

#[test]
fn config_init_refuses_overwrite_without_force() {
    let home = TempDir::new().expect("home");
    let init = |force: bool| {
        let mut cmd = tenderwatch_cmd(home.path());
        cmd.args(["config", "init", "--base-url", "http://localhost:8000"]);
        if force {
            cmd.arg("--force");
        }
        cmd.assert()
    };
    init(false).success();
    init(false).failure().stderr(contains("--force"));
    init(true).success();
}

// ---------------------------------------------------------------------------
// Against a stub server
// ---------------------------------------------------------------------------

#[test]
fn followers_list_json_passes_through_listing() {
    let home = TempDir::new().expect("home");
    let (base, rx) = serve_sequence(vec![("200 OK", listing())]);

    let output = tenderwatch_cmd(home.path())
        .args(["followers", "list", "12", "--json", "--base-url", &base])
        .output()
        .expect("run");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let users: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json stdout");
    assert_eq!(users.as_array().map(Vec::len), Some(3));

    let (request_line, _) = rx.recv_timeout(Duration::from_secs(5)).expect("request");
    assert!(request_line.starts_with("GET /tenders/12/followers/"));
}

#[test]
fn followers_edit_sends_batched_diff() {
    let home = TempDir::new().expect("home");
    let (base, rx) = serve_sequence(vec![
        ("200 OK", listing()),
        ("200 OK", "Success!".to_string()),
    ]);

    tenderwatch_cmd(home.path())
        .args([
            "followers", "edit", "12", "--add", "3", "--remove", "1", "--base-url", &base,
        ])
        .assert()
        .success()
        .stdout(contains("2 follower(s)"));

    let (get_line, _) = rx.recv_timeout(Duration::from_secs(5)).expect("listing request");
    assert!(get_line.starts_with("GET "));
    let (post_line, body) = rx.recv_timeout(Duration::from_secs(5)).expect("save request");
    assert!(post_line.starts_with("POST /tenders/12/followers/"));
    let body: serde_json::Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(
        body,
        serde_json::json!({
            "old_followers": [1, 2],
            "new_followers": [3],
            "unfollowers": [1],
        })
    );
}

#[test]
fn followers_edit_dry_run_does_not_save() {
    let home = TempDir::new().expect("home");
    let (base, rx) = serve_sequence(vec![("200 OK", listing())]);

    tenderwatch_cmd(home.path())
        .args(["followers", "edit", "12", "--add", "3", "--dry-run", "--base-url", &base])
        .assert()
        .success()
        .stdout(contains("[dry-run] would send"))
        .stdout(contains(r#""new_followers":[3]"#));

    rx.recv_timeout(Duration::from_secs(5)).expect("listing request");
    assert!(
        rx.recv_timeout(Duration::from_millis(200)).is_err(),
        "dry run must not POST"
    );
}

#[test]
fn server_rejection_is_reported() {
    let home = TempDir::new().expect("home");
    let (base, _rx) = serve_sequence(vec![("403 Forbidden", "CSRF verification failed".to_string())]);

    tenderwatch_cmd(home.path())
        .args(["seen", "12", "on", "--base-url", &base])
        .assert()
        .failure()
        .stderr(contains("403"));
}

#[test]
fn followers_edit_reports_acting_user_as_follower() {
    let home = TempDir::new().expect("home");
    let (base, rx) = serve_sequence(vec![
        ("200 OK", listing()),
        ("200 OK", "Success!".to_string()),
    ]);
    tenderwatch_cmd(home.path())
        .args(["config", "init", "--base-url", &base, "--user-id", "3"])
        .assert()
        .success();

    tenderwatch_cmd(home.path())
        .args(["followers", "edit", "12", "--add", "3", "--remove", "1"])
        .assert()
        .success()
        .stdout(contains("✓ tender 12"))
        .stdout(contains("2 follower(s), including you"));

    rx.recv_timeout(Duration::from_secs(5)).expect("listing request");
    let (post_line, _) = rx.recv_timeout(Duration::from_secs(5)).expect("save request");
    assert!(post_line.starts_with("POST /tenders/12/followers/"));
}

#[test]
fn tender_actions_print_result_lines() {
    let home = TempDir::new().expect("home");
    let (base, rx) = serve_sequence(vec![
        ("200 OK", "Success!".to_string()),
        ("200 OK", "Success!".to_string()),
        ("200 OK", "/tenders\n".to_string()),
    ]);

    tenderwatch_cmd(home.path())
        .args(["favourite", "12", "on", "--base-url", &base])
        .assert()
        .success()
        .stdout(contains("✓ tender 12 — favourite on"));
    let (line, body) = rx.recv_timeout(Duration::from_secs(5)).expect("favourite request");
    assert!(line.starts_with("POST /tenders/favourite/12 "), "got: {line}");
    assert_eq!(body, "favourite=true");

    tenderwatch_cmd(home.path())
        .args(["seen", "12", "on", "--base-url", &base])
        .assert()
        .success()
        .stdout(contains("✓ tender 12 — seen on"));
    let (line, body) = rx.recv_timeout(Duration::from_secs(5)).expect("seen request");
    assert!(line.starts_with("POST /tenders/seen/12 "), "got: {line}");
    assert_eq!(body, "seen=true");

    tenderwatch_cmd(home.path())
        .args(["delete", "12", "--yes", "--base-url", &base])
        .assert()
        .success()
        .stdout(contains("✓ tender 12 deleted (server redirect: /tenders)"));
    let (line, _) = rx.recv_timeout(Duration::from_secs(5)).expect("delete request");
    assert!(line.starts_with("POST /tenders/delete/12 "), "got: {line}");
}

#[test]
fn tag_posts_trimmed_name() {
    let home = TempDir::new().expect("home");
    let (base, rx) = serve_sequence(vec![("200 OK", "Success!".to_string())]);

    tenderwatch_cmd(home.path())
        .args(["tag", "12", " urgent ", "--base-url", &base])
        .assert()
        .success()
        .stdout(contains("✓ tender 12 — tagged 'urgent'"));

    let (line, body) = rx.recv_timeout(Duration::from_secs(5)).expect("tag request");
    assert!(line.starts_with("POST /tenders/tag/12 "), "got: {line}");
    assert_eq!(body, "tag_name=urgent");
}

#[test]
fn blank_tag_is_rejected_before_request() {
    let home = TempDir::new().expect("home");
    let (base, rx) = serve_sequence(vec![("200 OK", "Success!".to_string())]);

    tenderwatch_cmd(home.path())
        .args(["tag", "12", "   ", "--base-url", &base])
        .assert()
        .failure()
        .stderr(contains("tag name can not be empty"));

    assert!(
        rx.recv_timeout(Duration::from_millis(300)).is_err(),
        "blank tag must not be sent"
    );
}
