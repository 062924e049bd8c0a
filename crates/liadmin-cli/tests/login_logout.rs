//! Integration tests for login/logout/status.

mod fixtures;

use predicates::prelude::*;
use tempfile::tempdir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fixtures::{liadmin, login_success_body, seed_session, session_path};

#[tokio::test(flavor = "multi_thread")]
async fn login_stores_the_session() {
    let home = tempdir().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login/"))
        .and(body_json(serde_json::json!({
            "email": "admin@livingimage.io",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_success_body()))
        .expect(1)
        .mount(&server)
        .await;

    liadmin(&home, &server.uri())
        .args(["login", "--email", "admin@livingimage.io", "--password", "hunter2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as admin@livingimage.io"));

    let contents = std::fs::read_to_string(session_path(&home)).unwrap();
    assert!(contents.contains("test-access-token-1234567890"));
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn session_file_has_restricted_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let home = tempdir().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_success_body()))
        .mount(&server)
        .await;

    liadmin(&home, &server.uri())
        .args(["login", "--email", "admin@livingimage.io", "--password", "hunter2"])
        .assert()
        .success();

    let mode = std::fs::metadata(session_path(&home))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600, "session.json should have 0600 permissions");
}

/// Empty password fails validation locally; no request reaches the server.
#[tokio::test(flavor = "multi_thread")]
async fn login_with_empty_password_never_hits_the_network() {
    let home = tempdir().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_success_body()))
        .expect(0)
        .mount(&server)
        .await;

    liadmin(&home, &server.uri())
        .args(["login", "--email", "admin@livingimage.io", "--password", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter password"));

    assert!(!session_path(&home).exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn login_with_malformed_email_never_hits_the_network() {
    let home = tempdir().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_success_body()))
        .expect(0)
        .mount(&server)
        .await;

    liadmin(&home, &server.uri())
        .args(["login", "--email", "not-an-email", "--password", "pw"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter valid email"));
}

#[tokio::test(flavor = "multi_thread")]
async fn login_surfaces_non_admin_rejection() {
    let home = tempdir().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "admin": false,
            "token": {"access": "t"}
        })))
        .mount(&server)
        .await;

    liadmin(&home, &server.uri())
        .args(["login", "--email", "user@example.com", "--password", "pw"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Only admin can access.."));

    assert!(!session_path(&home).exists());
}

/// The login view is public-only: with a session present it redirects to
/// the dashboard instead of rendering.
#[test]
fn login_while_logged_in_redirects_to_dashboard() {
    let home = tempdir().unwrap();
    seed_session(&home, "abc");

    liadmin(&home, "http://127.0.0.1:9") // never contacted
        .args(["login", "--email", "a@b.io", "--password", "pw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already logged in"));
}

#[test]
fn logout_clears_the_session() {
    let home = tempdir().unwrap();
    seed_session(&home, "abc");

    liadmin(&home, "http://127.0.0.1:9")
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));

    assert!(!session_path(&home).exists());

    // Idempotent: a second logout is a no-op, not an error
    liadmin(&home, "http://127.0.0.1:9")
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}

#[test]
fn status_shows_the_session_without_the_full_token() {
    let home = tempdir().unwrap();
    seed_session(&home, "abcdefghijklmnop");

    liadmin(&home, "http://127.0.0.1:9")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as admin@livingimage.io"))
        .stdout(predicate::str::contains("abcdefgh…"))
        .stdout(predicate::str::contains("abcdefghijklmnop").not());
}

#[test]
fn status_when_logged_out_points_at_login() {
    let home = tempdir().unwrap();

    liadmin(&home, "http://127.0.0.1:9")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}
