//! Livingimage admin API client.
//!
//! One client per process: attaches the bearer token from the session
//! store at call time, normalizes failures into [`ApiError`], and turns
//! any 401 into a forced logout (session cleared, then a navigation
//! event emitted) so the next guard evaluation lands on the login route.

pub mod error;
pub mod types;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc;

pub use error::{ApiError, ApiErrorKind, ApiResult};
use types::{
    AnalyticsCard, DateFilter, LoginResponse, OneOriginalResponse, OneRegeneratedResponse,
    OriginalImage, OriginalImagePage, PaymentRow, PaymentsResponse, RegeneratedImage,
    RegeneratedImagePage, TrafficReport, UserDetailResponse, UserRow, UsersResponse,
};

use crate::config::Config;
use crate::session::{Session, SessionStore};

/// Standard User-Agent header for liadmin API requests.
pub const USER_AGENT: &str = concat!("liadmin/", env!("CARGO_PKG_VERSION"));

/// Login response message that marks an unverified account.
const VERIFY_MESSAGE: &str = "Verify your account First!";

/// Navigation side effects the fetch layer can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    /// Session was invalidated; the shell must route to the login view.
    ForceLogin,
}

/// Sender half of the navigation inbox.
pub type NavSender = mpsc::UnboundedSender<NavEvent>;
/// Receiver half of the navigation inbox.
pub type NavReceiver = mpsc::UnboundedReceiver<NavEvent>;

/// Creates the navigation inbox pair.
pub fn nav_channel() -> (NavSender, NavReceiver) {
    mpsc::unbounded_channel()
}

/// Authenticated client for the Livingimage admin API.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    store: SessionStore,
    nav: Option<NavSender>,
}

impl ApiClient {
    /// Creates a new client for the given base URL and session store.
    ///
    /// # Panics
    /// - In test builds (`#[cfg(test)]`), panics if `base_url` is the production API.
    /// - At runtime, panics if `LIADMIN_BLOCK_REAL_API=1` and `base_url` is the production API.
    ///
    /// This prevents tests from accidentally making real network requests.
    /// Use `LIVINGIMAGE_BASE_URL` or config to point to a mock server.
    pub fn new(base_url: impl Into<String>, store: SessionStore) -> Self {
        let base_url = base_url.into();

        #[cfg(test)]
        if base_url == Config::DEFAULT_BASE_URL {
            panic!(
                "Tests must not use the production Livingimage API!\n\
                 Set LIVINGIMAGE_BASE_URL to a mock server (e.g., wiremock).\n\
                 Found base_url: {base_url}"
            );
        }

        #[cfg(not(test))]
        if std::env::var("LIADMIN_BLOCK_REAL_API").is_ok_and(|v| v == "1")
            && base_url == Config::DEFAULT_BASE_URL
        {
            panic!(
                "LIADMIN_BLOCK_REAL_API=1 but trying to use the production Livingimage API!\n\
                 Set LIVINGIMAGE_BASE_URL to a mock server.\n\
                 Found base_url: {base_url}"
            );
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            store,
            nav: None,
        }
    }

    /// Attaches a navigation sender notified on forced logout.
    pub fn with_nav(mut self, nav: NavSender) -> Self {
        self.nav = Some(nav);
        self
    }

    /// Returns the session store this client reads from.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    // ------------------------------------------------------------------
    // Endpoints
    // ------------------------------------------------------------------

    /// Signs in and persists the resulting session.
    ///
    /// Mirrors the web console's gates: a 200 response can still be a
    /// rejection (unverified account, non-admin account).
    ///
    /// # Errors
    /// Returns an error if the call fails or the account is rejected.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<Session> {
        let body = serde_json::json!({ "email": email, "password": password });
        let raw: Value = self.post("/login/", Some(body), false).await?;

        let parsed: LoginResponse = serde_json::from_value(raw.clone())
            .map_err(|e| ApiError::parse(format!("Unexpected login response: {e}")))?;

        if parsed.message.as_deref() == Some(VERIFY_MESSAGE) {
            return Err(ApiError::new(ApiErrorKind::Http, "Account not verified!"));
        }
        if parsed.admin != Some(true) {
            return Err(ApiError::new(ApiErrorKind::Http, "Only admin can access.."));
        }
        let token = parsed
            .token
            .map(|t| t.access)
            .ok_or_else(|| ApiError::parse("Login response carried no access token"))?;

        let session = Session {
            token: Some(token),
            verified: parsed.verified.unwrap_or(false),
            raw,
        };
        self.store
            .set(&session)
            .map_err(|e| ApiError::new(ApiErrorKind::Parse, format!("Failed to persist session: {e}")))?;

        Ok(session)
    }

    /// Fetches the full user list.
    pub async fn get_all_users(&self) -> ApiResult<Vec<UserRow>> {
        let response: UsersResponse = self.post("/admin/get-all-user/", None, true).await?;
        Ok(response.users)
    }

    /// Fetches one user's profile and image history.
    pub async fn view_user(&self, email: &str) -> ApiResult<UserDetailResponse> {
        let body = serde_json::json!({ "email": email });
        self.post("/admin/view-user/", Some(body), true).await
    }

    /// Deletes a user by email.
    pub async fn delete_user(&self, email: &str) -> ApiResult<()> {
        let body = serde_json::json!({ "email": email });
        let _: Value = self.post("/admin/delete-user/", Some(body), true).await?;
        Ok(())
    }

    /// Fetches the product stat cards, newest bucket first.
    pub async fn analytics(&self, filter: DateFilter) -> ApiResult<Vec<AnalyticsCard>> {
        let body = serde_json::json!({ "date_filter": filter.as_str() });
        self.post("/admin/analytics/", Some(body), true).await
    }

    /// Fetches the traffic report, newest bucket first.
    pub async fn traffic(&self, filter: DateFilter) -> ApiResult<TrafficReport> {
        let body = serde_json::json!({ "date_filter": filter.as_str() });
        self.post("/admin/google-analytics/", Some(body), true).await
    }

    /// Fetches one page of original images.
    pub async fn original_images(&self, page: u64) -> ApiResult<OriginalImagePage> {
        self.post(&format!("/admin/get-all-original-admin/?page={page}"), None, true)
            .await
    }

    /// Fetches one page of regenerated images.
    pub async fn regenerated_images(&self, page: u64) -> ApiResult<RegeneratedImagePage> {
        self.post(&format!("/admin/get-all-regen-admin/?page={page}"), None, true)
            .await
    }

    /// Fetches a single original image by ID.
    pub async fn one_original(&self, image_id: u64) -> ApiResult<OriginalImage> {
        let body = serde_json::json!({ "image_id": image_id });
        let response: OneOriginalResponse = self
            .post("/admin/get-one-original-admin/", Some(body), true)
            .await?;
        Ok(response.image)
    }

    /// Fetches a single regenerated image by ID.
    pub async fn one_regenerated(&self, image_id: u64) -> ApiResult<RegeneratedImage> {
        let body = serde_json::json!({ "image_id": image_id });
        let response: OneRegeneratedResponse = self
            .post("/admin/get-one-regen-admin/", Some(body), true)
            .await?;
        Ok(response.image)
    }

    /// Deletes original images (and their regenerations) by ID.
    pub async fn delete_images(&self, image_ids: &[u64]) -> ApiResult<()> {
        let body = serde_json::json!({ "image_id": image_ids });
        let _: Value = self.post("/admin/delete-image/", Some(body), true).await?;
        Ok(())
    }

    /// Fetches the full payment list.
    pub async fn payments(&self) -> ApiResult<Vec<PaymentRow>> {
        let body = serde_json::json!({});
        let response: PaymentsResponse = self.post("/admin/get-all-payment/", Some(body), true).await?;
        Ok(response.payments)
    }

    // ------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------

    /// Performs one POST and decodes the JSON response.
    ///
    /// The bearer token is read from the store at call time, not earlier,
    /// so a login from another process is picked up immediately.
    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<Value>,
        authenticated: bool,
    ) -> ApiResult<T> {
        let url = format!("{}{path}", self.base_url);

        let mut request = self.http.post(&url);
        if authenticated
            && let Some(token) = self.store.get().token
        {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::network(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        tracing::debug!("POST {url} -> {status}");

        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.force_logout();
            return Err(ApiError::unauthorized());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::http_status(status.as_u16(), &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::parse(format!("Unexpected response from {url}: {e}")))
    }

    /// Clears the session, then signals the shell to route to login.
    ///
    /// The clear must complete before the signal is sent: the guard that
    /// runs on the resulting navigation has to observe the cleared store.
    fn force_logout(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear session after 401: {e}");
        }
        if let Some(nav) = &self.nav {
            let _ = nav.send(NavEvent::ForceLogin);
        }
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::at(dir.path().join("session.json"))
    }

    fn logged_in_store(dir: &tempfile::TempDir) -> SessionStore {
        let store = store_in(dir);
        store
            .set(&Session {
                token: Some("abc".to_string()),
                verified: true,
                raw: Value::Null,
            })
            .unwrap();
        store
    }

    fn users_body() -> Value {
        serde_json::json!({
            "Users Data": [
                {"User ID": 1, "User Email": "a@x.io", "Name": "Ada",
                 "Total Credits": 10, "Registered on": "2024-01-01",
                 "Verification Status": true},
                {"User ID": 2, "User Email": "b@x.io", "Name": "Bob",
                 "Total Credits": 5, "Registered on": "2024-02-01",
                 "Verification Status": false},
                {"User ID": 3, "User Email": "c@x.io", "Name": "Cid",
                 "Total Credits": 0, "Registered on": "2024-03-01",
                 "Verification Status": true}
            ]
        })
    }

    #[tokio::test]
    async fn attaches_the_stored_bearer_token() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/admin/get-all-user/"))
            .and(header("authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(users_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), logged_in_store(&dir));
        let users = client.get_all_users().await.unwrap();
        assert_eq!(users.len(), 3);
    }

    #[tokio::test]
    async fn unauthorized_clears_session_and_signals_login() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/admin/get-all-user/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "errors": {"detail": "Given token not valid for any token type"}
            })))
            .mount(&server)
            .await;

        let store = logged_in_store(&dir);
        let (tx, mut rx) = nav_channel();
        let client = ApiClient::new(server.uri(), store.clone()).with_nav(tx);

        let err = client.get_all_users().await.unwrap_err();
        assert!(err.is_unauthorized());

        // Store is cleared by the time the error is observable, and the
        // navigation signal is already queued behind it.
        assert_eq!(store.get().token, None);
        assert_eq!(rx.try_recv().unwrap(), NavEvent::ForceLogin);
    }

    #[tokio::test]
    async fn server_errors_surface_the_envelope_detail() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/admin/get-all-payment/"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "errors": {"detail": "Database unavailable"}
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), logged_in_store(&dir));
        let err = client.payments().await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Http);
        assert_eq!(err.message, "Database unavailable");
        // Non-401 failures never touch the session.
        assert!(client.store().get().is_authenticated());
    }

    #[tokio::test]
    async fn login_persists_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login/"))
            .and(body_json(serde_json::json!({
                "email": "admin@livingimage.io",
                "password": "hunter2"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "admin": true,
                "verified": true,
                "token": {"access": "fresh-token", "refresh": "r"}
            })))
            .mount(&server)
            .await;

        let store = store_in(&dir);
        let client = ApiClient::new(server.uri(), store.clone());
        let session = client.login("admin@livingimage.io", "hunter2").await.unwrap();

        assert_eq!(session.token.as_deref(), Some("fresh-token"));
        assert!(session.verified);
        assert_eq!(store.get().token.as_deref(), Some("fresh-token"));
    }

    #[tokio::test]
    async fn login_rejects_unverified_accounts() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Message": "Verify your account First!"
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), store_in(&dir));
        let err = client.login("a@b.io", "pw").await.unwrap_err();
        assert_eq!(err.message, "Account not verified!");
        assert!(!client.store().get().is_authenticated());
    }

    #[tokio::test]
    async fn login_rejects_non_admin_accounts() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "admin": false,
                "token": {"access": "t"}
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), store_in(&dir));
        let err = client.login("user@b.io", "pw").await.unwrap_err();
        assert_eq!(err.message, "Only admin can access..");
        assert!(!client.store().get().is_authenticated());
    }

    #[tokio::test]
    async fn paginated_request_carries_the_page_query() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/admin/get-all-regen-admin/"))
            .and(wiremock::matchers::query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "count": 25,
                "results": {"Regenerated_Image_data": []}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), logged_in_store(&dir));
        let page = client.regenerated_images(3).await.unwrap();
        assert_eq!(types::total_pages(page.count), 3);
    }
}
