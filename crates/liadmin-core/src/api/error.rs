//! Error types shared by all API calls.

use std::fmt;

use serde_json::Value;

/// Categories of API errors for consistent handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Backend returned 401; the session has been cleared
    Unauthorized,
    /// Any other non-2xx HTTP status
    Http,
    /// Transport failure (connect, TLS, body read)
    Network,
    /// Response body did not match the expected shape
    Parse,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Unauthorized => write!(f, "unauthorized"),
            ApiErrorKind::Http => write!(f, "http"),
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Structured error from an API call with kind and details.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Error category
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// Optional additional details (e.g., raw error body)
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Error for a 401 response. The store clear is the caller's job and
    /// must already have happened by the time this value escapes.
    pub fn unauthorized() -> Self {
        Self::new(ApiErrorKind::Unauthorized, "Session expired or invalid")
    }

    /// Creates an error from a non-2xx status and its body.
    ///
    /// Pulls a display message out of the backend's error envelope when
    /// one is present, keeping the raw body in `details`.
    pub fn http_status(status: u16, body: &str) -> Self {
        let message = extract_error_message(body)
            .unwrap_or_else(|| format!("HTTP {status}"));
        Self {
            kind: ApiErrorKind::Http,
            message,
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    /// Creates a transport error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Parse, message)
    }

    /// Returns true if this error is the forced-logout 401 case.
    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Extracts a display message from the backend's error envelopes.
///
/// Known shapes: `{"errors": {"detail": "..."}}` (admin endpoints) and
/// `{"Message": "..."}` (login endpoint).
pub fn extract_error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;

    if let Some(detail) = json
        .get("errors")
        .and_then(|e| e.get("detail"))
        .and_then(|d| d.as_str())
    {
        return Some(detail.to_string());
    }

    json.get("Message")
        .and_then(|m| m.as_str())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_detail_from_errors_envelope() {
        let body = r#"{"errors": {"detail": "Given token not valid for any token type"}}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("Given token not valid for any token type")
        );
    }

    #[test]
    fn extracts_login_message_envelope() {
        let body = r#"{"Message": "Invalid Credentials!"}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("Invalid Credentials!")
        );
    }

    #[test]
    fn falls_back_to_status_line() {
        let err = ApiError::http_status(500, "<html>oops</html>");
        assert_eq!(err.kind, ApiErrorKind::Http);
        assert_eq!(err.message, "HTTP 500");
        assert!(err.details.is_some());
    }

    #[test]
    fn prefers_envelope_over_status_line() {
        let err = ApiError::http_status(400, r#"{"errors": {"detail": "Bad page"}}"#);
        assert_eq!(err.message, "Bad page");
    }
}
