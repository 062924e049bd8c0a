//! Local login-form validation.
//!
//! Runs before any network call; a form that fails here never reaches
//! the API. Messages match the web console verbatim.

use std::sync::OnceLock;

use regex::Regex;

/// Same pattern the web console uses, compiled case-insensitively.
const EMAIL_PATTERN: &str = r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,4}$";

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

/// Credentials as typed by the admin.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Per-field validation messages. Empty on a valid form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginValidation {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginValidation {
    /// True when no field carries an error.
    pub fn is_valid(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }

    /// All messages, for shells that print them as one block.
    pub fn messages(&self) -> Vec<&str> {
        [self.email.as_deref(), self.password.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Validates the form without touching the network.
    pub fn validate(&self) -> LoginValidation {
        let email = if self.email.is_empty() {
            Some("Please enter email".to_string())
        } else if !email_regex().is_match(&self.email) {
            Some("Please enter valid email".to_string())
        } else {
            None
        };

        let password = self
            .password
            .is_empty()
            .then(|| "Please enter password".to_string());

        LoginValidation { email, password }
    }
}
