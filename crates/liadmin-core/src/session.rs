//! Persisted admin session storage.
//!
//! Stores the current session in `<home>/session.json` with restricted
//! permissions (0600). The token is never logged or displayed in full.
//!
//! The session file is the single source of truth for "logged in": a
//! session without a token is not authenticated, no matter what the other
//! fields say.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// The authenticated admin session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Bearer token issued by the login endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Account verification flag from the login response
    #[serde(default)]
    pub verified: bool,
    /// Raw login response payload, kept verbatim
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub raw: serde_json::Value,
}

impl Session {
    /// Returns true if this session carries a token.
    ///
    /// This is the only authentication check in the system.
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Returns the admin email recorded in the raw login payload, if any.
    pub fn email(&self) -> Option<&str> {
        self.raw.get("email").and_then(|v| v.as_str())
    }
}

/// Handle to the persisted session file.
///
/// Deliberately stateless: every `get` re-reads the file, so the most
/// recent token always wins, including one written by another process.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store over the default session path under the liadmin home.
    pub fn new() -> Self {
        Self {
            path: paths::session_path(),
        }
    }

    /// Store over an explicit file path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the path of the session file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Returns the current session.
    ///
    /// An absent-token session is returned if the file does not exist,
    /// was cleared, or cannot be parsed.
    pub fn get(&self) -> Session {
        if !self.path.exists() {
            return Session::default();
        }

        let Ok(contents) = fs::read_to_string(&self.path) else {
            return Session::default();
        };

        serde_json::from_str(&contents).unwrap_or_default()
    }

    /// Overwrites the stored session with restricted permissions (0600).
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn set(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }

    /// Clears the stored session.
    ///
    /// Idempotent: clearing an already-cleared store leaves the same
    /// absent-token session behind.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be removed.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        }
        Ok(())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
