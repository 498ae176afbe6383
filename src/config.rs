// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! The chat-completion API key is resolved separately through a
//! [`CredentialCache`]: the process environment first, then a local
//! `KEY=VALUE` file. The resolved key is cached for the rest of the process.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex};

use crate::services::FeedbackStyle;

/// Environment variable holding the chat-completion API key.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Default fallback file for the API key.
const DEFAULT_ENV_FILE: &str = ".env";

/// Identity of the learner for this session.
#[derive(Debug, Clone, PartialEq)]
pub struct UserIdentity {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub photo_url: Option<String>,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP project holding the Firestore database
    pub gcp_project_id: String,
    /// Chat-completion API base URL
    pub openai_base_url: String,
    /// Model used for unit generation and tutor feedback
    pub model: String,
    /// Shape of tutor feedback (structured JSON or free text)
    pub feedback_style: FeedbackStyle,
    /// Learner identity; progress is only persisted when set
    pub user: Option<UserIdentity>,
    /// Use the in-process document store instead of Firestore
    pub offline: bool,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            openai_base_url: "http://localhost:9999/v1".to_string(),
            model: "test-model".to_string(),
            feedback_style: FeedbackStyle::Json,
            user: Some(UserIdentity {
                uid: "test-user".to_string(),
                email: "test@example.com".to_string(),
                display_name: "Test User".to_string(),
                photo_url: None,
            }),
            offline: true,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let feedback_style = match env::var("TUTOR_FEEDBACK_STYLE") {
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                var: "TUTOR_FEEDBACK_STYLE",
                value,
            })?,
            Err(_) => FeedbackStyle::default(),
        };

        let user = non_empty_var("TUTOR_USER_ID").map(|uid| UserIdentity {
            email: non_empty_var("TUTOR_USER_EMAIL").unwrap_or_default(),
            display_name: non_empty_var("TUTOR_USER_NAME").unwrap_or_else(|| uid.clone()),
            photo_url: non_empty_var("TUTOR_USER_PHOTO_URL"),
            uid,
        });

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            model: env::var("TUTOR_MODEL").unwrap_or_else(|_| "gpt-5".to_string()),
            feedback_style,
            user,
            offline: matches!(env::var("TUTOR_OFFLINE").as_deref(), Ok("1") | Ok("true")),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Memoized lookup of a single credential.
///
/// The first successful [`get`](Self::get) is cached until [`reset`](Self::reset).
/// Failures are not cached, so a later call can succeed once the variable is set.
#[derive(Debug)]
pub struct CredentialCache {
    var: &'static str,
    env_file: PathBuf,
    cached: Mutex<Option<String>>,
}

impl CredentialCache {
    pub fn new(var: &'static str, env_file: impl Into<PathBuf>) -> Self {
        Self {
            var,
            env_file: env_file.into(),
            cached: Mutex::new(None),
        }
    }

    /// Resolve the credential: environment first, then the fallback file.
    ///
    /// A value found in the file is also exported into the process
    /// environment so later readers agree.
    pub fn get(&self) -> Result<String, ConfigError> {
        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(value) = cached.as_ref() {
            return Ok(value.clone());
        }

        let value = match env::var(self.var).ok().filter(|v| !v.is_empty()) {
            Some(value) => value,
            None => {
                let value = read_env_file(&self.env_file, self.var)
                    .filter(|v| !v.is_empty())
                    .ok_or(ConfigError::Missing(self.var))?;
                tracing::debug!(
                    var = self.var,
                    path = %self.env_file.display(),
                    "Credential loaded from env file"
                );
                env::set_var(self.var, &value);
                value
            }
        };

        *cached = Some(value.clone());
        Ok(value)
    }

    /// Drop the cached value so the next `get` resolves again.
    pub fn reset(&self) {
        *self.cached.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

/// Look up `key` in a `KEY=VALUE` file.
///
/// A missing or unreadable file yields `None`; malformed lines are skipped.
fn read_env_file(path: &Path, key: &str) -> Option<String> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Env file not readable");
            return None;
        }
    };

    let mut found = None;
    for entry in entries {
        match entry {
            Ok((k, v)) if k == key => found = Some(v),
            Ok(_) => {}
            Err(e) => tracing::debug!(path = %path.display(), error = %e, "Skipping env file line"),
        }
    }
    found
}

static OPENAI_KEY: LazyLock<CredentialCache> = LazyLock::new(|| {
    let env_file = env::var("TUTOR_ENV_FILE").unwrap_or_else(|_| DEFAULT_ENV_FILE.to_string());
    CredentialCache::new(OPENAI_API_KEY, env_file)
});

/// The chat-completion API key, resolved once per process.
pub fn openai_api_key() -> Result<String, ConfigError> {
    OPENAI_KEY.get()
}

/// Forget the memoized API key (tests and key rotation).
pub fn reset_openai_api_key() {
    OPENAI_KEY.reset();
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}
