// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.

use crate::config::ConfigError;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Language model API error: {0}")]
    Llm(String),

    #[error("Language model returned no content")]
    EmptyResponse,

    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppError {
    pub const LLM_RATE_LIMIT: &'static str = "Rate limit exceeded";
    pub const LLM_AUTH_ERROR: &'static str = "API key rejected";

    /// True when the model API rejected the request as rate limited.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AppError::Llm(msg) if msg == Self::LLM_RATE_LIMIT)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
