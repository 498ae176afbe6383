// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! AI Tutor: generated learning units, quizzes and tutor feedback
//!
//! This crate provides the persistence layer for learner profiles and
//! per-topic progress (Firestore), plus thin clients for generating units
//! and remedial feedback through a hosted chat-completion API.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{ChatClient, ContentGenerator, Tutor};

/// Shared state for one tutoring session.
pub struct AppState {
    pub config: Config,
    /// Present only when a user identity is configured.
    pub db: Option<&'static FirestoreDb>,
    pub content: ContentGenerator,
    pub tutor: Tutor,
}

impl AppState {
    /// Build the language-model services around a single HTTP client.
    pub fn new(config: Config, api_key: String, db: Option<&'static FirestoreDb>) -> Self {
        let chat = ChatClient::new(&config.openai_base_url, api_key);
        let content = ContentGenerator::new(chat.clone(), &config.model);
        let tutor = Tutor::new(chat, &config.model, config.feedback_style);

        Self {
            config,
            db,
            content,
            tutor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::FeedbackStyle;

    #[test]
    fn test_state_uses_configured_style() {
        let mut config = Config::test_default();
        config.feedback_style = FeedbackStyle::Text;

        let state = AppState::new(config, "test-key".to_string(), None);
        assert_eq!(state.tutor.style(), FeedbackStyle::Text);
        assert!(state.db.is_none());
    }
}
