// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tutor feedback for wrong answers.
//!
//! Two reply shapes exist: a structured JSON object and a free-text block
//! following the same template. Which one is used is a configuration choice.

use crate::error::AppError;
use crate::services::openai::parse_json_content;
use crate::services::ChatClient;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SYSTEM_TUTOR_JSON: &str = r#"You are a tutor that helps users when they get a question wrong.
When a user gets something wrong, output a JSON object with this format:
{
    "message": "You were close, but got it wrong: ...",
    "explanation": "PUT EXPLANATION HERE",
    "user_answer": "PUT THE USER ANSWER",
    "correct_answer": "PUT CORRECT ANSWER"
}
"#;

const SYSTEM_TUTOR_TEXT: &str = r#"You are a tutor that helps users when they get a question wrong.
When a user gets something wrong, reply in plain text using this template:
Message: You were close, but got it wrong: ...
Explanation: PUT EXPLANATION HERE
Your answer: PUT THE USER ANSWER
Correct answer: PUT CORRECT ANSWER
"#;

/// Which system prompt and reply shape to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedbackStyle {
    #[default]
    Json,
    Text,
}

impl FromStr for FeedbackStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            other => Err(format!("unknown feedback style: {}", other)),
        }
    }
}

/// Structured feedback returned in JSON mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TutorFeedback {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub user_answer: String,
    #[serde(default)]
    pub correct_answer: String,
}

/// Feedback in whichever shape the tutor was configured for.
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    Structured(TutorFeedback),
    Text(String),
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Structured(fb) => {
                writeln!(f, "{}", fb.message)?;
                writeln!(f, "Explanation: {}", fb.explanation)?;
                writeln!(f, "Your answer: {}", fb.user_answer)?;
                write!(f, "Correct answer: {}", fb.correct_answer)
            }
            Feedback::Text(text) => f.write_str(text),
        }
    }
}

/// Produces remedial feedback.
#[derive(Clone)]
pub struct Tutor {
    chat: ChatClient,
    model: String,
    style: FeedbackStyle,
}

impl Tutor {
    pub fn new(chat: ChatClient, model: &str, style: FeedbackStyle) -> Self {
        Self {
            chat,
            model: model.to_string(),
            style,
        }
    }

    pub fn style(&self) -> FeedbackStyle {
        self.style
    }

    /// Ask the model to explain a wrong answer.
    ///
    /// `context` carries the lesson text and the learner's answer.
    pub async fn reply(
        &self,
        question: &str,
        context: &str,
        model: Option<&str>,
    ) -> Result<Feedback, AppError> {
        let model = model.unwrap_or(self.model.as_str());
        let user = user_prompt(question, context);

        let content = match self.style {
            FeedbackStyle::Json => {
                self.chat
                    .complete(model, SYSTEM_TUTOR_JSON, &user, true)
                    .await?
            }
            FeedbackStyle::Text => {
                self.chat
                    .complete(model, SYSTEM_TUTOR_TEXT, &user, false)
                    .await?
            }
        };

        tracing::debug!(model, style = ?self.style, "Tutor feedback received");
        parse_feedback(self.style, &content)
    }
}

fn user_prompt(question: &str, context: &str) -> String {
    format!("{}:\nQuestion{}", context, question)
}

fn parse_feedback(style: FeedbackStyle, content: &str) -> Result<Feedback, AppError> {
    match style {
        FeedbackStyle::Json => parse_json_content(content).map(Feedback::Structured),
        FeedbackStyle::Text => Ok(Feedback::Text(content.trim().to_string())),
    }
}
