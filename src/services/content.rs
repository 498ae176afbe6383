// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Unit generation through the chat-completion API.

use crate::error::AppError;
use crate::models::{Unit, UnitId};
use crate::services::ChatClient;

const SYSTEM_UNIT: &str = r#"You write short learning units for a tutoring app.
Given a topic, output a JSON object with this format:
{
    "title": "UNIT TITLE",
    "skills": ["SKILL", "..."],
    "LESSON1CONTENT": [
        {
            "content": "A SHORT TEACHING PARAGRAPH",
            "questions": [
                {
                    "question": "QUESTION ABOUT THE PARAGRAPH",
                    "options": ["OPTION A", "OPTION B", "OPTION C", "OPTION D"],
                    "answer": "THE CORRECT OPTION, COPIED EXACTLY"
                }
            ]
        }
    ]
}
Use 3 to 5 content blocks with 1 or 2 questions each.
"#;

/// Generates units for a topic.
#[derive(Clone)]
pub struct ContentGenerator {
    chat: ChatClient,
    model: String,
}

impl ContentGenerator {
    pub fn new(chat: ChatClient, model: &str) -> Self {
        Self {
            chat,
            model: model.to_string(),
        }
    }

    /// Generate a unit for `topic`, using `model` or the configured default.
    pub async fn generate_unit(&self, topic: &str, model: Option<&str>) -> Result<Unit, AppError> {
        let topic = topic.trim();
        self.request_unit(topic, format!("Topic: {}", topic), model)
            .await
    }

    /// Generate the unit at position `unit` of the learning path for `topic`.
    pub async fn generate_unit_at(
        &self,
        topic: &str,
        unit: UnitId,
        model: Option<&str>,
    ) -> Result<Unit, AppError> {
        let topic = topic.trim();
        self.request_unit(topic, path_unit_prompt(topic, unit), model)
            .await
    }

    async fn request_unit(
        &self,
        topic: &str,
        prompt: String,
        model: Option<&str>,
    ) -> Result<Unit, AppError> {
        if topic.is_empty() {
            return Err(AppError::BadRequest("topic must not be empty".to_string()));
        }

        let model = model.unwrap_or(self.model.as_str());
        let unit: Unit = self.chat.complete_json(model, SYSTEM_UNIT, &prompt).await?;

        if unit.question_count() == 0 {
            return Err(AppError::Llm(format!(
                "Unit for {:?} has no lesson questions",
                topic
            )));
        }

        tracing::info!(
            topic,
            model,
            items = unit.first_lesson().len(),
            questions = unit.question_count(),
            "Unit generated"
        );
        Ok(unit)
    }
}

fn path_unit_prompt(topic: &str, unit: UnitId) -> String {
    format!(
        "Topic: {}\nUnit {}: level {}, unit {} of {}. Build on the earlier units.",
        topic,
        unit,
        unit.level,
        unit.unit,
        UnitId::UNITS_PER_LEVEL
    )
}
