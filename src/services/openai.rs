// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chat-completion API client.
//!
//! Handles:
//! - Bearer-authenticated requests to `{base_url}/chat/completions`
//! - JSON mode (`response_format: json_object`)
//! - Rate limit and auth failure detection
//!
//! There is no retry; failures go straight back to the caller.

use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Chat-completion client.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ChatClient {
    pub fn new(base_url: &str, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Send a system + user prompt and return the reply text.
    pub async fn complete(
        &self,
        model: &str,
        system: &str,
        user: &str,
        json_mode: bool,
    ) -> Result<String, AppError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            response_format: json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        tracing::debug!(model, json_mode, "Requesting chat completion");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Llm(e.to_string()))?;

        let body: ChatResponse = check_response_json(response).await?;
        extract_content(body)
    }

    /// Like [`complete`](Self::complete) in JSON mode, decoding the reply.
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<T, AppError> {
        let content = self.complete(model, system, user, true).await?;
        parse_json_content(&content)
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, &body));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Llm(format!("JSON parse error: {}", e)))
}

fn status_error(status: reqwest::StatusCode, body: &str) -> AppError {
    match status.as_u16() {
        429 => {
            tracing::warn!("Chat completion rate limit hit (429)");
            AppError::Llm(AppError::LLM_RATE_LIMIT.to_string())
        }
        401 => AppError::Llm(AppError::LLM_AUTH_ERROR.to_string()),
        _ => AppError::Llm(format!("HTTP {}: {}", status, body)),
    }
}

/// First choice's message content; missing or null content is an error.
fn extract_content(body: ChatResponse) -> Result<String, AppError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(AppError::EmptyResponse)
}

pub(crate) fn parse_json_content<T: DeserializeOwned>(content: &str) -> Result<T, AppError> {
    serde_json::from_str(content.trim())
        .map_err(|e| AppError::Llm(format!("JSON parse error: {}", e)))
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
