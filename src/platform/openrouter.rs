// DayzWatch - platform/openrouter.rs
//
// Summariser backed by OpenRouter's OpenAI-compatible chat-completions API.
//
// The API key is sent as a bearer token and never logged.

use crate::app::source::Summarizer;
use crate::util::constants::{
    DEFAULT_OPENROUTER_MODEL, EMPTY_SUMMARY_PLACEHOLDER, OPENROUTER_BASE_URL,
    OPENROUTER_TIMEOUT_SECS,
};
use crate::util::error::SummarizeError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes DayZ server events.";

const PROMPT_HEADER: &[&str] = &[
    "You are monitoring a DayZ game server.",
    "Summarize the following log lines from the last minute.",
    "Highlight potential issues, kicks/bans, or anomalies in a concise bullet list.",
    "Log lines:",
];

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

// =============================================================================
// Client
// =============================================================================

/// Blocking OpenRouter client.
pub struct OpenRouterSummarizer {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for OpenRouterSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterSummarizer")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenRouterSummarizer {
    /// Create a client. An empty `model` falls back to `openrouter/auto`.
    pub fn new(api_key: &str, model: &str) -> Result<Self, SummarizeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(OPENROUTER_TIMEOUT_SECS))
            .build()
            .map_err(|source| SummarizeError::Http { source })?;
        let model = if model.trim().is_empty() {
            DEFAULT_OPENROUTER_MODEL
        } else {
            model
        };
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: OPENROUTER_BASE_URL.to_string(),
        })
    }

    /// Point the client at another OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Summarizer for OpenRouterSummarizer {
    fn summarize(&self, lines: &[String]) -> Result<String, SummarizeError> {
        let request = build_request(&self.model, lines);
        tracing::debug!(lines = lines.len(), model = %self.model, "Sending log lines to OpenRouter");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|source| SummarizeError::Http { source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "OpenRouter request failed");
            return Err(SummarizeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|source| SummarizeError::Http { source })?;
        let summary = summary_from_response(parsed)?;
        tracing::info!("Received response from OpenRouter");
        Ok(summary)
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// The user prompt: fixed instructions followed by the raw lines.
pub fn build_prompt(lines: &[String]) -> String {
    PROMPT_HEADER
        .iter()
        .copied()
        .chain(lines.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_request<'a>(model: &'a str, lines: &[String]) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user",
                content: build_prompt(lines),
            },
        ],
    }
}

/// First choice's content; a missing or empty content becomes a placeholder.
pub fn summary_from_response(response: ChatResponse) -> Result<String, SummarizeError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(SummarizeError::NoChoices)?;
    Ok(choice
        .message
        .content
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| EMPTY_SUMMARY_PLACEHOLDER.to_string()))
}
