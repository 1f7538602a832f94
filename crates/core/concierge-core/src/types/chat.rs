//! Chat-completion wire shapes
//!
//! Only the fields the concierge produces or reads are modelled. Relayed
//! payloads travel as raw `serde_json::Value` so nothing is lost in transit.

use super::Message;
use serde::{Deserialize, Serialize};

/// Default upstream model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// Default completion budget
pub const DEFAULT_MAX_TOKENS: u32 = 300;

/// Reply used when the upstream answer carries no content
pub const NO_RESPONSE: &str = "(no response)";

/// Upstream-shaped chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model identifier
    pub model: String,
    /// Ordered turns, system prompt first
    pub messages: Vec<Message>,
    /// Sampling temperature
    pub temperature: f64,
    /// Completion token budget
    pub max_tokens: u32,
}

impl ChatCompletionRequest {
    /// Build a request with the default sampling settings
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Override the temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override the completion budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Pull `choices[0].message.content` out of an upstream response
pub fn extract_reply(response: &serde_json::Value) -> Option<&str> {
    response
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
}

/// Reply text, falling back to [`NO_RESPONSE`] when absent or empty
pub fn reply_or_placeholder(response: &serde_json::Value) -> String {
    match extract_reply(response) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => NO_RESPONSE.to_string(),
    }
}
