//! Client for a remote `/api/chat` relay

use async_trait::async_trait;
use concierge_core::{ChatCompletionRequest, ChatRelay, ConciergeError, Result};
use serde_json::Value;
use tracing::debug;

/// Default relay endpoint
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3000/api/chat";

/// Sends full upstream payloads to a running relay
///
/// The payload always carries `model`, so the relay forwards it untouched.
#[derive(Debug, Clone)]
pub struct HttpRelay {
    client: reqwest::Client,
    url: String,
}

impl HttpRelay {
    /// Relay at `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Endpoint in use
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpRelay {
    fn default() -> Self {
        Self::new(DEFAULT_RELAY_URL)
    }
}

#[async_trait]
impl ChatRelay for HttpRelay {
    async fn complete(&self, request: ChatCompletionRequest) -> Result<Value> {
        let resp = self.client.post(&self.url).json(&request).send().await?;
        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .map_err(|e| ConciergeError::relay(format!("relay returned a non-JSON body: {}", e)))?;

        if !status.is_success() {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(ConciergeError::relay(format!("{} ({})", message, status)));
        }

        debug!(status = %status, "Relay answered");
        Ok(body)
    }
}
