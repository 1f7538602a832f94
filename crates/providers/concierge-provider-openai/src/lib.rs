//! OpenAI chat-completion upstream for the concierge relay
//!
//! [`OpenAIClient`] posts a JSON payload to `{base_url}/chat/completions` and
//! hands back whatever JSON the upstream returned. [`PayloadWrapper`] turns a
//! bare `{messages}` body into a full upstream request carrying the hotel
//! knowledge base as its system prompt.

#![warn(missing_docs)]
#![warn(clippy::all)]

use async_trait::async_trait;
use concierge_core::{
    get_env_or, get_required_env, ChatCompletionRequest, ChatRelay, ConciergeError, KnowledgeBase,
    Message, PromptStyle, Result, TemplateEngine, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE,
};
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Default upstream API root
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variable holding the upstream credential
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Shared HTTP client for connection pooling
static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

/// Get or initialize the shared HTTP client
fn get_http_client() -> Client {
    HTTP_CLIENT
        .get_or_init(|| {
            Client::builder()
                .pool_max_idle_per_host(16)
                .pool_idle_timeout(std::time::Duration::from_secs(300))
                .tcp_keepalive(std::time::Duration::from_secs(60))
                .build()
                .unwrap_or_default()
        })
        .clone()
}

/// Upstream chat-completion client
///
/// The credential is looked up on every call unless one was pinned with
/// [`OpenAIClient::with_api_key`].
#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl OpenAIClient {
    /// Client for the given API root, e.g. `https://api.openai.com/v1`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: get_http_client(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Client for `OPENAI_BASE_URL`, or the public API
    pub fn from_env() -> Self {
        Self::new(get_env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL))
    }

    /// Use a fixed credential instead of reading the environment
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Full chat-completions endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn api_key(&self) -> Result<String> {
        match &self.api_key {
            Some(key) => Ok(key.clone()),
            None => get_required_env(API_KEY_ENV),
        }
    }

    /// Post `payload` upstream and return the response body as JSON
    ///
    /// A non-2xx upstream status is not an error: its JSON body is returned
    /// like any other. Fails on a missing credential (before any network
    /// traffic), on transport errors and on a body that is not JSON.
    pub async fn forward(&self, payload: &Value) -> Result<Value> {
        let api_key = self.api_key()?;

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = %status, "Upstream answered with a non-success status");
        }

        let body = resp.text().await?;
        let value = serde_json::from_str::<Value>(&body).map_err(|e| {
            ConciergeError::model(format!("upstream returned a non-JSON body ({}): {}", status, e))
        })?;
        debug!(status = %status, "Upstream response received");
        Ok(value)
    }
}

#[async_trait]
impl ChatRelay for OpenAIClient {
    async fn complete(&self, request: ChatCompletionRequest) -> Result<Value> {
        let payload = serde_json::to_value(&request)?;
        self.forward(&payload).await
    }
}

/// Builds upstream requests from bare `{messages}` bodies
#[derive(Debug, Clone)]
pub struct PayloadWrapper {
    model: String,
    system_prompt: Message,
    temperature: f64,
    max_tokens: u32,
}

impl PayloadWrapper {
    /// Wrapper with the default sampling settings
    pub fn new(model: impl Into<String>, system_prompt: Message) -> Self {
        Self {
            model: model.into(),
            system_prompt,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Wrapper whose system prompt embeds `knowledge`
    pub fn from_knowledge(
        model: impl Into<String>,
        style: PromptStyle,
        knowledge: &KnowledgeBase,
    ) -> Result<Self> {
        let system_prompt = TemplateEngine::new()?.system_message(style, knowledge)?;
        Ok(Self::new(model, system_prompt))
    }

    /// Wrapper for the default model
    pub fn with_default_model(style: PromptStyle, knowledge: &KnowledgeBase) -> Result<Self> {
        Self::from_knowledge(DEFAULT_MODEL, style, knowledge)
    }

    /// Model used for wrapped requests
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Turn a relay body into an upstream payload
    ///
    /// Bodies that already name a `model` pass through untouched. Anything
    /// else has its `messages` array (missing or malformed means empty)
    /// prefixed with the system prompt.
    pub fn prepare(&self, body: Value) -> Value {
        if body.get("model").is_some() {
            return body;
        }

        let mut messages = vec![json!({
            "role": self.system_prompt.role,
            "content": self.system_prompt.content,
        })];
        if let Some(Value::Array(items)) = body.get("messages") {
            messages.extend(items.iter().cloned());
        }

        json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }
}
