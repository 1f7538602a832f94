//! Relay seam between a conversation and the model

use crate::types::ChatCompletionRequest;
use crate::Result;
use async_trait::async_trait;

/// Anything that can turn a chat completion request into an upstream response
///
/// Implemented by the direct upstream client and by the HTTP client that
/// talks to a remote `/api/chat` relay.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRelay: Send + Sync {
    /// Send the request and return the upstream JSON body
    async fn complete(&self, request: ChatCompletionRequest) -> Result<serde_json::Value>;
}
