//! Shared test fixtures: a fake upstream and a relay on an ephemeral port

use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
use concierge_adaptor_web::{RelayServer, WebConfig};
use concierge_core::KnowledgeBase;
use concierge_provider_openai::OpenAIClient;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// Credential the fake upstream expects
pub const TEST_API_KEY: &str = "sk-test-concierge";

/// Requests seen by the fake upstream
#[derive(Default)]
pub struct MockUpstreamState {
    pub bodies: Mutex<Vec<Value>>,
    pub authorization: Mutex<Vec<String>>,
}

impl MockUpstreamState {
    pub fn calls(&self) -> usize {
        self.bodies.lock().unwrap().len()
    }

    pub fn last_body(&self) -> Value {
        self.bodies.lock().unwrap().last().cloned().unwrap_or(Value::Null)
    }
}

async fn chat_completions(
    State(state): State<Arc<MockUpstreamState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        state.authorization.lock().unwrap().push(auth.to_string());
    }
    let last = body["messages"]
        .as_array()
        .and_then(|m| m.last())
        .and_then(|m| m["content"].as_str())
        .unwrap_or_default()
        .to_string();
    state.bodies.lock().unwrap().push(body);

    Json(json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": format!("You asked: {}", last)},
            "finish_reason": "stop"
        }]
    }))
}

/// Start a fake chat-completion upstream; returns its `/v1` base URL
pub async fn start_mock_upstream() -> (String, Arc<MockUpstreamState>) {
    let state = Arc::new(MockUpstreamState::default());
    let app = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/v1", addr), state)
}

/// Serve a relay in front of `upstream_base`
pub async fn start_relay(upstream_base: &str) -> SocketAddr {
    let server = RelayServer::new(
        WebConfig::default(),
        Arc::new(KnowledgeBase::embedded().unwrap()),
        OpenAIClient::new(upstream_base).with_api_key(TEST_API_KEY),
    )
    .unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = server.router();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}
