//! Web adaptor for the concierge
//!
//! Serves the model relay at `/api/chat`, a browser UI at `/` and a small
//! session API that runs conversations server side.

#![warn(missing_docs)]

mod handlers;
mod page;
mod session;

pub use handlers::{ApiError, MessageInput, MessageOutput, RELAY_ERROR_MESSAGE};
pub use page::render_index;
pub use session::{Session, SessionStore, SessionView};

use axum::routing::{any, get, post};
use axum::Router;
use concierge_core::{
    get_env_int, get_env_opt, get_env_or, ChatRelay, ConciergeError, ControllerConfig,
    KnowledgeBase, NoSpeech, Result,
};
use concierge_provider_openai::{OpenAIClient, PayloadWrapper};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// How often idle sessions are swept
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Web server settings
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Idle time after which a session is discarded
    pub session_ttl: Duration,
    /// Knowledge base file; the built-in one when unset
    pub knowledge_path: Option<PathBuf>,
    /// Settings for server-side conversations and wrapped relay calls
    pub controller: ControllerConfig,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            session_ttl: Duration::from_secs(3600),
            knowledge_path: None,
            controller: ControllerConfig::default(),
        }
    }
}

impl WebConfig {
    /// Settings from `CONCIERGE_*` variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            host: get_env_or("CONCIERGE_HOST", &defaults.host),
            port: get_env_int("CONCIERGE_PORT", defaults.port),
            session_ttl: Duration::from_secs(get_env_int(
                "CONCIERGE_SESSION_TTL_SECS",
                defaults.session_ttl.as_secs(),
            )),
            knowledge_path: get_env_opt("CONCIERGE_KB_PATH").map(PathBuf::from),
            controller: ControllerConfig::from_env()?,
        })
    }

    /// `host:port`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    upstream: Arc<OpenAIClient>,
    wrapper: Arc<PayloadWrapper>,
    sessions: Arc<SessionStore>,
}

/// The concierge HTTP server
#[derive(Clone)]
pub struct RelayServer {
    config: Arc<WebConfig>,
    state: AppState,
}

impl RelayServer {
    /// Server relaying through `upstream`
    pub fn new(config: WebConfig, knowledge: Arc<KnowledgeBase>, upstream: OpenAIClient) -> Result<Self> {
        let wrapper = PayloadWrapper::from_knowledge(
            config.controller.model.clone(),
            config.controller.prompt_style,
            &knowledge,
        )?;
        let upstream = Arc::new(upstream);
        let relay: Arc<dyn ChatRelay> = upstream.clone();
        let sessions = SessionStore::new(
            config.session_ttl,
            config.controller.clone(),
            knowledge,
            relay,
            Arc::new(NoSpeech),
        );

        Ok(Self {
            config: Arc::new(config),
            state: AppState {
                upstream,
                wrapper: Arc::new(wrapper),
                sessions: Arc::new(sessions),
            },
        })
    }

    /// Server configured entirely from the environment
    pub fn from_env() -> Result<Self> {
        let config = WebConfig::from_env()?;
        let knowledge = KnowledgeBase::load(config.knowledge_path.as_deref())?;
        Self::new(config, Arc::new(knowledge), OpenAIClient::from_env())
    }

    /// Settings in use
    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    /// Session registry
    pub fn sessions(&self) -> Arc<SessionStore> {
        self.state.sessions.clone()
    }

    /// All routes with CORS and request tracing
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(handlers::index))
            .route("/health", get(handlers::health))
            .route("/api/chat", any(handlers::relay_chat))
            .route("/api/sessions", post(handlers::create_session))
            .route(
                "/api/sessions/:id",
                get(handlers::get_session).delete(handlers::delete_session),
            )
            .route("/api/sessions/:id/messages", post(handlers::post_message))
            .with_state(self.state.clone())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Bind and serve until Ctrl-C
    pub async fn run(&self) -> Result<()> {
        let addr = self.config.addr();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| ConciergeError::config(format!("Failed to bind to {}: {}", addr, e)))?;
        info!("Concierge listening on http://{}", addr);

        let sessions = self.state.sessions.clone();
        let sweeper = tokio::spawn(async move {
            let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                sessions.cleanup_expired();
                debug!("Session sweep completed. Live sessions: {}", sessions.len());
            }
        });

        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutting down");
            })
            .await;
        sweeper.abort();
        result.map_err(ConciergeError::from)
    }
}
