//! Server-side conversation sessions

use concierge_core::{
    ChatRelay, ControllerConfig, ConversationController, ConversationSnapshot, KnowledgeBase,
    Result, SpeechIo, SAMPLE_QUESTIONS,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

/// One guest conversation
///
/// The controller orders relay-bound submissions itself; readers and
/// human-agent requests never wait on an in-flight relay call.
pub struct Session {
    id: Uuid,
    controller: ConversationController,
    last_active: std::sync::Mutex<Instant>,
}

impl Session {
    /// Session id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The conversation; marks the session active
    pub fn controller(&self) -> &ConversationController {
        self.touch();
        &self.controller
    }

    /// Current view of the conversation
    pub fn view(&self) -> SessionView {
        SessionView::new(self.id, self.controller().snapshot())
    }

    fn touch(&self) {
        if let Ok(mut last) = self.last_active.lock() {
            *last = Instant::now();
        }
    }

    fn idle_for(&self) -> Duration {
        self.last_active
            .lock()
            .map(|last| last.elapsed())
            .unwrap_or_default()
    }
}

/// JSON view of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    /// Session id
    pub id: Uuid,
    /// History, callbacks and status
    #[serde(flatten)]
    pub snapshot: ConversationSnapshot,
    /// One-tap prompts for the UI
    pub sample_questions: &'static [&'static str],
}

impl SessionView {
    fn new(id: Uuid, snapshot: ConversationSnapshot) -> Self {
        Self {
            id,
            snapshot,
            sample_questions: &SAMPLE_QUESTIONS,
        }
    }
}

/// Live sessions keyed by id, expired after a period of inactivity
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
    ttl: Duration,
    config: ControllerConfig,
    knowledge: Arc<KnowledgeBase>,
    relay: Arc<dyn ChatRelay>,
    speech: Arc<dyn SpeechIo>,
}

impl SessionStore {
    /// Empty store; new sessions share `knowledge`, `relay` and `speech`
    pub fn new(
        ttl: Duration,
        config: ControllerConfig,
        knowledge: Arc<KnowledgeBase>,
        relay: Arc<dyn ChatRelay>,
        speech: Arc<dyn SpeechIo>,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
            config,
            knowledge,
            relay,
            speech,
        }
    }

    /// Start a new conversation
    pub fn create(&self) -> Result<Arc<Session>> {
        let controller = ConversationController::new(
            self.config.clone(),
            self.knowledge.clone(),
            self.relay.clone(),
            self.speech.clone(),
        )?;
        let session = Arc::new(Session {
            id: Uuid::new_v4(),
            controller,
            last_active: std::sync::Mutex::new(Instant::now()),
        });
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(session.id, session.clone());
        }
        info!(session_id = %session.id, "Session created");
        Ok(session)
    }

    /// Look up a live session
    pub fn get(&self, id: &Uuid) -> Option<Arc<Session>> {
        let sessions = self.sessions.read().ok()?;
        sessions.get(id).cloned()
    }

    /// Discard a session; false when it did not exist
    pub fn remove(&self, id: &Uuid) -> bool {
        let removed = self
            .sessions
            .write()
            .map(|mut sessions| sessions.remove(id).is_some())
            .unwrap_or(false);
        if removed {
            info!(session_id = %id, "Session discarded");
        }
        removed
    }

    /// Drop sessions idle for longer than the TTL
    pub fn cleanup_expired(&self) -> usize {
        let Ok(mut sessions) = self.sessions.write() else {
            return 0;
        };
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for() < self.ttl);
        let expired = before - sessions.len();
        if expired > 0 {
            debug!(expired, remaining = sessions.len(), "Expired idle sessions");
        }
        expired
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    /// True when no session is live
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::{ConciergeError, NoSpeech, GREETING};

    struct FailingRelay;

    #[async_trait::async_trait]
    impl ChatRelay for FailingRelay {
        async fn complete(
            &self,
            _request: concierge_core::ChatCompletionRequest,
        ) -> Result<serde_json::Value> {
            Err(ConciergeError::relay("offline"))
        }
    }

    fn store(ttl: Duration) -> SessionStore {
        SessionStore::new(
            ttl,
            ControllerConfig::default(),
            Arc::new(KnowledgeBase::embedded().unwrap()),
            Arc::new(FailingRelay),
            Arc::new(NoSpeech),
        )
    }

    #[tokio::test]
    async fn test_create_get_remove() {
        let store = store(Duration::from_secs(60));
        let session = store.create().unwrap();
        assert_eq!(store.len(), 1);

        let found = store.get(&session.id()).unwrap();
        let view = found.view();
        assert_eq!(view.snapshot.messages[0].content, GREETING);
        assert_eq!(view.sample_questions.len(), 5);

        assert!(store.remove(&session.id()));
        assert!(!store.remove(&session.id()));
        assert!(store.get(&session.id()).is_none());
    }

    #[tokio::test]
    async fn test_cleanup_drops_idle_sessions() {
        let store = store(Duration::ZERO);
        store.create().unwrap();
        store.create().unwrap();
        assert_eq!(store.cleanup_expired(), 2);
        assert!(store.is_empty());

        let store_long = self::store(Duration::from_secs(3600));
        store_long.create().unwrap();
        assert_eq!(store_long.cleanup_expired(), 0);
        assert_eq!(store_long.len(), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = store(Duration::from_secs(60));
        let a = store.create().unwrap();
        let b = store.create().unwrap();

        a.controller().submit("talk to a human").await.unwrap();

        assert_eq!(a.view().snapshot.callbacks.len(), 1);
        assert!(b.view().snapshot.callbacks.is_empty());
    }
}
