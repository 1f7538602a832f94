//! Session-scoped conversation controller

use super::status::{ConversationState, Status};
use super::{FALLBACK_REPLY, GREETING, RELAY_FAILURE_REPLY};
use crate::callback::{CallbackLog, CallbackLogEntry};
use crate::config::{get_env_bool, get_env_float, get_env_int, get_env_or};
use crate::handoff::{HandoffDetector, HANDOFF_REPLY};
use crate::knowledge::KnowledgeBase;
use crate::relay::ChatRelay;
use crate::speech::{SpeechIo, CAPTURE_UNAVAILABLE};
use crate::templates::{PromptStyle, TemplateEngine};
use crate::types::{
    reply_or_placeholder, ChatCompletionRequest, Message, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE,
};
use crate::{ConciergeError, Result};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Number of most recent turns forwarded upstream, the new message included
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Controller settings
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    /// Model requested from the relay
    pub model: String,
    /// Sampling temperature
    pub temperature: f64,
    /// Completion budget
    pub max_tokens: u32,
    /// Turns forwarded per request
    pub history_window: usize,
    /// Use the relay; when false, answer from the knowledge base locally
    pub ai_enabled: bool,
    /// System prompt style
    pub prompt_style: PromptStyle,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            history_window: DEFAULT_HISTORY_WINDOW,
            ai_enabled: true,
            prompt_style: PromptStyle::default(),
        }
    }
}

impl ControllerConfig {
    /// Read overrides from the environment
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            model: get_env_or("OPENAI_MODEL", &defaults.model),
            temperature: get_env_float("CONCIERGE_TEMPERATURE", defaults.temperature),
            max_tokens: get_env_int("CONCIERGE_MAX_TOKENS", defaults.max_tokens),
            history_window: get_env_int("CONCIERGE_HISTORY_WINDOW", defaults.history_window)
                .max(1),
            ai_enabled: get_env_bool("CONCIERGE_AI_ENABLED", defaults.ai_enabled),
            prompt_style: get_env_or("CONCIERGE_PROMPT_STYLE", "conversational").parse()?,
        })
    }
}

/// How a submission was handled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Routed to staff; the model was not called
    Handoff {
        /// The logged callback request
        callback: CallbackLogEntry,
    },
    /// The relay answered
    Answered,
    /// The relay failed and the fixed apology was appended
    RelayFailed,
    /// Relay disabled; answered locally
    Fallback,
}

/// Result of one submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    /// Assistant turn appended to history
    pub reply: String,
    /// Which path produced it
    pub outcome: Outcome,
}

/// Serializable view of a conversation
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSnapshot {
    /// Turns in order
    pub messages: Vec<Message>,
    /// Callback requests, newest first
    pub callbacks: Vec<CallbackLogEntry>,
    /// Current status
    pub status: Status,
}

/// History and callback log
struct Transcript {
    history: Vec<Message>,
    callbacks: CallbackLog,
}

/// Owns one guest conversation: history, callback log and status
///
/// All methods take `&self`. History and callbacks sit behind a lock that is
/// never held across an `.await`, so reads and human-agent requests are
/// answered immediately even while a relay call is in flight. Relay-bound
/// submissions wait for their turn on a separate queue and are answered in
/// arrival order.
pub struct ConversationController {
    config: ControllerConfig,
    knowledge: Arc<KnowledgeBase>,
    system_prompt: Message,
    relay: Arc<dyn ChatRelay>,
    speech: Arc<dyn SpeechIo>,
    detector: HandoffDetector,
    transcript: Mutex<Transcript>,
    relay_turn: tokio::sync::Mutex<()>,
    status_tx: watch::Sender<Status>,
}

impl ConversationController {
    /// Start a conversation with the greeting as its first turn
    pub fn new(
        config: ControllerConfig,
        knowledge: Arc<KnowledgeBase>,
        relay: Arc<dyn ChatRelay>,
        speech: Arc<dyn SpeechIo>,
    ) -> Result<Self> {
        let system_prompt =
            TemplateEngine::new()?.system_message(config.prompt_style, &knowledge)?;
        let initial = if speech.support().capture {
            Status::default()
        } else {
            Status::with_notice(ConversationState::Ready, CAPTURE_UNAVAILABLE)
        };
        let (status_tx, _) = watch::channel(initial);
        Ok(Self {
            config,
            knowledge,
            system_prompt,
            relay,
            speech,
            detector: HandoffDetector::new(),
            transcript: Mutex::new(Transcript {
                history: vec![Message::assistant(GREETING)],
                callbacks: CallbackLog::new(),
            }),
            relay_turn: tokio::sync::Mutex::new(()),
            status_tx,
        })
    }

    fn transcript(&self) -> MutexGuard<'_, Transcript> {
        // A panic mid-update leaves plain data behind; keep serving it
        self.transcript
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Turns so far, oldest first
    pub fn history(&self) -> Vec<Message> {
        self.transcript().history.clone()
    }

    /// Callback requests, newest first
    pub fn callbacks(&self) -> Vec<CallbackLogEntry> {
        self.transcript().callbacks.entries().cloned().collect()
    }

    /// Current status
    pub fn status(&self) -> Status {
        self.status_tx.borrow().clone()
    }

    /// Watch status changes, e.g. to drive a status line
    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.status_tx.subscribe()
    }

    /// Copy of everything a renderer needs
    pub fn snapshot(&self) -> ConversationSnapshot {
        let transcript = self.transcript();
        ConversationSnapshot {
            messages: transcript.history.clone(),
            callbacks: transcript.callbacks.entries().cloned().collect(),
            status: self.status(),
        }
    }

    fn publish(&self, status: Status) {
        self.status_tx.send_replace(status);
    }

    fn set_state(&self, state: ConversationState) {
        self.publish(Status::new(state));
    }

    /// Append the user turn and a locally produced reply, then speak it
    fn answer_locally(&self, text: &str, reply: &str) {
        {
            let mut transcript = self.transcript();
            transcript.history.push(Message::user(text));
            transcript.history.push(Message::assistant(reply));
        }
        self.speech.speak(reply);
    }

    fn request_for(&self, history: &[Message]) -> ChatCompletionRequest {
        let start = history.len().saturating_sub(self.config.history_window);
        let mut messages = Vec::with_capacity(history.len() - start + 1);
        messages.push(self.system_prompt.clone());
        messages.extend(history[start..].iter().cloned());
        ChatCompletionRequest::new(self.config.model.clone(), messages)
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens)
    }

    /// The upstream request for the current history
    pub fn build_request(&self) -> ChatCompletionRequest {
        self.request_for(&self.transcript().history)
    }

    /// Submit typed, spoken or sample-button text
    ///
    /// A human-agent request is answered and logged on the spot, whatever else
    /// is in flight. Anything else waits for earlier relay-bound submissions,
    /// then appends its user turn and goes to the relay. A relay failure is
    /// not an error here: it becomes the fixed apology turn.
    pub async fn submit(&self, text: &str) -> Result<Submission> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ConciergeError::validation("message text cannot be empty"));
        }

        if let Some(term) = self.detector.matched_term(text) {
            let callback = {
                let mut transcript = self.transcript();
                let callback = transcript.callbacks.record(text).clone();
                transcript.history.push(Message::user(text));
                transcript.history.push(Message::assistant(HANDOFF_REPLY));
                callback
            };
            info!(callback_id = callback.id, term = %term, "Guest asked for staff, callback logged");
            self.speech.speak(HANDOFF_REPLY);
            return Ok(Submission {
                reply: HANDOFF_REPLY.to_string(),
                outcome: Outcome::Handoff { callback },
            });
        }

        if !self.config.ai_enabled {
            let reply = self.local_answer(text);
            self.answer_locally(text, &reply);
            return Ok(Submission {
                reply,
                outcome: Outcome::Fallback,
            });
        }

        let _turn = self.relay_turn.lock().await;
        let request = {
            let mut transcript = self.transcript();
            transcript.history.push(Message::user(text));
            self.request_for(&transcript.history)
        };
        debug!(turns = request.messages.len(), "Forwarding conversation to relay");
        self.set_state(ConversationState::Busy);
        let (reply, outcome) = match self.relay.complete(request).await {
            Ok(body) => (reply_or_placeholder(&body), Outcome::Answered),
            Err(e) => {
                warn!(error = %e, "Relay call failed");
                (RELAY_FAILURE_REPLY.to_string(), Outcome::RelayFailed)
            }
        };
        self.transcript()
            .history
            .push(Message::assistant(reply.clone()));
        self.set_state(ConversationState::Ready);
        self.speech.speak(&reply);
        Ok(Submission { reply, outcome })
    }

    /// Capture one utterance and submit it
    ///
    /// Returns `Ok(None)` when nothing was submitted: no recognizer, an empty
    /// transcript, or a recognition error (reported through the status).
    pub async fn listen(&self) -> Result<Option<Submission>> {
        if !self.speech.support().capture {
            self.publish(Status::with_notice(
                ConversationState::Ready,
                CAPTURE_UNAVAILABLE,
            ));
            return Ok(None);
        }

        self.set_state(ConversationState::Listening);
        match self.speech.capture().await {
            Ok(transcript) => {
                self.set_state(ConversationState::Ready);
                if transcript.trim().is_empty() {
                    return Ok(None);
                }
                self.submit(&transcript).await.map(Some)
            }
            Err(e) => {
                warn!(error = %e, "Speech recognition failed");
                let cause = match e {
                    ConciergeError::Speech(cause) => cause,
                    other => other.to_string(),
                };
                self.publish(Status::with_notice(
                    ConversationState::Ready,
                    format!("Recognition error: {}", cause),
                ));
                Ok(None)
            }
        }
    }

    fn local_answer(&self, text: &str) -> String {
        match self.knowledge.lookup(text) {
            Some((_, _, entry)) => match &entry.name {
                Some(name) => format!("{}: {}", name, entry.description),
                None => entry.description.clone(),
            },
            None => FALLBACK_REPLY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::MockChatRelay;
    use crate::speech::{MockSpeechIo, SpeechSupport};
    use crate::types::Role;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn knowledge() -> Arc<KnowledgeBase> {
        Arc::new(KnowledgeBase::embedded().unwrap())
    }

    fn upstream_reply(text: &str) -> serde_json::Value {
        json!({"choices": [{"message": {"role": "assistant", "content": text}}]})
    }

    fn quiet_speech(capture: bool) -> MockSpeechIo {
        let mut speech = MockSpeechIo::new();
        speech.expect_support().return_const(SpeechSupport {
            capture,
            output: true,
        });
        speech.expect_speak().return_const(());
        speech
    }

    fn controller(relay: MockChatRelay, speech: MockSpeechIo) -> ConversationController {
        ConversationController::new(
            ControllerConfig::default(),
            knowledge(),
            Arc::new(relay),
            Arc::new(speech),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_starts_with_greeting() {
        let ctl = controller(MockChatRelay::new(), quiet_speech(true));
        assert_eq!(ctl.history(), vec![Message::assistant(GREETING)]);
        assert!(ctl.callbacks().is_empty());
        assert_eq!(ctl.status(), Status::default());
    }

    #[tokio::test]
    async fn test_dinner_question_goes_to_relay() {
        let dinner = knowledge().get("dining", "dinner").unwrap().description.clone();
        let mut relay = MockChatRelay::new();
        relay
            .expect_complete()
            .times(1)
            .withf(move |req: &ChatCompletionRequest| {
                req.messages[0].role == Role::System
                    && req.messages[0].content.contains(&dinner)
                    && req.messages.last().map(|m| m.content.as_str())
                        == Some("What time is dinner served?")
                    && req.model == DEFAULT_MODEL
                    && req.max_tokens == 300
            })
            .returning(|_| Ok(upstream_reply("Dinner runs 6 PM to 10 PM on the rooftop.")));

        let mut speech = MockSpeechIo::new();
        speech.expect_support().return_const(SpeechSupport {
            capture: true,
            output: true,
        });
        speech
            .expect_speak()
            .times(1)
            .withf(|text| text.contains("rooftop"))
            .return_const(());

        let ctl = controller(relay, speech);
        let submission = ctl.submit("  What time is dinner served?  ").await.unwrap();

        assert_eq!(submission.outcome, Outcome::Answered);
        assert_eq!(submission.reply, "Dinner runs 6 PM to 10 PM on the rooftop.");
        assert_eq!(ctl.history().len(), 3);
        assert_eq!(ctl.history()[1], Message::user("What time is dinner served?"));
        assert_eq!(ctl.status().state, ConversationState::Ready);
    }

    #[tokio::test]
    async fn test_person_request_is_handed_off() {
        let mut relay = MockChatRelay::new();
        relay.expect_complete().times(0);

        let mut speech = MockSpeechIo::new();
        speech.expect_support().return_const(SpeechSupport::default());
        speech
            .expect_speak()
            .times(1)
            .withf(|text| text.contains("notified our staff"))
            .return_const(());

        let ctl = controller(relay, speech);
        let submission = ctl.submit("I want to talk to a person").await.unwrap();

        assert_eq!(submission.reply, HANDOFF_REPLY);
        match submission.outcome {
            Outcome::Handoff { callback } => {
                assert_eq!(callback.user_text, "I want to talk to a person");
                assert_eq!(callback.phone, crate::callback::PLACEHOLDER_PHONE);
            }
            other => panic!("expected handoff, got {:?}", other),
        }
        assert_eq!(ctl.callbacks().len(), 1);
        assert_eq!(ctl.history().len(), 3);
        assert_eq!(ctl.history()[2], Message::assistant(HANDOFF_REPLY));
    }

    #[tokio::test]
    async fn test_relay_failure_then_resubmit_appends_new_pair() {
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        let mut relay = MockChatRelay::new();
        relay.expect_complete().times(2).returning(move |_| {
            let mut n = counter.lock().unwrap();
            *n += 1;
            if *n == 1 {
                Err(ConciergeError::relay("connection refused"))
            } else {
                Ok(upstream_reply("Yes, a suite is available."))
            }
        });

        let ctl = controller(relay, quiet_speech(true));
        let first = ctl.submit("Do you have a suite available?").await.unwrap();
        assert_eq!(first.outcome, Outcome::RelayFailed);
        assert_eq!(first.reply, RELAY_FAILURE_REPLY);

        let before: Vec<Message> = ctl.history().to_vec();
        let second = ctl.submit("Do you have a suite available?").await.unwrap();
        assert_eq!(second.outcome, Outcome::Answered);

        assert_eq!(ctl.history().len(), before.len() + 2);
        assert_eq!(&ctl.history()[..before.len()], before.as_slice());
        assert_eq!(ctl.status().state, ConversationState::Ready);
    }

    #[tokio::test]
    async fn test_missing_content_becomes_placeholder() {
        let mut relay = MockChatRelay::new();
        relay
            .expect_complete()
            .returning(|_| Ok(json!({"error": {"message": "invalid api key"}})));

        let ctl = controller(relay, quiet_speech(true));
        let submission = ctl.submit("Tell me about the romantic package").await.unwrap();
        assert_eq!(submission.reply, crate::types::NO_RESPONSE);
        assert_eq!(submission.outcome, Outcome::Answered);
    }

    #[tokio::test]
    async fn test_only_recent_window_is_forwarded() {
        let sizes = Arc::new(Mutex::new(Vec::new()));
        let seen = sizes.clone();
        let mut relay = MockChatRelay::new();
        relay.expect_complete().returning(move |req| {
            seen.lock().unwrap().push((
                req.messages.len(),
                req.messages.last().map(|m| m.content.clone()),
            ));
            Ok(upstream_reply("ok"))
        });

        let ctl = controller(relay, quiet_speech(true));
        for i in 0..8 {
            ctl.submit(&format!("question {}", i)).await.unwrap();
        }

        let sizes = sizes.lock().unwrap();
        // greeting + q0 forwarded on the first call
        assert_eq!(sizes[0].0, 1 + 2);
        // later calls are capped at the window plus the system prompt
        assert!(sizes.iter().all(|(n, _)| *n <= DEFAULT_HISTORY_WINDOW + 1));
        assert_eq!(sizes[7].0, DEFAULT_HISTORY_WINDOW + 1);
        assert_eq!(sizes[7].1.as_deref(), Some("question 7"));
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected_without_touching_history() {
        let mut relay = MockChatRelay::new();
        relay.expect_complete().times(0);
        let ctl = controller(relay, quiet_speech(true));

        let err = ctl.submit("   ").await.unwrap_err();
        assert!(matches!(err, ConciergeError::Validation(_)));
        assert_eq!(ctl.history().len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_when_ai_disabled() {
        let mut relay = MockChatRelay::new();
        relay.expect_complete().times(0);
        let ctl = ConversationController::new(
            ControllerConfig {
                ai_enabled: false,
                ..Default::default()
            },
            knowledge(),
            Arc::new(relay),
            Arc::new(quiet_speech(true)),
        )
        .unwrap();

        let known = ctl.submit("Do you have a suite available?").await.unwrap();
        assert_eq!(known.outcome, Outcome::Fallback);
        assert!(known.reply.starts_with("Suite: Spacious"));

        let unknown = ctl.submit("How do I check in after midnight?").await.unwrap();
        assert_eq!(unknown.reply, FALLBACK_REPLY);

        // handoff still wins over the fallback
        let handoff = ctl.submit("operator please").await.unwrap();
        assert!(matches!(handoff.outcome, Outcome::Handoff { .. }));
    }

    #[tokio::test]
    async fn test_listen_submits_transcript() {
        let mut relay = MockChatRelay::new();
        relay
            .expect_complete()
            .times(1)
            .returning(|_| Ok(upstream_reply("We can arrange balloons.")));
        let mut speech = quiet_speech(true);
        speech
            .expect_capture()
            .times(1)
            .returning(|| Ok("Can you plan a birthday surprise?".to_string()));

        let ctl = controller(relay, speech);
        let mut status_rx = ctl.subscribe();
        let submission = ctl.listen().await.unwrap().unwrap();

        assert_eq!(submission.reply, "We can arrange balloons.");
        assert_eq!(ctl.history()[1], Message::user("Can you plan a birthday surprise?"));
        assert!(status_rx.has_changed().unwrap());
        assert_eq!(status_rx.borrow_and_update().state, ConversationState::Ready);
    }

    #[tokio::test]
    async fn test_listen_error_sets_notice() {
        let mut relay = MockChatRelay::new();
        relay.expect_complete().times(0);
        let mut speech = quiet_speech(true);
        speech
            .expect_capture()
            .returning(|| Err(ConciergeError::speech("no-speech")));

        let ctl = controller(relay, speech);
        assert!(ctl.listen().await.unwrap().is_none());

        let status = ctl.status();
        assert_eq!(status.state, ConversationState::Ready);
        assert_eq!(status.to_string(), "Recognition error: no-speech");
        assert_eq!(ctl.history().len(), 1);
    }

    #[tokio::test]
    async fn test_listen_without_recognizer_degrades() {
        let mut relay = MockChatRelay::new();
        relay.expect_complete().times(0);
        let mut speech = quiet_speech(false);
        speech.expect_capture().times(0);

        let ctl = controller(relay, speech);
        assert_eq!(ctl.status().notice.as_deref(), Some(CAPTURE_UNAVAILABLE));
        assert!(ctl.listen().await.unwrap().is_none());
        assert_eq!(ctl.status().notice.as_deref(), Some(CAPTURE_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_snapshot_lists_callbacks_newest_first() {
        let ctl = controller(MockChatRelay::new(), quiet_speech(true));
        ctl.submit("talk to a human").await.unwrap();
        ctl.submit("get me an agent").await.unwrap();

        let snapshot = ctl.snapshot();
        assert_eq!(snapshot.callbacks.len(), 2);
        assert_eq!(snapshot.callbacks[0].user_text, "get me an agent");
        assert_eq!(snapshot.messages.len(), 5);
    }

    /// Relay that holds any message containing "slow" until released
    #[derive(Default)]
    struct GatedRelay {
        gate: Notify,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl ChatRelay for GatedRelay {
        async fn complete(&self, request: ChatCompletionRequest) -> Result<serde_json::Value> {
            let last = request
                .messages
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default();
            self.seen.lock().unwrap().push(last.clone());
            if last.contains("slow") {
                self.gate.notified().await;
            }
            Ok(upstream_reply(&format!("re: {}", last)))
        }
    }

    fn shared_controller(relay: Arc<GatedRelay>) -> Arc<ConversationController> {
        Arc::new(
            ConversationController::new(
                ControllerConfig::default(),
                knowledge(),
                relay,
                Arc::new(quiet_speech(true)),
            )
            .unwrap(),
        )
    }

    fn contents(ctl: &ConversationController) -> Vec<String> {
        ctl.history().into_iter().map(|m| m.content).collect()
    }

    #[tokio::test]
    async fn test_handoff_answers_while_relay_call_is_pending() {
        let relay = Arc::new(GatedRelay::default());
        let ctl = shared_controller(relay.clone());
        let mut status_rx = ctl.subscribe();

        let pending = tokio::spawn({
            let ctl = ctl.clone();
            async move { ctl.submit("slow: what time is dinner served?").await }
        });
        status_rx
            .wait_for(|s| s.state == ConversationState::Busy)
            .await
            .unwrap();

        let handoff = tokio::time::timeout(
            Duration::from_millis(500),
            ctl.submit("I want to talk to a person"),
        )
        .await
        .expect("handoff must not wait for the relay")
        .unwrap();
        assert!(matches!(handoff.outcome, Outcome::Handoff { .. }));

        // Readable mid-call, and still busy
        let snapshot = ctl.snapshot();
        assert_eq!(snapshot.status.state, ConversationState::Busy);
        assert_eq!(snapshot.callbacks.len(), 1);

        relay.gate.notify_one();
        let answered = pending.await.unwrap().unwrap();
        assert_eq!(answered.reply, "re: slow: what time is dinner served?");
        assert_eq!(
            contents(&ctl)[1..],
            [
                "slow: what time is dinner served?",
                "I want to talk to a person",
                HANDOFF_REPLY,
                "re: slow: what time is dinner served?",
            ]
        );
        assert_eq!(relay.seen.lock().unwrap().len(), 1);
        assert_eq!(ctl.status().state, ConversationState::Ready);
    }

    #[tokio::test]
    async fn test_relay_submissions_are_answered_in_arrival_order() {
        let relay = Arc::new(GatedRelay::default());
        let ctl = shared_controller(relay.clone());
        let mut status_rx = ctl.subscribe();

        let first = tokio::spawn({
            let ctl = ctl.clone();
            async move { ctl.submit("slow one").await }
        });
        status_rx
            .wait_for(|s| s.state == ConversationState::Busy)
            .await
            .unwrap();
        let second = tokio::spawn({
            let ctl = ctl.clone();
            async move { ctl.submit("quick two").await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        // The second waits its turn and has not reached the relay
        assert_eq!(relay.seen.lock().unwrap().as_slice(), ["slow one"]);

        relay.gate.notify_one();
        assert_eq!(first.await.unwrap().unwrap().reply, "re: slow one");
        assert_eq!(second.await.unwrap().unwrap().reply, "re: quick two");
        assert_eq!(
            contents(&ctl)[1..],
            ["slow one", "re: slow one", "quick two", "re: quick two"]
        );
        assert_eq!(relay.seen.lock().unwrap().as_slice(), ["slow one", "quick two"]);
    }
}
