//! Observable conversation status

use serde::Serialize;
use std::fmt;

/// Externally visible controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationState {
    /// Waiting for input
    #[default]
    Ready,
    /// Speech capture in progress
    Listening,
    /// Waiting on the relay
    Busy,
}

impl ConversationState {
    /// Status line shown for this state
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Listening => "listening",
            Self::Busy => "Asking AI...",
        }
    }
}

/// State plus an optional notice that replaces the state label
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Status {
    /// Current state
    pub state: ConversationState,
    /// Degradation or error notice
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl Status {
    /// Plain state, no notice
    pub fn new(state: ConversationState) -> Self {
        Self {
            state,
            notice: None,
        }
    }

    /// State with a notice
    pub fn with_notice(state: ConversationState, notice: impl Into<String>) -> Self {
        Self {
            state,
            notice: Some(notice.into()),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.notice {
            Some(notice) => f.write_str(notice),
            None => f.write_str(self.state.label()),
        }
    }
}
