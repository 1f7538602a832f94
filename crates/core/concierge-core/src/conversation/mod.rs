//! Conversation controller and the fixed phrases it uses

pub mod controller;
pub mod status;

pub use controller::{
    ControllerConfig, ConversationController, ConversationSnapshot, Outcome, Submission,
    DEFAULT_HISTORY_WINDOW,
};
pub use status::{ConversationState, Status};

/// First assistant turn of every conversation
pub const GREETING: &str = "Hello — I'm your Hotel AI Assistant. Ask me about rooms, packages, dining, or say 'talk to a human'.";

/// Assistant turn appended when the relay fails
pub const RELAY_FAILURE_REPLY: &str = "Sorry, something went wrong when contacting the AI.";

/// Local answer when the relay is disabled and the knowledge base has no match
pub const FALLBACK_REPLY: &str = "I don’t have that info right now. Try asking about rooms, packages, dining, check-in, or say 'talk to a human'.";

/// Canned questions offered as one-tap buttons
pub const SAMPLE_QUESTIONS: [&str; 5] = [
    "Tell me about the romantic package",
    "Do you have a suite available?",
    "What time is dinner served?",
    "I want to talk to a person",
    "How do I check in after midnight?",
];
