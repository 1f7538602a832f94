//! Human handoff detection

use once_cell::sync::Lazy;
use regex::Regex;

/// Reply given instead of a model answer when a guest asks for staff
pub const HANDOFF_REPLY: &str =
    "I’ve notified our staff. They will follow up by phone or email shortly.";

static HANDOFF_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(human|person|operator|representative|agent|reps)\b")
        .expect("handoff pattern is a valid regex")
});

/// Decides whether a message asks for a human instead of the model
#[derive(Debug, Clone, Copy, Default)]
pub struct HandoffDetector;

impl HandoffDetector {
    /// Create a detector
    pub fn new() -> Self {
        Self
    }

    /// True when `text` mentions a human-referring term as a whole word
    pub fn is_handoff(&self, text: &str) -> bool {
        HANDOFF_PATTERN.is_match(text)
    }

    /// The term that triggered the match, lowercased
    pub fn matched_term(&self, text: &str) -> Option<String> {
        HANDOFF_PATTERN
            .find(text)
            .map(|m| m.as_str().to_lowercase())
    }
}
