//! Human callback log

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::collections::VecDeque;

/// Phone number recorded on every callback request
pub const PLACEHOLDER_PHONE: &str = "(555) 555-0199";

/// A guest asked to be contacted by staff
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackLogEntry {
    /// Strictly increasing, millisecond based
    pub id: i64,
    /// Local time the request was logged, for display
    pub time: String,
    /// The guest's original message
    pub user_text: String,
    /// Contact number
    pub phone: String,
}

/// In-memory callback requests, newest first
///
/// Only grows; it is dropped together with its conversation.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct CallbackLog {
    entries: VecDeque<CallbackLogEntry>,
    #[serde(skip)]
    last_id: i64,
}

impl CallbackLog {
    /// Empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request at the current time
    pub fn record(&mut self, user_text: impl Into<String>) -> &CallbackLogEntry {
        self.record_at(Utc::now(), user_text)
    }

    /// Record a request at a given instant
    pub fn record_at(&mut self, at: DateTime<Utc>, user_text: impl Into<String>) -> &CallbackLogEntry {
        let id = at.timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        let time = at
            .with_timezone(&Local)
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string();
        self.entries.push_front(CallbackLogEntry {
            id,
            time,
            user_text: user_text.into(),
            phone: PLACEHOLDER_PHONE.to_string(),
        });
        &self.entries[0]
    }

    /// Entries, newest first
    pub fn entries(&self) -> impl Iterator<Item = &CallbackLogEntry> {
        self.entries.iter()
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&CallbackLogEntry> {
        self.entries.front()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no callback was requested
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
