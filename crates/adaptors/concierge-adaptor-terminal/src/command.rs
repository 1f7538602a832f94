//! Terminal input parsing

use concierge_core::SAMPLE_QUESTIONS;

/// One line of terminal input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Free text for the assistant
    Say(String),
    /// List the sample questions
    Samples,
    /// Submit sample question `n` (1-based)
    Sample(usize),
    /// Show the callback log
    Callbacks,
    /// Capture one spoken utterance
    Listen,
    /// Show commands
    Help,
    /// Leave
    Quit,
    /// Blank line
    Empty,
    /// Slash command we do not know
    Unknown(String),
}

impl Command {
    /// Parse a raw input line
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Self::Say(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        match (parts.next().unwrap_or(""), parts.next()) {
            ("samples", None) => Self::Samples,
            ("sample", Some(n)) => match n.parse::<usize>() {
                Ok(n) if (1..=SAMPLE_QUESTIONS.len()).contains(&n) => Self::Sample(n),
                _ => Self::Unknown(line.to_string()),
            },
            ("callbacks", None) => Self::Callbacks,
            ("listen", None) => Self::Listen,
            ("help", None) => Self::Help,
            ("quit", None) | ("exit", None) => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// Help text
pub const HELP: &str = "\
Commands:
  /samples      list sample questions
  /sample N     ask sample question N
  /callbacks    show callback requests
  /listen       speak a question
  /help         show this help
  /quit         leave";
