//! Voice Provider for the concierge
//!
//! Implements the core speech capability with local programs:
//!
//! - Text-to-speech: any command that reads text on stdin and plays it
//!   (for example `piper ... | aplay`, `espeak-ng --stdin`)
//! - Speech-to-text: any command that records one utterance and prints the
//!   transcript on stdout
//!
//! Either half may be left unconfigured; the controller then degrades.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod engines;
mod types;

pub use engines::*;
pub use types::*;
