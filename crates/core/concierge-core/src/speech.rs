//! Speech capture and playback capability
//!
//! The controller only sees this trait. Hosts plug in whatever engine they
//! have (a browser, a local TTS binary, nothing at all).

use crate::{ConciergeError, Result};
use async_trait::async_trait;

/// Status shown when no recognizer is present
pub const CAPTURE_UNAVAILABLE: &str = "Speech recognition is not available on this host.";

/// Which halves of the speech capability are present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpeechSupport {
    /// Speech-to-text is available
    pub capture: bool,
    /// Text-to-speech is available
    pub output: bool,
}

/// Injectable speech I/O
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechIo: Send + Sync {
    /// What this host can do
    fn support(&self) -> SpeechSupport;

    /// Listen once and return the single best final transcript
    async fn capture(&self) -> Result<String>;

    /// Speak `text`, interrupting anything still playing. Never blocks on playback.
    fn speak(&self, text: &str);
}

/// Host without any speech engine
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpeech;

#[async_trait]
impl SpeechIo for NoSpeech {
    fn support(&self) -> SpeechSupport {
        SpeechSupport::default()
    }

    async fn capture(&self) -> Result<String> {
        Err(ConciergeError::unsupported(
            "Speech recognition",
            "no recognizer on this host",
        ))
    }

    fn speak(&self, _text: &str) {}
}
