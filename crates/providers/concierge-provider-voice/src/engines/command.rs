//! Speech through local programs
//!
//! Playback pipes the text into the TTS command's stdin. Starting a new
//! utterance kills the one still playing. Capture runs the STT command to
//! completion and takes the first non-empty stdout line as the transcript.

use crate::types::{CommandSpec, RecognitionConfig};
use async_trait::async_trait;
use concierge_core::{get_env_opt, ConciergeError, Result, SpeechIo, SpeechSupport};
use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Speech engine backed by external commands
#[derive(Debug, Default)]
pub struct CommandSpeech {
    tts: Option<CommandSpec>,
    stt: Option<CommandSpec>,
    recognition: RecognitionConfig,
    playing: Arc<Mutex<Option<Child>>>,
}

impl CommandSpeech {
    /// Engine with optional playback and capture commands
    pub fn new(tts: Option<CommandSpec>, stt: Option<CommandSpec>) -> Self {
        Self {
            tts,
            stt,
            ..Default::default()
        }
    }

    /// Engine from `CONCIERGE_TTS_COMMAND` and `CONCIERGE_STT_COMMAND`
    pub fn from_env() -> Self {
        let tts = get_env_opt("CONCIERGE_TTS_COMMAND").and_then(|c| CommandSpec::parse(&c));
        let stt = get_env_opt("CONCIERGE_STT_COMMAND").and_then(|c| CommandSpec::parse(&c));
        info!(
            tts = tts.as_ref().map(|c| c.program.as_str()).unwrap_or("<none>"),
            stt = stt.as_ref().map(|c| c.program.as_str()).unwrap_or("<none>"),
            "Configured command speech"
        );
        Self::new(tts, stt)
    }

    /// Override the recognition settings
    pub fn with_recognition(mut self, recognition: RecognitionConfig) -> Self {
        self.recognition = recognition;
        self
    }

    /// Process id of the utterance still playing, if any
    pub fn current_pid(&self) -> Option<u32> {
        let mut slot = self.playing.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_mut() {
            Some(child) => match child.try_wait() {
                Ok(None) => child.id(),
                _ => {
                    *slot = None;
                    None
                }
            },
            None => None,
        }
    }

    /// Interrupt playback
    pub fn stop(&self) {
        let previous = self
            .playing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(mut child) = previous {
            if let Err(e) = child.start_kill() {
                debug!(error = %e, "Previous utterance already finished");
            }
        }
    }

    fn start_utterance(&self, spec: &CommandSpec, text: &str) -> Result<()> {
        let mut child = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ConciergeError::speech(format!("failed to start {}: {}", spec.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            let text = text.to_string();
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(text.as_bytes()).await {
                    debug!(error = %e, "TTS command closed stdin early");
                }
            });
        }

        *self.playing.lock().unwrap_or_else(PoisonError::into_inner) = Some(child);
        Ok(())
    }
}

#[async_trait]
impl SpeechIo for CommandSpeech {
    fn support(&self) -> SpeechSupport {
        SpeechSupport {
            capture: self.stt.is_some(),
            output: self.tts.is_some(),
        }
    }

    async fn capture(&self) -> Result<String> {
        let spec = self.stt.as_ref().ok_or_else(|| {
            ConciergeError::unsupported("Speech recognition", "no capture command configured")
        })?;

        let output = Command::new(&spec.program)
            .args(&spec.args)
            .envs(self.recognition.env_vars())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ConciergeError::speech(format!("failed to start {}: {}", spec.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, stderr = %stderr.trim(), "Capture command failed");
            let cause = stderr.trim();
            return Err(ConciergeError::speech(if cause.is_empty() {
                format!("capture command exited with {}", output.status)
            } else {
                cause.to_string()
            }));
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ConciergeError::speech("no-speech"))
    }

    fn speak(&self, text: &str) {
        let Some(spec) = self.tts.as_ref() else {
            return;
        };
        self.stop();
        if tokio::runtime::Handle::try_current().is_err() {
            warn!("Speech output needs a Tokio runtime, skipping utterance");
            return;
        }
        if let Err(e) = self.start_utterance(spec, text) {
            warn!(error = %e, "Speech output failed");
        }
    }
}
