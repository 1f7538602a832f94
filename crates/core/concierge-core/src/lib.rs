//! Hotel Concierge Core
//!
//! Shared types and the conversation logic behind every concierge front end:
//!
//! - Hotel knowledge base and the system prompts that embed it
//! - Human-handoff detection and the callback log
//! - The conversation controller that owns history and talks to a relay
//! - Seams for the model relay and for speech I/O
//!
//! # Example
//!
//! ```no_run
//! use concierge_core::*;
//! use std::sync::Arc;
//!
//! # async fn run(relay: Arc<dyn ChatRelay>) -> Result<()> {
//! let knowledge = Arc::new(KnowledgeBase::embedded()?);
//! let controller = ConversationController::new(
//!     ControllerConfig::default(),
//!     knowledge,
//!     relay,
//!     Arc::new(NoSpeech),
//! )?;
//! let submission = controller.submit("What time is dinner served?").await?;
//! println!("{}", submission.reply);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod callback;
pub mod config;
pub mod conversation;
pub mod error;
pub mod handoff;
pub mod knowledge;
pub mod relay;
pub mod speech;
pub mod templates;
pub mod types;
pub mod utils;

pub use callback::{CallbackLog, CallbackLogEntry, PLACEHOLDER_PHONE};
pub use config::{
    get_env_bool, get_env_float, get_env_int, get_env_opt, get_env_or, get_required_env,
    load_env, load_env_from_path,
};
pub use conversation::{
    ControllerConfig, ConversationController, ConversationSnapshot, ConversationState, Outcome,
    Status, Submission, DEFAULT_HISTORY_WINDOW, FALLBACK_REPLY, GREETING, RELAY_FAILURE_REPLY,
    SAMPLE_QUESTIONS,
};
pub use error::{ConciergeError, Result};
pub use handoff::{HandoffDetector, HANDOFF_REPLY};
pub use knowledge::{KnowledgeBase, KnowledgeEntry};
pub use relay::ChatRelay;
pub use speech::{NoSpeech, SpeechIo, SpeechSupport, CAPTURE_UNAVAILABLE};
pub use templates::{PromptStyle, TemplateEngine};
pub use types::*;
pub use utils::{init_logging, Logger};
