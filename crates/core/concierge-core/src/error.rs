//! Error types for the concierge core

use thiserror::Error;

/// Main error type for concierge operations
#[derive(Debug, Error)]
pub enum ConciergeError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream model error
    #[error("Model error: {0}")]
    Model(String),

    /// Relay error (the relay answered with a failure)
    #[error("Relay error: {0}")]
    Relay(String),

    /// Speech capture or synthesis error
    #[error("Speech error: {0}")]
    Speech(String),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(String),

    /// Not found error (generic)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Capability not present on this host
    #[error("{capability} is not available: {reason}")]
    Unsupported {
        /// Capability name
        capability: String,
        /// Why it is unavailable
        reason: String,
    },

    /// Missing required field
    #[error("Missing required field '{field}' in {context}")]
    MissingField {
        /// Field name
        field: String,
        /// Context where field is missing
        context: String,
    },
}

/// Convenient Result type using ConciergeError
pub type Result<T> = std::result::Result<T, ConciergeError>;

impl ConciergeError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        ConciergeError::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        ConciergeError::Validation(msg.into())
    }

    /// Create a model error
    pub fn model(msg: impl Into<String>) -> Self {
        ConciergeError::Model(msg.into())
    }

    /// Create a relay error
    pub fn relay(msg: impl Into<String>) -> Self {
        ConciergeError::Relay(msg.into())
    }

    /// Create a speech error
    pub fn speech(msg: impl Into<String>) -> Self {
        ConciergeError::Speech(msg.into())
    }

    /// Create a template error
    pub fn template(msg: impl Into<String>) -> Self {
        ConciergeError::Template(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        ConciergeError::NotFound(msg.into())
    }

    /// Create an unsupported capability error
    pub fn unsupported(capability: impl Into<String>, reason: impl Into<String>) -> Self {
        ConciergeError::Unsupported {
            capability: capability.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        ConciergeError::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }
}
