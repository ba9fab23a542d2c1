use crate::domain::audio::AudioState;
use thiserror::Error;

/// Domain-level errors for SignBridge.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Audio device error: {message}")]
    AudioDevice { message: String },

    #[error("Invalid audio state transition from {from:?} to {to:?}")]
    AudioStateTransition { from: AudioState, to: AudioState },

    #[error("Recognition model unavailable for {language}: {reason}")]
    ModelUnavailable { language: String, reason: String },

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Recognizer error: {0}")]
    Recognizer(String),

    #[error("Whisper error: {0}")]
    Whisper(String),

    #[error("No signs found for the given text")]
    ResolutionMiss,

    #[error("Failed to persist {what}: {message}")]
    Persistence { what: &'static str, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("Upload rejected: {0}")]
    UploadValidation(String),
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for DomainError {
    fn from(err: toml::de::Error) -> Self {
        DomainError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DomainError {
    fn from(err: toml::ser::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}
