//! Structured error handling for the speech service
//!
//! Every failure inside the crate is expressed as a [`TtsError`]. The
//! synthesis and detection services decide which variants are surfaced to
//! callers and which degrade into fallbacks; the HTTP layer maps the
//! surfaced ones to status codes.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias with TtsError
pub type Result<T> = std::result::Result<T, TtsError>;

/// Speech backend kinds, used to tag backend failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Local neural voice (subprocess)
    Native,
    /// Cloud TTS API
    Cloud,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Native => write!(f, "native"),
            BackendKind::Cloud => write!(f, "cloud"),
        }
    }
}

/// Audio operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioOperation {
    Decoding,
}

impl fmt::Display for AudioOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioOperation::Decoding => write!(f, "decoding"),
        }
    }
}

/// Main error type
#[derive(Error, Debug, Clone)]
pub enum TtsError {
    /// Malformed client input (missing text, bad body)
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// A synthesis backend is missing or failed
    #[error("{backend} backend unavailable: {message}")]
    BackendUnavailable {
        backend: BackendKind,
        message: String,
    },

    /// The language classifier is disabled or could not be loaded
    #[error("Classifier unavailable: {message}")]
    ClassifierUnavailable { message: String },

    /// The language classifier was reachable but the call failed
    #[error("Classifier error: {message}")]
    Classifier { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Audio container errors
    #[error("Audio {operation} error: {message}")]
    Audio {
        message: String,
        operation: AudioOperation,
    },

    /// I/O errors
    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    /// Operation timed out
    #[error("Operation timeout: {message} ({duration_ms}ms)")]
    Timeout { message: String, duration_ms: u64 },

    /// Internal/bug errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TtsError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        TtsError::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a validation error bound to a request field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        TtsError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a backend failure
    pub fn backend(backend: BackendKind, message: impl Into<String>) -> Self {
        TtsError::BackendUnavailable {
            backend,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        TtsError::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a classifier call error
    pub fn classifier(message: impl Into<String>) -> Self {
        TtsError::Classifier {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        TtsError::Internal {
            message: message.into(),
        }
    }

    /// Whether callers are expected to degrade to a fallback instead of
    /// reporting this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TtsError::BackendUnavailable { .. }
                | TtsError::ClassifierUnavailable { .. }
                | TtsError::Classifier { .. }
                | TtsError::Timeout { .. }
        )
    }

    /// Whether the error was caused by the client
    pub fn is_client_error(&self) -> bool {
        matches!(self, TtsError::Validation { .. })
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for TtsError {
    fn from(err: std::io::Error) -> Self {
        TtsError::Io {
            message: err.to_string(),
            path: None,
        }
    }
}

impl From<hound::Error> for TtsError {
    fn from(err: hound::Error) -> Self {
        TtsError::Audio {
            message: err.to_string(),
            operation: AudioOperation::Decoding,
        }
    }
}

impl From<serde_yaml::Error> for TtsError {
    fn from(err: serde_yaml::Error) -> Self {
        TtsError::config(err.to_string())
    }
}
