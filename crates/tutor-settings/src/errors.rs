//! Settings error types.

use thiserror::Error;
use tutor_core::{Classify, ErrorKind};

/// Errors that can occur when loading or parsing settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read the settings file from disk.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to parse JSON in the settings file.
    #[error("failed to parse settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A settings value was invalid.
    #[error("invalid settings value: {0}")]
    InvalidValue(String),
}

impl Classify for SettingsError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::ExternalIo,
            Self::Json(_) | Self::InvalidValue(_) => ErrorKind::Configuration,
        }
    }
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
