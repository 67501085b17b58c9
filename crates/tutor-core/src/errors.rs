//! Error taxonomy shared across the tutor crates.
//!
//! Each crate keeps its own [`thiserror`] enum. What they have in common is:
//!
//! - [`ErrorKind`]: the user-facing classification (invalid index, no active
//!   target, external I/O, execution failure, configuration)
//! - [`Classify`]: implemented by every crate error to map onto [`ErrorKind`]
//! - [`ExternalIoError`]: the single shape of a filesystem fault, carrying the
//!   action that failed and the path it failed on

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// ErrorKind
// ─────────────────────────────────────────────────────────────────────────────

/// User-facing classification of a fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Navigation to a section or step outside bounds.
    InvalidIndex,
    /// A run was requested with no current code file.
    NoActiveTarget,
    /// Opening, reading, writing, or watching a file failed.
    ExternalIo,
    /// The executed code did not complete successfully. Not a system fault.
    ExecutionFailure,
    /// Settings or curriculum content is malformed.
    Configuration,
}

impl ErrorKind {
    /// Whether this kind is an expected learner outcome rather than a fault.
    #[must_use]
    pub fn is_informational(self) -> bool {
        matches!(self, Self::ExecutionFailure)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIndex => write!(f, "invalid_index"),
            Self::NoActiveTarget => write!(f, "no_active_target"),
            Self::ExternalIo => write!(f, "external_io"),
            Self::ExecutionFailure => write!(f, "execution_failure"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

/// Map a crate-specific error onto the shared taxonomy.
pub trait Classify {
    /// The kind of this error.
    fn kind(&self) -> ErrorKind;
}

// ─────────────────────────────────────────────────────────────────────────────
// ExternalIoError
// ─────────────────────────────────────────────────────────────────────────────

/// The filesystem action that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IoAction {
    /// Opening a file for display or editing.
    Open,
    /// Reading file contents.
    Read,
    /// Writing or persisting file contents.
    Write,
    /// Creating a file or directory.
    Create,
    /// Removing a file.
    Remove,
    /// Copying a file.
    Copy,
    /// Registering a filesystem watch.
    Watch,
}

impl fmt::Display for IoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
            Self::Create => write!(f, "create"),
            Self::Remove => write!(f, "remove"),
            Self::Copy => write!(f, "copy"),
            Self::Watch => write!(f, "watch"),
        }
    }
}

/// A filesystem operation failed on a specific path.
#[derive(Debug, Error)]
#[error("failed to {action} {}: {source}", path.display())]
pub struct ExternalIoError {
    /// What was being done.
    pub action: IoAction,
    /// The file or directory involved.
    pub path: PathBuf,
    /// Underlying cause.
    #[source]
    pub source: io::Error,
}

impl ExternalIoError {
    /// Create a new I/O error for `path`.
    #[must_use]
    pub fn new(action: IoAction, path: impl AsRef<Path>, source: io::Error) -> Self {
        Self {
            action,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Build a closure suitable for `map_err`.
    pub fn with(action: IoAction, path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::new(action, path, source)
    }

    /// Whether the underlying cause is a missing file.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.source.kind() == io::ErrorKind::NotFound
    }
}

impl Classify for ExternalIoError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::ExternalIo
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
