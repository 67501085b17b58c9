//! Workspace error types.

use std::path::PathBuf;

use thiserror::Error;
use tutor_core::{Classify, ErrorKind, ExternalIoError};

/// Errors reading, restoring, or provisioning working files.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// A filesystem operation failed.
    #[error(transparent)]
    Io(#[from] ExternalIoError),

    /// Walking the working tree failed.
    #[error("failed to walk {}: {source}", root.display())]
    Walk {
        /// Root of the walk.
        root: PathBuf,
        /// Underlying error.
        #[source]
        source: walkdir::Error,
    },
}

impl Classify for WorkspaceError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::ExternalIo
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, WorkspaceError>;
