//! Session error types.
//!
//! None of these escape the event loop; each is turned into a notification.

use thiserror::Error;
use tutor_core::{Classify, ErrorKind, ExternalIoError};
use tutor_curriculum::NavigationError;
use tutor_runner::RunnerError;
use tutor_workspace::WorkspaceError;

/// Anything a session operation can fail with.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Section index out of bounds.
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// Forward navigation past the furthest section reached.
    #[error("section {} is not unlocked yet", index + 1)]
    Locked {
        /// 0-based section index.
        index: usize,
    },

    /// Starting a run failed.
    #[error(transparent)]
    Runner(#[from] RunnerError),

    /// Drift check or restore failed.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// A collaborator failed to open or show a file.
    #[error(transparent)]
    Io(#[from] ExternalIoError),
}

impl Classify for SessionError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Navigation(e) => e.kind(),
            Self::Locked { .. } => ErrorKind::InvalidIndex,
            Self::Runner(e) => e.kind(),
            Self::Workspace(e) => e.kind(),
            Self::Io(e) => e.kind(),
        }
    }
}
