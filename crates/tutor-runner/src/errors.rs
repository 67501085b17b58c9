//! Runner error types.

use std::path::PathBuf;

use thiserror::Error;
use tutor_core::{Classify, ErrorKind, ExternalIoError};

/// Errors starting or observing an execution run.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// A run was requested with no code file open.
    #[error("no active code file to run")]
    NoActiveTarget,

    /// The target has no parent directory to place sentinels in.
    #[error("cannot determine the directory of {}", path.display())]
    NoParentDirectory {
        /// The target path.
        path: PathBuf,
    },

    /// Reading the target, writing the wrapper script, or similar failed.
    #[error(transparent)]
    Io(#[from] ExternalIoError),

    /// Registering the filesystem watch failed.
    #[error("failed to watch {}: {source}", dir.display())]
    Watch {
        /// Directory being watched.
        dir: PathBuf,
        /// Underlying watcher error.
        #[source]
        source: notify::Error,
    },

    /// The watcher stopped delivering events before a sentinel appeared.
    #[error("lost filesystem events for {}", dir.display())]
    WatchLost {
        /// Directory being watched.
        dir: PathBuf,
    },

    /// The terminal surface could not be created or refused the command.
    #[error("terminal unavailable: {message}")]
    Terminal {
        /// Description of the failure.
        message: String,
    },
}

impl RunnerError {
    /// Convenience constructor for terminal failures.
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }
}

impl Classify for RunnerError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NoActiveTarget => ErrorKind::NoActiveTarget,
            Self::NoParentDirectory { .. }
            | Self::Io(_)
            | Self::Watch { .. }
            | Self::WatchLost { .. }
            | Self::Terminal { .. } => ErrorKind::ExternalIo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_active_target_classification() {
        let err = RunnerError::NoActiveTarget;
        assert_eq!(err.to_string(), "no active code file to run");
        assert_eq!(err.kind(), ErrorKind::NoActiveTarget);
    }

    #[test]
    fn terminal_display() {
        let err = RunnerError::terminal("pty exhausted");
        assert_eq!(err.to_string(), "terminal unavailable: pty exhausted");
        assert_eq!(err.kind(), ErrorKind::ExternalIo);
    }
}
