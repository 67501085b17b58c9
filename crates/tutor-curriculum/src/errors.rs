//! Curriculum and navigation error types.

use std::path::PathBuf;

use thiserror::Error;
use tutor_core::{Classify, ErrorKind, ExternalIoError};

/// Errors building a curriculum from its JSON description.
#[derive(Debug, Error)]
pub enum CurriculumError {
    /// The curriculum file could not be read.
    #[error(transparent)]
    Io(#[from] ExternalIoError),

    /// The curriculum file is not valid curriculum JSON.
    #[error("failed to parse curriculum {}: {source}", path.display())]
    Parse {
        /// The curriculum file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The curriculum has no sections.
    #[error("curriculum has no sections")]
    Empty,

    /// A section has no steps.
    #[error("section {index} ({title:?}) has no steps")]
    EmptySection {
        /// 0-based section index.
        index: usize,
        /// Section title.
        title: String,
    },
}

impl Classify for CurriculumError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::ExternalIo,
            Self::Parse { .. } | Self::Empty | Self::EmptySection { .. } => {
                ErrorKind::Configuration
            }
        }
    }
}

/// Errors from section/step navigation. Model state is unchanged when one
/// of these is returned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// Requested index is outside `0..len`.
    #[error("invalid section index {index}: curriculum has {len} sections")]
    InvalidIndex {
        /// Requested index.
        index: usize,
        /// Number of sections.
        len: usize,
    },
}

impl Classify for NavigationError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidIndex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_index_display() {
        let err = NavigationError::InvalidIndex { index: 5, len: 3 };
        assert_eq!(
            err.to_string(),
            "invalid section index 5: curriculum has 3 sections"
        );
        assert_eq!(err.kind(), ErrorKind::InvalidIndex);
    }

    #[test]
    fn empty_section_display() {
        let err = CurriculumError::EmptySection {
            index: 1,
            title: "Pipelines".to_string(),
        };
        assert_eq!(err.to_string(), "section 1 (\"Pipelines\") has no steps");
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
