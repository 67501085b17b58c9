//! Curriculum JSON loading.
//!
//! ```json
//! {
//!   "sections": [
//!     {
//!       "title": "Training a model",
//!       "description": "Build your first pipeline",
//!       "steps": [
//!         { "doc": "docs/training/1.md", "code": "sections/training/training1.py" },
//!         { "doc": "docs/training/2.md" }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use tutor_core::{ExternalIoError, IoAction};

use crate::errors::CurriculumError;
use crate::model::TutorialModel;
use crate::section::Section;
use crate::step::Step;

/// Raw curriculum as stored on disk.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurriculumData {
    /// Sections in order.
    pub sections: Vec<SectionData>,
}

/// Raw section as stored on disk.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SectionData {
    /// Section title.
    pub title: String,
    /// Section description.
    #[serde(default)]
    pub description: String,
    /// Steps in order.
    pub steps: Vec<Step>,
}

impl TryFrom<CurriculumData> for TutorialModel {
    type Error = CurriculumError;

    fn try_from(data: CurriculumData) -> Result<Self, Self::Error> {
        let sections = data
            .sections
            .into_iter()
            .enumerate()
            .map(|(index, s)| {
                Section::new(s.title, s.description, s.steps).map_err(|e| match e {
                    CurriculumError::EmptySection { title, .. } => {
                        CurriculumError::EmptySection { index, title }
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        TutorialModel::new(sections)
    }
}

/// Parse curriculum JSON. `origin` is only used in error messages.
pub fn parse_curriculum(json: &str, origin: &Path) -> Result<TutorialModel, CurriculumError> {
    let data: CurriculumData =
        serde_json::from_str(json).map_err(|source| CurriculumError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
    TutorialModel::try_from(data)
}

/// Read and parse a curriculum file.
pub fn load_curriculum(path: &Path) -> Result<TutorialModel, CurriculumError> {
    let json =
        std::fs::read_to_string(path).map_err(ExternalIoError::with(IoAction::Read, path))?;
    let model = parse_curriculum(&json, path)?;
    debug!(
        path = %path.display(),
        sections = model.section_count(),
        "curriculum loaded"
    );
    Ok(model)
}
