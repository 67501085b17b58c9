//! # tutor-curriculum
//!
//! The tutorial progression state machine.
//!
//! - [`Step`]: one reading reference, an optional code file, an optional supplement
//! - [`Section`]: ordered steps with a current step and completion flags
//! - [`TutorialModel`]: ordered sections with cross-section navigation and a
//!   "furthest reached" high-water mark
//! - [`load_curriculum`]: build a model from curriculum JSON
//!
//! All references are kept as strings relative to the content root; turning
//! them into paths is the caller's business.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod model;
pub mod section;
pub mod step;

pub use errors::{CurriculumError, NavigationError};
pub use loader::{CurriculumData, SectionData, load_curriculum, parse_curriculum};
pub use model::{Navigation, Position, TutorialModel};
pub use section::Section;
pub use step::Step;
