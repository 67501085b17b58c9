//! # tutor-session
//!
//! Ties the tutorial model, the runner, and the backup workspace together
//! behind one event loop.
//!
//! - [`Session`]: applies [`TutorEvent`]s in order
//! - [`DocViewer`], [`CodeEditor`], [`Notifier`]: host surfaces
//! - [`RenderState`]: what the viewer shows, with derived display flags

#![deny(unsafe_code)]

pub mod collaborators;
pub mod errors;
pub mod event;
pub mod render;
pub mod session;

pub use collaborators::{CodeEditor, Collaborators, DocViewer, Notifier};
pub use errors::SessionError;
pub use event::TutorEvent;
pub use render::{NextButton, RenderState};
pub use session::{Session, SessionConfig};
