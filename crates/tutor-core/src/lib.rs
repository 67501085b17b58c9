//! # tutor-core
//!
//! Foundation types shared by every tutor crate:
//!
//! - **Run IDs**: [`RunId`] scopes one code execution's sentinel files
//! - **Errors**: the [`ErrorKind`] taxonomy, the [`Classify`] trait every crate
//!   error implements, and [`ExternalIoError`] for filesystem faults
//! - **Logging**: `tracing` subscriber setup and log capture for tests

#![deny(unsafe_code)]

pub mod errors;
pub mod ids;
pub mod logging;

pub use errors::{Classify, ErrorKind, ExternalIoError, IoAction};
pub use ids::RunId;
