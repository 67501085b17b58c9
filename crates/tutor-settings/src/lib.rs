//! # tutor-settings
//!
//! Configuration with layered sources for the tutorial runner.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`TutorSettings::default()`]
//! 2. **User file**: `~/.tutor/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `TUTOR_*` overrides (highest priority)
//!
//! The CLI applies its own flags on top of the loaded value.
//!
//! # Usage
//!
//! ```no_run
//! let settings = tutor_settings::load_settings().unwrap_or_default();
//! println!("interpreter: {}", settings.runner.interpreter);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
