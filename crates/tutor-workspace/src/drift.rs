//! Drift detection: has the learner changed a working file?
//!
//! Contents are compared in full on every call. Nothing is cached, so the
//! answer is always current after edits, focus changes, or a restore.

use std::path::Path;

use tracing::debug;
use tutor_core::{ExternalIoError, IoAction};

use crate::errors::Result;
use crate::layout::BackupLayout;

/// Result of a drift check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Drift {
    /// Contents equal the backup.
    Clean,
    /// Contents differ from the backup.
    Drifted,
    /// No backup to compare against.
    Unknown,
}

impl Drift {
    /// Whether a reset is worth offering. `Unknown` counts as not drifted.
    pub fn is_drifted(self) -> bool {
        self == Self::Drifted
    }
}

/// Compares working files with their backups.
#[derive(Clone, Debug)]
pub struct DriftDetector {
    layout: BackupLayout,
}

impl DriftDetector {
    /// Detector over `layout`.
    pub fn new(layout: BackupLayout) -> Self {
        Self { layout }
    }

    /// The layout in use.
    pub fn layout(&self) -> &BackupLayout {
        &self.layout
    }

    /// Compare the on-disk contents of `path` with its backup.
    pub fn check(&self, path: &Path) -> Result<Drift> {
        let Some(backup) = self.layout.backup_for(path) else {
            return Ok(Drift::Unknown);
        };
        let working = std::fs::read(path).map_err(ExternalIoError::with(IoAction::Read, path))?;
        compare(path, &working, &backup)
    }

    /// Compare `text` (e.g. an unsaved editor buffer for `path`) with the
    /// backup of `path`.
    pub fn check_text(&self, path: &Path, text: &str) -> Result<Drift> {
        let Some(backup) = self.layout.backup_for(path) else {
            return Ok(Drift::Unknown);
        };
        compare(path, text.as_bytes(), &backup)
    }
}

fn compare(path: &Path, working: &[u8], backup: &Path) -> Result<Drift> {
    let pristine = std::fs::read(backup).map_err(ExternalIoError::with(IoAction::Read, backup))?;
    let drift = if working == pristine.as_slice() {
        Drift::Clean
    } else {
        Drift::Drifted
    };
    debug!(path = %path.display(), ?drift, "drift checked");
    Ok(drift)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
