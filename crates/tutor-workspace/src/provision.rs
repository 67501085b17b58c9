//! Backup provisioning.
//!
//! Copies the working tree into the backup tree. Files already present in
//! the backup are never overwritten, so the pristine copy taken on first
//! start survives the learner's later edits.

use tracing::{debug, info, warn};
use tutor_core::{ExternalIoError, IoAction};
use walkdir::WalkDir;

use crate::errors::{Result, WorkspaceError};
use crate::layout::BackupLayout;

/// Counts from one provisioning pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    /// Files copied into the backup tree.
    pub copied: usize,
    /// Files skipped because a backup already existed.
    pub skipped: usize,
}

/// Mirror every file of the working tree into the backup tree.
///
/// A missing working tree is not an error; nothing is copied.
pub fn provision_backup(layout: &BackupLayout) -> Result<ProvisionReport> {
    let source = layout.working_root();
    let target = layout.backup_root();
    let mut report = ProvisionReport::default();

    if !source.is_dir() {
        warn!(dir = %source.display(), "working tree missing, no backup provisioned");
        return Ok(report);
    }

    for entry in WalkDir::new(&source).follow_links(false) {
        let entry = entry.map_err(|e| WorkspaceError::Walk {
            root: source.clone(),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(&source) else {
            continue;
        };
        let dest = target.join(rel);
        if dest.exists() {
            report.skipped += 1;
            continue;
        }
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .map_err(ExternalIoError::with(IoAction::Create, parent))?;
        }
        let _ = std::fs::copy(entry.path(), &dest)
            .map_err(ExternalIoError::with(IoAction::Copy, &dest))?;
        debug!(path = %dest.display(), "backup file created");
        report.copied += 1;
    }

    info!(
        backup = %target.display(),
        copied = report.copied,
        skipped = report.skipped,
        "backup provisioned"
    );
    Ok(report)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
