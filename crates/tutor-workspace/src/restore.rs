//! Replace a working file with its backup.
//!
//! The whole file is replaced in one step: the backup is written to a
//! temporary file beside the target, which is then renamed over it. The
//! backup tree is only ever read.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};
use tutor_core::{ExternalIoError, IoAction};

use crate::errors::Result;
use crate::layout::BackupLayout;

/// What [`BackupRestorer::restore`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Restore {
    /// The working file now equals this backup.
    Restored {
        /// The backup that was copied.
        backup: PathBuf,
    },
    /// No backup exists; nothing was touched.
    NoBackup,
}

/// Writes backups over working files.
#[derive(Clone, Debug)]
pub struct BackupRestorer {
    layout: BackupLayout,
}

impl BackupRestorer {
    /// Restorer over `layout`.
    pub fn new(layout: BackupLayout) -> Self {
        Self { layout }
    }

    /// Replace the contents of `path` with its backup.
    pub fn restore(&self, path: &Path) -> Result<Restore> {
        let Some(backup) = self.layout.backup_for(path) else {
            debug!(path = %path.display(), "no backup to restore from");
            return Ok(Restore::NoBackup);
        };

        let pristine =
            std::fs::read(&backup).map_err(ExternalIoError::with(IoAction::Read, &backup))?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));

        let mut tmp =
            NamedTempFile::new_in(dir).map_err(ExternalIoError::with(IoAction::Create, dir))?;
        tmp.write_all(&pristine)
            .map_err(ExternalIoError::with(IoAction::Write, tmp.path()))?;
        if let Ok(meta) = std::fs::metadata(path) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(ExternalIoError::with(IoAction::Write, tmp.path()))?;
        }
        let _ = tmp
            .persist(path)
            .map_err(|e| ExternalIoError::new(IoAction::Write, path, e.error))?;

        info!(path = %path.display(), backup = %backup.display(), "code restored from backup");
        Ok(Restore::Restored { backup })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drift::{Drift, DriftDetector};

    fn setup() -> (tempfile::TempDir, BackupLayout, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let layout = BackupLayout::new(dir.path(), "sections", "sectionsBackup");
        for tree in ["sections/s", "sectionsBackup/s"] {
            std::fs::create_dir_all(dir.path().join(tree)).unwrap();
        }
        let working = dir.path().join("sections/s/main.py");
        std::fs::write(&working, "edited\n").unwrap();
        std::fs::write(dir.path().join("sectionsBackup/s/main.py"), "pristine\n").unwrap();
        (dir, layout, working)
    }

    #[test]
    fn restore_replaces_contents() {
        let (dir, layout, working) = setup();
        let outcome = BackupRestorer::new(layout).restore(&working).unwrap();
        assert_eq!(
            outcome,
            Restore::Restored {
                backup: dir.path().join("sectionsBackup/s/main.py")
            }
        );
        assert_eq!(std::fs::read_to_string(&working).unwrap(), "pristine\n");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("sectionsBackup/s/main.py")).unwrap(),
            "pristine\n"
        );
    }

    #[test]
    fn drift_round_trip() {
        let (_dir, layout, working) = setup();
        let detector = DriftDetector::new(layout.clone());
        assert_eq!(detector.check(&working).unwrap(), Drift::Drifted);
        let _ = BackupRestorer::new(layout).restore(&working).unwrap();
        assert_eq!(detector.check(&working).unwrap(), Drift::Clean);
    }

    #[test]
    fn restore_without_backup_is_noop() {
        let (dir, layout, _) = setup();
        let stray = dir.path().join("sections/s/other.py");
        std::fs::write(&stray, "mine\n").unwrap();
        let outcome = BackupRestorer::new(layout).restore(&stray).unwrap();
        assert_eq!(outcome, Restore::NoBackup);
        assert_eq!(std::fs::read_to_string(&stray).unwrap(), "mine\n");
    }

    #[test]
    fn restore_recreates_deleted_working_file() {
        let (_dir, layout, working) = setup();
        std::fs::remove_file(&working).unwrap();
        let _ = BackupRestorer::new(layout).restore(&working).unwrap();
        assert_eq!(std::fs::read_to_string(&working).unwrap(), "pristine\n");
    }

    #[test]
    fn no_temp_files_left_behind() {
        let (dir, layout, working) = setup();
        let _ = BackupRestorer::new(layout).restore(&working).unwrap();
        let names: Vec<_> = std::fs::read_dir(dir.path().join("sections/s"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("main.py")]);
    }
}
