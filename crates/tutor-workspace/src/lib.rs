//! # tutor-workspace
//!
//! The learner's editable code files and their pristine backups.
//!
//! - [`BackupLayout`]: maps a working path onto its backup path
//! - [`DriftDetector`]: does a working file still equal its backup?
//! - [`BackupRestorer`]: overwrite a working file with its backup
//! - [`provision_backup`]: create the backup tree from the working tree

#![deny(unsafe_code)]

pub mod drift;
pub mod errors;
pub mod layout;
pub mod provision;
pub mod restore;

pub use drift::{Drift, DriftDetector};
pub use errors::{Result, WorkspaceError};
pub use layout::BackupLayout;
pub use provision::{ProvisionReport, provision_backup};
pub use restore::{BackupRestorer, Restore};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn any_byte_edit_is_drift_until_restored(
            original in proptest::collection::vec(any::<u8>(), 0..256),
            index in any::<prop::sample::Index>(),
            flip in 1u8..=255,
        ) {
            let dir = tempfile::tempdir().unwrap();
            let layout = BackupLayout::new(dir.path(), "sections", "sectionsBackup");
            std::fs::create_dir_all(dir.path().join("sections")).unwrap();
            std::fs::create_dir_all(dir.path().join("sectionsBackup")).unwrap();
            let working = dir.path().join("sections/f.py");
            std::fs::write(&working, &original).unwrap();
            std::fs::write(dir.path().join("sectionsBackup/f.py"), &original).unwrap();

            let detector = DriftDetector::new(layout.clone());
            prop_assert_eq!(detector.check(&working).unwrap(), Drift::Clean);

            let mut edited = original.clone();
            if edited.is_empty() {
                edited.push(flip);
            } else {
                let i = index.index(edited.len());
                edited[i] ^= flip;
            }
            std::fs::write(&working, &edited).unwrap();
            prop_assert_eq!(detector.check(&working).unwrap(), Drift::Drifted);

            let _ = BackupRestorer::new(layout).restore(&working).unwrap();
            prop_assert_eq!(detector.check(&working).unwrap(), Drift::Clean);
        }
    }
}
