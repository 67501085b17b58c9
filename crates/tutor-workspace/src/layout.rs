//! Working tree to backup tree mapping.
//!
//! Every file under the working directory (`sections` by default) has a
//! pristine twin at the same relative path under the backup directory
//! (`sectionsBackup`). Both trees sit directly under the content root; a
//! path maps only when it lies inside `root/<working_dir>`.

use std::path::{Path, PathBuf};

use tutor_settings::ContentSettings;

/// Names and location of the working and backup trees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackupLayout {
    root: PathBuf,
    working_dir: String,
    backup_dir: String,
}

impl BackupLayout {
    /// Layout with both trees directly under `root`.
    pub fn new(
        root: impl Into<PathBuf>,
        working_dir: impl Into<String>,
        backup_dir: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            working_dir: working_dir.into(),
            backup_dir: backup_dir.into(),
        }
    }

    /// Layout described by the content settings.
    pub fn from_settings(content: &ContentSettings) -> Self {
        Self::new(
            content.root_path(),
            content.working_dir.clone(),
            content.backup_dir.clone(),
        )
    }

    /// Content root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The editable tree.
    pub fn working_root(&self) -> PathBuf {
        self.root.join(&self.working_dir)
    }

    /// The pristine tree.
    pub fn backup_root(&self) -> PathBuf {
        self.root.join(&self.backup_dir)
    }

    /// Where the backup of `path` would live, whether or not it exists.
    ///
    /// `None` when `path` is not inside the working tree.
    pub fn mirror_path(&self, path: &Path) -> Option<PathBuf> {
        let relative = path.strip_prefix(self.working_root()).ok()?;
        Some(self.backup_root().join(relative))
    }

    /// The backup of `path`, if one exists on disk.
    pub fn backup_for(&self, path: &Path) -> Option<PathBuf> {
        self.mirror_path(path).filter(|p| p.is_file())
    }
}
