//! One-shot watch for a pair of sentinel files.
//!
//! The wrapper script signals completion by creating one of two marker files
//! in the target's directory: `runSuccess<id>.txt` on exit status 0,
//! `runError<id>.txt` otherwise. [`SentinelWatcher`] observes that directory
//! (non-recursively) and resolves with whichever marker is observed first.
//!
//! Disposal drops the OS watch and deletes both marker files. It happens when
//! [`SentinelWatcher::wait`] returns, and on drop if the wait was abandoned.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use tutor_core::RunId;

use crate::errors::RunnerError;

/// File names of the two markers for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentinelNames {
    /// Created when the interpreter exits with status 0.
    pub success: String,
    /// Created when the interpreter exits with any other status.
    pub error: String,
}

impl SentinelNames {
    /// Marker names scoped to `run_id`.
    pub fn for_run(run_id: &RunId) -> Self {
        Self {
            success: format!("runSuccess{run_id}.txt"),
            error: format!("runError{run_id}.txt"),
        }
    }
}

/// Which marker appeared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sentinel {
    /// The success marker.
    Success,
    /// The error marker.
    Error,
}

/// A live watch on one directory for one pair of markers.
pub struct SentinelWatcher {
    dir: PathBuf,
    names: SentinelNames,
    watcher: Option<RecommendedWatcher>,
    events: mpsc::UnboundedReceiver<notify::Result<Event>>,
}

impl SentinelWatcher {
    /// Start watching `dir` for the markers in `names`.
    pub fn watch(dir: &Path, names: SentinelNames) -> Result<Self, RunnerError> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        })
        .map_err(|source| RunnerError::Watch {
            dir: dir.to_path_buf(),
            source,
        })?;

        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|source| RunnerError::Watch {
                dir: dir.to_path_buf(),
                source,
            })?;

        debug!(
            dir = %dir.display(),
            success = %names.success,
            error = %names.error,
            "sentinel watch registered"
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            names,
            watcher: Some(watcher),
            events: rx,
        })
    }

    /// Directory being watched.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the success marker.
    pub fn success_path(&self) -> PathBuf {
        self.dir.join(&self.names.success)
    }

    /// Full path of the error marker.
    pub fn error_path(&self) -> PathBuf {
        self.dir.join(&self.names.error)
    }

    /// Wait for the first marker, then dispose.
    pub async fn wait(mut self) -> Result<Sentinel, RunnerError> {
        let outcome = self.next_sentinel().await;
        self.dispose();
        outcome
    }

    async fn next_sentinel(&mut self) -> Result<Sentinel, RunnerError> {
        if let Some(hit) = self.already_present() {
            return Ok(hit);
        }
        while let Some(res) = self.events.recv().await {
            match res {
                Ok(event) => {
                    if let Some(hit) = self.classify(&event) {
                        return Ok(hit);
                    }
                }
                Err(e) => warn!(dir = %self.dir.display(), error = %e, "watch error"),
            }
        }
        Err(RunnerError::WatchLost {
            dir: self.dir.clone(),
        })
    }

    fn already_present(&self) -> Option<Sentinel> {
        if self.success_path().is_file() {
            Some(Sentinel::Success)
        } else if self.error_path().is_file() {
            Some(Sentinel::Error)
        } else {
            None
        }
    }

    fn classify(&self, event: &Event) -> Option<Sentinel> {
        let created = match event.kind {
            EventKind::Create(_) => true,
            EventKind::Remove(_) | EventKind::Access(_) => return None,
            _ => false,
        };
        event.paths.iter().find_map(|path| {
            let hit = self.match_name(path.file_name()?)?;
            (created || path.is_file()).then_some(hit)
        })
    }

    fn match_name(&self, name: &OsStr) -> Option<Sentinel> {
        if name == OsStr::new(&self.names.success) {
            Some(Sentinel::Success)
        } else if name == OsStr::new(&self.names.error) {
            Some(Sentinel::Error)
        } else {
            None
        }
    }

    /// Stop observing and delete both markers. Idempotent.
    fn dispose(&mut self) {
        if self.watcher.take().is_none() {
            return;
        }
        self.events.close();
        for path in [self.success_path(), self.error_path()] {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "sentinel removed"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "failed to remove sentinel"),
            }
        }
        debug!(dir = %self.dir.display(), "sentinel watch disposed");
    }
}

impl Drop for SentinelWatcher {
    fn drop(&mut self) {
        self.dispose();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(10);

    fn names(id: &str) -> SentinelNames {
        SentinelNames::for_run(&RunId::from(id))
    }

    #[test]
    fn names_embed_run_id() {
        let n = names("abc");
        assert_eq!(n.success, "runSuccessabc.txt");
        assert_eq!(n.error, "runErrorabc.txt");
    }

    #[tokio::test]
    async fn success_marker_resolves_and_is_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let watcher = SentinelWatcher::watch(dir.path(), names("s1")).unwrap();
        let marker = watcher.success_path();

        let wait = tokio::spawn(watcher.wait());
        tokio::time::sleep(Duration::from_millis(50)).await;
        std::fs::write(&marker, b"").unwrap();

        let hit = tokio::time::timeout(WAIT, wait).await.unwrap().unwrap().unwrap();
        assert_eq!(hit, Sentinel::Success);
        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn error_marker_resolves_and_is_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let watcher = SentinelWatcher::watch(dir.path(), names("e1")).unwrap();
        let marker = watcher.error_path();

        let wait = tokio::spawn(watcher.wait());
        tokio::time::sleep(Duration::from_millis(50)).await;
        std::fs::write(&marker, b"").unwrap();

        let hit = tokio::time::timeout(WAIT, wait).await.unwrap().unwrap().unwrap();
        assert_eq!(hit, Sentinel::Error);
        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn unrelated_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let watcher = SentinelWatcher::watch(dir.path(), names("u1")).unwrap();
        let marker = watcher.success_path();

        let wait = tokio::spawn(watcher.wait());
        tokio::time::sleep(Duration::from_millis(50)).await;
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("runSuccessother.txt"), b"").unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!wait.is_finished());

        std::fs::write(&marker, b"").unwrap();
        let hit = tokio::time::timeout(WAIT, wait).await.unwrap().unwrap().unwrap();
        assert_eq!(hit, Sentinel::Success);
        assert!(dir.path().join("notes.txt").exists());
        assert!(dir.path().join("runSuccessother.txt").exists());
    }

    #[tokio::test]
    async fn both_markers_present_picks_one_and_removes_both() {
        let dir = tempfile::tempdir().unwrap();
        let watcher = SentinelWatcher::watch(dir.path(), names("b1")).unwrap();
        let ok = watcher.success_path();
        let err = watcher.error_path();
        std::fs::write(&ok, b"").unwrap();
        std::fs::write(&err, b"").unwrap();

        let hit = tokio::time::timeout(WAIT, watcher.wait()).await.unwrap().unwrap();
        assert_eq!(hit, Sentinel::Success);
        assert!(!ok.exists());
        assert!(!err.exists());
    }

    #[tokio::test]
    async fn dropping_an_abandoned_watch_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let watcher = SentinelWatcher::watch(dir.path(), names("d1")).unwrap();
        let marker = watcher.error_path();
        std::fs::write(&marker, b"").unwrap();
        drop(watcher);
        assert!(!marker.exists());
    }

    #[test]
    fn watching_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = SentinelWatcher::watch(&missing, names("m1")).err().unwrap();
        assert!(matches!(err, RunnerError::Watch { .. }));
    }
}
