//! Turns on-disk edits under the working tree into session events.
//!
//! The learner edits code in an editor we do not control, so the only
//! signal that a file changed is the filesystem itself.

use std::path::Path;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use tutor_session::TutorEvent;

/// Recursive watch posting [`TutorEvent::DocumentChanged`]. Stops on drop.
pub struct EditWatcher {
    _watcher: RecommendedWatcher,
}

impl EditWatcher {
    /// Watch `dir` recursively, posting into `events`.
    pub fn start(dir: &Path, events: mpsc::UnboundedSender<TutorEvent>) -> notify::Result<Self> {
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    return;
                }
                for path in event.paths.into_iter().filter(|p| p.is_file()) {
                    let _ = events.send(TutorEvent::DocumentChanged { path, text: None });
                }
            }
            Err(e) => warn!(error = %e, "edit watch error"),
        })?;
        watcher.watch(dir, RecursiveMode::Recursive)?;
        debug!(dir = %dir.display(), "watching working tree for edits");
        Ok(Self { _watcher: watcher })
    }
}
