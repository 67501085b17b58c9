//! The user-visible process surface code runs in.
//!
//! [`Terminal`] is the seam to whatever hosts the learner's terminal. The
//! runner only ever sends it a command line and asks it to show itself; it
//! never gets a process handle back, which is why completion is signalled
//! through sentinel files.
//!
//! [`TerminalSlot`] holds at most one terminal, created on first use and
//! forgotten when the host reports it closed.

use std::process::Stdio;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::errors::RunnerError;

/// A terminal that accepts command lines.
pub trait Terminal: Send + Sync {
    /// Display name.
    fn name(&self) -> &str;

    /// Send a command line for execution. Must not wait for it to finish.
    fn send_text(&self, text: &str) -> Result<(), RunnerError>;

    /// Bring the terminal into view.
    fn show(&self) {}

    /// Hide the terminal without closing it.
    fn hide(&self) {}
}

/// Creates terminals on demand.
pub trait TerminalFactory: Send + Sync {
    /// Create a terminal called `name`.
    fn create(&self, name: &str) -> Result<Arc<dyn Terminal>, RunnerError>;
}

/// Lazily created single terminal.
pub struct TerminalSlot {
    factory: Arc<dyn TerminalFactory>,
    name: String,
    current: Option<Arc<dyn Terminal>>,
}

impl TerminalSlot {
    /// Empty slot that will create terminals called `name`.
    pub fn new(factory: Arc<dyn TerminalFactory>, name: impl Into<String>) -> Self {
        Self {
            factory,
            name: name.into(),
            current: None,
        }
    }

    /// The current terminal, creating it if needed.
    pub fn get_or_create(&mut self) -> Result<Arc<dyn Terminal>, RunnerError> {
        if let Some(ref terminal) = self.current {
            return Ok(Arc::clone(terminal));
        }
        let terminal = self.factory.create(&self.name)?;
        debug!(name = %self.name, "terminal created");
        self.current = Some(Arc::clone(&terminal));
        Ok(terminal)
    }

    /// The current terminal, if one exists.
    pub fn get(&self) -> Option<&Arc<dyn Terminal>> {
        self.current.as_ref()
    }

    /// Forget the current terminal (the host closed it).
    pub fn release(&mut self) {
        if self.current.take().is_some() {
            debug!(name = %self.name, "terminal released");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shell terminal
// ─────────────────────────────────────────────────────────────────────────────

/// Runs each command line with `bash -c`, sharing this process's stdout and
/// stderr. Stdin is not forwarded.
pub struct ShellTerminal {
    name: String,
}

impl ShellTerminal {
    /// New terminal called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Terminal for ShellTerminal {
    fn name(&self) -> &str {
        &self.name
    }

    fn send_text(&self, text: &str) -> Result<(), RunnerError> {
        let mut cmd = tokio::process::Command::new("bash");
        let _ = cmd
            .arg("-c")
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let mut child = cmd
            .spawn()
            .map_err(|e| RunnerError::terminal(format!("failed to spawn bash: {e}")))?;
        debug!(terminal = %self.name, command = text, pid = ?child.id(), "command dispatched");

        let command = text.to_owned();
        drop(tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => debug!(command, ?status, "terminal command exited"),
                Err(e) => warn!(command, error = %e, "terminal command wait failed"),
            }
        }));
        Ok(())
    }

    fn show(&self) {
        info!(terminal = %self.name, "terminal shown");
    }
}

/// Factory for [`ShellTerminal`].
#[derive(Default)]
pub struct ShellTerminalFactory;

impl TerminalFactory for ShellTerminalFactory {
    fn create(&self, name: &str) -> Result<Arc<dyn Terminal>, RunnerError> {
        Ok(Arc::new(ShellTerminal::new(name)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingFactory {
        created: AtomicUsize,
    }

    impl TerminalFactory for CountingFactory {
        fn create(&self, name: &str) -> Result<Arc<dyn Terminal>, RunnerError> {
            let _ = self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(ShellTerminal::new(name)))
        }
    }

    struct BrokenFactory;

    impl TerminalFactory for BrokenFactory {
        fn create(&self, _name: &str) -> Result<Arc<dyn Terminal>, RunnerError> {
            Err(RunnerError::terminal("no pty"))
        }
    }

    #[test]
    fn slot_creates_lazily_and_reuses() {
        let factory = Arc::new(CountingFactory {
            created: AtomicUsize::new(0),
        });
        let mut slot = TerminalSlot::new(factory.clone(), "T");
        assert!(slot.get().is_none());

        let a = slot.get_or_create().unwrap();
        let b = slot.get_or_create().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.name(), "T");
        assert_eq!(factory.created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn slot_recreates_after_release() {
        let factory = Arc::new(CountingFactory {
            created: AtomicUsize::new(0),
        });
        let mut slot = TerminalSlot::new(factory.clone(), "T");
        let _ = slot.get_or_create().unwrap();
        slot.release();
        assert!(slot.get().is_none());
        let _ = slot.get_or_create().unwrap();
        assert_eq!(factory.created.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn slot_surfaces_factory_failure() {
        let mut slot = TerminalSlot::new(Arc::new(BrokenFactory), "T");
        assert!(matches!(
            slot.get_or_create(),
            Err(RunnerError::Terminal { .. })
        ));
        assert!(slot.get().is_none());
    }

    #[tokio::test]
    async fn shell_terminal_runs_command_in_background() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("done");
        let terminal = ShellTerminal::new("T");
        terminal
            .send_text(&format!("touch '{}'", marker.display()))
            .unwrap();

        for _ in 0..100 {
            if marker.exists() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("command did not run");
    }
}
