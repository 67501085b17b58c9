//! Execution coordinator: starts runs and routes their outcome.
//!
//! [`ExecutionCoordinator::run`] never waits for the code to finish. It
//! writes a wrapper script, registers a [`SentinelWatcher`] on the target's
//! directory, hands the script to the terminal, and spawns a task that
//! resolves the run. That task races the watcher against the optional
//! timeout and the run's cancellation token; whichever wins, the watcher
//! and the script are cleaned up before the callback fires.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tutor_core::{Classify, ErrorKind, ExternalIoError, IoAction, RunId};
use tutor_settings::RunnerSettings;

use crate::errors::RunnerError;
use crate::script::{ScriptSpec, WrapperScript};
use crate::sentinel::{Sentinel, SentinelNames, SentinelWatcher};
use crate::terminal::{Terminal, TerminalFactory, TerminalSlot};

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Resolved runner configuration.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Interpreter command.
    pub interpreter: String,
    /// Clear the terminal before each run.
    pub clear_terminal: bool,
    /// Terminal display name.
    pub terminal_name: String,
    /// Where wrapper scripts are written.
    pub script_dir: PathBuf,
    /// Sentinel wait bound.
    pub timeout: Option<Duration>,
}

impl From<&RunnerSettings> for RunConfig {
    fn from(settings: &RunnerSettings) -> Self {
        Self {
            interpreter: settings.interpreter.clone(),
            clear_terminal: settings.clear_terminal,
            terminal_name: settings.terminal_name.clone(),
            script_dir: settings.script_dir_path(),
            timeout: settings.timeout(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::from(&RunnerSettings::default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Run types
// ─────────────────────────────────────────────────────────────────────────────

/// One execution request, fixed at start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionRun {
    /// Fresh per run.
    pub run_id: RunId,
    /// Absolute path of the executed file.
    pub target_path: PathBuf,
    /// Marker created on success.
    pub success_sentinel_path: PathBuf,
    /// Marker created on failure.
    pub error_sentinel_path: PathBuf,
    /// The wrapper script.
    pub script_path: PathBuf,
}

/// Lifecycle of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Waiting for a sentinel.
    Pending,
    /// The success sentinel appeared.
    Succeeded,
    /// The error sentinel appeared, or the wait ended some other way.
    Failed,
    /// Cleaned up and callback dispatched.
    Disposed,
}

/// Why a run did not succeed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The interpreter exited with a non-zero status.
    NonZeroExit,
    /// No sentinel appeared within the configured timeout.
    TimedOut,
    /// The run was cancelled through its handle.
    Cancelled,
    /// The watcher stopped delivering events.
    WatchLost,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonZeroExit => write!(f, "the code exited with an error"),
            Self::TimedOut => write!(f, "the code did not finish in time"),
            Self::Cancelled => write!(f, "the run was cancelled"),
            Self::WatchLost => write!(f, "lost track of the run"),
        }
    }
}

impl Classify for FailureKind {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::WatchLost => ErrorKind::ExternalIo,
            Self::NonZeroExit | Self::TimedOut | Self::Cancelled => ErrorKind::ExecutionFailure,
        }
    }
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Exit status 0.
    Succeeded,
    /// Anything else.
    Failed(FailureKind),
}

/// Delivered to the run's callback.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// The run.
    pub run: ExecutionRun,
    /// Its outcome.
    pub outcome: RunOutcome,
    /// Time from dispatch to resolution.
    pub elapsed: Duration,
}

impl RunReport {
    /// Whether the run succeeded.
    pub fn is_success(&self) -> bool {
        self.outcome == RunOutcome::Succeeded
    }
}

/// Handle to a started run. Dropping it does not cancel the run.
pub struct RunHandle {
    run: ExecutionRun,
    state: Arc<Mutex<RunState>>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl RunHandle {
    /// Run id.
    pub fn id(&self) -> &RunId {
        &self.run.run_id
    }

    /// The run this handle tracks.
    pub fn run(&self) -> &ExecutionRun {
        &self.run
    }

    /// Current state.
    pub fn state(&self) -> RunState {
        *self.state.lock()
    }

    /// Force-complete a pending run with [`FailureKind::Cancelled`].
    /// No effect once the run has resolved.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait until the run is disposed.
    pub async fn finished(self) -> RunState {
        if let Err(e) = self.task.await {
            warn!(run_id = %self.run.run_id, error = %e, "run task aborted");
        }
        *self.state.lock()
    }
}

impl fmt::Debug for RunHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunHandle")
            .field("run", &self.run)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Coordinator
// ─────────────────────────────────────────────────────────────────────────────

/// Starts runs in a lazily created terminal.
pub struct ExecutionCoordinator {
    config: RunConfig,
    terminal: TerminalSlot,
}

impl ExecutionCoordinator {
    /// Coordinator creating terminals through `factory`.
    pub fn new(config: RunConfig, factory: Arc<dyn TerminalFactory>) -> Self {
        let terminal = TerminalSlot::new(factory, config.terminal_name.clone());
        Self { config, terminal }
    }

    /// Active configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Execute `target` in the terminal.
    ///
    /// Returns once the run is dispatched. Exactly one of `on_success` or
    /// `on_failure` is called later, from a runtime task, after the
    /// sentinels and wrapper script are gone. Must be called from within a
    /// tokio runtime.
    pub fn run<S, F>(
        &mut self,
        target: Option<&Path>,
        on_success: S,
        on_failure: F,
    ) -> Result<RunHandle, RunnerError>
    where
        S: FnOnce(RunReport) + Send + 'static,
        F: FnOnce(RunReport) + Send + 'static,
    {
        let target = target.ok_or(RunnerError::NoActiveTarget)?;
        let target = resolve_target(target)?;
        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| RunnerError::NoParentDirectory {
                path: target.clone(),
            })?
            .to_path_buf();

        let terminal = self.terminal.get_or_create()?;

        let run_id = RunId::new();
        let names = SentinelNames::for_run(&run_id);
        let success_sentinel_path = dir.join(&names.success);
        let error_sentinel_path = dir.join(&names.error);

        let script = WrapperScript::render(
            &self.config.script_dir,
            &run_id,
            &ScriptSpec {
                interpreter: &self.config.interpreter,
                target: &target,
                success_marker: &success_sentinel_path,
                error_marker: &error_sentinel_path,
                clear_terminal: self.config.clear_terminal,
            },
        );
        script.write()?;

        let watcher = match SentinelWatcher::watch(&dir, names) {
            Ok(w) => w,
            Err(e) => {
                script.remove();
                return Err(e);
            }
        };

        if let Err(e) = terminal.send_text(&script.invocation()) {
            drop(watcher);
            script.remove();
            return Err(e);
        }
        terminal.show();

        let run = ExecutionRun {
            run_id,
            target_path: target,
            success_sentinel_path,
            error_sentinel_path,
            script_path: script.path().to_path_buf(),
        };
        info!(
            run_id = %run.run_id,
            target = %run.target_path.display(),
            "run started"
        );

        let state = Arc::new(Mutex::new(RunState::Pending));
        let cancel = CancellationToken::new();
        let task = tokio::spawn(resolve(
            run.clone(),
            watcher,
            script,
            self.config.timeout,
            cancel.clone(),
            Arc::clone(&state),
            on_success,
            on_failure,
        ));

        Ok(RunHandle {
            run,
            state,
            cancel,
            task,
        })
    }

    /// Send an arbitrary command line to the terminal and show it.
    pub fn send_command(&mut self, text: &str) -> Result<(), RunnerError> {
        let terminal = self.terminal.get_or_create()?;
        terminal.send_text(text)?;
        terminal.show();
        Ok(())
    }

    /// Hide the terminal if one exists.
    pub fn hide_terminal(&self) {
        if let Some(terminal) = self.terminal.get() {
            terminal.hide();
        }
    }

    /// The current terminal, if one exists.
    pub fn terminal(&self) -> Option<&Arc<dyn Terminal>> {
        self.terminal.get()
    }

    /// The host closed the terminal; the next run creates a new one.
    pub fn terminal_closed(&mut self) {
        self.terminal.release();
    }
}

fn resolve_target(target: &Path) -> Result<PathBuf, RunnerError> {
    let meta = std::fs::metadata(target).map_err(ExternalIoError::with(IoAction::Open, target))?;
    if !meta.is_file() {
        return Err(ExternalIoError::new(
            IoAction::Open,
            target,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
        )
        .into());
    }
    let absolute =
        std::path::absolute(target).map_err(ExternalIoError::with(IoAction::Open, target))?;
    Ok(absolute)
}

async fn deadline(timeout: Option<Duration>) {
    match timeout {
        Some(d) => tokio::time::sleep(d).await,
        None => std::future::pending().await,
    }
}

#[allow(clippy::too_many_arguments)]
async fn resolve<S, F>(
    run: ExecutionRun,
    watcher: SentinelWatcher,
    script: WrapperScript,
    timeout: Option<Duration>,
    cancel: CancellationToken,
    state: Arc<Mutex<RunState>>,
    on_success: S,
    on_failure: F,
) where
    S: FnOnce(RunReport) + Send + 'static,
    F: FnOnce(RunReport) + Send + 'static,
{
    let started = Instant::now();
    let run_id = run.run_id.clone();

    // Every branch drops the watcher, which removes both sentinels.
    let outcome = tokio::select! {
        res = watcher.wait() => match res {
            Ok(Sentinel::Success) => RunOutcome::Succeeded,
            Ok(Sentinel::Error) => RunOutcome::Failed(FailureKind::NonZeroExit),
            Err(e) => {
                warn!(run_id = %run_id, error = %e, "sentinel watch ended early");
                RunOutcome::Failed(FailureKind::WatchLost)
            }
        },
        () = deadline(timeout) => {
            warn!(run_id = %run_id, timeout_ms = ?timeout.map(|t| t.as_millis()), "run timed out");
            RunOutcome::Failed(FailureKind::TimedOut)
        }
        () = cancel.cancelled() => {
            debug!(run_id = %run_id, "run cancelled");
            RunOutcome::Failed(FailureKind::Cancelled)
        }
    };

    *state.lock() = match outcome {
        RunOutcome::Succeeded => RunState::Succeeded,
        RunOutcome::Failed(_) => RunState::Failed,
    };
    script.remove();

    let elapsed = started.elapsed();
    info!(
        run_id = %run_id,
        outcome = ?outcome,
        elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        "run finished"
    );

    let report = RunReport {
        run,
        outcome,
        elapsed,
    };
    let dispatched = match outcome {
        RunOutcome::Succeeded => catch_unwind(AssertUnwindSafe(|| on_success(report))),
        RunOutcome::Failed(_) => catch_unwind(AssertUnwindSafe(|| on_failure(report))),
    };
    if dispatched.is_err() {
        warn!(run_id = %run_id, "run callback panicked");
    }

    *state.lock() = RunState::Disposed;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
