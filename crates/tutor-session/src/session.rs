//! The session loop.
//!
//! A [`Session`] owns the tutorial model and every collaborator, and applies
//! [`TutorEvent`]s one at a time. Run callbacks execute on runtime tasks, so
//! they never touch session state; they only post
//! [`TutorEvent::RunFinished`] back into the loop.
//!
//! A successful run advances the step of the section it was started from,
//! and only while the learner is still on that exact section and step.

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tutor_core::{ExternalIoError, IoAction, RunId};
use tutor_curriculum::{Position, TutorialModel};
use tutor_runner::{
    ExecutionCoordinator, FailureKind, RunConfig, RunHandle, RunOutcome, RunReport,
};
use tutor_settings::TutorSettings;
use tutor_workspace::{BackupLayout, BackupRestorer, Drift, DriftDetector, Restore};

use crate::collaborators::{CodeEditor, Collaborators, DocViewer, Notifier};
use crate::errors::SessionError;
use crate::event::TutorEvent;
use crate::render::RenderState;

/// Session configuration.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Directory curriculum refs are relative to.
    pub content_root: PathBuf,
    /// Working and backup trees.
    pub layout: BackupLayout,
    /// Runner configuration.
    pub run: RunConfig,
    /// Offer "next" before a section was ever completed.
    pub always_show_next: bool,
    /// Sent to the terminal once by [`Session::start`].
    pub startup_command: Option<String>,
}

impl SessionConfig {
    /// Configuration described by `settings`.
    pub fn from_settings(settings: &TutorSettings) -> Self {
        Self {
            content_root: settings.content.root_path(),
            layout: BackupLayout::from_settings(&settings.content),
            run: RunConfig::from(&settings.runner),
            always_show_next: settings.ui.always_show_next,
            startup_command: settings.runner.startup_command.clone(),
        }
    }
}

struct PendingRun {
    origin: Position,
    handle: RunHandle,
}

/// One learner's tutorial session.
pub struct Session {
    model: TutorialModel,
    content_root: PathBuf,
    always_show_next: bool,
    startup_command: Option<String>,

    coordinator: ExecutionCoordinator,
    detector: DriftDetector,
    restorer: BackupRestorer,

    viewer: Box<dyn DocViewer>,
    editor: Box<dyn CodeEditor>,
    notifier: Box<dyn Notifier>,

    events: mpsc::UnboundedSender<TutorEvent>,
    pending: HashMap<RunId, PendingRun>,

    /// Code file opened for the current step.
    open_code: Option<PathBuf>,
    /// Focused document; drift is tracked for this file.
    active_document: Option<PathBuf>,
    drifted: bool,
}

impl Session {
    /// Create a session. Run completions are posted to `events`, which must
    /// feed the receiver passed to [`Session::run`].
    pub fn new(
        model: TutorialModel,
        config: SessionConfig,
        parts: Collaborators,
        events: mpsc::UnboundedSender<TutorEvent>,
    ) -> Self {
        Self {
            model,
            content_root: config.content_root,
            always_show_next: config.always_show_next,
            startup_command: config.startup_command,
            coordinator: ExecutionCoordinator::new(config.run, parts.terminals),
            detector: DriftDetector::new(config.layout.clone()),
            restorer: BackupRestorer::new(config.layout),
            viewer: parts.viewer,
            editor: parts.editor,
            notifier: parts.notifier,
            events,
            pending: HashMap::new(),
            open_code: None,
            active_document: None,
            drifted: false,
        }
    }

    /// The tutorial model.
    pub fn model(&self) -> &TutorialModel {
        &self.model
    }

    /// What the viewer currently shows.
    pub fn render_state(&self) -> RenderState {
        RenderState::capture(
            &self.model,
            &self.content_root,
            self.drifted,
            self.always_show_next,
        )
    }

    /// Whether the active document differs from its backup.
    pub fn is_drifted(&self) -> bool {
        self.drifted
    }

    /// Focused document, if any.
    pub fn active_document(&self) -> Option<&Path> {
        self.active_document.as_deref()
    }

    /// Runs started and not yet reported.
    pub fn pending_runs(&self) -> usize {
        self.pending.len()
    }

    /// Send the startup command, if any, and open the first section.
    pub fn start(&mut self) {
        if let Some(command) = self.startup_command.take() {
            debug!(command, "sending startup command");
            if let Err(e) = self.coordinator.send_command(&command) {
                self.report(&e.into());
            }
        }
        self.show_current();
    }

    /// Process events until [`TutorEvent::Shutdown`] or the channel closes,
    /// then cancel and await pending runs.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<TutorEvent>) {
        while let Some(event) = events.recv().await {
            if self.handle(event).is_break() {
                break;
            }
        }
        self.shutdown().await;
    }

    /// Apply one event.
    pub fn handle(&mut self, event: TutorEvent) -> ControlFlow<()> {
        debug!(?event, "handling event");
        match event {
            TutorEvent::OpenSection(index) => self.open_section(index),
            TutorEvent::Next => {
                if self.model.go_next().crossed_section() {
                    self.coordinator.hide_terminal();
                }
                self.show_current();
            }
            TutorEvent::NextStep => {
                let _ = self.model.next_step();
                self.show_current();
            }
            TutorEvent::Previous => {
                let _ = self.model.go_back();
                self.show_current();
            }
            TutorEvent::ResetSection => {
                self.model.reset_current_section();
                self.show_current();
            }
            TutorEvent::ResetCode => self.reset_code(),
            TutorEvent::RunCode => self.run_code(),
            TutorEvent::FocusChanged(path) => self.focus_changed(path),
            TutorEvent::DocumentChanged { path, text } => {
                self.document_changed(&path, text.as_deref());
            }
            TutorEvent::TerminalCommand(command) => self.terminal_command(&command),
            TutorEvent::TerminalClosed => self.coordinator.terminal_closed(),
            TutorEvent::RunFinished(report) => self.run_finished(report),
            TutorEvent::Refresh => self.render(),
            TutorEvent::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Cancel pending runs and wait for their cleanup.
    pub async fn shutdown(&mut self) {
        let pending: Vec<PendingRun> = self.pending.drain().map(|(_, run)| run).collect();
        if !pending.is_empty() {
            info!(count = pending.len(), "cancelling pending runs");
        }
        for run in &pending {
            run.handle.cancel();
        }
        for run in pending {
            let _ = run.handle.finished().await;
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────

    fn open_section(&mut self, index: usize) {
        if index < self.model.section_count()
            && !self.model.is_unlocked(index)
            && !self.always_show_next
        {
            self.report(&SessionError::Locked { index });
            return;
        }
        if let Err(e) = self.model.select_section(index) {
            self.report(&e.into());
            return;
        }
        self.coordinator.hide_terminal();
        self.show_current();
    }

    /// Open the current step's code (or close the editor for a text-only
    /// step), re-check drift, render.
    fn show_current(&mut self) {
        match self.model.current_section().code() {
            Some(code) => {
                let path = self.content_root.join(code);
                match self.editor.open(&path) {
                    Ok(()) => {
                        self.open_code = Some(path.clone());
                        self.active_document = Some(path);
                    }
                    Err(e) => {
                        if self.open_code.take().is_some() {
                            self.editor.close();
                        }
                        self.active_document = None;
                        self.report(&ExternalIoError::new(IoAction::Open, &path, e).into());
                    }
                }
            }
            None => {
                if self.open_code.take().is_some() {
                    self.editor.close();
                }
                self.active_document = None;
            }
        }
        self.drifted = self.check_active(None).is_drifted();
        self.render();
    }

    fn render(&mut self) {
        let state = self.render_state();
        if let Err(e) = self.viewer.render(&state) {
            self.report(&ExternalIoError::new(IoAction::Open, &state.doc, e).into());
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Drift
    // ─────────────────────────────────────────────────────────────────────

    fn check_active(&self, text: Option<&str>) -> Drift {
        let Some(path) = self.active_document.as_deref() else {
            return Drift::Unknown;
        };
        let result = match text {
            Some(text) => self.detector.check_text(path, text),
            None => self.detector.check(path),
        };
        result.unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "drift check failed");
            Drift::Unknown
        })
    }

    /// Update the drift flag; re-render only when it flips.
    fn update_drift(&mut self, text: Option<&str>) {
        let drift = self.check_active(text);
        if drift == Drift::Unknown {
            return;
        }
        let drifted = drift.is_drifted();
        if drifted != self.drifted {
            debug!(drifted, "drift flag changed");
            self.drifted = drifted;
            self.render();
        }
    }

    fn focus_changed(&mut self, path: Option<PathBuf>) {
        let Some(path) = path else {
            return;
        };
        self.active_document = Some(path);
        self.update_drift(None);
    }

    fn document_changed(&mut self, path: &Path, text: Option<&str>) {
        if self.active_document.as_deref() != Some(path) {
            return;
        }
        self.update_drift(text);
    }

    fn reset_code(&mut self) {
        let Some(path) = self.active_document.clone().or_else(|| self.open_code.clone()) else {
            debug!("reset requested with no active document");
            return;
        };
        if let Err(e) = self.editor.reveal(&path) {
            self.report(&ExternalIoError::new(IoAction::Open, &path, e).into());
            return;
        }
        match self.restorer.restore(&path) {
            Ok(Restore::Restored { .. }) => {
                if let Err(e) = self.editor.reload(&path) {
                    self.report(&ExternalIoError::new(IoAction::Read, &path, e).into());
                }
                self.active_document = Some(path);
                self.update_drift(None);
            }
            Ok(Restore::NoBackup) => debug!(path = %path.display(), "nothing to reset"),
            Err(e) => self.report(&e.into()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Runs
    // ─────────────────────────────────────────────────────────────────────

    fn run_code(&mut self) {
        let target = self
            .model
            .current_section()
            .code()
            .map(|c| self.content_root.join(c));

        if let Some(ref path) = target {
            if let Err(e) = self.editor.reveal(path) {
                warn!(path = %path.display(), error = %e, "could not reveal code before run");
            }
        }

        let on_success = self.post_finished();
        let on_failure = self.post_finished();
        match self.coordinator.run(target.as_deref(), on_success, on_failure) {
            Ok(handle) => {
                let origin = self.model.position();
                debug!(
                    run_id = %handle.id(),
                    section = origin.section,
                    step = origin.step,
                    "run pending"
                );
                let _ = self.pending.insert(handle.id().clone(), PendingRun { origin, handle });
            }
            Err(e) => self.report(&e.into()),
        }
    }

    fn terminal_command(&mut self, command: &str) {
        debug!(command, "sending terminal command");
        if let Err(e) = self.coordinator.send_command(command) {
            self.report(&e.into());
        }
    }

    fn post_finished(&self) -> impl FnOnce(RunReport) + Send + 'static {
        let events = self.events.clone();
        move |report| {
            if events.send(TutorEvent::RunFinished(report)).is_err() {
                debug!("session gone, run report dropped");
            }
        }
    }

    fn run_finished(&mut self, report: RunReport) {
        let origin = self.pending.remove(&report.run.run_id).map(|p| p.origin);
        match report.outcome {
            RunOutcome::Succeeded => {
                self.notifier.info("Code ran successfully!");
                if origin == Some(self.model.position()) {
                    let _ = self.model.next_step();
                    self.show_current();
                } else {
                    info!(run_id = %report.run.run_id, "learner moved on, progress unchanged");
                }
            }
            RunOutcome::Failed(FailureKind::Cancelled) => {
                self.notifier.info(&format!("Run stopped: {}.", FailureKind::Cancelled));
            }
            RunOutcome::Failed(kind) => {
                self.notifier.error(&format!("Code run encountered an error: {kind}."));
            }
        }
    }

    fn report(&mut self, err: &SessionError) {
        warn!(error = %err, "session operation failed");
        self.notifier.error(&err.to_string());
    }
}
