//! Console implementations of the session's host surfaces.
//!
//! The doc viewer prints the step's markdown source as is. The editor does
//! not edit anything; it tells the learner which file to open in their own
//! editor.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tutor_session::{CodeEditor, DocViewer, NextButton, Notifier, RenderState};

/// A writer shared by all console surfaces so their output interleaves in
/// order.
#[derive(Clone)]
pub struct Console {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Console {
    /// Console writing to `out`.
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
        }
    }

    /// Console writing to stdout.
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Write `text` followed by a newline and flush.
    pub fn line(&self, text: &str) -> io::Result<()> {
        let mut out = self.out.lock();
        writeln!(out, "{text}")?;
        out.flush()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Viewer
// ─────────────────────────────────────────────────────────────────────────────

/// Prints the current step.
pub struct ConsoleViewer {
    console: Console,
}

impl ConsoleViewer {
    /// Viewer on `console`.
    pub fn new(console: Console) -> Self {
        Self { console }
    }
}

fn navigation_hint(state: &RenderState) -> String {
    let mut hints = Vec::new();
    if !state.is_beginning {
        hints.push("back");
    }
    if state.code.is_some() {
        hints.push("run");
    }
    if state.is_drifted {
        hints.push("reset-code");
    }
    match state.next {
        NextButton::Hidden => {}
        NextButton::Primary => hints.push("next"),
        NextButton::Secondary => hints.push("next (revisit)"),
    }
    hints.join(" | ")
}

impl DocViewer for ConsoleViewer {
    fn render(&mut self, state: &RenderState) -> io::Result<()> {
        let doc = std::fs::read_to_string(&state.doc)?;
        let mut text = format!(
            "\n=== Section {} of {}: {} (step {} of {}) ===\n",
            state.section_number,
            state.section_count,
            state.title,
            state.step_index + 1,
            state.step_count,
        );
        if !state.description.is_empty() && state.step_index == 0 {
            text.push_str(&state.description);
            text.push('\n');
        }
        text.push('\n');
        text.push_str(doc.trim_end());
        text.push_str("\n\n");
        if let Some(ref code) = state.code {
            text.push_str(&format!("code: {}", code.display()));
            if state.is_drifted {
                text.push_str(" (modified)");
            }
            text.push('\n');
        }
        if let Some(ref supplement) = state.supplement {
            text.push_str(&format!("see also: {}\n", supplement.display()));
        }
        if state.is_end {
            text.push_str("You have reached the end of the tutorial.\n");
        }
        text.push_str(&format!("[{}]", navigation_hint(state)));
        self.console.line(&text)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Editor
// ─────────────────────────────────────────────────────────────────────────────

/// Points the learner at code files.
pub struct ConsoleEditor {
    console: Console,
    current: Option<PathBuf>,
}

impl ConsoleEditor {
    /// Editor on `console`.
    pub fn new(console: Console) -> Self {
        Self {
            console,
            current: None,
        }
    }
}

impl CodeEditor for ConsoleEditor {
    fn open(&mut self, path: &Path) -> io::Result<()> {
        let _ = std::fs::metadata(path)?;
        if self.current.as_deref() != Some(path) {
            self.console.line(&format!("-> edit {}", path.display()))?;
            self.current = Some(path.to_path_buf());
        }
        Ok(())
    }

    fn close(&mut self) {
        self.current = None;
    }

    fn reload(&mut self, path: &Path) -> io::Result<()> {
        self.console
            .line(&format!("-> {} was restored, reload it in your editor", path.display()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Notifier
// ─────────────────────────────────────────────────────────────────────────────

/// Prints messages, errors marked as such.
pub struct ConsoleNotifier {
    console: Console,
}

impl ConsoleNotifier {
    /// Notifier on `console`.
    pub fn new(console: Console) -> Self {
        Self { console }
    }
}

impl Notifier for ConsoleNotifier {
    fn info(&mut self, message: &str) {
        if let Err(e) = self.console.line(message) {
            tracing::warn!(error = %e, "failed to print message");
        }
    }

    fn error(&mut self, message: &str) {
        if let Err(e) = self.console.line(&format!("error: {message}")) {
            tracing::warn!(error = %e, "failed to print message");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
