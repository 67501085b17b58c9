//! Per-run wrapper script.
//!
//! The script clears the terminal, runs the target with the configured
//! interpreter, and creates the success or error marker depending on the
//! interpreter's exit status. One script is written per run and removed once
//! the run completes.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use tutor_core::{ExternalIoError, IoAction, RunId};

use crate::errors::RunnerError;

/// Quote `s` for a POSIX shell using single quotes.
pub fn shell_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

/// A wrapper script on disk.
#[derive(Debug)]
pub struct WrapperScript {
    path: PathBuf,
    body: String,
}

/// What the wrapper needs to know about a run.
#[derive(Clone, Copy, Debug)]
pub struct ScriptSpec<'a> {
    /// Interpreter command, inserted verbatim (may carry flags).
    pub interpreter: &'a str,
    /// File to execute.
    pub target: &'a Path,
    /// Marker created on exit status 0.
    pub success_marker: &'a Path,
    /// Marker created on any other exit status.
    pub error_marker: &'a Path,
    /// Whether to clear the terminal first.
    pub clear_terminal: bool,
}

impl WrapperScript {
    /// Render the script for `spec` at `script_dir/runCode<id>.sh`.
    pub fn render(script_dir: &Path, run_id: &RunId, spec: &ScriptSpec<'_>) -> Self {
        let target = shell_quote(&spec.target.to_string_lossy());
        let success = shell_quote(&spec.success_marker.to_string_lossy());
        let error = shell_quote(&spec.error_marker.to_string_lossy());
        let clear = if spec.clear_terminal { "clear\n" } else { "" };

        let body = format!(
            "{{\n\
             {clear}echo \"Executing code...\"\n\
             {interpreter} {target}\n\
             if [ $? -eq 0 ]; then\n  touch {success}\nelse\n  touch {error}\nfi\n\
             exit\n\
             }}\n",
            interpreter = spec.interpreter,
        );

        Self {
            path: script_dir.join(format!("runCode{run_id}.sh")),
            body,
        }
    }

    /// Where the script lives.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Script contents.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The command line that runs this script.
    pub fn invocation(&self) -> String {
        format!("bash {}", shell_quote(&self.path.to_string_lossy()))
    }

    /// Write the script to disk.
    pub fn write(&self) -> Result<(), RunnerError> {
        std::fs::write(&self.path, &self.body)
            .map_err(ExternalIoError::with(IoAction::Write, &self.path))?;
        debug!(path = %self.path.display(), "wrapper script written");
        Ok(())
    }

    /// Remove the script. Missing files are fine.
    pub fn remove(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "wrapper script removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to remove wrapper script");
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
