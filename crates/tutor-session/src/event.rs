//! Inputs to the session loop.

use std::path::PathBuf;

use tutor_runner::RunReport;

/// One unit of work for the session. Handled strictly in arrival order.
#[derive(Clone, Debug)]
pub enum TutorEvent {
    /// Open the section at this 0-based index.
    OpenSection(usize),
    /// Advance a step, or move to the next section once this one is done.
    Next,
    /// Advance a step within the current section.
    NextStep,
    /// Step back, crossing into the previous section from a first step.
    Previous,
    /// Return the current section to its first step and clear its flags.
    ResetSection,
    /// Overwrite the active code file with its backup.
    ResetCode,
    /// Run the current step's code file.
    RunCode,
    /// The focused document changed (`None`: nothing focused).
    FocusChanged(Option<PathBuf>),
    /// A document's text changed.
    DocumentChanged {
        /// The document.
        path: PathBuf,
        /// Unsaved buffer contents, or `None` to read the file from disk.
        text: Option<String>,
    },
    /// Send a command line to the tutorial terminal, creating it if needed.
    TerminalCommand(String),
    /// The host closed the terminal.
    TerminalClosed,
    /// A run resolved. Posted by run callbacks.
    RunFinished(RunReport),
    /// Render the current state again.
    Refresh,
    /// Stop the loop.
    Shutdown,
}
