//! The host surfaces a session drives.
//!
//! A session never touches a screen directly. It hands a [`RenderState`] to
//! a [`DocViewer`], asks a [`CodeEditor`] to show working files, and reports
//! outcomes through a [`Notifier`]. Terminals come from a
//! [`TerminalFactory`](tutor_runner::TerminalFactory).

use std::io;
use std::path::Path;
use std::sync::Arc;

use tutor_runner::TerminalFactory;

use crate::render::RenderState;

/// Shows the current step's reading material.
pub trait DocViewer: Send {
    /// Display `state`, replacing whatever was shown before.
    fn render(&mut self, state: &RenderState) -> io::Result<()>;
}

/// Shows working code files.
pub trait CodeEditor: Send {
    /// Open `path` and give it focus.
    fn open(&mut self, path: &Path) -> io::Result<()>;

    /// Close the code file opened last, if any.
    fn close(&mut self);

    /// Bring an already opened `path` into view.
    fn reveal(&mut self, path: &Path) -> io::Result<()> {
        self.open(path)
    }

    /// Re-read `path` from disk after it was replaced.
    fn reload(&mut self, path: &Path) -> io::Result<()> {
        self.open(path)
    }
}

/// User-visible messages.
pub trait Notifier: Send {
    /// Informational message.
    fn info(&mut self, message: &str);

    /// Error message.
    fn error(&mut self, message: &str);
}

/// Everything a session needs from its host.
pub struct Collaborators {
    /// Reading material surface.
    pub viewer: Box<dyn DocViewer>,
    /// Code surface.
    pub editor: Box<dyn CodeEditor>,
    /// Message surface.
    pub notifier: Box<dyn Notifier>,
    /// Terminal source for runs.
    pub terminals: Arc<dyn TerminalFactory>,
}
