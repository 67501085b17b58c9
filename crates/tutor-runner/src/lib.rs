//! # tutor-runner
//!
//! Runs a learner's code file in a user-visible terminal and finds out how
//! it went.
//!
//! The terminal gives no exit status back, so each run is wrapped in a
//! script that creates `runSuccess<id>.txt` or `runError<id>.txt` next to the
//! target. A one-shot [`SentinelWatcher`] observes that directory and
//! resolves the run.
//!
//! - [`ExecutionCoordinator`]: start runs, own the terminal slot
//! - [`RunHandle`]: state, cancellation, completion of one run
//! - [`Terminal`] / [`TerminalFactory`]: the terminal seam, with a
//!   `bash -c` backed [`ShellTerminal`]

#![deny(unsafe_code)]

pub mod coordinator;
pub mod errors;
pub mod script;
pub mod sentinel;
pub mod terminal;

pub use coordinator::{
    ExecutionCoordinator, ExecutionRun, FailureKind, RunConfig, RunHandle, RunOutcome, RunReport,
    RunState,
};
pub use errors::RunnerError;
pub use script::{ScriptSpec, WrapperScript, shell_quote};
pub use sentinel::{Sentinel, SentinelNames, SentinelWatcher};
pub use terminal::{ShellTerminal, ShellTerminalFactory, Terminal, TerminalFactory, TerminalSlot};
