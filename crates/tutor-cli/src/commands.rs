//! Learner commands read from stdin.

use thiserror::Error;
use tutor_session::TutorEvent;

/// Printed for `help`.
pub const HELP: &str = "\
commands:
  open N       open section N (1-based)
  next         next step, or next section once this one is done
  step         next step within this section
  back         previous step or section
  run          run this step's code
  reset        restart this section
  reset-code   restore this step's code from its backup
  term CMD     send CMD to the tutorial terminal
  status       show the current step again
  help         show this message
  quit         leave the tutorial";

/// A parsed input line.
#[derive(Clone, Debug)]
pub enum Command {
    /// Forward to the session.
    Event(TutorEvent),
    /// Print [`HELP`].
    Help,
    /// Nothing to do (blank line).
    Nothing,
}

/// Input the command loop cannot interpret.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// Unrecognised command word.
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),
    /// `open` without a valid section number.
    #[error("usage: open N, where N is a section number starting at 1")]
    BadSection,
    /// `term` without a command line.
    #[error("usage: term CMD, where CMD is a shell command line")]
    MissingCommand,
}

/// Parse one line of input.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    if word.is_empty() {
        return Ok(Command::Nothing);
    }
    let mut words = rest.split_whitespace();
    let event = match word.to_ascii_lowercase().as_str() {
        "open" => {
            let n = words
                .next()
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|&n| n > 0)
                .ok_or(CommandError::BadSection)?;
            TutorEvent::OpenSection(n - 1)
        }
        "next" | "n" => TutorEvent::Next,
        "step" => TutorEvent::NextStep,
        "back" | "previous" | "b" => TutorEvent::Previous,
        "run" | "r" => TutorEvent::RunCode,
        "reset" => TutorEvent::ResetSection,
        "reset-code" => TutorEvent::ResetCode,
        "term" => {
            let command = rest.trim();
            if command.is_empty() {
                return Err(CommandError::MissingCommand);
            }
            TutorEvent::TerminalCommand(command.to_owned())
        }
        "status" => TutorEvent::Refresh,
        "quit" | "exit" | "q" => TutorEvent::Shutdown,
        "help" | "?" => return Ok(Command::Help),
        other => return Err(CommandError::Unknown(other.to_owned())),
    };
    Ok(Command::Event(event))
}
