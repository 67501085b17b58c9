//! # tutor
//!
//! Interactive coding tutorial in the terminal. Loads a curriculum, shows
//! one step at a time, runs the step's code, and moves on when it succeeds.

#![deny(unsafe_code)]

mod commands;
mod console;
mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tutor_runner::ShellTerminalFactory;
use tutor_session::{Collaborators, Session, SessionConfig, TutorEvent};
use tutor_settings::TutorSettings;

use crate::commands::{Command, HELP, parse_command};
use crate::console::{Console, ConsoleEditor, ConsoleNotifier, ConsoleViewer};
use crate::watch::EditWatcher;

/// Interactive coding tutorial.
#[derive(Parser, Debug)]
#[command(name = "tutor", about = "Step-by-step coding tutorial in your terminal")]
struct Cli {
    /// Directory holding the curriculum and its files.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Interpreter used to run code files.
    #[arg(long)]
    interpreter: Option<String>,

    /// Give up on a run after this many milliseconds.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=86_400_000))]
    timeout_ms: Option<u64>,

    /// Log level or `EnvFilter` directive.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Flags take precedence over every settings layer.
    fn apply(self, settings: &mut TutorSettings) {
        if let Some(root) = self.root {
            settings.content.root = root.to_string_lossy().into_owned();
        }
        if let Some(interpreter) = self.interpreter {
            settings.runner.interpreter = interpreter;
        }
        if let Some(ms) = self.timeout_ms {
            settings.runner.timeout_ms = Some(ms);
        }
        if let Some(level) = self.log_level {
            settings.logging.level = level;
        }
    }
}

/// Read learner commands from stdin until EOF, then ask the session to stop.
async fn read_commands(events: mpsc::UnboundedSender<TutorEvent>, console: Console) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "failed to read stdin");
                break;
            }
        };
        let reply = match parse_command(&line) {
            Ok(Command::Event(event)) => {
                let stop = matches!(event, TutorEvent::Shutdown);
                if events.send(event).is_err() || stop {
                    return;
                }
                continue;
            }
            Ok(Command::Help) => HELP.to_owned(),
            Ok(Command::Nothing) => continue,
            Err(e) => e.to_string(),
        };
        if let Err(e) = console.line(&reply) {
            warn!(error = %e, "failed to write to stdout");
        }
    }
    let _ = events.send(TutorEvent::Shutdown);
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let mut settings = tutor_settings::load_settings().context("Failed to load settings")?;
    args.apply(&mut settings);
    settings.validate().context("Invalid settings")?;
    tutor_core::logging::init_subscriber(&settings.logging.level);

    let root = settings.content.root_path();
    let root = std::fs::canonicalize(&root)
        .with_context(|| format!("Content root not found: {}", root.display()))?;
    settings.content.root = root.to_string_lossy().into_owned();

    let curriculum_path = settings.content.curriculum_path();
    let model = tutor_curriculum::load_curriculum(&curriculum_path)
        .with_context(|| format!("Failed to load curriculum: {}", curriculum_path.display()))?;
    info!(sections = model.section_count(), "curriculum loaded");

    let config = SessionConfig::from_settings(&settings);
    if settings.content.provision_backup {
        let _ = tutor_workspace::provision_backup(&config.layout)
            .context("Failed to provision backup")?;
    }

    let (tx, rx) = mpsc::unbounded_channel();
    let _edits = match EditWatcher::start(&config.layout.working_root(), tx.clone()) {
        Ok(w) => Some(w),
        Err(e) => {
            warn!(error = %e, "edit watching disabled, drift only updates on navigation");
            None
        }
    };

    let console = Console::stdout();
    let mut session = Session::new(
        model,
        config,
        Collaborators {
            viewer: Box::new(ConsoleViewer::new(console.clone())),
            editor: Box::new(ConsoleEditor::new(console.clone())),
            notifier: Box::new(ConsoleNotifier::new(console.clone())),
            terminals: Arc::new(ShellTerminalFactory),
        },
        tx.clone(),
    );
    session.start();
    console.line("type 'help' for commands").context("Failed to write to stdout")?;

    let input = tokio::spawn(read_commands(tx, console));
    session.run(rx).await;
    input.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let cli = Cli::try_parse_from([
            "tutor",
            "--root",
            "/content",
            "--interpreter",
            "python3",
            "--timeout-ms",
            "5000",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let mut settings = TutorSettings::default();
        cli.apply(&mut settings);
        assert_eq!(settings.content.root, "/content");
        assert_eq!(settings.runner.interpreter, "python3");
        assert_eq!(settings.runner.timeout_ms, Some(5000));
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn no_flags_keep_settings() {
        let cli = Cli::try_parse_from(["tutor"]).unwrap();
        let mut settings = TutorSettings::default();
        cli.apply(&mut settings);
        assert_eq!(settings.runner.interpreter, "python");
        assert!(settings.runner.timeout_ms.is_none());
    }

    #[test]
    fn timeout_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["tutor", "--timeout-ms", "0"]).is_err());
        assert!(Cli::try_parse_from(["tutor", "--timeout-ms", "86400001"]).is_err());
    }
}
