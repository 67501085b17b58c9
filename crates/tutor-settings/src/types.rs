//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`,
//! so a settings file only needs the fields it overrides.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// # JSON Format
///
/// ```json
/// {
///   "content": { "root": "/opt/quickstart" },
///   "runner": { "interpreter": "python3", "timeoutMs": 600000 }
/// }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TutorSettings {
    /// Where the curriculum and its files live.
    pub content: ContentSettings,
    /// How learner code is executed.
    pub runner: RunnerSettings,
    /// Presentation flags.
    pub ui: UiSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl TutorSettings {
    /// Reject values that would make the session unusable.
    pub fn validate(&self) -> Result<()> {
        if self.content.working_dir.trim().is_empty() || self.content.backup_dir.trim().is_empty()
        {
            return Err(SettingsError::InvalidValue(
                "content.workingDir and content.backupDir must not be empty".to_string(),
            ));
        }
        if self.content.working_dir == self.content.backup_dir {
            return Err(SettingsError::InvalidValue(
                "content.workingDir and content.backupDir must differ".to_string(),
            ));
        }
        if self.runner.interpreter.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "runner.interpreter must not be empty".to_string(),
            ));
        }
        if self.runner.timeout_ms == Some(0) {
            return Err(SettingsError::InvalidValue(
                "runner.timeoutMs must be > 0 when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Curriculum location and backup mirror layout.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentSettings {
    /// Directory every curriculum reference is relative to.
    pub root: String,
    /// Curriculum JSON file, relative to `root`.
    pub curriculum: String,
    /// Name of the editable subtree under `root`.
    pub working_dir: String,
    /// Name of the pristine mirror of `working_dir` under `root`.
    pub backup_dir: String,
    /// Copy the working subtree into the backup subtree at startup
    /// (existing backup files are never overwritten).
    pub provision_backup: bool,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
            curriculum: "curriculum.json".to_string(),
            working_dir: "sections".to_string(),
            backup_dir: "sectionsBackup".to_string(),
            provision_backup: true,
        }
    }
}

impl ContentSettings {
    /// The content root as a path.
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(&self.root)
    }

    /// Absolute-or-relative path of the curriculum file.
    pub fn curriculum_path(&self) -> PathBuf {
        self.root_path().join(&self.curriculum)
    }
}

/// Code execution settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunnerSettings {
    /// Interpreter command the wrapper script runs the target file with.
    pub interpreter: String,
    /// Clear the terminal before each run.
    pub clear_terminal: bool,
    /// Display name of the terminal surface.
    pub terminal_name: String,
    /// Directory for per-run wrapper scripts. Defaults to the OS temp dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_dir: Option<String>,
    /// Give up waiting for a sentinel after this many milliseconds.
    /// `None` waits forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Command sent to the terminal once when a session starts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startup_command: Option<String>,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            interpreter: "python".to_string(),
            clear_terminal: true,
            terminal_name: "Tutor Terminal".to_string(),
            script_dir: None,
            timeout_ms: None,
            startup_command: None,
        }
    }
}

impl RunnerSettings {
    /// Resolved wrapper script directory.
    pub fn script_dir_path(&self) -> PathBuf {
        self.script_dir
            .as_ref()
            .map_or_else(std::env::temp_dir, PathBuf::from)
    }

    /// Sentinel wait bound, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Presentation flags.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiSettings {
    /// Always offer the "next" affordance, even before a section is done.
    pub always_show_next: bool,
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level (`trace`, `debug`, `info`, `warn`, `error`), or any
    /// `EnvFilter` directive.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let settings: TutorSettings =
            serde_json::from_str(r#"{"runner": {"interpreter": "python3"}}"#).unwrap();
        assert_eq!(settings.runner.interpreter, "python3");
        assert!(settings.runner.clear_terminal);
        assert_eq!(settings.content.working_dir, "sections");
    }

    #[test]
    fn camel_case_wire_format() {
        let json = serde_json::to_value(TutorSettings::default()).unwrap();
        assert_eq!(json["content"]["workingDir"], "sections");
        assert_eq!(json["content"]["backupDir"], "sectionsBackup");
        assert_eq!(json["runner"]["clearTerminal"], true);
        assert!(json["runner"].get("timeoutMs").is_none());
    }

    #[test]
    fn curriculum_path_is_under_root() {
        let content = ContentSettings {
            root: "/opt/tutorial".to_string(),
            ..ContentSettings::default()
        };
        assert_eq!(
            content.curriculum_path(),
            PathBuf::from("/opt/tutorial/curriculum.json")
        );
    }

    #[test]
    fn timeout_conversion() {
        let mut runner = RunnerSettings::default();
        assert!(runner.timeout().is_none());
        runner.timeout_ms = Some(1500);
        assert_eq!(runner.timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn script_dir_defaults_to_temp() {
        let runner = RunnerSettings::default();
        assert_eq!(runner.script_dir_path(), std::env::temp_dir());
    }

    #[test]
    fn validate_rejects_same_dirs() {
        let mut settings = TutorSettings::default();
        settings.content.backup_dir = "sections".to_string();
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidValue(_))
        ));
    }

    #[test]
    fn validate_rejects_empty_interpreter() {
        let mut settings = TutorSettings::default();
        settings.runner.interpreter = "  ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut settings = TutorSettings::default();
        settings.runner.timeout_ms = Some(0);
        assert!(settings.validate().is_err());
    }
}
