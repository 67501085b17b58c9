//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`TutorSettings::default()`]
//! 2. If `~/.tutor/settings.json` exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//! 4. Validate the result
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::TutorSettings;

/// Resolve the path to the settings file (`~/.tutor/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".tutor").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<TutorSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields the defaults. Invalid JSON or values rejected by
/// [`TutorSettings::validate`] are errors.
pub fn load_settings_from_path(path: &Path) -> Result<TutorSettings> {
    let mut settings = load_file_layer(path)?;
    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

fn load_file_layer(path: &Path) -> Result<TutorSettings> {
    let defaults = serde_json::to_value(TutorSettings::default())?;

    let merged = if path.exists() {
        debug!(path = %path.display(), "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(path = %path.display(), "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `TUTOR_*` environment variable overrides.
///
/// Invalid values are ignored with a warning and the file/default value
/// is kept.
pub fn apply_env_overrides(settings: &mut TutorSettings) {
    // ── Content ─────────────────────────────────────────────────────
    if let Some(v) = read_env_string("TUTOR_CONTENT_ROOT") {
        settings.content.root = v;
    }
    if let Some(v) = read_env_string("TUTOR_CURRICULUM") {
        settings.content.curriculum = v;
    }

    // ── Runner ──────────────────────────────────────────────────────
    if let Some(v) = read_env_string("TUTOR_INTERPRETER") {
        settings.runner.interpreter = v;
    }
    if let Some(v) = read_env_u64("TUTOR_RUN_TIMEOUT_MS", 1, 86_400_000) {
        settings.runner.timeout_ms = Some(v);
    }
    if let Some(v) = read_env_bool("TUTOR_CLEAR_TERMINAL") {
        settings.runner.clear_terminal = v;
    }

    // ── UI / logging ────────────────────────────────────────────────
    if let Some(v) = read_env_bool("TUTOR_ALWAYS_SHOW_NEXT") {
        settings.ui.always_show_next = v;
    }
    if let Some(v) = read_env_string("TUTOR_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u64` within an inclusive range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_bool(name: &str) -> Option<bool> {
    let val = std::env::var(name).ok()?;
    let result = parse_bool(&val);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid boolean env var, ignoring");
    }
    result
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
