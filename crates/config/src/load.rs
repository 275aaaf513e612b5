//! Settings loading helpers (file + env).
//!
//! Precedence (highest wins):
//! - env overrides (`LoggerEnv`)
//! - TOML file content
//! - defaults (`LoggerSettings::default()`)

use crate::{LoggerEnv, LoggerSettings};
use metalog_shared::{ErrorCode, ErrorEnvelope};
use std::path::Path;

/// Load settings from optional TOML text plus env overrides.
pub fn load_settings_from_sources(
    config_toml: Option<&str>,
    env: &LoggerEnv,
) -> Result<LoggerSettings, ErrorEnvelope> {
    let settings = match config_toml {
        None => LoggerSettings::default(),
        Some(input) => parse_settings_toml(input)?,
    };
    Ok(env.apply(settings))
}

/// Load settings from an optional TOML file path plus env overrides.
pub fn load_settings_from_path(
    config_path: Option<&Path>,
    env: &LoggerEnv,
) -> Result<LoggerSettings, ErrorEnvelope> {
    let text = match config_path {
        None => None,
        Some(path) => Some(read_config_file(path)?),
    };
    load_settings_from_sources(text.as_deref(), env)
}

/// Load settings from the process environment and an optional file path.
pub fn load_settings_std_env(config_path: Option<&Path>) -> Result<LoggerSettings, ErrorEnvelope> {
    let env = LoggerEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    load_settings_from_path(config_path, &env)
}

/// Parse settings from TOML text without env overrides.
pub fn parse_settings_toml(input: &str) -> Result<LoggerSettings, ErrorEnvelope> {
    toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid logger settings TOML: {error}"),
        )
        .with_metadata("source", "config")
    })
}

/// Serialize settings as pretty TOML (with trailing newline).
pub fn to_pretty_toml(settings: &LoggerSettings) -> Result<String, ErrorEnvelope> {
    let mut output = toml::to_string_pretty(settings).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_toml"),
            format!("failed to serialize logger settings TOML: {error}"),
        )
    })?;
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

fn read_config_file(path: &Path) -> Result<String, ErrorEnvelope> {
    std::fs::read_to_string(path).map_err(|error| {
        ErrorEnvelope::from(error).with_metadata("path", path.display().to_string())
    })
}
