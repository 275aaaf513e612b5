//! Logger settings schema and defaults.
//!
//! Settings are plain data; turning them into a live logger is the facade's
//! job. Every field has a default so partial files and empty env maps work.

use metalog_ports::Level;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Record encoding written to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// `key=value` text lines.
    Text,
}

impl LogFormat {
    /// Stable name used in env vars and files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Standard stream the logger writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard output.
    Stdout,
    /// Standard error.
    #[default]
    Stderr,
}

impl LogOutput {
    /// Stable name used in env vars and files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

impl fmt::Display for LogOutput {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Settings for one logger instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LoggerSettings {
    /// Minimum severity written.
    pub level: Level,
    /// Record encoding.
    pub format: LogFormat,
    /// Destination stream.
    pub output: LogOutput,
    /// Replace values of credential-like keys with a placeholder.
    pub redact_secrets: bool,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: Level::Info,
            format: LogFormat::Json,
            output: LogOutput::Stderr,
            redact_secrets: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = LoggerSettings::default();
        assert_eq!(settings.level, Level::Info);
        assert_eq!(settings.format, LogFormat::Json);
        assert_eq!(settings.output, LogOutput::Stderr);
        assert!(!settings.redact_secrets);
    }

    #[test]
    fn names_are_stable() {
        assert_eq!(LogFormat::Text.to_string(), "text");
        assert_eq!(LogOutput::Stdout.to_string(), "stdout");
    }
}
