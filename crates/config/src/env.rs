//! Environment variable parsing for logger settings.
//!
//! Parsing is strict: a variable that is present must hold a valid value,
//! otherwise the whole parse fails with the variable named in the error.

use crate::schema::{LogFormat, LogOutput, LoggerSettings};
use metalog_ports::Level;
use metalog_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::fmt;

/// Env var: minimum level.
pub const ENV_LEVEL: &str = "METALOG_LEVEL";
/// Env var: record format (`json` or `text`).
pub const ENV_FORMAT: &str = "METALOG_FORMAT";
/// Env var: output stream (`stdout` or `stderr`).
pub const ENV_OUTPUT: &str = "METALOG_OUTPUT";
/// Env var: redact credential-like fields.
pub const ENV_REDACT: &str = "METALOG_REDACT";

const ALL_VARS: [&str; 4] = [ENV_LEVEL, ENV_FORMAT, ENV_OUTPUT, ENV_REDACT];

/// Env overrides for logger settings. `None` means "not set".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoggerEnv {
    /// Override for [`LoggerSettings::level`].
    pub level: Option<Level>,
    /// Override for [`LoggerSettings::format`].
    pub format: Option<LogFormat>,
    /// Override for [`LoggerSettings::output`].
    pub output: Option<LogOutput>,
    /// Override for [`LoggerSettings::redact_secrets`].
    pub redact_secrets: Option<bool>,
}

impl LoggerEnv {
    /// Parse overrides from an env map.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            level: parse_optional_level(map, ENV_LEVEL)?,
            format: parse_optional_enum(map, ENV_FORMAT, &[
                ("json", LogFormat::Json),
                ("text", LogFormat::Text),
            ])?,
            output: parse_optional_enum(map, ENV_OUTPUT, &[
                ("stdout", LogOutput::Stdout),
                ("stderr", LogOutput::Stderr),
            ])?,
            redact_secrets: parse_optional_bool(map, ENV_REDACT)?,
        })
    }

    /// Parse overrides from the process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in ALL_VARS {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_string(), value);
            }
        }
        Self::from_map(&map)
    }

    /// Apply the overrides that are set on top of `settings`.
    #[must_use]
    pub fn apply(&self, mut settings: LoggerSettings) -> LoggerSettings {
        if let Some(level) = self.level {
            settings.level = level;
        }
        if let Some(format) = self.format {
            settings.format = format;
        }
        if let Some(output) = self.output {
            settings.output = output;
        }
        if let Some(redact) = self.redact_secrets {
            settings.redact_secrets = redact;
        }
        settings
    }
}

/// Env parsing failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Boolean env var had an invalid value.
    InvalidBool {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Enumerated env var had an unsupported value.
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidBool { .. } => ErrorCode::new("config", "invalid_env_bool"),
            Self::InvalidEnum { .. } => ErrorCode::new("config", "invalid_env_enum"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidBool { var, .. } => write!(formatter, "{var} must be a boolean"),
            Self::InvalidEnum { var, .. } => write!(formatter, "{var} has an unsupported value"),
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());
        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidBool { var, value } | EnvParseError::InvalidEnum { var, value } => {
                envelope
                    .with_metadata("env_var", var)
                    .with_metadata("value", value)
            },
        }
    }
}

fn parse_optional_trimmed<'a>(
    map: &'a BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<&'a str>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }
    Ok(Some(trimmed))
}

fn parse_optional_level(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Level>, EnvParseError> {
    let Some(value) = parse_optional_trimmed(map, var)? else {
        return Ok(None);
    };
    value
        .parse::<Level>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidEnum {
            var,
            value: value.to_string(),
        })
}

fn parse_optional_enum<T: Copy>(
    map: &BTreeMap<String, String>,
    var: &'static str,
    choices: &[(&str, T)],
) -> Result<Option<T>, EnvParseError> {
    let Some(value) = parse_optional_trimmed(map, var)? else {
        return Ok(None);
    };
    let lowered = value.to_ascii_lowercase();
    choices
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, choice)| Some(*choice))
        .ok_or_else(|| EnvParseError::InvalidEnum {
            var,
            value: value.to_string(),
        })
}

fn parse_optional_bool(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<bool>, EnvParseError> {
    let Some(value) = parse_optional_trimmed(map, var)? else {
        return Ok(None);
    };

    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(EnvParseError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}
