//! Structured logging boundary contract.

use crate::hook::Hook;
use chrono::{DateTime, Utc};
use metalog_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Log severity, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Debug.
    Debug,
    /// Info.
    Info,
    /// Warn.
    #[serde(alias = "warning")]
    Warn,
    /// Error.
    Error,
    /// Fatal: emission is followed by process exit.
    Fatal,
    /// Panic: emission is followed by an unwinding panic.
    Panic,
}

impl Level {
    /// Every level, least severe first.
    pub const ALL: [Self; 6] = [
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Fatal,
        Self::Panic,
    ];

    /// Name written into records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Panic => "panic",
        }
    }

    /// Returns true for levels whose emission ends the caller's control flow.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Fatal | Self::Panic)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ErrorEnvelope;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            "panic" => Ok(Self::Panic),
            _ => Err(ErrorEnvelope::expected(
                ErrorCode::invalid_level(),
                format!("not a valid log level: {value:?}"),
            )
            .with_metadata("value", value)),
        }
    }
}

/// Structured fields attached to a record.
pub type Fields = BTreeMap<Box<str>, serde_json::Value>;

/// A single log record, built by the caller and handed to a logger.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Capture time.
    pub time: DateTime<Utc>,
    /// Severity.
    pub level: Level,
    /// Human-readable message.
    pub message: Box<str>,
    /// Merged structured fields.
    pub fields: Fields,
    /// Rendered error value, when one was attached.
    pub error: Option<Box<str>>,
}

impl Record {
    /// Create a record stamped with the current time.
    pub fn new(level: Level, message: impl Into<Box<str>>) -> Self {
        Self {
            time: Utc::now(),
            level,
            message: message.into(),
            fields: Fields::new(),
            error: None,
        }
    }

    /// Replace the record's fields.
    #[must_use]
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    /// Attach an error by its `Display` rendering.
    #[must_use]
    pub fn with_error(mut self, error: &(dyn std::error::Error + '_)) -> Self {
        self.error = Some(error.to_string().into_boxed_str());
        self
    }
}

/// Boundary contract for an underlying structured logger.
///
/// Implementations own the sink, the severity threshold, the formatter, and
/// the hook table. Writing is synchronous; asynchrony is the caller's choice.
pub trait LoggerPort: Send + Sync {
    /// Minimum severity this logger writes.
    fn level(&self) -> Level;

    /// Returns true when a record at `level` would be written.
    fn is_enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// Fire hooks for the record and write it, if enabled.
    fn log(&self, record: Record);

    /// Register a hook for every level it declares.
    fn add_hook(&self, hook: Arc<dyn Hook>);

    /// Number of (hook, level) registrations.
    fn hook_count(&self) -> usize;

    /// Push buffered output to its destination.
    fn flush(&self) {}
}
