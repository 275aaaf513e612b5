//! Error envelope types and helpers.
//!
//! Logging calls themselves never fail observably; the envelope is used by the
//! fallible setup paths (level parsing, settings, dispatcher start) and by
//! hooks reporting a failed delivery.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fmt, io};

/// Metadata attached to errors for diagnostics.
pub type ErrorMetadata = BTreeMap<String, String>;

/// High-level classification of error origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Expected failures (bad input, bad configuration).
    Expected,
    /// Unexpected failures (I/O, thread spawn, external dependencies).
    Unexpected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected => formatter.write_str("expected"),
            Self::Unexpected => formatter.write_str("unexpected"),
        }
    }
}

/// Stable error code with namespace and identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode {
    namespace: String,
    code: String,
}

impl ErrorCode {
    /// Create a new error code with a namespace and code.
    pub fn new(namespace: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            code: code.into(),
        }
    }

    /// Invalid input code.
    pub fn invalid_input() -> Self {
        Self::new("core", "invalid_input")
    }

    /// I/O error code.
    pub fn io() -> Self {
        Self::new("core", "io")
    }

    /// Internal failure code.
    pub fn internal() -> Self {
        Self::new("core", "internal")
    }

    /// Unknown severity name.
    pub fn invalid_level() -> Self {
        Self::new("logger", "invalid_level")
    }

    /// A hook failed to observe a record.
    pub fn hook_failed() -> Self {
        Self::new("logger", "hook_failed")
    }

    /// The background writer thread could not be started.
    pub fn worker_spawn() -> Self {
        Self::new("dispatch", "worker_spawn")
    }

    /// Returns the namespace portion.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the code identifier.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.namespace, self.code)
    }
}

/// Structured error envelope shared across crates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Error kind describing the origin category.
    pub kind: ErrorKind,
    /// Stable error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Additional diagnostic metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: ErrorMetadata,
}

impl ErrorEnvelope {
    /// Create an expected error.
    pub fn expected(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Expected,
            code,
            message: message.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Create an unexpected error.
    pub fn unexpected(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Unexpected,
            code,
            message: message.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a single metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {}: {}", self.kind, self.code, self.message)
    }
}

impl std::error::Error for ErrorEnvelope {}

impl From<io::Error> for ErrorEnvelope {
    fn from(error: io::Error) -> Self {
        Self::unexpected(ErrorCode::io(), error.to_string())
            .with_metadata("io_kind", format!("{:?}", error.kind()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_constructors() {
        let expected = ErrorEnvelope::expected(ErrorCode::invalid_level(), "bad level");
        assert_eq!(expected.kind, ErrorKind::Expected);
        assert_eq!(expected.code.namespace(), "logger");
        assert_eq!(expected.code.code(), "invalid_level");

        let unexpected = ErrorEnvelope::unexpected(ErrorCode::internal(), "boom");
        assert_eq!(unexpected.kind, ErrorKind::Unexpected);
        assert_eq!(unexpected.to_string(), "unexpected core:internal: boom");
        assert_eq!(ErrorCode::worker_spawn().to_string(), "dispatch:worker_spawn");
    }

    #[test]
    fn io_errors_are_normalized() {
        let envelope = ErrorEnvelope::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));

        assert_eq!(envelope.kind, ErrorKind::Unexpected);
        assert_eq!(envelope.code, ErrorCode::io());
        assert_eq!(
            envelope.metadata.get("io_kind").map(String::as_str),
            Some("BrokenPipe")
        );
    }

    #[test]
    fn envelope_serializes_without_empty_metadata() -> Result<(), Box<dyn std::error::Error>> {
        let envelope = ErrorEnvelope::expected(ErrorCode::invalid_input(), "bad");
        let json = serde_json::to_value(&envelope)?;

        assert!(json.get("metadata").is_none());
        assert_eq!(json.get("message"), Some(&serde_json::Value::from("bad")));
        Ok(())
    }
}
