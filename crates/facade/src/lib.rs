//! # metalog
//!
//! Process-wide structured logging: metadata merged into every record,
//! per-call fields, hooks, and ordered background dispatch with synchronous
//! fatal/panic emission.
//!
//! Two ready-made surfaces share one implementation:
//! - [`log`]: a single logger with hooks, `fatal` and `panic`.
//! - [`app`]: an app logger for debug/info/warn and an err logger for
//!   error/panic.
//!
//! [`Facade`] is the same thing as an owned value for callers who prefer an
//! explicit context over process-wide state.
//!
//! This crate depends on `adapters`, `config`, `ports`, and `shared`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod app;
mod dispatch;
mod facade;
mod fields;
pub mod log;
mod setup;

pub use dispatch::Dispatcher;
pub use facade::{Abort, DEFAULT_WORKER_NAME, Facade, Routing};
pub use fields::join_fields;
pub use setup::{logger_from_settings, settings_from_env_map};

pub use metalog_adapters::{
    Formatter, JsonFormatter, LogSink, Logger, MemoryLogSink, StderrLogSink, StdoutLogSink,
    TextFormatter, TracingLogger, WriterLogSink,
};
pub use metalog_config::{
    ENV_FORMAT, ENV_LEVEL, ENV_OUTPUT, ENV_REDACT, LogFormat, LogOutput, LoggerSettings,
};
pub use metalog_ports::{Fields, Hook, Level, LoggerPort, Record};
pub use metalog_shared::{ErrorCode, ErrorEnvelope, ErrorKind, Result};

#[doc(hidden)]
pub mod __private {
    pub use crate::fields::field_value;
}

/// Returns the facade crate version.
#[must_use]
pub const fn facade_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
