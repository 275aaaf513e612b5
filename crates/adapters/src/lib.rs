//! # metalog-adapters
//!
//! Implementations of the logger port: sinks, formatters, the sink-backed
//! [`logger::Logger`], and a bridge into `tracing`.
//! This crate depends on `ports` and `shared`.

pub mod format;
pub mod log_sink;
pub mod logger;
pub mod tracing_bridge;

pub use format::{Formatter, JsonFormatter, TextFormatter};
pub use log_sink::{LogSink, MemoryLogSink, StderrLogSink, StdoutLogSink, WriterLogSink};
pub use logger::Logger;
pub use tracing_bridge::TracingLogger;

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
