//! Logger that re-emits records as `tracing` events.
//!
//! Fatal and panic records are emitted at `ERROR`; the original severity is
//! kept in the `severity` field. Merged fields travel as one JSON string.

use metalog_ports::{Hook, Level, LevelHooks, LoggerPort, Record};
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};

/// Target used for every bridged event.
pub const TRACING_TARGET: &str = "metalog";

/// Logger forwarding records to the current `tracing` subscriber.
#[derive(Debug)]
pub struct TracingLogger {
    min_level: Level,
    hooks: RwLock<LevelHooks>,
}

impl TracingLogger {
    /// Bridge records at or above `min_level`.
    #[must_use]
    pub fn new(min_level: Level) -> Self {
        Self {
            min_level,
            hooks: RwLock::new(LevelHooks::new()),
        }
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new(Level::Debug)
    }
}

macro_rules! bridge_event {
    ($macro:ident, $record:expr, $fields:expr) => {
        tracing::$macro!(
            target: TRACING_TARGET,
            severity = $record.level.as_str(),
            fields = %$fields,
            error = $record.error.as_deref(),
            "{}",
            $record.message
        )
    };
}

impl LoggerPort for TracingLogger {
    fn level(&self) -> Level {
        self.min_level
    }

    fn log(&self, record: Record) {
        if !self.is_enabled(record.level) {
            return;
        }

        let hooks = self
            .hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for error in hooks.fire(&record) {
            eprintln!("Failed to fire hook: {error}");
        }

        let fields = Value::Object(
            record
                .fields
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
        );
        match record.level {
            Level::Debug => bridge_event!(debug, record, fields),
            Level::Info => bridge_event!(info, record, fields),
            Level::Warn => bridge_event!(warn, record, fields),
            Level::Error | Level::Fatal | Level::Panic => bridge_event!(error, record, fields),
        }
    }

    fn add_hook(&self, hook: Arc<dyn Hook>) {
        self.hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add(hook);
    }

    fn hook_count(&self) -> usize {
        self.hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
