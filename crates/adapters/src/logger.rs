//! Leveled logger writing formatted records to a sink.

use crate::format::{Formatter, JsonFormatter, TextFormatter};
use crate::log_sink::{LogSink, StderrLogSink, StdoutLogSink};
use metalog_ports::{Hook, Level, LevelHooks, LoggerPort, Record};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Logger bundling a sink, a threshold, a formatter, and a hook table.
pub struct Logger {
    sink: Arc<dyn LogSink>,
    formatter: Arc<dyn Formatter>,
    min_level: Level,
    hooks: RwLock<LevelHooks>,
}

impl Logger {
    /// Create a JSON logger at `info` backed by the provided sink.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            formatter: Arc::new(JsonFormatter::new()),
            min_level: Level::Info,
            hooks: RwLock::new(LevelHooks::new()),
        }
    }

    /// JSON logger on stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Arc::new(StdoutLogSink))
    }

    /// JSON logger on stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Arc::new(StderrLogSink))
    }

    /// Set the minimum log level.
    #[must_use]
    pub const fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Set the record encoder.
    #[must_use]
    pub fn with_formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Arc::new(formatter);
        self
    }

    /// Register a hook at construction time.
    #[must_use]
    pub fn with_hook(self, hook: Arc<dyn Hook>) -> Self {
        self.add_hook(hook);
        self
    }
}

impl Default for Logger {
    /// Text logger at `info` on stderr.
    fn default() -> Self {
        Self::stderr().with_formatter(TextFormatter::new())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Logger")
            .field("min_level", &self.min_level)
            .field("hooks", &self.hook_count())
            .finish_non_exhaustive()
    }
}

impl LoggerPort for Logger {
    fn level(&self) -> Level {
        self.min_level
    }

    fn log(&self, record: Record) {
        if !self.is_enabled(record.level) {
            return;
        }

        // Hooks may register further hooks; fire outside the lock.
        let hooks = {
            let table = self.hooks.read().unwrap_or_else(PoisonError::into_inner);
            if table.for_level(record.level).is_empty() {
                None
            } else {
                Some(table.clone())
            }
        };
        if let Some(hooks) = hooks {
            for error in hooks.fire(&record) {
                eprintln!("Failed to fire hook: {error}");
            }
        }

        let line = self.formatter.format(&record);
        self.sink.write_line(&line);
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

    fn flush(&self) {
        self.sink.flush();
    }
}
