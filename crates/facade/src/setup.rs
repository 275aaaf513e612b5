//! Building loggers from settings.

use metalog_adapters::{JsonFormatter, LogSink, Logger, StderrLogSink, StdoutLogSink, TextFormatter};
use metalog_config::{LogFormat, LogOutput, LoggerEnv, LoggerSettings, load_settings_from_sources};
use metalog_shared::{ErrorEnvelope, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Build a logger writing to the configured stream in the configured format.
#[must_use]
pub fn logger_from_settings(settings: &LoggerSettings) -> Logger {
    let sink: Arc<dyn LogSink> = match settings.output {
        LogOutput::Stdout => Arc::new(StdoutLogSink),
        LogOutput::Stderr => Arc::new(StderrLogSink),
    };
    let logger = Logger::new(sink).with_min_level(settings.level);
    match settings.format {
        LogFormat::Json => {
            logger.with_formatter(JsonFormatter::new().with_redaction(settings.redact_secrets))
        },
        LogFormat::Text => {
            logger.with_formatter(TextFormatter::new().with_redaction(settings.redact_secrets))
        },
    }
}

/// Resolve settings from an env map (defaults, then `METALOG_*` overrides).
pub fn settings_from_env_map(env: &BTreeMap<String, String>) -> Result<LoggerSettings> {
    let env = LoggerEnv::from_map(env).map_err(ErrorEnvelope::from)?;
    load_settings_from_sources(None, &env)
}
