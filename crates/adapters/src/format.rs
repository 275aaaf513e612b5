//! Record encoders.
//!
//! Both formatters write records flat: the reserved keys `time`, `level`,
//! `msg` and `error` sit next to the user fields. A user field whose key
//! collides with `time`, `level` or `msg` is kept under `fields.<key>`.

use chrono::SecondsFormat;
use metalog_ports::{Fields, Record};
use metalog_shared::{REDACTED, is_secret_key};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt::Write as _;

/// Key holding the record timestamp.
pub const TIME_KEY: &str = "time";
/// Key holding the severity name.
pub const LEVEL_KEY: &str = "level";
/// Key holding the message.
pub const MESSAGE_KEY: &str = "msg";
/// Key holding the attached error.
pub const ERROR_KEY: &str = "error";

/// Encodes a record into one output line, including the trailing newline.
pub trait Formatter: Send + Sync {
    /// Render the record.
    fn format(&self, record: &Record) -> String;
}

/// JSON encoder: one object per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    redact_secrets: bool,
    disable_timestamp: bool,
}

impl JsonFormatter {
    /// Create a formatter with timestamps and without redaction.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            redact_secrets: false,
            disable_timestamp: false,
        }
    }

    /// Replace values of credential-like keys with a placeholder.
    #[must_use]
    pub const fn with_redaction(mut self, enabled: bool) -> Self {
        self.redact_secrets = enabled;
        self
    }

    /// Omit the `time` key.
    #[must_use]
    pub const fn without_timestamp(mut self) -> Self {
        self.disable_timestamp = true;
        self
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, record: &Record) -> String {
        let mut fields = prefix_clashes(&record.fields);
        if self.redact_secrets {
            redact_fields(&mut fields);
        }

        let mut payload = serde_json::Map::new();
        for (key, value) in fields {
            payload.insert(key.into_owned(), value);
        }
        if !self.disable_timestamp {
            payload.insert(TIME_KEY.to_string(), Value::String(timestamp(record)));
        }
        payload.insert(
            LEVEL_KEY.to_string(),
            Value::String(record.level.as_str().to_string()),
        );
        payload.insert(
            MESSAGE_KEY.to_string(),
            Value::String(record.message.to_string()),
        );
        if let Some(error) = &record.error {
            payload.insert(ERROR_KEY.to_string(), Value::String(error.to_string()));
        }

        serde_json::to_string(&Value::Object(payload)).map_or_else(
            |_| {
                "{\"level\":\"error\",\"msg\":\"log serialization failed\"}\n".to_string()
            },
            |mut encoded| {
                encoded.push('\n');
                encoded
            },
        )
    }
}

/// Text encoder: `time="..." level=info msg=... key=value`, fields sorted by key.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter {
    redact_secrets: bool,
    disable_timestamp: bool,
}

impl TextFormatter {
    /// Create a formatter with timestamps and without redaction.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            redact_secrets: false,
            disable_timestamp: false,
        }
    }

    /// Replace values of credential-like keys with a placeholder.
    #[must_use]
    pub const fn with_redaction(mut self, enabled: bool) -> Self {
        self.redact_secrets = enabled;
        self
    }

    /// Omit the `time` key.
    #[must_use]
    pub const fn without_timestamp(mut self) -> Self {
        self.disable_timestamp = true;
        self
    }
}

impl Formatter for TextFormatter {
    fn format(&self, record: &Record) -> String {
        let mut fields = prefix_clashes(&record.fields);
        if self.redact_secrets {
            redact_fields(&mut fields);
        }

        let mut line = String::new();
        if !self.disable_timestamp {
            push_pair(&mut line, TIME_KEY, &timestamp(record));
        }
        push_pair(&mut line, LEVEL_KEY, record.level.as_str());
        push_pair(&mut line, MESSAGE_KEY, &record.message);
        if let Some(error) = &record.error {
            push_pair(&mut line, ERROR_KEY, error);
        }
        for (key, value) in &fields {
            if record.error.is_some() && key == ERROR_KEY {
                continue;
            }
            match value {
                Value::String(text) => push_pair(&mut line, key, text),
                other => push_pair(&mut line, key, &other.to_string()),
            }
        }
        line.push('\n');
        line
    }
}

fn timestamp(record: &Record) -> String {
    record.time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn push_pair(line: &mut String, key: &str, value: &str) {
    if !line.is_empty() {
        line.push(' ');
    }
    line.push_str(key);
    line.push('=');
    if needs_quoting(value) {
        let _ = write!(line, "{value:?}");
    } else {
        line.push_str(value);
    }
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || !value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_' | '/' | '@' | '^' | '+'))
}

fn prefix_clashes(fields: &Fields) -> Vec<(Cow<'_, str>, Value)> {
    let mut out: Vec<(Cow<'_, str>, Value)> = fields
        .iter()
        .map(|(key, value)| {
            let key: &str = key;
            let key = if matches!(key, TIME_KEY | LEVEL_KEY | MESSAGE_KEY) {
                Cow::Owned(format!("fields.{key}"))
            } else {
                Cow::Borrowed(key)
            };
            (key, value.clone())
        })
        .collect();
    out.sort_by(|left, right| left.0.cmp(&right.0));
    out
}

fn redact_fields(fields: &mut [(Cow<'_, str>, Value)]) {
    for (key, value) in fields.iter_mut() {
        if is_secret_key(key) {
            *value = Value::String(REDACTED.to_string());
        } else {
            redact_value(value);
        }
    }
}

fn redact_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map.iter_mut() {
                if is_secret_key(key) {
                    *nested = Value::String(REDACTED.to_string());
                } else {
                    redact_value(nested);
                }
            }
        },
        Value::Array(items) => {
            for item in items {
                redact_value(item);
            }
        },
        _ => {},
    }
}
