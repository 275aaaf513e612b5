//! # metalog-config
//!
//! Logger settings schema, env parsing, and loading.
//! This crate depends on `ports` and `shared` only.

/// Environment variable parsing.
pub mod env;
/// Settings loading helpers (file + env).
pub mod load;
/// Settings schema types and defaults.
pub mod schema;

pub use env::{ENV_FORMAT, ENV_LEVEL, ENV_OUTPUT, ENV_REDACT, EnvParseError, LoggerEnv};
pub use load::{
    load_settings_from_path, load_settings_from_sources, load_settings_std_env,
    parse_settings_toml, to_pretty_toml,
};
pub use schema::{LogFormat, LogOutput, LoggerSettings};
