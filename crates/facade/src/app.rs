//! Process-wide logger with separate app and error streams.
//!
//! Debug, info and warn records go to the app logger (JSON on stdout from
//! `debug` up); error and panic records go to the err logger (JSON on stderr
//! from `error` up). Metadata added here is independent of [`crate::log`].

use crate::facade::{Abort, Facade};
use metalog_adapters::Logger;
use metalog_ports::{Fields, Level, LoggerPort};
use std::error::Error;
use std::sync::{Arc, LazyLock};

static FACADE: LazyLock<Facade> = LazyLock::new(|| {
    Facade::split(
        Arc::new(Logger::stdout().with_min_level(Level::Debug)),
        Arc::new(Logger::stderr().with_min_level(Level::Error)),
    )
    .with_worker_name("metalog-app")
});

/// The context behind this module's functions.
pub fn facade() -> &'static Facade {
    &FACADE
}

/// Merge `fields` into the metadata attached to every record.
pub fn add_meta_info(fields: Fields) {
    FACADE.add_metadata(fields);
}

/// Replace the logger for debug/info/warn.
pub fn set_app_logger(logger: Arc<dyn LoggerPort>) {
    FACADE.set_app_logger(logger);
}

/// Replace the logger for error/panic.
pub fn set_err_logger(logger: Arc<dyn LoggerPort>) {
    FACADE.set_err_logger(logger);
}

/// The logger for debug/info/warn.
pub fn app_logger() -> Arc<dyn LoggerPort> {
    FACADE.app_logger()
}

/// The logger for error/panic.
pub fn err_logger() -> Arc<dyn LoggerPort> {
    FACADE.err_logger()
}

/// Queue a debug record on the app logger.
pub fn debug(message: &str, fields: &[Fields]) {
    FACADE.debug(message, fields);
}

/// Queue an info record on the app logger.
pub fn info(message: &str, fields: &[Fields]) {
    FACADE.info(message, fields);
}

/// Queue a warning record on the app logger.
pub fn warn(message: &str, fields: &[Fields]) {
    FACADE.warn(message, fields);
}

/// Queue an error record on the err logger.
pub fn error(message: &str, error: Option<&(dyn Error + '_)>, fields: &[Fields]) {
    FACADE.error(message, error, fields);
}

/// Write a panic record on the err logger, then unwind.
pub fn panic(message: &str, error: Option<&(dyn Error + '_)>, fields: &[Fields]) -> ! {
    FACADE.panic(message, error, fields)
}

/// Write a panic record and hand the unwind decision to the caller.
pub fn panic_record(message: &str, error: Option<&(dyn Error + '_)>, fields: &[Fields]) -> Abort {
    FACADE.panic_record(message, error, fields)
}

/// Block until queued records are written.
pub fn flush() {
    FACADE.flush();
}

/// Await queued records.
pub async fn flush_async() {
    FACADE.flush_async().await;
}
