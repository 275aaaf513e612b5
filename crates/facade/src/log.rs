//! Process-wide logger with a single handle, hooks and fatal handling.
//!
//! The default handle writes text records at `info` and above to stderr.
//! `debug`, `info`, `warn` and `error` return once the record is queued;
//! call [`flush`] before inspecting output. `fatal` and `panic` write on the
//! calling thread after everything queued before them.
//!
//! ```no_run
//! use metalog::{fields, log};
//!
//! log::add_metadata(fields! { "service" => "billing" });
//! log::info("server started", &[fields! { "port" => 8080 }]);
//! log::flush();
//! ```

use crate::facade::{Abort, Facade};
use crate::setup::logger_from_settings;
use metalog_adapters::Logger;
use metalog_config::load_settings_std_env;
use metalog_ports::{Fields, Hook, LoggerPort};
use metalog_shared::Result;
use std::error::Error;
use std::sync::{Arc, LazyLock};

static FACADE: LazyLock<Facade> = LazyLock::new(|| {
    Facade::new(Arc::new(Logger::default())).with_worker_name("metalog-log")
});

/// The context behind this module's functions.
pub fn facade() -> &'static Facade {
    &FACADE
}

/// Merge `fields` into the metadata attached to every record.
pub fn add_metadata(fields: Fields) {
    FACADE.add_metadata(fields);
}

/// Replace the active logger.
pub fn set_logger(logger: Arc<dyn LoggerPort>) {
    FACADE.set_logger(logger);
}

/// The active logger.
pub fn logger() -> Arc<dyn LoggerPort> {
    FACADE.logger()
}

/// Register hooks on the active logger.
pub fn add_hooks<I>(hooks: I)
where
    I: IntoIterator<Item = Arc<dyn Hook>>,
{
    FACADE.add_hooks(hooks);
}

/// Install a logger built from `METALOG_*` env vars.
pub fn init_from_env() -> Result<()> {
    let settings = load_settings_std_env(None)?;
    set_logger(Arc::new(logger_from_settings(&settings)));
    Ok(())
}

/// Queue a debug record.
pub fn debug(message: &str, fields: &[Fields]) {
    FACADE.debug(message, fields);
}

/// Queue an info record.
pub fn info(message: &str, fields: &[Fields]) {
    FACADE.info(message, fields);
}

/// Queue a warning record.
pub fn warn(message: &str, fields: &[Fields]) {
    FACADE.warn(message, fields);
}

/// Queue an error record, attaching `error` when given.
pub fn error(message: &str, error: Option<&(dyn Error + '_)>, fields: &[Fields]) {
    FACADE.error(message, error, fields);
}

/// Write a fatal record, then exit with status 1.
pub fn fatal(message: &str, error: Option<&(dyn Error + '_)>, fields: &[Fields]) -> ! {
    FACADE.fatal(message, error, fields)
}

/// Write a panic record, then unwind with the message as payload.
pub fn panic(message: &str, error: Option<&(dyn Error + '_)>, fields: &[Fields]) -> ! {
    FACADE.panic(message, error, fields)
}

/// Write a fatal record and hand the exit decision to the caller.
pub fn fatal_record(message: &str, error: Option<&(dyn Error + '_)>, fields: &[Fields]) -> Abort {
    FACADE.fatal_record(message, error, fields)
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
