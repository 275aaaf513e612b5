//! Logging context: metadata, logger handles, routing and dispatch policy.

use crate::dispatch::{self, Dispatcher};
use crate::fields::join_fields;
use metalog_ports::{Fields, Hook, Level, LoggerPort, Record};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Name given to the dispatch worker thread unless overridden.
pub const DEFAULT_WORKER_NAME: &str = "metalog-dispatch";

/// Which handle receives a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    /// Every level goes to the primary handle.
    Unified,
    /// Debug, info and warn go to the primary (app) handle; error and above go
    /// to the secondary (err) handle.
    Split,
}

/// Outcome of a terminal emission.
///
/// The record has already been written when this value exists. The caller
/// picks the control-flow effect.
#[must_use = "the record is written; call exit() or raise() to terminate"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abort {
    level: Level,
    message: String,
}

impl Abort {
    /// Status passed to `process::exit` by [`Abort::exit`].
    pub const EXIT_CODE: i32 = 1;

    /// Level of the record that produced this outcome.
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Message of the record that produced this outcome.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Terminate the process with [`Abort::EXIT_CODE`].
    pub fn exit(self) -> ! {
        std::process::exit(Self::EXIT_CODE)
    }

    /// Unwind with the message as a `String` payload.
    pub fn raise(self) -> ! {
        std::panic::panic_any(self.message)
    }
}

impl fmt::Display for Abort {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.level, self.message)
    }
}

/// A logging context.
///
/// Holds the metadata merged into every record, one or two logger handles,
/// and the dispatch policy. Levels outside the sync set are written by a
/// background worker in call order; fatal and panic are always written on the
/// calling thread after the queue has drained.
///
/// Records emitted from a dispatch worker thread, typically by a hook, are
/// written inline on that thread.
pub struct Facade {
    routing: Routing,
    metadata: RwLock<Fields>,
    primary: RwLock<Arc<dyn LoggerPort>>,
    secondary: RwLock<Arc<dyn LoggerPort>>,
    sync_levels: BTreeSet<Level>,
    worker_name: String,
    dispatcher: OnceLock<Option<Dispatcher>>,
}

impl Facade {
    /// Context with a single handle for every level.
    #[must_use]
    pub fn new(logger: Arc<dyn LoggerPort>) -> Self {
        Self::build(Routing::Unified, Arc::clone(&logger), logger)
    }

    /// Context routing debug/info/warn to `app` and error/fatal/panic to `err`.
    #[must_use]
    pub fn split(app: Arc<dyn LoggerPort>, err: Arc<dyn LoggerPort>) -> Self {
        Self::build(Routing::Split, app, err)
    }

    fn build(
        routing: Routing,
        primary: Arc<dyn LoggerPort>,
        secondary: Arc<dyn LoggerPort>,
    ) -> Self {
        Self {
            routing,
            metadata: RwLock::new(Fields::new()),
            primary: RwLock::new(primary),
            secondary: RwLock::new(secondary),
            sync_levels: Level::ALL
                .into_iter()
                .filter(|level| level.is_terminal())
                .collect(),
            worker_name: DEFAULT_WORKER_NAME.to_string(),
            dispatcher: OnceLock::new(),
        }
    }

    /// Also write these levels synchronously. Fatal and panic always are.
    #[must_use]
    pub fn with_sync_levels(mut self, levels: &[Level]) -> Self {
        self.sync_levels.extend(levels.iter().copied());
        self
    }

    /// Name of the background worker thread.
    #[must_use]
    pub fn with_worker_name(mut self, name: impl Into<String>) -> Self {
        self.worker_name = name.into();
        self
    }

    /// Routing mode.
    pub const fn routing(&self) -> Routing {
        self.routing
    }

    /// Returns true when records at `level` are written on the calling thread.
    pub fn is_sync(&self, level: Level) -> bool {
        self.sync_levels.contains(&level)
    }

    /// Merge `fields` into the metadata; existing keys are overwritten.
    pub fn add_metadata(&self, fields: Fields) {
        self.metadata
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(fields);
    }

    /// Snapshot of the current metadata.
    pub fn metadata(&self) -> Fields {
        self.metadata
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace every handle with `logger`.
    pub fn set_logger(&self, logger: Arc<dyn LoggerPort>) {
        *self.primary.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&logger);
        *self.secondary.write().unwrap_or_else(PoisonError::into_inner) = logger;
    }

    /// Replace the handle for debug/info/warn under split routing, or the only
    /// handle under unified routing.
    pub fn set_app_logger(&self, logger: Arc<dyn LoggerPort>) {
        *self.primary.write().unwrap_or_else(PoisonError::into_inner) = logger;
    }

    /// Replace the handle for error/fatal/panic. Only consulted under split
    /// routing.
    pub fn set_err_logger(&self, logger: Arc<dyn LoggerPort>) {
        *self.secondary.write().unwrap_or_else(PoisonError::into_inner) = logger;
    }

    /// The primary handle.
    pub fn logger(&self) -> Arc<dyn LoggerPort> {
        Arc::clone(&self.primary.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Handle receiving debug/info/warn records.
    pub fn app_logger(&self) -> Arc<dyn LoggerPort> {
        self.handle_for(Level::Info)
    }

    /// Handle receiving error/fatal/panic records.
    pub fn err_logger(&self) -> Arc<dyn LoggerPort> {
        self.handle_for(Level::Error)
    }

    /// Handle that receives records at `level`.
    pub fn handle_for(&self, level: Level) -> Arc<dyn LoggerPort> {
        let handle = match self.routing {
            Routing::Split if level >= Level::Error => &self.secondary,
            Routing::Unified | Routing::Split => &self.primary,
        };
        Arc::clone(&handle.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Register hooks on every active handle. Zero hooks is a no-op.
    pub fn add_hooks<I>(&self, hooks: I)
    where
        I: IntoIterator<Item = Arc<dyn Hook>>,
    {
        let (app, err) = self.active_handles();
        for hook in hooks {
            if let Some(err) = &err {
                err.add_hook(Arc::clone(&hook));
            }
            app.add_hook(hook);
        }
    }

    // The app handle, plus the err handle when it is a different logger.
    fn active_handles(&self) -> (Arc<dyn LoggerPort>, Option<Arc<dyn LoggerPort>>) {
        let app = self.handle_for(Level::Debug);
        let err = self.handle_for(Level::Error);
        if std::ptr::addr_eq(Arc::as_ptr(&app), Arc::as_ptr(&err)) {
            (app, None)
        } else {
            (app, Some(err))
        }
    }

    /// Emit at `level` without terminating, honouring the dispatch policy.
    pub fn emit(
        &self,
        level: Level,
        message: &str,
        error: Option<&(dyn Error + '_)>,
        fields: &[Fields],
    ) {
        let logger = self.handle_for(level);
        if !logger.is_enabled(level) {
            return;
        }
        let record = self.record(level, message, error, fields);
        if self.is_sync(level) {
            self.drain();
            logger.log(record);
        } else {
            self.submit(logger, record);
        }
    }

    /// Debug record, written in the background.
    pub fn debug(&self, message: &str, fields: &[Fields]) {
        self.emit(Level::Debug, message, None, fields);
    }

    /// Info record, written in the background.
    pub fn info(&self, message: &str, fields: &[Fields]) {
        self.emit(Level::Info, message, None, fields);
    }

    /// Warning record, written in the background.
    pub fn warn(&self, message: &str, fields: &[Fields]) {
        self.emit(Level::Warn, message, None, fields);
    }

    /// Error record, written in the background.
    pub fn error(&self, message: &str, error: Option<&(dyn Error + '_)>, fields: &[Fields]) {
        self.emit(Level::Error, message, error, fields);
    }

    /// Write a fatal record after draining the queue and return the outcome.
    pub fn fatal_record(
        &self,
        message: &str,
        error: Option<&(dyn Error + '_)>,
        fields: &[Fields],
    ) -> Abort {
        self.terminal(Level::Fatal, message, error, fields)
    }

    /// Write a panic record after draining the queue and return the outcome.
    pub fn panic_record(
        &self,
        message: &str,
        error: Option<&(dyn Error + '_)>,
        fields: &[Fields],
    ) -> Abort {
        self.terminal(Level::Panic, message, error, fields)
    }

    /// Write a fatal record, then exit the process with status 1.
    pub fn fatal(&self, message: &str, error: Option<&(dyn Error + '_)>, fields: &[Fields]) -> ! {
        self.fatal_record(message, error, fields).exit()
    }

    /// Write a panic record, then unwind with the message as payload.
    pub fn panic(&self, message: &str, error: Option<&(dyn Error + '_)>, fields: &[Fields]) -> ! {
        self.panic_record(message, error, fields).raise()
    }

    /// Block until queued records are written and handles are flushed.
    pub fn flush(&self) {
        self.drain();
        self.flush_handles();
    }

    /// Awaitable [`Facade::flush`].
    pub async fn flush_async(&self) {
        if let Some(dispatcher) = self.dispatcher.get().and_then(Option::as_ref) {
            dispatcher.flush_async().await;
        }
        self.flush_handles();
    }

    fn terminal(
        &self,
        level: Level,
        message: &str,
        error: Option<&(dyn Error + '_)>,
        fields: &[Fields],
    ) -> Abort {
        let logger = self.handle_for(level);
        self.drain();
        if logger.is_enabled(level) {
            logger.log(self.record(level, message, error, fields));
        }
        self.flush_handles();
        Abort {
            level,
            message: message.to_string(),
        }
    }

    fn record(
        &self,
        level: Level,
        message: &str,
        error: Option<&(dyn Error + '_)>,
        fields: &[Fields],
    ) -> Record {
        let fields = join_fields(self.metadata(), fields);
        let record = Record::new(level, message).with_fields(fields);
        match error {
            Some(error) => record.with_error(error),
            None => record,
        }
    }

    fn submit(&self, logger: Arc<dyn LoggerPort>, record: Record) {
        match self.dispatcher() {
            Some(dispatcher) => dispatcher.submit(logger, record),
            None => logger.log(record),
        }
    }

    fn dispatcher(&self) -> Option<&Dispatcher> {
        self.dispatcher
            .get_or_init(|| match Dispatcher::spawn(&self.worker_name) {
                Ok(dispatcher) => Some(dispatcher),
                Err(error) => {
                    eprintln!("metalog: {error}; writing records inline");
                    None
                },
            })
            .as_ref()
    }

    // Never starts the worker: nothing can be pending before it exists.
    // A dispatch worker wrote its own records inline, and waiting on another
    // worker from there could close a wait cycle.
    fn drain(&self) {
        if dispatch::on_dispatch_worker() {
            return;
        }
        if let Some(dispatcher) = self.dispatcher.get().and_then(Option::as_ref) {
            dispatcher.flush();
        }
    }

    fn flush_handles(&self) {
        let (app, err) = self.active_handles();
        app.flush();
        if let Some(err) = err {
            err.flush();
        }
    }
}

impl fmt::Debug for Facade {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Facade")
            .field("routing", &self.routing)
            .field("metadata_keys", &self.metadata().len())
            .field("sync_levels", &self.sync_levels)
            .field("worker_name", &self.worker_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use metalog_adapters::{Logger, MemoryLogSink};
    use metalog_shared::Result;
    use serde_json::Value;
    use std::io;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, Weak, mpsc};
    use std::time::Duration;

    fn memory(level: Level) -> (Arc<MemoryLogSink>, Arc<dyn LoggerPort>) {
        let sink = Arc::new(MemoryLogSink::new());
        let logger: Arc<dyn LoggerPort> = Arc::new(Logger::new(sink.clone()).with_min_level(level));
        (sink, logger)
    }

    struct RecordingHook {
        levels: Vec<Level>,
        seen: Mutex<Vec<String>>,
    }

    impl RecordingHook {
        fn new(levels: &[Level]) -> Arc<Self> {
            Arc::new(Self {
                levels: levels.to_vec(),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap_or_else(PoisonError::into_inner).clone()
        }
    }

    impl Hook for RecordingHook {
        fn levels(&self) -> &[Level] {
            &self.levels
        }

        fn fire(&self, record: &Record) -> Result<()> {
            self.seen
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(record.message.to_string());
            Ok(())
        }
    }

    #[test]
    fn metadata_is_merged_into_every_record() {
        let (sink, logger) = memory(Level::Debug);
        let facade = Facade::new(logger);

        facade.add_metadata(fields! { "hoge" => "fuga" });
        facade.info("first", &[]);
        facade.debug("second", &[fields! { "id" => 7 }]);
        facade.flush();

        let records = sink.json_records();
        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record["hoge"], "fuga");
        }
        assert!(records[0].get("id").is_none());
        assert_eq!(records[1]["id"], 7);
    }

    #[test]
    fn per_call_fields_override_metadata() {
        let (sink, logger) = memory(Level::Debug);
        let facade = Facade::new(logger);

        facade.add_metadata(fields! { "id" => "meta", "service" => "api" });
        facade.warn("m", &[fields! { "id" => "first" }, fields! { "id" => "second" }]);
        facade.flush();

        let records = sink.json_records();
        assert_eq!(records[0]["id"], "second");
        assert_eq!(records[0]["service"], "api");
        assert_eq!(facade.metadata()["id"], "meta");
    }

    #[test]
    fn level_and_message_are_preserved() {
        let (sink, logger) = memory(Level::Debug);
        let facade = Facade::new(logger);

        facade.debug("d", &[]);
        facade.info("i", &[]);
        facade.warn("w", &[]);
        facade.error("e", None, &[]);
        facade.flush();

        let pairs: Vec<(Value, Value)> = sink
            .json_records()
            .into_iter()
            .map(|record| (record["level"].clone(), record["msg"].clone()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (Value::from("debug"), Value::from("d")),
                (Value::from("info"), Value::from("i")),
                (Value::from("warning"), Value::from("w")),
                (Value::from("error"), Value::from("e")),
            ]
        );
    }

    #[test]
    fn error_value_is_attached() {
        let (sink, logger) = memory(Level::Debug);
        let facade = Facade::new(logger);

        facade.error("failed", Some(&io::Error::other("dummy")), &[]);
        facade.flush();

        assert_eq!(sink.json_records()[0]["error"], "dummy");
    }

    #[test]
    fn panic_record_is_written_before_unwinding() {
        let (sink, logger) = memory(Level::Debug);
        let facade = Facade::new(logger);

        facade.info("before", &[]);
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            facade.panic("panic test message", Some(&io::Error::other("dummy")), &[]);
        }));

        let payload = outcome.err().and_then(|payload| payload.downcast::<String>().ok());
        assert_eq!(payload.as_deref().map(String::as_str), Some("panic test message"));

        let records = sink.json_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["msg"], "before");
        assert_eq!(records[1]["level"], "panic");
        assert_eq!(records[1]["error"], "dummy");
    }

    #[test]
    fn terminal_records_return_an_abort_sentinel() {
        let (sink, logger) = memory(Level::Debug);
        let facade = Facade::new(logger);

        let abort = facade.fatal_record("shutting down", None, &[fields! { "code" => 3 }]);

        assert_eq!(abort.level(), Level::Fatal);
        assert_eq!(abort.message(), "shutting down");
        assert_eq!(abort.to_string(), "fatal: shutting down");
        assert_eq!(sink.json_records()[0]["code"], 3);
    }

    #[test]
    fn terminal_call_drains_earlier_records() {
        let (sink, logger) = memory(Level::Debug);
        let facade = Facade::new(logger);

        for index in 0..50 {
            facade.info(&format!("queued {index}"), &[]);
        }
        let _abort = facade.panic_record("last", None, &[]);

        let records = sink.json_records();
        assert_eq!(records.len(), 51);
        assert_eq!(records[0]["msg"], "queued 0");
        assert_eq!(records[49]["msg"], "queued 49");
        assert_eq!(records[50]["msg"], "last");
    }

    #[test]
    fn hooks_fire_once_per_matching_emission() {
        let (_sink, logger) = memory(Level::Debug);
        let facade = Facade::new(logger);
        let hook = RecordingHook::new(&[Level::Error, Level::Panic]);

        facade.add_hooks([hook.clone() as Arc<dyn Hook>]);
        facade.info("ignored", &[]);
        facade.error("observed", None, &[]);
        let _abort = facade.panic_record("also observed", None, &[]);

        assert_eq!(hook.seen(), vec!["observed".to_string(), "also observed".to_string()]);
        assert_eq!(facade.logger().hook_count(), 2);
    }

    #[test]
    fn add_hooks_with_no_hooks_is_a_no_op() {
        let (_sink, logger) = memory(Level::Debug);
        let facade = Facade::new(logger);

        facade.add_hooks(Vec::<Arc<dyn Hook>>::new());

        assert_eq!(facade.logger().hook_count(), 0);
    }

    #[test]
    fn records_below_threshold_skip_hooks() {
        let (sink, logger) = memory(Level::Warn);
        let facade = Facade::new(logger);
        let hook = RecordingHook::new(&Level::ALL);

        facade.add_hooks([hook.clone() as Arc<dyn Hook>]);
        facade.info("dropped", &[]);
        facade.warn("kept", &[]);
        facade.flush();

        assert_eq!(sink.len(), 1);
        assert_eq!(hook.seen(), vec!["kept".to_string()]);
    }

    #[test]
    fn set_logger_is_visible_immediately() {
        let (_old_sink, old) = memory(Level::Info);
        let (new_sink, new) = memory(Level::Error);
        let facade = Facade::new(old);

        facade.set_logger(new);
        assert_eq!(facade.logger().level(), Level::Error);

        facade.warn("filtered", &[]);
        facade.error("kept", None, &[]);
        facade.flush();
        assert_eq!(new_sink.len(), 1);
    }

    #[test]
    fn split_routing_separates_app_and_err_output() {
        let (app_sink, app) = memory(Level::Debug);
        let (err_sink, err) = memory(Level::Debug);
        let facade = Facade::split(app, err);

        facade.debug("d", &[]);
        facade.info("i", &[]);
        facade.warn("w", &[]);
        facade.error("e", None, &[]);
        let _abort = facade.panic_record("p", None, &[]);

        let messages = |sink: &MemoryLogSink| -> Vec<Value> {
            sink.json_records()
                .into_iter()
                .map(|record| record["msg"].clone())
                .collect()
        };
        let app_messages = messages(&app_sink);
        let err_messages = messages(&err_sink);
        assert_eq!(app_messages, vec![Value::from("d"), Value::from("i"), Value::from("w")]);
        assert_eq!(err_messages, vec![Value::from("e"), Value::from("p")]);
        assert_eq!(facade.routing(), Routing::Split);
    }

    #[test]
    fn split_hooks_reach_both_handles() {
        let (_app_sink, app) = memory(Level::Debug);
        let (_err_sink, err) = memory(Level::Debug);
        let facade = Facade::split(app, err);
        let hook = RecordingHook::new(&Level::ALL);

        facade.add_hooks([hook.clone() as Arc<dyn Hook>]);
        facade.info("app", &[]);
        facade.error("err", None, &[]);
        facade.flush();

        assert_eq!(hook.seen(), vec!["app".to_string(), "err".to_string()]);
        assert_eq!(facade.app_logger().hook_count(), Level::ALL.len());
        assert_eq!(facade.err_logger().hook_count(), Level::ALL.len());
    }

    #[test]
    fn extra_sync_levels_write_without_flush() {
        let (sink, logger) = memory(Level::Debug);
        let facade = Facade::new(logger).with_sync_levels(&[Level::Error]);

        facade.info("queued", &[]);
        facade.error("inline", None, &[]);

        assert!(facade.is_sync(Level::Error));
        assert!(facade.is_sync(Level::Fatal));
        assert!(!facade.is_sync(Level::Info));
        let records = sink.json_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["msg"], "inline");
    }

    #[tokio::test]
    async fn flush_async_drains_the_queue() {
        let (sink, logger) = memory(Level::Debug);
        let facade = Facade::new(logger).with_worker_name("metalog-test-facade");

        facade.info("one", &[]);
        facade.info("two", &[]);
        facade.flush_async().await;

        assert_eq!(sink.len(), 2);
    }

    fn messages(sink: &MemoryLogSink) -> Vec<String> {
        sink.json_records()
            .into_iter()
            .map(|record| record["msg"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    // Relays a burst of records and a terminal record to another facade.
    struct RelayHook {
        target: Arc<Facade>,
    }

    impl Hook for RelayHook {
        fn levels(&self) -> &[Level] {
            &[Level::Info]
        }

        fn fire(&self, record: &Record) -> Result<()> {
            if &*record.message == "trigger" {
                for index in 0..200 {
                    self.target.info(&format!("relayed {index}"), &[]);
                }
                let _abort = self.target.panic_record("terminal", None, &[]);
            }
            Ok(())
        }
    }

    #[test]
    fn records_from_another_worker_precede_its_terminal_record() {
        let (_source_sink, source_logger) = memory(Level::Debug);
        let source = Facade::new(source_logger).with_worker_name("metalog-test-source");
        let (target_sink, target_logger) = memory(Level::Debug);
        let target = Arc::new(Facade::new(target_logger).with_worker_name("metalog-test-target"));

        source.add_hooks([Arc::new(RelayHook {
            target: Arc::clone(&target),
        }) as Arc<dyn Hook>]);
        source.info("trigger", &[]);
        source.flush();
        target.flush();

        let messages = messages(&target_sink);
        assert_eq!(messages.len(), 201);
        assert_eq!(messages[0], "relayed 0");
        assert_eq!(messages[199], "relayed 199");
        assert_eq!(messages[200], "terminal");
    }

    // Logs back into the facade it is registered on.
    struct EchoHook {
        facade: OnceLock<Weak<Facade>>,
    }

    impl Hook for EchoHook {
        fn levels(&self) -> &[Level] {
            &[Level::Info]
        }

        fn fire(&self, record: &Record) -> Result<()> {
            if &*record.message != "trigger" {
                return Ok(());
            }
            if let Some(facade) = self.facade.get().and_then(Weak::upgrade) {
                facade.info("from hook", &[]);
                let _abort = facade.panic_record("terminal", None, &[]);
            }
            Ok(())
        }
    }

    #[test]
    fn hook_records_keep_program_order_on_the_worker() {
        let (sink, logger) = memory(Level::Debug);
        let facade = Arc::new(Facade::new(logger).with_worker_name("metalog-test-echo"));
        let hook = Arc::new(EchoHook {
            facade: OnceLock::new(),
        });
        let _ = hook.facade.set(Arc::downgrade(&facade));

        facade.add_hooks([hook as Arc<dyn Hook>]);
        facade.info("trigger", &[]);
        facade.flush();

        // Hooks fire before their own record is written.
        assert_eq!(messages(&sink), vec!["from hook", "terminal", "trigger"]);
    }

    // Holds every write until released.
    struct GatedLogger {
        gate: Mutex<mpsc::Receiver<()>>,
        writes: AtomicUsize,
    }

    impl LoggerPort for GatedLogger {
        fn level(&self) -> Level {
            Level::Debug
        }

        fn log(&self, _record: Record) {
            let gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
            let _ = gate.recv_timeout(Duration::from_secs(5));
            self.writes.fetch_add(1, Ordering::SeqCst);
        }

        fn add_hook(&self, _hook: Arc<dyn Hook>) {}

        fn hook_count(&self) -> usize {
            0
        }
    }

    #[test]
    fn async_emission_returns_before_the_write() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let (release, gate) = mpsc::channel();
        let logger = Arc::new(GatedLogger {
            gate: Mutex::new(gate),
            writes: AtomicUsize::new(0),
        });
        let facade = Facade::new(logger.clone()).with_worker_name("metalog-test-gated");

        facade.info("held", &[]);
        assert_eq!(logger.writes.load(Ordering::SeqCst), 0);

        release.send(())?;
        facade.flush();
        assert_eq!(logger.writes.load(Ordering::SeqCst), 1);
        Ok(())
    }
}
