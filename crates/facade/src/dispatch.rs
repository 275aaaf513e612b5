//! Ordered background dispatch of log records.
//!
//! One worker thread drains an unbounded channel and hands each record to the
//! logger captured at call time. Records are written in send order. Flush
//! requests travel through the same channel, so a flush returns once every
//! record sent before it has been written.
//!
//! Records submitted from any dispatch worker thread (a hook or logger that
//! logs again) are written inline on that thread, so their program order
//! holds without waiting on another worker.

use metalog_ports::{LoggerPort, Record};
use metalog_shared::{ErrorCode, ErrorEnvelope, Result};
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, mpsc as std_mpsc};
use std::thread::{self, JoinHandle, ThreadId};
use tokio::sync::{mpsc, oneshot};

thread_local! {
    static ON_WORKER: Cell<bool> = const { Cell::new(false) };
}

/// Whether the current thread is the worker of any dispatcher.
pub fn on_dispatch_worker() -> bool {
    ON_WORKER.with(Cell::get)
}

enum Ack {
    // std channel: the blocking wait must also work inside a tokio runtime.
    Blocking(std_mpsc::SyncSender<()>),
    Async(oneshot::Sender<()>),
}

impl Ack {
    fn send(self) {
        match self {
            Self::Blocking(tx) => {
                let _ = tx.send(());
            },
            Self::Async(tx) => {
                let _ = tx.send(());
            },
        }
    }
}

enum Command {
    Write {
        logger: Arc<dyn LoggerPort>,
        record: Record,
    },
    Flush(Ack),
}

/// Single-worker record dispatcher.
pub struct Dispatcher {
    tx: Option<mpsc::UnboundedSender<Command>>,
    worker: Option<JoinHandle<()>>,
    worker_id: ThreadId,
}

impl Dispatcher {
    /// Start the worker thread under `name`.
    pub fn spawn(name: &str) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || run_worker(rx))
            .map_err(|error| {
                ErrorEnvelope::unexpected(
                    ErrorCode::worker_spawn(),
                    format!("failed to start log dispatch thread: {error}"),
                )
                .with_metadata("io_kind", format!("{:?}", error.kind()))
                .with_metadata("thread", name)
            })?;

        Ok(Self {
            tx: Some(tx),
            worker_id: worker.thread().id(),
            worker: Some(worker),
        })
    }

    /// Queue `record` for `logger`.
    ///
    /// Writes inline if the worker is gone or the caller is itself a
    /// dispatch worker.
    pub fn submit(&self, logger: Arc<dyn LoggerPort>, record: Record) {
        let command = Command::Write { logger, record };
        if on_dispatch_worker() {
            execute(command);
            return;
        }
        match &self.tx {
            Some(tx) => {
                if let Err(mpsc::error::SendError(command)) = tx.send(command) {
                    execute(command);
                }
            },
            None => execute(command),
        }
    }

    /// Block until every record submitted before this call is written.
    ///
    /// Returns immediately when called from this dispatcher's own worker.
    pub fn flush(&self) {
        if self.is_own_worker() {
            return;
        }
        let (ack_tx, ack_rx) = std_mpsc::sync_channel(1);
        if self.request(Ack::Blocking(ack_tx)) {
            let _ = ack_rx.recv();
        }
    }

    /// Await every record submitted before this call.
    pub async fn flush_async(&self) {
        if self.is_own_worker() {
            return;
        }
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.request(Ack::Async(ack_tx)) {
            let _ = ack_rx.await;
        }
    }

    fn is_own_worker(&self) -> bool {
        thread::current().id() == self.worker_id
    }

    fn request(&self, ack: Ack) -> bool {
        self.tx
            .as_ref()
            .is_some_and(|tx| tx.send(Command::Flush(ack)).is_ok())
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Dispatcher")
            .field("running", &self.tx.as_ref().is_some_and(|tx| !tx.is_closed()))
            .finish_non_exhaustive()
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain and exit.
        drop(self.tx.take());
        let Some(worker) = self.worker.take() else {
            return;
        };
        if self.is_own_worker() {
            return;
        }
        if worker.join().is_err() {
            eprintln!("metalog: dispatch worker terminated abnormally");
        }
    }
}

fn run_worker(mut rx: mpsc::UnboundedReceiver<Command>) {
    ON_WORKER.with(|flag| flag.set(true));
    while let Some(command) = rx.blocking_recv() {
        execute(command);
    }
}

fn execute(command: Command) {
    match command {
        Command::Write { logger, record } => {
            let level = record.level;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| logger.log(record)));
            if outcome.is_err() {
                eprintln!("metalog: logger panicked while writing a {level} record");
            }
        },
        Command::Flush(ack) => ack.send(),
    }
}
