//! Background sink: runs another sink on a dedicated worker thread

use crate::core::{Completion, LoggerError, Result, Sink, SinkRecord};
use crossbeam_channel::{bounded, Sender};
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

/// Default shutdown timeout for draining the worker (5 seconds)
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Default capacity of the queue in front of the worker
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

enum Job {
    Write(SinkRecord, Completion),
    Flush(Sender<Result<()>>),
}

/// Hands records to a worker thread that writes them to the inner sink.
///
/// Completions fire on the worker thread. A full queue blocks the caller;
/// records are never dropped. Dropping the sink drains the queue.
///
/// Completion callbacks run on the worker, so a record they log through the
/// same sink is written inline, ahead of anything still queued. Flushing from
/// a callback would wait on the worker itself and returns an error instead.
///
/// # Example
///
/// ```
/// use debug_logtron::prelude::*;
/// use debug_logtron::sinks::BackgroundSink;
///
/// let lines = MemorySink::new();
/// let logger = Logger::builder("svc")
///     .env(Environment::new())
///     .sink(BackgroundSink::new(lines.clone()))
///     .build()?;
///
/// logger.info("written off-thread", None);
/// logger.flush()?;
/// assert_eq!(lines.len(), 1);
/// # Ok::<(), LoggerError>(())
/// ```
pub struct BackgroundSink {
    name: String,
    inner: Arc<dyn Sink>,
    worker: ThreadId,
    sender: Option<Sender<Job>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl BackgroundSink {
    pub fn new<S: Sink + 'static>(inner: S) -> Self {
        Self::with_capacity(Arc::new(inner), DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(inner: Arc<dyn Sink>, capacity: usize) -> Self {
        let (sender, receiver) = bounded::<Job>(capacity.max(1));
        let name = format!("background({})", inner.name());

        let worker_sink = Arc::clone(&inner);
        let handle = thread::spawn(move || {
            for job in receiver {
                match job {
                    Job::Write(record, done) => Self::run_write(worker_sink.as_ref(), &record, done),
                    Job::Flush(reply) => {
                        let _ = reply.send(worker_sink.flush());
                    }
                }
            }
        });

        Self {
            name,
            inner,
            worker: handle.thread().id(),
            sender: Some(sender),
            handle: Some(handle),
        }
    }

    /// Write with panic isolation; a panicking inner sink still settles.
    fn run_write(inner: &dyn Sink, record: &SinkRecord, done: Completion) {
        let slot = Arc::new(Mutex::new(Some(done)));
        let forward: Completion = {
            let slot = Arc::clone(&slot);
            Box::new(move |result| {
                let done = slot.lock().take();
                if let Some(done) = done {
                    done(result);
                }
            })
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| inner.write(record, forward)));
        if outcome.is_err() {
            eprintln!(
                "[LOGGER CRITICAL] Sink '{}' panicked on the background worker.",
                inner.name()
            );
            let done = slot.lock().take();
            if let Some(done) = done {
                done(Err(LoggerError::sink(inner.name(), "panicked")));
            }
        }
    }

    fn on_worker(&self) -> bool {
        thread::current().id() == self.worker
    }

    /// Close the queue and wait for the worker to drain it.
    ///
    /// Returns `false` if the worker did not finish within `timeout`.
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        drop(self.sender.take());

        if let Some(handle) = self.handle.take() {
            let start = Instant::now();

            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        eprintln!("[LOGGER ERROR] Background worker panicked during shutdown: {:?}", e);
                        return false;
                    }
                    break;
                }

                if start.elapsed() >= timeout {
                    eprintln!(
                        "[LOGGER WARNING] Background worker did not finish within {:?}. \
                         Some records may be lost.",
                        timeout
                    );
                    return false;
                }

                thread::sleep(Duration::from_millis(10));
            }
        }

        true
    }
}

impl Sink for BackgroundSink {
    fn write(&self, record: &SinkRecord, done: Completion) {
        if self.on_worker() {
            Self::run_write(self.inner.as_ref(), record, done);
            return;
        }

        let Some(sender) = self.sender.as_ref() else {
            done(Err(LoggerError::ChannelSendError));
            return;
        };

        if let Err(err) = sender.send(Job::Write(record.clone(), done)) {
            if let Job::Write(_, done) = err.into_inner() {
                done(Err(LoggerError::ChannelSendError));
            }
        }
    }

    /// Waits until every record queued before this call has been written.
    fn flush(&self) -> Result<()> {
        if self.on_worker() {
            return Err(LoggerError::config(
                "BackgroundSink",
                "flush called from a completion running on the worker thread",
            ));
        }

        let sender = self.sender.as_ref().ok_or(LoggerError::ChannelSendError)?;
        let (reply_tx, reply_rx) = bounded(1);
        sender
            .send(Job::Flush(reply_tx))
            .map_err(|_| LoggerError::ChannelSendError)?;
        reply_rx.recv().map_err(|_| LoggerError::ChannelSendError)?
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for BackgroundSink {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}
