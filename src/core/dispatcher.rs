//! Fan-out of gate-passed records to sinks

use super::{
    error::{LoggerError, Result},
    metrics::LoggerMetrics,
    sink::{Completion, Sink, SinkRecord},
};
use crossbeam_channel::{bounded, Sender};
use parking_lot::Mutex;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Completion state shared by every sink write of one record.
struct Pending {
    remaining: usize,
    on_complete: Option<Completion>,
    /// Signalled once every sink has settled, errors included
    all_settled: Option<Sender<()>>,
}

impl Pending {
    /// Settle one sink. The first error, or the last success, releases the
    /// caller's completion; later results only count towards `all_settled`.
    fn settle(pending: &Mutex<Pending>, result: Result<()>) {
        let (ready, settled) = {
            let mut state = pending.lock();
            state.remaining = state.remaining.saturating_sub(1);
            let last = state.remaining == 0;

            let ready = match result {
                Err(err) => state.on_complete.take().map(|done| (done, Err(err))),
                Ok(()) if last => state.on_complete.take().map(|done| (done, Ok(()))),
                Ok(()) => None,
            };
            let settled = if last { state.all_settled.take() } else { None };
            (ready, settled)
        };

        // Never call back into user code while holding the lock
        if let Some((done, result)) = ready {
            done(result);
        }
        if let Some(settled) = settled {
            let _ = settled.send(());
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Writes a record to every sink and enforces fail-fast on severe levels.
pub struct Dispatcher {
    sinks: Vec<Arc<dyn Sink>>,
    metrics: Arc<LoggerMetrics>,
}

impl Dispatcher {
    pub fn new(sinks: Vec<Arc<dyn Sink>>, metrics: Arc<LoggerMetrics>) -> Self {
        Self { sinks, metrics }
    }

    pub fn sinks(&self) -> &[Arc<dyn Sink>] {
        &self.sinks
    }

    /// Write `record` to every sink, then panic with the record's message if
    /// it is error or fatal.
    ///
    /// `on_complete` fires exactly once. For error and fatal records the call
    /// blocks until every sink has settled and only then panics; a sink that
    /// never completes hangs the caller.
    pub fn dispatch(&self, record: &SinkRecord, on_complete: Completion) {
        let entry = record.record();
        if !entry.level().is_severe() {
            self.write_all(record, on_complete, None);
            return;
        }

        let (settled_tx, settled_rx) = bounded::<()>(1);
        self.write_all(record, on_complete, Some(settled_tx));

        // Disconnected means every completion handle was dropped unfired
        let _ = settled_rx.recv();
        panic!("{}", entry.message());
    }

    /// Request a write from every sink and aggregate their completions.
    ///
    /// **Per-Sink Panic Isolation**: a sink that panics before settling is
    /// reported as a failed write instead of unwinding through the caller. A
    /// sink that panics after settling is reported and otherwise ignored. Only
    /// panics raised by the caller's own completion are propagated.
    pub fn fan_out(&self, record: &SinkRecord, on_complete: Completion) {
        self.write_all(record, on_complete, None);
    }

    fn write_all(&self, record: &SinkRecord, on_complete: Completion, all_settled: Option<Sender<()>>) {
        if self.sinks.is_empty() {
            on_complete(Ok(()));
            return;
        }

        let pending = Arc::new(Mutex::new(Pending {
            remaining: self.sinks.len(),
            on_complete: Some(on_complete),
            all_settled,
        }));

        for sink in &self.sinks {
            let settled = Arc::new(AtomicBool::new(false));
            let completion_panicked = Arc::new(AtomicBool::new(false));

            let done: Completion = {
                let pending = Arc::clone(&pending);
                let settled = Arc::clone(&settled);
                let completion_panicked = Arc::clone(&completion_panicked);
                let metrics = Arc::clone(&self.metrics);
                Box::new(move |result| {
                    if settled.swap(true, Ordering::AcqRel) {
                        return;
                    }
                    if result.is_err() {
                        metrics.record_sink_failure();
                    }
                    let outcome =
                        panic::catch_unwind(AssertUnwindSafe(|| Pending::settle(&pending, result)));
                    if let Err(payload) = outcome {
                        completion_panicked.store(true, Ordering::Release);
                        panic::resume_unwind(payload);
                    }
                })
            };

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| sink.write(record, done)));

            if let Err(payload) = outcome {
                if completion_panicked.load(Ordering::Acquire) {
                    panic::resume_unwind(payload);
                }

                let message = panic_message(payload.as_ref());
                eprintln!(
                    "[LOGGER CRITICAL] Sink '{}' panicked: {}. \
                     Other sinks continue to function.",
                    sink.name(),
                    message
                );

                if !settled.swap(true, Ordering::AcqRel) {
                    self.metrics.record_sink_failure();
                    Pending::settle(&pending, Err(LoggerError::sink(sink.name(), message)));
                }
            }
        }
    }

    pub fn flush(&self) -> Result<()> {
        for sink in &self.sinks {
            sink.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLevel, LogRecord};
    use crossbeam_channel::unbounded;

    /// Completes with a fixed result, synchronously or later via `release`.
    struct ScriptedSink {
        fail: bool,
        deferred: Mutex<Vec<Completion>>,
        defer: bool,
        writes: Mutex<usize>,
    }

    impl ScriptedSink {
        fn new(fail: bool, defer: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                deferred: Mutex::new(Vec::new()),
                defer,
                writes: Mutex::new(0),
            })
        }

        fn release(&self) {
            let pending: Vec<_> = self.deferred.lock().drain(..).collect();
            for done in pending {
                done(self.result());
            }
        }

        fn result(&self) -> Result<()> {
            if self.fail {
                Err(LoggerError::sink("scripted", "refused"))
            } else {
                Ok(())
            }
        }
    }

    impl Sink for ScriptedSink {
        fn write(&self, _record: &SinkRecord, done: Completion) {
            *self.writes.lock() += 1;
            if self.defer {
                self.deferred.lock().push(done);
            } else {
                done(self.result());
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    struct PanickingSink;

    impl Sink for PanickingSink {
        fn write(&self, _record: &SinkRecord, _done: Completion) {
            panic!("sink exploded");
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    /// Reports success, then panics anyway.
    struct LatePanickingSink;

    impl Sink for LatePanickingSink {
        fn write(&self, _record: &SinkRecord, done: Completion) {
            done(Ok(()));
            panic!("panicked after completing");
        }

        fn name(&self) -> &str {
            "late-panicking"
        }
    }

    fn record(level: LogLevel, message: &str) -> SinkRecord {
        SinkRecord::new(Arc::from("TEST"), Arc::new(LogRecord::new(level, message, None)))
    }

    fn build(sinks: Vec<Arc<dyn Sink>>) -> (Dispatcher, Arc<LoggerMetrics>) {
        let metrics = Arc::new(LoggerMetrics::new());
        (Dispatcher::new(sinks, Arc::clone(&metrics)), metrics)
    }

    #[test]
    fn test_no_sinks_completes_immediately() {
        let (dispatcher, _) = build(Vec::new());
        let (tx, rx) = unbounded();
        dispatcher.dispatch(
            &record(LogLevel::Info, "x"),
            Box::new(move |r| tx.send(r.is_ok()).unwrap()),
        );
        assert_eq!(rx.try_recv(), Ok(true));
    }

    #[test]
    fn test_waits_for_all_sinks_in_any_order() {
        let a = ScriptedSink::new(false, true);
        let b = ScriptedSink::new(false, true);
        let (dispatcher, _) = build(vec![a.clone() as Arc<dyn Sink>, b.clone()]);

        let (tx, rx) = unbounded();
        dispatcher.dispatch(
            &record(LogLevel::Info, "x"),
            Box::new(move |r| tx.send(r.is_ok()).unwrap()),
        );

        assert!(rx.try_recv().is_err());
        b.release();
        assert!(rx.try_recv().is_err());
        a.release();
        assert_eq!(rx.try_recv(), Ok(true));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_first_error_short_circuits() {
        let slow = ScriptedSink::new(false, true);
        let failing = ScriptedSink::new(true, false);
        let (dispatcher, metrics) = build(vec![slow.clone() as Arc<dyn Sink>, failing.clone()]);

        let (tx, rx) = unbounded();
        dispatcher.dispatch(
            &record(LogLevel::Warn, "x"),
            Box::new(move |r| tx.send(r.is_err()).unwrap()),
        );

        assert_eq!(rx.try_recv(), Ok(true));
        slow.release();
        assert!(rx.try_recv().is_err(), "completion must fire exactly once");
        assert_eq!(metrics.sink_failures(), 1);
    }

    #[test]
    fn test_severe_levels_raise_after_every_sink_wrote() {
        let a = ScriptedSink::new(false, false);
        let b = ScriptedSink::new(true, false);
        let (dispatcher, _) = build(vec![a.clone() as Arc<dyn Sink>, b.clone()]);

        let (tx, rx) = unbounded();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            dispatcher.dispatch(
                &record(LogLevel::Fatal, "boom"),
                Box::new(move |r| tx.send(r.is_ok()).unwrap()),
            );
        }));

        let payload = outcome.unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "boom");
        assert_eq!(*a.writes.lock(), 1);
        assert_eq!(*b.writes.lock(), 1);
        assert_eq!(rx.try_recv(), Ok(false));
    }

    #[test]
    fn test_panicking_sink_is_isolated() {
        let healthy = ScriptedSink::new(false, false);
        let (dispatcher, metrics) = build(vec![Arc::new(PanickingSink) as Arc<dyn Sink>, healthy.clone()]);

        let (tx, rx) = unbounded();
        dispatcher.dispatch(
            &record(LogLevel::Info, "x"),
            Box::new(move |r| tx.send(r.err().map(|e| e.to_string())).unwrap()),
        );

        let err = rx.try_recv().unwrap().unwrap();
        assert!(err.contains("sink exploded"));
        assert_eq!(*healthy.writes.lock(), 1);
        assert_eq!(metrics.sink_failures(), 1);
    }

    #[test]
    fn test_severe_raise_waits_for_deferred_sinks() {
        let deferred = ScriptedSink::new(false, true);
        let (dispatcher, _) = build(vec![deferred.clone() as Arc<dyn Sink>]);

        let releaser = {
            let deferred = Arc::clone(&deferred);
            std::thread::spawn(move || {
                while *deferred.writes.lock() == 0 {
                    std::thread::yield_now();
                }
                std::thread::sleep(std::time::Duration::from_millis(50));
                deferred.release();
            })
        };

        let (tx, rx) = unbounded();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            dispatcher.dispatch(
                &record(LogLevel::Error, "boom"),
                Box::new(move |r| tx.send(r.is_ok()).unwrap()),
            );
        }));

        // the completion already ran when the panic surfaced
        assert_eq!(rx.try_recv(), Ok(true));
        assert_eq!(panic_message(outcome.unwrap_err().as_ref()), "boom");
        releaser.join().unwrap();
    }

    #[test]
    fn test_severe_raise_waits_past_short_circuit() {
        let deferred = ScriptedSink::new(false, true);
        let failing = ScriptedSink::new(true, false);
        let (dispatcher, _) = build(vec![deferred.clone() as Arc<dyn Sink>, failing]);

        let released = Arc::new(AtomicBool::new(false));
        let releaser = {
            let deferred = Arc::clone(&deferred);
            let released = Arc::clone(&released);
            std::thread::spawn(move || {
                while *deferred.writes.lock() == 0 {
                    std::thread::yield_now();
                }
                std::thread::sleep(std::time::Duration::from_millis(50));
                released.store(true, Ordering::SeqCst);
                deferred.release();
            })
        };

        let (tx, rx) = unbounded();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            dispatcher.dispatch(
                &record(LogLevel::Error, "boom"),
                Box::new(move |r| tx.send(r.is_err()).unwrap()),
            );
        }));

        assert!(outcome.is_err());
        assert!(released.load(Ordering::SeqCst));
        assert_eq!(rx.try_recv(), Ok(true));
        assert!(rx.try_recv().is_err());
        releaser.join().unwrap();
    }

    #[test]
    fn test_severe_raise_survives_dropped_completion() {
        struct ForgetfulSink;

        impl Sink for ForgetfulSink {
            fn write(&self, _record: &SinkRecord, done: Completion) {
                drop(done);
            }

            fn name(&self) -> &str {
                "forgetful"
            }
        }

        let (dispatcher, _) = build(vec![Arc::new(ForgetfulSink) as Arc<dyn Sink>]);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            dispatcher.dispatch(&record(LogLevel::Fatal, "gone"), Box::new(|_| {}));
        }));
        assert_eq!(panic_message(outcome.unwrap_err().as_ref()), "gone");
    }

    #[test]
    fn test_panic_after_settling_is_isolated() {
        let healthy = ScriptedSink::new(false, false);
        let (dispatcher, metrics) =
            build(vec![Arc::new(LatePanickingSink) as Arc<dyn Sink>, healthy.clone()]);

        let (tx, rx) = unbounded();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            dispatcher.dispatch(
                &record(LogLevel::Info, "x"),
                Box::new(move |r| tx.send(r.is_ok()).unwrap()),
            );
        }));

        assert!(outcome.is_ok());
        assert_eq!(rx.try_recv(), Ok(true));
        assert_eq!(*healthy.writes.lock(), 1);
        assert_eq!(metrics.sink_failures(), 0);
    }

    #[test]
    fn test_panicking_completion_is_propagated() {
        let healthy = ScriptedSink::new(false, false);
        let (dispatcher, _) = build(vec![healthy as Arc<dyn Sink>]);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            dispatcher.dispatch(
                &record(LogLevel::Info, "x"),
                Box::new(|_| panic!("callback failed")),
            );
        }));

        assert_eq!(panic_message(outcome.unwrap_err().as_ref()), "callback failed");
    }
}
