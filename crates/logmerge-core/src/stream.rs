//! Ordered record stream
//!
//! A single-pass iterator fed by a producer thread through a bounded queue.
//! The producer blocks while the queue is full and the consumer blocks while
//! it is empty, so replay memory stays bounded by the queue capacity no
//! matter how many records the store holds.
//!
//! A producer failure arrives as a final `Err` item. After that, or after the
//! producer finishes, `next()` returns `None` without blocking.

use std::iter::FusedIterator;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

use crate::error::{MergeError, Result};
use crate::types::Record;

const WORKER_NAME: &str = "logmerge-replay";

/// Producer half of a [`RecordStream`]
pub struct RecordSink {
    tx: SyncSender<Result<Record>>,
}

impl RecordSink {
    /// Push a record, blocking while the queue is full
    ///
    /// Returns `false` once the consumer has dropped the stream; the producer
    /// should stop scanning.
    pub fn send(&self, record: Record) -> bool {
        self.tx.send(Ok(record)).is_ok()
    }

    fn fail(&self, err: MergeError) {
        let _ = self.tx.send(Err(err));
    }
}

/// Consumer half: yields records in the order the producer sent them
pub struct RecordStream {
    rx: Option<Receiver<Result<Record>>>,
    worker: Option<JoinHandle<()>>,
    yielded: u64,
}

impl RecordStream {
    /// Start `producer` on a worker thread feeding a queue of `capacity`
    pub fn spawn<F>(capacity: usize, producer: F) -> Result<Self>
    where
        F: FnOnce(&RecordSink) -> Result<()> + Send + 'static,
    {
        if capacity == 0 {
            return Err(MergeError::Config(
                "stream capacity must be at least 1".into(),
            ));
        }

        let (tx, rx) = mpsc::sync_channel(capacity);
        let worker = thread::Builder::new()
            .name(WORKER_NAME.into())
            .spawn(move || {
                let sink = RecordSink { tx };
                if let Err(e) = producer(&sink) {
                    tracing::error!("Replay producer failed: {}", e);
                    sink.fail(e);
                }
            })?;

        Ok(Self {
            rx: Some(rx),
            worker: Some(worker),
            yielded: 0,
        })
    }

    /// Records handed to the consumer so far
    pub fn yielded(&self) -> u64 {
        self.yielded
    }

    /// Whether the stream has been fully drained
    pub fn is_finished(&self) -> bool {
        self.rx.is_none()
    }

    /// Drop the queue and wait for the worker
    fn finish(&mut self) -> Result<()> {
        self.rx = None;
        match self.worker.take() {
            Some(worker) => worker
                .join()
                .map_err(|_| MergeError::Stream("replay worker panicked".into())),
            None => Ok(()),
        }
    }
}

impl Iterator for RecordStream {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let rx = self.rx.as_ref()?;

        match rx.recv() {
            Ok(Ok(record)) => {
                self.yielded += 1;
                Some(Ok(record))
            }
            Ok(Err(e)) => {
                let _ = self.finish();
                Some(Err(e))
            }
            // producer hung up: either done or panicked
            Err(_) => match self.finish() {
                Ok(()) => None,
                Err(e) => Some(Err(e)),
            },
        }
    }
}

impl FusedIterator for RecordStream {}

impl Drop for RecordStream {
    fn drop(&mut self) {
        // a producer blocked on a full queue wakes up once the receiver is gone
        if let Err(e) = self.finish() {
            tracing::warn!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Timestamp;
    use chrono::DateTime;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn record(n: usize) -> Record {
        let instant = DateTime::parse_from_rfc3339("2023-06-15T14:30:22+00:00").unwrap();
        Record::new(Timestamp::new(instant, "UTC"), "svc", "n1", n.to_string())
    }

    #[test]
    fn test_yields_in_send_order_then_ends() {
        let mut stream = RecordStream::spawn(3, |sink| {
            for n in 0..25 {
                if !sink.send(record(n)) {
                    break;
                }
            }
            Ok(())
        })
        .unwrap();

        let messages: Vec<String> = stream
            .by_ref()
            .map(|r| r.unwrap().message)
            .collect();
        let expected: Vec<String> = (0..25).map(|n| n.to_string()).collect();
        assert_eq!(messages, expected);
        assert_eq!(stream.yielded(), 25);
        assert!(stream.is_finished());

        // exhausted streams stay exhausted
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_empty_producer() {
        let mut stream = RecordStream::spawn(1, |_| Ok(())).unwrap();
        assert!(stream.next().is_none());
        assert_eq!(stream.yielded(), 0);
    }

    #[test]
    fn test_producer_error_ends_stream() {
        let mut stream = RecordStream::spawn(2, |sink| {
            sink.send(record(0));
            Err(MergeError::Store("scan failed".into()))
        })
        .unwrap();

        assert!(stream.next().unwrap().is_ok());
        assert!(matches!(stream.next(), Some(Err(MergeError::Store(_)))));
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_producer_panic_is_reported() {
        let mut stream = RecordStream::spawn(2, |_| -> Result<()> { panic!("boom") }).unwrap();
        assert!(matches!(stream.next(), Some(Err(MergeError::Stream(_)))));
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_backpressure_bounds_queue() {
        let sent = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&sent);
        let mut stream = RecordStream::spawn(2, move |sink| {
            for n in 0..100 {
                if !sink.send(record(n)) {
                    break;
                }
                counter.fetch_add(1, Ordering::SeqCst);
            }
            Ok(())
        })
        .unwrap();

        std::thread::sleep(Duration::from_millis(50));
        assert!(sent.load(Ordering::SeqCst) <= 2);

        assert_eq!(stream.by_ref().count(), 100);
        assert_eq!(sent.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn test_early_drop_stops_producer() {
        let sent = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&sent);
        let mut stream = RecordStream::spawn(1, move |sink| {
            for n in 0..1_000 {
                if !sink.send(record(n)) {
                    break;
                }
                counter.fetch_add(1, Ordering::SeqCst);
            }
            Ok(())
        })
        .unwrap();

        assert!(stream.next().is_some());
        // joins the worker; would hang if the producer kept blocking
        drop(stream);
        assert!(sent.load(Ordering::SeqCst) < 1_000);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            RecordStream::spawn(0, |_| Ok(())),
            Err(MergeError::Config(_))
        ));
    }
}
