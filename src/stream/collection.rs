// In: src/stream/collection.rs

//! The consumer-facing lazy solution collection.
//!
//! A `SolutionStream` is fed through an mpsc queue by a producer (the state
//! machine, running synchronously or on a background thread). The queue is
//! the sole synchronization point; status and final log live in a small
//! shared side-structure the producer writes and the consumer reads. While
//! the producer is live the collection is a monotonically-growing view, not a
//! snapshot: `len()` and iteration report whatever has arrived so far.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};

use crate::error::DznError;
use crate::model::{Solution, Status};

//==================================================================================
// 1. Shared Producer/Consumer State
//==================================================================================

#[derive(Debug)]
struct StreamShared {
    status: Mutex<Status>,
    log: Mutex<String>,
    produced: AtomicUsize,
}

fn lock_unpoisoned<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// The producer half: enqueues fully-decoded solutions and publishes the
/// final status and log. Dropping it (with or without a terminal status)
/// closes the queue; everything already enqueued stays readable.
#[derive(Debug)]
pub struct StreamProducer {
    tx: Sender<Solution>,
    shared: Arc<StreamShared>,
}

impl StreamProducer {
    /// Enqueues one solution. A solution is atomic: it is fully decoded
    /// before this call, or never enqueued at all. Returns false once the
    /// consumer has gone away.
    pub fn send(&self, solution: Solution) -> bool {
        let ok = self.tx.send(solution).is_ok();
        if ok {
            self.shared.produced.fetch_add(1, Ordering::SeqCst);
        }
        ok
    }

    /// Advances the stream status. Monotone: a stream reaches at most one
    /// terminal value, so later writes are ignored.
    pub fn set_status(&self, status: Status) {
        let mut guard = lock_unpoisoned(&self.shared.status);
        if !guard.is_terminal() {
            *guard = status;
        }
    }

    /// Publishes the trailing solver log/stderr text, set once on completion.
    pub fn set_log(&self, log: String) {
        *lock_unpoisoned(&self.shared.log) = log;
    }
}

//==================================================================================
// 2. The Lazy Collection
//==================================================================================

/// A lazy, possibly-concurrently-populated collection of solutions.
///
/// Two retention modes:
/// - `keep = true` (default): arrivals are drained into an internal list on
///   access and every further access is served from that list. Repeated
///   iteration is idempotent and never blocks.
/// - `keep = false`: drain-once. Each `next_solution` call consumes the
///   queue (blocking until an item or end-of-stream), indexed access is
///   refused, and a second iteration pass sees nothing.
#[derive(Debug)]
pub struct SolutionStream {
    rx: Receiver<Solution>,
    shared: Arc<StreamShared>,
    keep: bool,
    cache: Vec<Solution>,
    consumed: usize,
}

impl SolutionStream {
    /// Creates a connected producer/consumer pair.
    pub fn channel(keep: bool) -> (StreamProducer, SolutionStream) {
        let (tx, rx) = channel();
        let shared = Arc::new(StreamShared {
            status: Mutex::new(Status::Incomplete),
            log: Mutex::new(String::new()),
            produced: AtomicUsize::new(0),
        });
        let producer = StreamProducer {
            tx,
            shared: Arc::clone(&shared),
        };
        let stream = SolutionStream {
            rx,
            shared,
            keep,
            cache: Vec::new(),
            consumed: 0,
        };
        (producer, stream)
    }

    pub fn keep(&self) -> bool {
        self.keep
    }

    /// The stream status as of this call. Only a terminal value means the
    /// producer is finished.
    pub fn status(&self) -> Status {
        *lock_unpoisoned(&self.shared.status)
    }

    /// The trailing solver log text. Complete only once the status is
    /// terminal or the producer has gone away.
    pub fn log(&self) -> String {
        lock_unpoisoned(&self.shared.log).clone()
    }

    /// Number of solutions visible right now. In keep mode this is the total
    /// received so far (monotone); in drain-once mode, the number currently
    /// queued and not yet consumed.
    pub fn len(&mut self) -> usize {
        if self.keep {
            self.drain_available();
            self.cache.len()
        } else {
            self.shared.produced.load(Ordering::SeqCst) - self.consumed
        }
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// Indexed access. Keep mode only: a drain-once stream does not retain
    /// delivered solutions, so there is nothing stable to index into.
    pub fn get(&mut self, index: usize) -> Result<Option<&Solution>, DznError> {
        if !self.keep {
            return Err(DznError::UnsupportedOperation(
                "indexed access requires keep mode".to_string(),
            ));
        }
        self.drain_available();
        Ok(self.cache.get(index))
    }

    /// Iterates the solutions received so far without blocking. Keep mode
    /// only; repeat calls are idempotent over what has arrived.
    pub fn iter(&mut self) -> Result<std::slice::Iter<'_, Solution>, DznError> {
        if !self.keep {
            return Err(DznError::UnsupportedOperation(
                "non-consuming iteration requires keep mode; use next_solution".to_string(),
            ));
        }
        self.drain_available();
        Ok(self.cache.iter())
    }

    /// Drain-once consumption: blocks until the next solution arrives or the
    /// producer is finished. In keep mode use `iter`/`wait` instead.
    pub fn next_solution(&mut self) -> Result<Option<Solution>, DznError> {
        if self.keep {
            return Err(DznError::UnsupportedOperation(
                "consuming reads are for drain-once mode; use iter or wait".to_string(),
            ));
        }
        match self.rx.recv() {
            Ok(sol) => {
                self.consumed += 1;
                Ok(Some(sol))
            }
            // Disconnected: the producer is done (or was cancelled).
            Err(_) => Ok(None),
        }
    }

    /// Keep mode: blocks until the producer finishes, then returns the full
    /// materialized solution list.
    pub fn wait(&mut self) -> Result<&[Solution], DznError> {
        if !self.keep {
            return Err(DznError::UnsupportedOperation(
                "wait requires keep mode".to_string(),
            ));
        }
        while let Ok(sol) = self.rx.recv() {
            self.cache.push(sol);
        }
        Ok(&self.cache)
    }

    /// Moves everything currently queued into the cache without blocking.
    fn drain_available(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(sol) => self.cache.push(sol),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }
}
