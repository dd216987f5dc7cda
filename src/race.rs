//! First-winner concurrent search.
//!
//! Every worker owns a duplicate of the master random source, reseeded with
//! `seed + worker_index`, and loops build-and-test until it finds a probable
//! prime or sees that another worker already has. Workers race on a single
//! atomic flag; only the one that flips it publishes into the result channel,
//! whether it carries a prime or a failure. Panics are caught inside the
//! worker and published as [`Error::WorkerPanicked`].

use crate::candidate::build_candidate;
use crate::error::{Error, Result};
use crate::primality::PrimalityTest;
use crate::rng::RandomSource;
use num_bigint::BigUint;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, SyncSender};
use std::thread;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Parameters shared read-only by all workers.
pub(crate) struct Search<'a> {
    pub tester: &'a dyn PrimalityTest,
    pub key_bits: u64,
    pub iterations: u32,
}

/// How a worker left the race.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WorkerExit {
    /// Found a prime and published it.
    Won,
    /// Stopped because the race was already decided.
    Lost,
    /// Hit an error; published it only if the race was still open.
    Failed,
}

struct RaceState {
    found: AtomicBool,
}

impl RaceState {
    fn new() -> Self {
        Self {
            found: AtomicBool::new(false),
        }
    }

    fn is_decided(&self) -> bool {
        self.found.load(Ordering::Acquire)
    }

    /// True for exactly one caller per race.
    fn claim(&self) -> bool {
        !self.found.swap(true, Ordering::AcqRel)
    }
}

/// Runs `workers` searches in parallel and returns the first outcome
/// published. All workers are joined before this returns.
pub(crate) fn race(
    master: &dyn RandomSource,
    search: &Search<'_>,
    seed: u32,
    workers: usize,
) -> Result<BigUint> {
    let started = Instant::now();
    info!(
        key_bits = search.key_bits,
        iterations = search.iterations,
        workers,
        rng = master.name(),
        tester = search.tester.name(),
        "starting concurrent key search"
    );

    let state = RaceState::new();
    let (tx, rx) = mpsc::sync_channel::<Result<BigUint>>(1);

    let outcome = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for index in 0..workers {
            let rng = master.duplicate();
            let worker_seed = seed.wrapping_add(index as u32);
            let worker_tx = tx.clone();
            let state = &state;
            let spawned = thread::Builder::new()
                .name(format!("keygen-worker-{index}"))
                .spawn_scoped(scope, move || {
                    run_worker(index, rng, worker_seed, search, state, worker_tx)
                });
            match spawned {
                Ok(handle) => handles.push((index, handle)),
                Err(err) => {
                    if state.claim() {
                        error!(worker = index, %err, "failed to spawn search worker");
                        let _ = tx.send(Err(Error::SpawnFailed {
                            reason: err.to_string(),
                        }));
                    }
                    break;
                }
            }
        }
        drop(tx);

        let received = rx.recv();
        for (index, handle) in handles {
            match handle.join() {
                Ok(exit) => debug!(worker = index, ?exit, "search worker joined"),
                Err(payload) => {
                    error!(worker = index, message = %panic_message(&*payload), "search worker unwound")
                }
            }
        }
        received.unwrap_or(Err(Error::ResultChannelClosed))
    });

    match &outcome {
        Ok(prime) => info!(
            bits = prime.bits(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "concurrent key search finished"
        ),
        Err(err) => error!(%err, "concurrent key search failed"),
    }
    outcome
}

fn run_worker(
    index: usize,
    rng: Result<Box<dyn RandomSource>>,
    seed: u32,
    search: &Search<'_>,
    state: &RaceState,
    tx: SyncSender<Result<BigUint>>,
) -> WorkerExit {
    let mut attempts = 0u64;
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> Result<Option<BigUint>> {
        let mut rng = rng?;
        rng.set_seed(seed);
        while !state.is_decided() {
            let candidate = build_candidate(search.key_bits, rng.as_mut());
            attempts += 1;
            if search
                .tester
                .is_prime(&candidate, search.iterations, rng.as_mut())?
            {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }))
    .unwrap_or_else(|payload| {
        Err(Error::WorkerPanicked {
            worker: index,
            message: panic_message(&*payload),
        })
    });

    match outcome {
        Ok(Some(prime)) => {
            if state.claim() {
                debug!(worker = index, attempts, "worker found the prime");
                let _ = tx.send(Ok(prime));
                WorkerExit::Won
            } else {
                debug!(worker = index, attempts, "worker found a prime after the race was decided");
                WorkerExit::Lost
            }
        }
        Ok(None) => {
            debug!(worker = index, attempts, "worker stopped, race already decided");
            WorkerExit::Lost
        }
        Err(err) => {
            if state.claim() {
                error!(worker = index, attempts, %err, "worker failed, publishing error");
                let _ = tx.send(Err(err));
            } else {
                warn!(worker = index, attempts, %err, "worker failed after the race was decided");
            }
            WorkerExit::Failed
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
