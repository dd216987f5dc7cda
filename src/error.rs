//! Error type shared by every part of the key search.

use num_bigint::BigUint;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, thiserror::Error, Debug)]
pub enum Error {
    /// Candidates need room for both boundary bits.
    #[error("Key size must be at least 2 bits, got {bits}")]
    InvalidKeySize { bits: u64 },

    #[error("Primality test iteration count must be positive")]
    InvalidIterations,

    #[error("Worker count must be positive")]
    InvalidWorkerCount,

    #[error("Key generator requires a random source")]
    MissingRandomSource,

    #[error("Key generator requires a primality test")]
    MissingPrimalityTest,

    /// Witnesses live in `[2, n-2]`, which is empty for `n <= 3`.
    #[error("Witness bound must be greater than 3, got {bound}")]
    WitnessBoundTooSmall { bound: BigUint },

    #[error("Failed to duplicate random source {source_name}: {reason}")]
    DuplicationFailed {
        source_name: &'static str,
        reason: String,
    },

    #[error("Failed to spawn search worker: {reason}")]
    SpawnFailed { reason: String },

    #[error("Search worker {worker} panicked: {message}")]
    WorkerPanicked { worker: usize, message: String },

    #[error("Result channel closed before any worker published")]
    ResultChannelClosed,
}
