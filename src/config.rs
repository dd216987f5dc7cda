//! Search parameters fixed when a [`KeyGenerator`](crate::KeyGenerator) is built.

use crate::error::{Error, Result};

pub const DEFAULT_KEY_BITS: u64 = 2048;
pub const DEFAULT_ITERATIONS: u32 = 64;
pub const MIN_KEY_BITS: u64 = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyGenConfig {
    /// Exact bit length of every candidate.
    pub key_bits: u64,
    /// Witness rounds per primality test.
    pub iterations: u32,
    /// Race worker count; `None` uses half the logical CPUs.
    pub workers: Option<usize>,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            key_bits: DEFAULT_KEY_BITS,
            iterations: DEFAULT_ITERATIONS,
            workers: None,
        }
    }
}

impl KeyGenConfig {
    pub fn validate(&self) -> Result<()> {
        if self.key_bits < MIN_KEY_BITS {
            return Err(Error::InvalidKeySize {
                bits: self.key_bits,
            });
        }
        if self.iterations == 0 {
            return Err(Error::InvalidIterations);
        }
        if self.workers == Some(0) {
            return Err(Error::InvalidWorkerCount);
        }
        Ok(())
    }

    /// Number of race workers to spawn, never less than one.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| num_cpus::get() / 2).max(1)
    }
}
