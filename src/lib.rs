//! Probable-prime search for cryptographic key material.
//!
//! Candidates are odd integers of an exact bit length assembled from 32-bit
//! pseudo-random words; each one is checked with a probabilistic primality
//! test (Fermat or Miller-Rabin) until one passes. The search runs either on
//! the calling thread or as a race between workers that each own a
//! duplicated random source, stopping at the first prime.
//!
//! ```text
//! RandomSource ──► build_candidate ──► PrimalityTest::is_prime
//!      │                                   ▲
//!      └──────── sample_witness ───────────┘
//!
//! KeyGenerator::generate_key             (one thread, master source)
//! KeyGenerator::generate_key_concurrent  (N workers, duplicated sources)
//! ```

pub mod candidate;
pub mod config;
pub mod error;
pub mod keygen;
pub mod primality;
mod race;
pub mod rng;
pub mod sieve;

pub use crate::candidate::build_candidate;
pub use crate::config::KeyGenConfig;
pub use crate::error::{Error, Result};
pub use crate::keygen::{KeyGenerator, KeyGeneratorBuilder};
pub use crate::primality::{Fermat, MillerRabin, PrimalityTest};
pub use crate::rng::RandomSource;
