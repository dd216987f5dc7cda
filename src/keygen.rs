//! Probable-prime key search.

use crate::candidate::build_candidate;
use crate::config::KeyGenConfig;
use crate::error::{Error, Result};
use crate::primality::PrimalityTest;
use crate::race::{self, Search};
use crate::rng::RandomSource;
use num_bigint::BigUint;
use std::time::Instant;
use tracing::info;

/// Searches for probable primes of a fixed bit length.
///
/// The generator owns its master random source and borrows the primality
/// test, which must outlive it.
///
/// # Example
/// ```
/// use prime_keygen::primality::MillerRabin;
/// use prime_keygen::rng::MersenneTwister;
/// use prime_keygen::KeyGenerator;
///
/// let tester = MillerRabin::new();
/// let mut keygen = KeyGenerator::builder()
///     .random_source(Box::new(MersenneTwister::default()))
///     .tester(&tester)
///     .key_bits(128)
///     .iterations(16)
///     .build()
///     .unwrap();
///
/// let prime = keygen.generate_key(42).unwrap();
/// assert_eq!(prime.bits(), 128);
/// assert_eq!(prime, keygen.generate_key(42).unwrap());
/// ```
pub struct KeyGenerator<'t> {
    rng: Box<dyn RandomSource>,
    tester: &'t dyn PrimalityTest,
    config: KeyGenConfig,
}

impl<'t> KeyGenerator<'t> {
    /// Fails fast on an invalid `config`.
    pub fn new(
        rng: Box<dyn RandomSource>,
        tester: &'t dyn PrimalityTest,
        config: KeyGenConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rng,
            tester,
            config,
        })
    }

    pub fn builder() -> KeyGeneratorBuilder<'t> {
        KeyGeneratorBuilder::default()
    }

    /// Replaces the master random source.
    pub fn set_random_source(&mut self, rng: Box<dyn RandomSource>) {
        self.rng = rng;
    }

    pub fn set_tester(&mut self, tester: &'t dyn PrimalityTest) {
        self.tester = tester;
    }

    pub fn key_bits(&self) -> u64 {
        self.config.key_bits
    }

    pub fn iterations(&self) -> u32 {
        self.config.iterations
    }

    pub fn config(&self) -> &KeyGenConfig {
        &self.config
    }

    /// Builds one candidate from the master source's current state.
    pub fn generate_candidate(&mut self) -> BigUint {
        build_candidate(self.config.key_bits, self.rng.as_mut())
    }

    /// Reseeds the master source, then builds one candidate.
    pub fn generate_candidate_seeded(&mut self, seed: u32) -> BigUint {
        self.rng.set_seed(seed);
        self.generate_candidate()
    }

    /// Single-threaded search. Reseeds the master source with `seed`, then
    /// builds and tests candidates until one passes. The same seed and source
    /// algorithm always yield the same prime.
    pub fn generate_key(&mut self, seed: u32) -> Result<BigUint> {
        let started = Instant::now();
        info!(
            key_bits = self.config.key_bits,
            iterations = self.config.iterations,
            rng = self.rng.name(),
            tester = self.tester.name(),
            "starting sequential key search"
        );

        self.rng.set_seed(seed);
        let mut attempts = 0u64;
        loop {
            let candidate = build_candidate(self.config.key_bits, self.rng.as_mut());
            attempts += 1;
            if self
                .tester
                .is_prime(&candidate, self.config.iterations, self.rng.as_mut())?
            {
                info!(
                    attempts,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "sequential key search finished"
                );
                return Ok(candidate);
            }
        }
    }

    /// Races several workers, each on its own duplicate of the master source
    /// seeded with `seed + worker_index`, and returns the first prime found.
    /// The master source itself is left untouched.
    pub fn generate_key_concurrent(&self, seed: u32) -> Result<BigUint> {
        let search = Search {
            tester: self.tester,
            key_bits: self.config.key_bits,
            iterations: self.config.iterations,
        };
        race::race(
            self.rng.as_ref(),
            &search,
            seed,
            self.config.worker_count(),
        )
    }
}

/// Step-by-step construction of a [`KeyGenerator`]; `build` reports the
/// first missing or invalid part.
#[derive(Default)]
pub struct KeyGeneratorBuilder<'t> {
    rng: Option<Box<dyn RandomSource>>,
    tester: Option<&'t dyn PrimalityTest>,
    config: KeyGenConfig,
}

impl<'t> KeyGeneratorBuilder<'t> {
    pub fn random_source(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn tester(mut self, tester: &'t dyn PrimalityTest) -> Self {
        self.tester = Some(tester);
        self
    }

    pub fn config(mut self, config: KeyGenConfig) -> Self {
        self.config = config;
        self
    }

    pub fn key_bits(mut self, bits: u64) -> Self {
        self.config.key_bits = bits;
        self
    }

    pub fn iterations(mut self, iterations: u32) -> Self {
        self.config.iterations = iterations;
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = Some(workers);
        self
    }

    pub fn build(self) -> Result<KeyGenerator<'t>> {
        let rng = self.rng.ok_or(Error::MissingRandomSource)?;
        let tester = self.tester.ok_or(Error::MissingPrimalityTest)?;
        KeyGenerator::new(rng, tester, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primality::{Fermat, MillerRabin};
    use crate::rng::{BlumBlumShub, MersenneTwister};

    #[test]
    fn test_builder_requires_collaborators() {
        let tester = Fermat;
        let missing_rng = KeyGenerator::builder().tester(&tester).build();
        assert!(matches!(missing_rng, Err(Error::MissingRandomSource)));

        let missing_tester = KeyGenerator::builder()
            .random_source(Box::new(MersenneTwister::default()))
            .build();
        assert!(matches!(missing_tester, Err(Error::MissingPrimalityTest)));
    }

    #[test]
    fn test_builder_validates_config() {
        let tester = Fermat;
        let result = KeyGenerator::builder()
            .random_source(Box::new(MersenneTwister::default()))
            .tester(&tester)
            .key_bits(0)
            .build();
        assert!(matches!(result, Err(Error::InvalidKeySize { bits: 0 })));

        let result = KeyGenerator::builder()
            .random_source(Box::new(MersenneTwister::default()))
            .tester(&tester)
            .iterations(0)
            .build();
        assert!(matches!(result, Err(Error::InvalidIterations)));
    }

    #[test]
    fn test_seeded_candidate_is_reproducible() {
        let tester = MillerRabin::new();
        let config = KeyGenConfig {
            key_bits: 96,
            ..Default::default()
        };
        let mut keygen =
            KeyGenerator::new(Box::new(MersenneTwister::default()), &tester, config).unwrap();
        let first = keygen.generate_candidate_seeded(5);
        let next = keygen.generate_candidate();
        assert_ne!(first, next);
        assert_eq!(keygen.generate_candidate_seeded(5), first);
    }

    #[test]
    fn test_replacing_collaborators() {
        let miller_rabin = MillerRabin::new();
        let fermat = Fermat;
        let config = KeyGenConfig {
            key_bits: 64,
            iterations: 16,
            workers: Some(1),
        };
        let mut keygen =
            KeyGenerator::new(Box::new(MersenneTwister::default()), &miller_rabin, config).unwrap();
        let with_mt = keygen.generate_key(3).unwrap();

        keygen.set_random_source(Box::new(BlumBlumShub::new(1)));
        keygen.set_tester(&fermat);
        let with_bbs = keygen.generate_key(3).unwrap();
        assert_eq!(with_bbs.bits(), 64);
        assert_ne!(with_mt, with_bbs);
    }
}
