//! Blum-Blum-Shub generator over a small fixed modulus.
//!
//! The modulus is far too small for cryptographic use, and `FACTOR_P` is not
//! itself prime; the generator exists to compare search behaviour across
//! structurally different sources.

use super::RandomSource;
use crate::error::Result;
use num_integer::Integer;

/// Both factors are congruent to 3 mod 4.
const FACTOR_P: u64 = 100_127;
const FACTOR_Q: u64 = 100_183;
const MODULUS: u64 = FACTOR_P * FACTOR_Q;

/// State used whenever the seed is unusable as a quadratic residue start.
const FALLBACK_STATE: u64 = 7_641_693_654;

#[derive(Clone)]
pub struct BlumBlumShub {
    state: u64,
}

impl BlumBlumShub {
    pub fn new(seed: u32) -> Self {
        Self {
            state: initial_state(seed),
        }
    }

    fn square(&mut self) -> u64 {
        let s = self.state as u128;
        self.state = (s * s % MODULUS as u128) as u64;
        self.state
    }
}

/// Seeds 0 and 1 are fixed points of squaring.
fn initial_state(seed: u32) -> u64 {
    let seed = seed as u64;
    if seed < 2 || seed >= MODULUS || seed.gcd(&MODULUS) != 1 {
        FALLBACK_STATE
    } else {
        seed
    }
}

impl RandomSource for BlumBlumShub {
    /// One bit per squaring, most significant bit first.
    fn generate(&mut self) -> u32 {
        (0..32).fold(0u32, |word, _| (word << 1) | (self.square() & 1) as u32)
    }

    fn set_seed(&mut self, seed: u32) {
        self.state = initial_state(seed);
    }

    fn duplicate(&self) -> Result<Box<dyn RandomSource>> {
        Ok(Box::new(self.clone()))
    }

    fn name(&self) -> &'static str {
        "blum-blum-shub"
    }
}
