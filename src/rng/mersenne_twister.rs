//! 32-bit Mersenne Twister (MT19937).

use super::RandomSource;
use crate::error::Result;

const STATE_SIZE: usize = 624;
const TWIST_OFFSET: usize = 397;
const MATRIX_A: u32 = 0x9908_B0DF;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7FFF_FFFF;
const SEED_MULTIPLIER: u32 = 1_812_433_253;

/// Seed used by the reference implementation when none is given.
pub const DEFAULT_SEED: u32 = 5489;

/// MT19937 with period 2^19937 - 1. Output for a fixed seed is deterministic
/// and matches the reference algorithm.
#[derive(Clone)]
pub struct MersenneTwister {
    state: [u32; STATE_SIZE],
    index: usize,
}

impl MersenneTwister {
    pub fn new(seed: u32) -> Self {
        let mut mt = Self {
            state: [0; STATE_SIZE],
            index: STATE_SIZE,
        };
        mt.set_seed(seed);
        mt
    }

    /// Regenerates the whole state block.
    fn twist(&mut self) {
        for i in 0..STATE_SIZE {
            let merged =
                (self.state[i] & UPPER_MASK) | (self.state[(i + 1) % STATE_SIZE] & LOWER_MASK);
            let mut shifted = merged >> 1;
            if merged & 1 != 0 {
                shifted ^= MATRIX_A;
            }
            self.state[i] = self.state[(i + TWIST_OFFSET) % STATE_SIZE] ^ shifted;
        }
        self.index = 0;
    }
}

impl Default for MersenneTwister {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl RandomSource for MersenneTwister {
    fn generate(&mut self) -> u32 {
        if self.index >= STATE_SIZE {
            self.twist();
        }
        let mut y = self.state[self.index];
        self.index += 1;

        // Tempering
        y ^= y >> 11;
        y ^= (y << 7) & 0x9D2C_5680;
        y ^= (y << 15) & 0xEFC6_0000;
        y ^= y >> 18;
        y
    }

    fn set_seed(&mut self, seed: u32) {
        self.state[0] = seed;
        for i in 1..STATE_SIZE {
            let prev = self.state[i - 1];
            self.state[i] = SEED_MULTIPLIER
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        self.index = STATE_SIZE;
    }

    fn duplicate(&self) -> Result<Box<dyn RandomSource>> {
        Ok(Box::new(self.clone()))
    }

    fn name(&self) -> &'static str {
        "mt19937"
    }
}
