//! Pseudo-random word sources that feed candidate construction and witness
//! sampling.
//!
//! Every source hands out 32-bit words, can be reseeded, and can produce an
//! independent duplicate so concurrent searches never share mutable state.

pub mod blum_blum_shub;
pub mod chacha;
pub mod mersenne_twister;
pub mod naor_reingold;

pub use self::blum_blum_shub::BlumBlumShub;
pub use self::chacha::ChaCha20Source;
pub use self::mersenne_twister::MersenneTwister;
pub use self::naor_reingold::NaorReingold;

use crate::error::Result;
use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::RngCore;

/// Width of a single `generate` call in bits.
pub const WORD_BITS: u64 = 32;

/// A stateful generator of 32-bit words.
///
/// # Example
/// ```
/// use prime_keygen::rng::{MersenneTwister, RandomSource};
///
/// let mut master = MersenneTwister::new(7);
/// let mut copy = master.duplicate().unwrap();
/// assert_eq!(master.generate(), copy.generate());
///
/// copy.set_seed(8);
/// assert_ne!(master.generate(), copy.generate());
/// ```
pub trait RandomSource: Send {
    /// Returns the next pseudo-random word.
    fn generate(&mut self) -> u32;

    /// Reinitializes the internal state from `seed`.
    fn set_seed(&mut self, seed: u32);

    /// Returns a copy with the same algorithm and parameters whose mutable
    /// state is separate from `self`.
    fn duplicate(&self) -> Result<Box<dyn RandomSource>>;

    /// Short algorithm name used in logs and errors.
    fn name(&self) -> &'static str;
}

/// Draws `bits` random bits from `rng` in 32-bit chunks, least significant
/// chunk first, masking the last chunk down to the bits still needed.
pub fn random_bits(bits: u64, rng: &mut dyn RandomSource) -> BigUint {
    let mut words = Vec::with_capacity(bits.div_ceil(WORD_BITS) as usize);
    let mut collected = 0;
    while collected < bits {
        let take = (bits - collected).min(WORD_BITS);
        let mask = if take == WORD_BITS {
            u32::MAX
        } else {
            (1u32 << take) - 1
        };
        words.push(rng.generate() & mask);
        collected += take;
    }
    BigUint::new(words)
}

/// Seed drawn from the operating system, for searches that do not need to be
/// reproducible.
pub fn entropy_seed() -> u32 {
    OsRng.next_u32()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Replays a fixed word sequence, cycling when exhausted.
    #[derive(Clone)]
    pub(crate) struct ScriptedSource {
        words: Vec<u32>,
        pos: usize,
    }

    impl ScriptedSource {
        pub(crate) fn new(words: Vec<u32>) -> Self {
            Self { words, pos: 0 }
        }
    }

    impl RandomSource for ScriptedSource {
        fn generate(&mut self) -> u32 {
            let word = self.words[self.pos % self.words.len()];
            self.pos += 1;
            word
        }

        fn set_seed(&mut self, seed: u32) {
            self.pos = seed as usize;
        }

        fn duplicate(&self) -> Result<Box<dyn RandomSource>> {
            Ok(Box::new(self.clone()))
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    #[test]
    fn random_bits_masks_partial_chunk() {
        let mut rng = ScriptedSource::new(vec![u32::MAX]);
        let value = random_bits(40, &mut rng);
        assert_eq!(value.bits(), 40);
        assert_eq!(value, (BigUint::from(1u64) << 40u32) - 1u32);
    }

    #[test]
    fn random_bits_orders_chunks_little_endian() {
        let mut rng = ScriptedSource::new(vec![0x1111_1111, 0x2]);
        let value = random_bits(34, &mut rng);
        assert_eq!(value, BigUint::from(0x2_1111_1111u64));
    }

    #[test]
    fn random_bits_zero_width_draws_nothing() {
        let mut rng = ScriptedSource::new(vec![5]);
        assert_eq!(random_bits(0, &mut rng), BigUint::from(0u32));
        assert_eq!(rng.generate(), 5);
    }
}
