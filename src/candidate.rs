//! Construction of fixed-width odd candidates.

use crate::rng::{random_bits, RandomSource};
use num_bigint::BigUint;
use num_traits::One;

/// Builds a `bits`-wide candidate from `rng`: the low `bits` bits are random,
/// then bit 0 (odd) and bit `bits - 1` (exact length) are forced on.
///
/// `bits` must be at least 2; [`KeyGenConfig::validate`](crate::KeyGenConfig::validate)
/// rejects smaller sizes before a search starts.
pub fn build_candidate(bits: u64, rng: &mut dyn RandomSource) -> BigUint {
    debug_assert!(bits >= 2);
    random_bits(bits, rng)
        | BigUint::one() // Ensure it's odd
        | (BigUint::one() << (bits - 1)) // Ensure the highest bit is set
}
