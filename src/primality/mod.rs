//! Probabilistic primality tests and the witness sampler they share.

pub mod fermat;
pub mod miller_rabin;

pub use self::fermat::Fermat;
pub use self::miller_rabin::MillerRabin;

use crate::error::{Error, Result};
use crate::rng::{random_bits, RandomSource};
use num_bigint::BigUint;
use num_integer::Integer;
use tracing::warn;

/// Extra bits drawn beyond the width of the witness range. Reducing a value
/// that is 64 bits wider than the range keeps the modulo bias below 2^-64.
pub const WITNESS_MARGIN_BITS: u64 = 64;

/// A probabilistic primality test.
///
/// Implementations hold no per-call mutable state: one instance is shared by
/// every search worker, each passing its own random source.
pub trait PrimalityTest: Send + Sync {
    /// Returns `Ok(true)` if `n` survives `iterations` random witnesses
    /// ("probably prime"), `Ok(false)` once a witness proves it composite.
    fn is_prime(&self, n: &BigUint, iterations: u32, rng: &mut dyn RandomSource)
        -> Result<bool>;

    fn name(&self) -> &'static str;
}

/// Outcome of the checks every test runs before touching witnesses.
pub(crate) enum Trivial {
    Prime,
    Composite,
    Undecided,
}

/// `n <= 1` is not prime, 2 and 3 are, any other even number is not.
pub(crate) fn trivial_cases(n: &BigUint) -> Trivial {
    if n.bits() <= 1 {
        Trivial::Composite
    } else if *n <= BigUint::from(3u32) {
        Trivial::Prime
    } else if n.is_even() {
        Trivial::Composite
    } else {
        Trivial::Undecided
    }
}

/// Draws a witness uniformly from `[2, n-2]`.
///
/// Fresh bits are consumed on every call. Fails when `n <= 3`, where the range
/// is empty.
pub fn sample_witness(n: &BigUint, rng: &mut dyn RandomSource) -> Result<BigUint> {
    let two = BigUint::from(2u32);
    if *n <= BigUint::from(3u32) {
        return Err(Error::WitnessBoundTooSmall { bound: n.clone() });
    }

    // n - 3 values: [0, n-4] shifted up by two.
    let range = n - 3u32;
    let upper = n - &two;
    let draw_bits = range.bits() + WITNESS_MARGIN_BITS;
    loop {
        let witness = random_bits(draw_bits, rng) % &range + &two;
        if witness >= two && witness <= upper {
            return Ok(witness);
        }
        warn!(%witness, %n, "witness outside [2, n-2], redrawing");
    }
}

/// Splits `n - 1` into `d * 2^r` with `d` odd. `n` must be odd and at least 3.
pub(crate) fn decompose(n_minus_one: &BigUint) -> (BigUint, u64) {
    let r = n_minus_one.trailing_zeros().unwrap_or(0);
    (n_minus_one >> r, r)
}
