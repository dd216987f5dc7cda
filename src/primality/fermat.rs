//! Fermat probable-prime test.
//!
//! A witness `a` coprime to `n` with `a^(n-1) != 1 (mod n)` proves `n`
//! composite. Witnesses sharing a factor with `n` are redrawn, so Carmichael
//! numbers (561, 1105, 1729, ...) pass for every witness and are reported as
//! probably prime. That blind spot is inherent to the test.

use super::{sample_witness, trivial_cases, PrimalityTest, Trivial};
use crate::error::Result;
use crate::rng::RandomSource;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;

#[derive(Copy, Clone, Debug, Default)]
pub struct Fermat;

impl Fermat {
    pub fn new() -> Self {
        Self
    }
}

impl PrimalityTest for Fermat {
    fn is_prime(&self, n: &BigUint, iterations: u32, rng: &mut dyn RandomSource) -> Result<bool> {
        match trivial_cases(n) {
            Trivial::Prime => return Ok(true),
            Trivial::Composite => return Ok(false),
            Trivial::Undecided => {}
        }

        let n_minus_one = n - 1u32;
        for _ in 0..iterations {
            // n - 2 is always coprime to odd n, so this terminates.
            let witness = loop {
                let candidate = sample_witness(n, rng)?;
                if candidate.gcd(n).is_one() {
                    break candidate;
                }
            };
            if !witness.modpow(&n_minus_one, n).is_one() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn name(&self) -> &'static str {
        "fermat"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::MersenneTwister;

    const CARMICHAEL: [u32; 13] = [
        561, 1105, 1729, 2465, 2821, 6601, 8911, 10585, 15841, 29341, 41041, 46657, 52633,
    ];

    #[test]
    fn test_small_primes_pass() {
        let mut rng = MersenneTwister::new(5);
        for p in (2u32..500).filter(|&p| primal::is_prime(p as u64)) {
            assert!(Fermat.is_prime(&BigUint::from(p), 8, &mut rng).unwrap(), "{p}");
        }
    }

    #[test]
    fn test_non_carmichael_composites_fail() {
        let mut rng = MersenneTwister::new(6);
        for n in (4u32..3000).filter(|&n| !primal::is_prime(n as u64)) {
            if CARMICHAEL.contains(&n) {
                continue;
            }
            assert!(!Fermat.is_prime(&BigUint::from(n), 20, &mut rng).unwrap(), "{n}");
        }
    }

    #[test]
    fn test_carmichael_numbers_fool_fermat() {
        let mut rng = MersenneTwister::new(7);
        for n in CARMICHAEL {
            assert!(Fermat.is_prime(&BigUint::from(n), 32, &mut rng).unwrap(), "{n}");
        }
    }

    #[test]
    fn test_zero_and_one_are_not_prime() {
        let mut rng = MersenneTwister::new(8);
        assert!(!Fermat.is_prime(&BigUint::from(0u32), 4, &mut rng).unwrap());
        assert!(!Fermat.is_prime(&BigUint::from(1u32), 4, &mut rng).unwrap());
    }
}
