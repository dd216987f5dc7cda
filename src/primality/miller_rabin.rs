//! Miller-Rabin strong probable-prime test.
//!
//! With `n - 1 = d * 2^r`, each witness `a` must either give `a^d = +-1` or
//! reach `n - 1` by repeated squaring of `a^d`. Reaching 1 first exposes a
//! nontrivial square root of unity, which proves `n` composite. A witness
//! sharing a factor with `n` is itself a proof of compositeness.

use super::{decompose, sample_witness, trivial_cases, PrimalityTest, Trivial};
use crate::error::Result;
use crate::rng::RandomSource;
use crate::sieve::SmallPrimes;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;

#[derive(Clone, Debug)]
pub struct MillerRabin {
    trial_division: Option<SmallPrimes>,
}

impl MillerRabin {
    /// Miller-Rabin preceded by trial division with the default small-prime table.
    pub fn new() -> Self {
        Self::with_trial_division(SmallPrimes::default())
    }

    pub fn with_trial_division(small_primes: SmallPrimes) -> Self {
        Self {
            trial_division: Some(small_primes),
        }
    }

    /// Runs only the witness loop after the trivial checks.
    pub fn without_trial_division() -> Self {
        Self {
            trial_division: None,
        }
    }
}

impl Default for MillerRabin {
    fn default() -> Self {
        Self::new()
    }
}

impl PrimalityTest for MillerRabin {
    fn is_prime(&self, n: &BigUint, iterations: u32, rng: &mut dyn RandomSource) -> Result<bool> {
        match trivial_cases(n) {
            Trivial::Prime => return Ok(true),
            Trivial::Composite => return Ok(false),
            Trivial::Undecided => {}
        }
        if let Some(small_primes) = &self.trial_division {
            if small_primes.has_small_factor(n) {
                return Ok(false);
            }
        }

        let two = BigUint::from(2u32);
        let n_minus_one = n - 1u32;
        let (d, r) = decompose(&n_minus_one);

        'witness: for _ in 0..iterations {
            let witness = sample_witness(n, rng)?;
            if !witness.gcd(n).is_one() {
                return Ok(false);
            }

            let mut x = witness.modpow(&d, n);
            if x.is_one() || x == n_minus_one {
                continue;
            }
            for _ in 1..r {
                x = x.modpow(&two, n);
                if x == n_minus_one {
                    continue 'witness;
                }
                if x.is_one() {
                    return Ok(false);
                }
            }
            return Ok(false);
        }
        Ok(true)
    }

    fn name(&self) -> &'static str {
        "miller-rabin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ChaCha20Source, MersenneTwister};

    const CARMICHAEL: [u32; 12] = [
        561, 1105, 1729, 2465, 6601, 8911, 10585, 15841, 29341, 41041, 46657, 52633,
    ];

    #[test]
    fn test_carmichael_numbers_are_rejected() {
        let mut rng = MersenneTwister::new(11);
        let bare = MillerRabin::without_trial_division();
        for n in CARMICHAEL {
            assert!(!bare.is_prime(&BigUint::from(n), 20, &mut rng).unwrap(), "{n}");
            assert!(!MillerRabin::new().is_prime(&BigUint::from(n), 1, &mut rng).unwrap());
        }
    }

    #[test]
    fn test_small_primes_pass_with_and_without_sieve() {
        let mut rng = ChaCha20Source::new(12);
        let sieved = MillerRabin::new();
        let bare = MillerRabin::without_trial_division();
        for p in (2u32..5000).filter(|&p| primal::is_prime(p as u64)) {
            let n = BigUint::from(p);
            assert!(sieved.is_prime(&n, 4, &mut rng).unwrap(), "{p}");
            assert!(bare.is_prime(&n, 4, &mut rng).unwrap(), "{p}");
        }
    }

    #[test]
    fn test_odd_composites_fail() {
        let mut rng = MersenneTwister::new(13);
        let bare = MillerRabin::without_trial_division();
        for n in (9u32..5000).step_by(2).filter(|&n| !primal::is_prime(n as u64)) {
            assert!(!bare.is_prime(&BigUint::from(n), 12, &mut rng).unwrap(), "{n}");
        }
    }

    #[test]
    fn test_large_mersenne_prime_and_composite() {
        let mut rng = MersenneTwister::new(14);
        // 2^127 - 1
        let mersenne = (BigUint::one() << 127u32) - 1u32;
        assert!(MillerRabin::new().is_prime(&mersenne, 16, &mut rng).unwrap());

        let composite = &mersenne * (&mersenne + 2u32);
        assert!(!MillerRabin::new().is_prime(&composite, 16, &mut rng).unwrap());
    }
}
