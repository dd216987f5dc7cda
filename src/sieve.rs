//! Trial division by small primes, used to reject most composite candidates
//! before any modular exponentiation.

use num_bigint::BigUint;
use num_traits::Zero;

/// Primes below this bound make up the default table.
pub const DEFAULT_SMALL_PRIME_LIMIT: usize = 2_000;

#[derive(Clone, Debug)]
pub struct SmallPrimes {
    primes: Vec<u32>,
}

impl SmallPrimes {
    /// Every prime strictly below `limit`.
    pub fn below(limit: usize) -> Self {
        let sieve = primal::Sieve::new(limit);
        let primes = sieve
            .primes_from(0)
            .take_while(|&p| p < limit)
            .map(|p| p as u32)
            .collect();
        Self { primes }
    }

    pub fn primes(&self) -> &[u32] {
        &self.primes
    }

    /// Returns true if `n` is divisible by a table prime other than itself,
    /// i.e. `n` is definitely composite.
    pub fn has_small_factor(&self, n: &BigUint) -> bool {
        for &p in &self.primes {
            if (n % p).is_zero() {
                return *n != BigUint::from(p);
            }
        }
        false
    }
}

impl Default for SmallPrimes {
    fn default() -> Self {
        Self::below(DEFAULT_SMALL_PRIME_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_contents() {
        let table = SmallPrimes::below(30);
        assert_eq!(table.primes(), &[2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert_eq!(SmallPrimes::default().primes().len(), 303);
    }

    #[test]
    fn test_small_primes_are_not_flagged() {
        let table = SmallPrimes::default();
        for &p in table.primes() {
            assert!(!table.has_small_factor(&BigUint::from(p)), "{p} flagged");
        }
    }

    #[test]
    fn test_composites_with_small_factors() {
        let table = SmallPrimes::default();
        assert!(table.has_small_factor(&BigUint::from(561u32)));
        assert!(table.has_small_factor(&BigUint::from(1999u32 * 1997)));
        // 2003 * 2011 has no factor below the table limit.
        assert!(!table.has_small_factor(&BigUint::from(2003u32 * 2011)));
    }
}
