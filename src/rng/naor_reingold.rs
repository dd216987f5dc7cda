//! Naor-Reingold pseudorandom function used as a counter-mode generator.
//!
//! `f(x) = (g^a0)^(prod_{i : x_i = 1} a_{i+1}) mod P`, evaluated at successive
//! inputs `x`. The group parameters and key are small fixed demo values.

use super::RandomSource;
use crate::error::Result;
use num_bigint::BigUint;

const INPUT_BITS: usize = 32;

const MODULUS_P: u64 = 4_279_969_613;
const SUBGROUP_Q: u64 = 9_999_929;
const GENERATOR_G: u64 = 9_999_918;

/// `a0..a32`, one more than the input width.
const KEY: [u64; INPUT_BITS + 1] = [
    650_051, 3_948_705, 3_142_325, 4_036_110, 1_141_941, 5_739_231, 5_725_758, 8_299_330,
    1_776_388, 1_423_550, 9_260_804, 156_410, 1_190_436, 61_218, 2_382_500, 1_738_876,
    7_978_879, 6_010_478, 310_917, 4_280_253, 24_724, 7_087_659, 796_099, 8_383_655, 7_638_286,
    1_390_415, 7_899_225, 5_628_976, 1_472_292, 4_284_966, 9_708_041, 4_179_835, 3_635_954,
];

#[derive(Clone)]
pub struct NaorReingold {
    modulus: BigUint,
    /// `g^a0 mod P`
    base: BigUint,
    input: u32,
}

impl NaorReingold {
    pub fn new(seed: u32) -> Self {
        let modulus = BigUint::from(MODULUS_P);
        let base = BigUint::from(GENERATOR_G).modpow(&BigUint::from(KEY[0]), &modulus);
        Self {
            modulus,
            base,
            input: seed,
        }
    }

    fn evaluate(&self, x: u32) -> BigUint {
        let exponent = (0..INPUT_BITS)
            .filter(|bit| (x >> bit) & 1 == 1)
            .fold(1u64, |acc, bit| acc * KEY[bit + 1] % SUBGROUP_Q);
        self.base.modpow(&BigUint::from(exponent), &self.modulus)
    }
}

impl RandomSource for NaorReingold {
    fn generate(&mut self) -> u32 {
        let value = self.evaluate(self.input);
        self.input = self.input.wrapping_add(1);
        // P < 2^32, so the low digit is the whole value.
        value.iter_u32_digits().next().unwrap_or(0)
    }

    fn set_seed(&mut self, seed: u32) {
        self.input = seed;
    }

    fn duplicate(&self) -> Result<Box<dyn RandomSource>> {
        Ok(Box::new(self.clone()))
    }

    fn name(&self) -> &'static str {
        "naor-reingold"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_parameters_are_consistent() {
        assert_eq!((MODULUS_P - 1) % SUBGROUP_Q, 0);
        assert!(primal::is_prime(MODULUS_P));
        assert!(primal::is_prime(SUBGROUP_Q));
        assert!(KEY.iter().all(|&a| a < SUBGROUP_Q));
    }

    #[test]
    fn test_zero_input_yields_base() {
        let mut prf = NaorReingold::new(0);
        let base = BigUint::from(GENERATOR_G).modpow(&BigUint::from(KEY[0]), &BigUint::from(MODULUS_P));
        assert_eq!(BigUint::from(prf.generate()), base);
    }

    #[test]
    fn test_single_bit_input_uses_matching_key() {
        let mut prf = NaorReingold::new(0b100);
        let modulus = BigUint::from(MODULUS_P);
        let base = BigUint::from(GENERATOR_G).modpow(&BigUint::from(KEY[0]), &modulus);
        let expected = base.modpow(&BigUint::from(KEY[3]), &modulus);
        assert_eq!(BigUint::from(prf.generate()), expected);
    }

    #[test]
    fn test_input_advances_per_word() {
        let mut a = NaorReingold::new(10);
        a.generate();
        let mut b = NaorReingold::new(11);
        assert_eq!(a.generate(), b.generate());
    }
}
