//! Bit length parameters of the scheme.
//!
//! [`KeyGenParameters`] fix the sizes of the modulus, messages, signature values and the statistical
//! security of all proofs. [`GraphEncodingParameters`] fix how many vertices, edges and labels a signed
//! graph can have and the sizes of their prime representatives. Both are validated before any key material
//! is generated.

use crate::error::GraphSigError;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{format, string::String};
use num_bigint::{BigInt, BigUint};
use num_traits::One;
use serde::{Deserialize, Serialize};
use sigma_pok::{context::GSContext, statement::ProofParameters};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
)]
pub struct KeyGenParameters {
    /// Bit length of the special RSA modulus `N`
    pub l_n: u32,
    /// Bit length of the order of the commitment group
    pub l_gamma: u32,
    /// Bit length of the prime order subgroup of the commitment group
    pub l_rho: u32,
    /// Maximum bit length of a message exponent
    pub l_m: u32,
    /// Number of reserved messages
    pub l_res: u32,
    /// Bit length of the signature's `e` before the offset
    pub l_e: u32,
    /// Bit length of the interval `e` is chosen from
    pub l_prime_e: u32,
    /// Bit length of the signature's `v`
    pub l_v: u32,
    /// Statistical zero-knowledge security parameter
    pub l_statzk: u32,
    /// Bit length of hash outputs and challenges
    pub l_H: u32,
    pub l_r: u32,
    /// Error bits of the primality test
    pub l_pt: u32,
}

impl Default for KeyGenParameters {
    fn default() -> Self {
        Self {
            l_n: 2048,
            l_gamma: 1632,
            l_rho: 256,
            l_m: 256,
            l_res: 1,
            l_e: 597,
            l_prime_e: 120,
            l_v: 2724,
            l_statzk: 80,
            l_H: 256,
            l_r: 80,
            l_pt: 80,
        }
    }
}

fn invalid_key_gen(reason: String) -> GraphSigError {
    GraphSigError::InvalidKeyGenParameters(reason)
}

impl KeyGenParameters {
    pub fn validate(&self) -> Result<(), GraphSigError> {
        let all = [
            self.l_n,
            self.l_gamma,
            self.l_rho,
            self.l_m,
            self.l_res,
            self.l_e,
            self.l_prime_e,
            self.l_v,
            self.l_statzk,
            self.l_H,
            self.l_r,
            self.l_pt,
        ];
        if all.contains(&0) {
            return Err(invalid_key_gen(format!("all bit lengths must be positive: {:?}", all)));
        }
        if self.l_n % 2 != 0 {
            return Err(invalid_key_gen(format!("l_n = {} must be even", self.l_n)));
        }
        if !(self.l_rho <= self.l_gamma && self.l_gamma <= self.l_n) {
            return Err(invalid_key_gen(format!(
                "need l_rho <= l_gamma <= l_n but got {}, {}, {}",
                self.l_rho, self.l_gamma, self.l_n
            )));
        }
        // Widening to u64 so that sums of large parameters cannot overflow
        let (l_n, l_m, l_res, l_e, l_prime_e, l_v, l_statzk, l_H) = (
            self.l_n as u64,
            self.l_m as u64,
            self.l_res as u64,
            self.l_e as u64,
            self.l_prime_e as u64,
            self.l_v as u64,
            self.l_statzk as u64,
            self.l_H as u64,
        );
        if l_prime_e + 2 >= l_e {
            return Err(invalid_key_gen(format!(
                "need l'_e + 2 < l_e but got l'_e = {}, l_e = {}",
                l_prime_e, l_e
            )));
        }
        let min_e = l_statzk + l_H + (l_m + 4).max(l_prime_e + 2);
        if l_e <= min_e {
            return Err(invalid_key_gen(format!(
                "need l_e > l_statzk + l_H + max(l_m + 4, l'_e + 2) = {} but got {}",
                min_e, l_e
            )));
        }
        let min_v = l_n + l_statzk + l_H + (l_m + l_res + 3).max(l_statzk + 2);
        if l_v < min_v {
            return Err(invalid_key_gen(format!(
                "need l_v >= l_n + l_statzk + l_H + max(l_m + l_res + 3, l_statzk + 2) = {} but got {}",
                min_v, l_v
            )));
        }
        Ok(())
    }

    pub fn proof_parameters(&self) -> ProofParameters {
        ProofParameters {
            l_statzk: self.l_statzk,
            l_H: self.l_H,
        }
    }

    /// `2^(l_e - 1)`, the center of the interval `e` is chosen from
    pub fn e_offset(&self) -> BigUint {
        BigUint::one() << (self.l_e - 1)
    }

    /// `2^(l_e - 1) - 2^(l'_e - 1)`
    pub fn lower_bound_e(&self) -> BigUint {
        self.e_offset() - (BigUint::one() << (self.l_prime_e - 1))
    }

    /// `2^(l_e - 1) + 2^(l'_e - 1)`
    pub fn upper_bound_e(&self) -> BigUint {
        self.e_offset() + (BigUint::one() << (self.l_prime_e - 1))
    }

    pub fn is_e_in_range(&self, e: &BigUint) -> bool {
        e >= &self.lower_bound_e() && e <= &self.upper_bound_e()
    }

    /// Bit length of the randomness `r_A` used to blind a signature and of the recipient's `v'` in issuance
    pub fn blinding_bits(&self) -> u64 {
        self.l_n as u64 + self.l_statzk as u64
    }

    /// Bound on `|v|` of a blinded signature, `v - e*r_A`
    pub fn blinded_v_bits(&self) -> u64 {
        (self.l_v as u64).max(self.l_e as u64 + self.blinding_bits()) + 1
    }

    /// Returns true if `|m| <= 2^l_m`
    pub fn is_message_in_range(&self, m: &BigInt) -> bool {
        gs_crypto_utils::randomness::is_within_symmetric_range(m, self.l_m as u64)
    }

    /// Writes the parameters in declaration order
    pub fn append_to_context(&self, context: &mut GSContext) {
        for x in [
            self.l_n,
            self.l_gamma,
            self.l_rho,
            self.l_m,
            self.l_res,
            self.l_e,
            self.l_prime_e,
            self.l_v,
            self.l_statzk,
            self.l_H,
            self.l_r,
            self.l_pt,
        ] {
            context.append_u32(x);
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
)]
pub struct GraphEncodingParameters {
    /// Maximum number of vertices
    pub l_V: u32,
    /// Bit length of a vertex representative
    pub l_prime_V: u32,
    /// Maximum number of edges
    pub l_E: u32,
    /// Number of labels
    pub l_L: u32,
    /// Bit length of a label representative
    pub l_prime_L: u32,
}

impl Default for GraphEncodingParameters {
    fn default() -> Self {
        Self {
            l_V: 1000,
            l_prime_V: 120,
            l_E: 50000,
            l_L: 256,
            l_prime_L: 16,
        }
    }
}

impl GraphEncodingParameters {
    pub fn validate(&self) -> Result<(), GraphSigError> {
        let all = [self.l_V, self.l_prime_V, self.l_E, self.l_L, self.l_prime_L];
        if all.contains(&0) {
            return Err(GraphSigError::InvalidGraphEncodingParameters(format!(
                "all parameters must be positive: {:?}",
                all
            )));
        }
        if self.l_prime_L < 2 {
            return Err(GraphSigError::InvalidGraphEncodingParameters(format!(
                "l'_L = {} leaves no primes",
                self.l_prime_L
            )));
        }
        // Different lengths keep vertex and label representatives distinct
        if self.l_prime_V <= self.l_prime_L {
            return Err(GraphSigError::InvalidGraphEncodingParameters(format!(
                "need l'_V > l'_L but got {} and {}",
                self.l_prime_V, self.l_prime_L
            )));
        }
        Ok(())
    }

    /// Number of bases `R_1..R_k` needed, one per vertex slot and one per edge slot
    pub fn num_bases(&self) -> usize {
        self.l_V as usize + self.l_E as usize
    }

    /// Index of the base of the first edge slot
    pub fn first_edge_index(&self) -> usize {
        self.l_V as usize + 1
    }

    pub fn append_to_context(&self, context: &mut GSContext) {
        for x in [self.l_V, self.l_prime_V, self.l_E, self.l_L, self.l_prime_L] {
            context.append_u32(x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{test_graph_params, test_params};

    #[test]
    fn defaults_and_test_parameters_are_valid() {
        KeyGenParameters::default().validate().unwrap();
        GraphEncodingParameters::default().validate().unwrap();
        test_params().validate().unwrap();
        test_graph_params().validate().unwrap();
    }

    #[test]
    fn contradictory_key_gen_parameters() {
        let valid = KeyGenParameters::default();
        let check = |p: KeyGenParameters| {
            assert!(matches!(
                p.validate(),
                Err(GraphSigError::InvalidKeyGenParameters(_))
            ))
        };
        check(KeyGenParameters { l_n: 2047, ..valid });
        check(KeyGenParameters { l_m: 0, ..valid });
        check(KeyGenParameters { l_gamma: 4096, ..valid });
        check(KeyGenParameters { l_rho: 2000, ..valid });
        check(KeyGenParameters { l_prime_e: 595, ..valid });
        check(KeyGenParameters { l_e: 596, ..valid });
        check(KeyGenParameters { l_v: 2643, ..valid });
        // l_v exactly at its lower bound is fine
        KeyGenParameters { l_v: 2644, ..valid }.validate().unwrap();
        KeyGenParameters { l_e: 597, ..valid }.validate().unwrap();
    }

    #[test]
    fn contradictory_graph_parameters() {
        let valid = GraphEncodingParameters::default();
        for p in [
            GraphEncodingParameters { l_V: 0, ..valid },
            GraphEncodingParameters { l_prime_L: 1, ..valid },
            GraphEncodingParameters { l_prime_V: 16, ..valid },
        ] {
            assert!(matches!(
                p.validate(),
                Err(GraphSigError::InvalidGraphEncodingParameters(_))
            ));
        }
        assert_eq!(valid.num_bases(), 51000);
        assert_eq!(valid.first_edge_index(), 1001);
    }

    #[test]
    fn e_interval() {
        let p = KeyGenParameters::default();
        assert_eq!(p.upper_bound_e() - p.lower_bound_e(), BigUint::one() << 120u32);
        assert_eq!(p.upper_bound_e().bits(), 597);
        assert_eq!(p.lower_bound_e().bits(), 596);
        assert!(p.is_e_in_range(&p.e_offset()));
        assert!(!p.is_e_in_range(&(p.upper_bound_e() + 1u32)));
        assert!(!p.is_e_in_range(&(p.lower_bound_e() - 1u32)));
    }

    #[test]
    fn context_contribution() {
        let mut a = GSContext::new(b"params");
        KeyGenParameters::default().append_to_context(&mut a);
        let mut b = GSContext::new(b"params");
        KeyGenParameters {
            l_pt: 81,
            ..KeyGenParameters::default()
        }
        .append_to_context(&mut b);
        assert_eq!(a.as_bytes().len(), b.as_bytes().len());
        assert_ne!(a.as_bytes(), b.as_bytes());
    }
}
