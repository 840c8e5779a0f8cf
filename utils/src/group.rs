//! The group `QR_N` of quadratic residues modulo a special RSA modulus `N = pq`.
//!
//! A [`QRGroup`] either knows only `N`, which is what verifiers and recipients hold, or also the safe prime
//! factorization, which is what the signer holds. Knowing the factorization gives the group order `p'q'`,
//! exact membership testing and exponentiation split over `p` and `q` and recombined with the CRT.
//! Results are identical on both paths so the same code serves both parties.
//!
//! Elements are plain values and all operations go through the group so an element never carries the
//! secret factorization around.

use crate::{
    crt::CrtParams,
    error::GroupError,
    number_theory::{jacobi, mod_inverse, SpecialRsaModulus},
    serde_utils::{deserialize_natural, natural_serialized_size, serialize_natural},
};
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, SerializationError, Valid, Validate,
};
use ark_std::{
    cfg_iter,
    io::{Read, Write},
    rand::RngCore,
    vec::Vec,
};
use num_bigint::{BigInt, BigUint, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Bound on the candidates sampled by [`QRGroup::create_generator`] and [`QRGroup::random_element`]. A random
/// square fails to be a generator with probability about `1/p' + 1/q'`, so this is only reached for broken
/// parameters.
pub const MAX_SAMPLING_ATTEMPTS: usize = 1024;

/// An element of `QR_N` represented by its least non-negative residue.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct GroupElement(pub BigUint);

impl GroupElement {
    pub fn value(&self) -> &BigUint {
        &self.0
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }
}

impl From<BigUint> for GroupElement {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl From<u32> for GroupElement {
    fn from(value: u32) -> Self {
        Self(BigUint::from(value))
    }
}

impl CanonicalSerialize for GroupElement {
    fn serialize_with_mode<W: Write>(
        &self,
        writer: W,
        compress: Compress,
    ) -> Result<(), SerializationError> {
        serialize_natural(&self.0, writer, compress)
    }

    fn serialized_size(&self, compress: Compress) -> usize {
        natural_serialized_size(&self.0, compress)
    }
}

impl Valid for GroupElement {
    fn check(&self) -> Result<(), SerializationError> {
        Ok(())
    }
}

impl CanonicalDeserialize for GroupElement {
    fn deserialize_with_mode<R: Read>(
        reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        deserialize_natural(reader, compress, validate).map(Self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Factorization {
    modulus: SpecialRsaModulus,
    crt: CrtParams,
    /// `p'q'`
    order: BigUint,
}

/// Quadratic residues modulo `N`, optionally with the factorization of `N`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QRGroup {
    modulus: BigUint,
    factorization: Option<Factorization>,
}

impl QRGroup {
    /// Group for a party that only knows the modulus
    pub fn new_n(modulus: BigUint) -> Self {
        Self {
            modulus,
            factorization: None,
        }
    }

    /// Group for the party that generated the modulus
    pub fn new_pq(modulus: SpecialRsaModulus) -> Result<Self, GroupError> {
        let crt = CrtParams::new(modulus.p.p.clone(), modulus.q.p.clone())?;
        let order = modulus.qr_order();
        Ok(Self {
            modulus: modulus.n.clone(),
            factorization: Some(Factorization {
                modulus,
                crt,
                order,
            }),
        })
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn has_factorization(&self) -> bool {
        self.factorization.is_some()
    }

    /// Returns the same group without the factorization, which is what other parties see.
    pub fn public(&self) -> Self {
        Self::new_n(self.modulus.clone())
    }

    /// `p'q'`
    pub fn order(&self) -> Result<&BigUint, GroupError> {
        self.factorization
            .as_ref()
            .map(|f| &f.order)
            .ok_or(GroupError::FactorizationUnknown)
    }

    pub fn identity(&self) -> GroupElement {
        GroupElement(BigUint::one())
    }

    /// Reduce an arbitrary natural number modulo `N`. The result is in `QR_N` only if the input was.
    pub fn element(&self, value: &BigUint) -> GroupElement {
        GroupElement(value % &self.modulus)
    }

    pub fn mul(&self, a: &GroupElement, b: &GroupElement) -> GroupElement {
        GroupElement((&a.0 * &b.0) % &self.modulus)
    }

    pub fn inverse(&self, a: &GroupElement) -> Result<GroupElement, GroupError> {
        mod_inverse(&BigInt::from(a.0.clone()), &self.modulus).map(GroupElement)
    }

    /// `a * b^-1`
    pub fn div(&self, a: &GroupElement, b: &GroupElement) -> Result<GroupElement, GroupError> {
        Ok(self.mul(a, &self.inverse(b)?))
    }

    pub fn pow_unsigned(&self, base: &GroupElement, exponent: &BigUint) -> GroupElement {
        match self.crt_pow(base, &BigInt::from(exponent.clone())) {
            Some(r) => r,
            None => GroupElement(base.0.modpow(exponent, &self.modulus)),
        }
    }

    /// `base^exponent` where a negative exponent means a power of the inverse. Fails only when the exponent
    /// is negative and `base` is not a unit.
    pub fn pow(&self, base: &GroupElement, exponent: &BigInt) -> Result<GroupElement, GroupError> {
        if let Some(r) = self.crt_pow(base, exponent) {
            return Ok(r);
        }
        let (sign, magnitude) = (exponent.sign(), exponent.magnitude());
        if sign == Sign::Minus {
            let inv = self.inverse(base)?;
            Ok(GroupElement(inv.0.modpow(magnitude, &self.modulus)))
        } else {
            Ok(GroupElement(base.0.modpow(magnitude, &self.modulus)))
        }
    }

    /// `prod_i bases_i^exponents_i`. The powers are computed in parallel with the `parallel` feature.
    pub fn multi_pow(
        &self,
        terms: &[(&GroupElement, &BigInt)],
    ) -> Result<GroupElement, GroupError> {
        let powers = cfg_iter!(terms)
            .map(|(b, e)| self.pow(b, e))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(powers
            .iter()
            .fold(self.identity(), |acc, x| self.mul(&acc, x)))
    }

    /// Exponentiation modulo `p` and `q` separately. Exponents are reduced modulo `p-1` and `q-1` which
    /// handles negative exponents without an inversion. Returns `None` when the factorization is unknown or
    /// `base` shares a factor with `N`, in which case the caller uses plain exponentiation.
    fn crt_pow(&self, base: &GroupElement, exponent: &BigInt) -> Option<GroupElement> {
        let f = self.factorization.as_ref()?;
        let p = &f.crt.p;
        let q = &f.crt.q;
        let b_p = &base.0 % p;
        let b_q = &base.0 % q;
        if b_p.is_zero() || b_q.is_zero() {
            return None;
        }
        let e_p = exponent
            .mod_floor(&BigInt::from(p - 1u32))
            .into_parts()
            .1;
        let e_q = exponent
            .mod_floor(&BigInt::from(q - 1u32))
            .into_parts()
            .1;
        let r_p = b_p.modpow(&e_p, p);
        let r_q = b_q.modpow(&e_q, q);
        Some(GroupElement(f.crt.combine(&r_p, &r_q)))
    }

    /// Membership test. With the factorization this is exact: `x` is a unit whose Legendre symbols modulo
    /// `p` and `q` are both 1. Without it, only the Jacobi symbol modulo `N` can be checked, which also
    /// accepts non-residues modulo both primes.
    pub fn is_element(&self, x: &GroupElement) -> bool {
        if x.0.is_zero() || x.0 >= self.modulus {
            return false;
        }
        match &self.factorization {
            Some(f) => {
                jacobi(&x.0, &f.modulus.p.p) == 1 && jacobi(&x.0, &f.modulus.q.p) == 1
            }
            None => jacobi(&x.0, &self.modulus) == 1,
        }
    }

    /// Random element of `QR_N` other than 1, as the square of a random unit.
    pub fn random_element<R: RngCore>(&self, rng: &mut R) -> Result<GroupElement, GroupError> {
        let low = BigUint::from(2u32);
        for _ in 0..MAX_SAMPLING_ATTEMPTS {
            let x = rng.gen_biguint_range(&low, &self.modulus);
            if !x.gcd(&self.modulus).is_one() {
                continue;
            }
            let candidate = GroupElement(x.modpow(&low, &self.modulus));
            if !candidate.is_one() {
                return Ok(candidate);
            }
        }
        Err(GroupError::RetryLimitExceeded(MAX_SAMPLING_ATTEMPTS))
    }

    /// Returns true if `g` has maximal order `p'q'`. Needs the factorization.
    pub fn is_generator(&self, g: &GroupElement) -> Result<bool, GroupError> {
        let f = self
            .factorization
            .as_ref()
            .ok_or(GroupError::FactorizationUnknown)?;
        if g.is_one() || !self.is_element(g) {
            return Ok(false);
        }
        // The order of `g` divides `p'q'` so it is maximal iff neither `g^p'` nor `g^q'` is 1
        Ok(!self.pow_unsigned(g, &f.modulus.p.p_prime).is_one()
            && !self.pow_unsigned(g, &f.modulus.q.p_prime).is_one())
    }

    /// Sample `x` in `[2, p'q' - 1]` and return `x^2 mod N` once it generates `QR_N`. Needs the factorization.
    pub fn create_generator<R: RngCore>(&self, rng: &mut R) -> Result<GroupElement, GroupError> {
        let order = self.order()?;
        let low = BigUint::from(2u32);
        for _ in 0..MAX_SAMPLING_ATTEMPTS {
            let x = rng.gen_biguint_range(&low, order);
            let candidate = GroupElement(x.modpow(&low, &self.modulus));
            if self.is_generator(&candidate)? {
                return Ok(candidate);
            }
        }
        Err(GroupError::RetryLimitExceeded(MAX_SAMPLING_ATTEMPTS))
    }

    /// Uniform exponent in `[2, p'q' - 1]`. Needs the factorization.
    pub fn random_exponent<R: RngCore>(&self, rng: &mut R) -> Result<BigUint, GroupError> {
        let order = self.order()?;
        Ok(rng.gen_biguint_range(&BigUint::from(2u32), order))
    }

    /// `a^-1 mod p'q'`, e.g. the root taken by the signer. Needs the factorization.
    pub fn invert_exponent(&self, a: &BigInt) -> Result<BigUint, GroupError> {
        let f = self
            .factorization
            .as_ref()
            .ok_or(GroupError::FactorizationUnknown)?;
        let p_prime = &f.modulus.p.p_prime;
        let q_prime = &f.modulus.q.p_prime;
        let inv_p = mod_inverse(a, p_prime)?;
        let inv_q = mod_inverse(a, q_prime)?;
        crate::crt::compute_crt(&inv_p, p_prime, &inv_q, q_prime)
    }
}
