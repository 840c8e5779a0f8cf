//! Camenisch-Lysyanskaya signatures over a base collection.
//!
//! A signature `(A, e, v)` on exponents `m_i` of bases `base_i` satisfies
//! `A^e = Z / (S^v * prod base_i^m_i) mod N` with `e` a prime in `[2^(l_e-1) - 2^(l'_e-1), 2^(l_e-1) + 2^(l'_e-1)]`.
//! Only the signer, knowing `p'q'`, can take the `e`-th root.
//!
//! [`GSSignature::oracle_sign`] signs exponents known to the signer. Signing exponents the signer must not
//! learn goes through [`crate::issuance`]. A signature is [blinded](GSSignature::blind) before being used in
//! a proof of possession so that proofs cannot be linked by `A`.

use crate::{
    base_representation::{BaseCollection, BaseType, KeyBases},
    error::{GraphSigError, VerificationFailure},
    keys::SignerSecretKey,
    setup::KeyGenParameters,
};
use ark_std::{end_timer, rand::RngCore, start_timer};
use gs_crypto_utils::{
    group::{GroupElement, QRGroup},
    impl_canonical_serialization,
    number_theory::{is_probable_prime, random_prime_in_range},
    randomness::{random_integer_with_top_bit, random_unsigned_integer},
    serde_utils::ArkObjectBytes,
};
use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GSSignature {
    #[serde_as(as = "ArkObjectBytes")]
    pub A: GroupElement,
    pub e: BigUint,
    pub v: BigInt,
    /// The signed exponents and their bases
    pub bases: BaseCollection,
}

impl_canonical_serialization!(GSSignature {
    A: ark,
    e: natural,
    v: integer,
    bases: ark,
});

impl GSSignature {
    /// Signs the exponents of `bases`, all of which the signer knows. `v` has exactly `l_v` bits.
    pub fn oracle_sign<R: RngCore, K: KeyBases>(
        rng: &mut R,
        bases: BaseCollection,
        secret_key: &SignerSecretKey,
        public_key: &K,
    ) -> Result<Self, GraphSigError> {
        let signer_key = public_key.signer_public_key();
        secret_key.check_matches(signer_key)?;
        if bases.is_empty() {
            return Err(GraphSigError::EmptyBaseCollection);
        }
        bases
            .check_consistency(public_key)
            .map_err(GraphSigError::InvalidBaseCollection)?;
        let params = &signer_key.params;
        bases.check_message_lengths(params)?;

        let timer = start_timer!(|| "Oracle sign");
        let group = secret_key.group()?;
        let e = random_e(rng, params)?;
        let v = BigInt::from(random_integer_with_top_bit(rng, params.l_v as u64)?);
        let mut terms = bases.terms();
        terms.push((&signer_key.S, &v));
        let A = root_of_quotient(&group, &signer_key.Z, &terms, &e)?;
        end_timer!(timer);
        Ok(Self { A, e, v, bases })
    }

    /// Checks the base collection against the key, that `e` is a prime in range and the signature equation
    pub fn verify<K: KeyBases>(&self, public_key: &K) -> Result<(), GraphSigError> {
        let signer_key = public_key.signer_public_key();
        let params = &signer_key.params;
        self.bases.check_consistency(public_key)?;
        if !params.is_e_in_range(&self.e) {
            return Err(VerificationFailure::EOutOfRange.into());
        }
        if !is_probable_prime(&self.e, params.l_pt) {
            return Err(VerificationFailure::ENotPrime.into());
        }
        let group = signer_key.group();
        if !group.is_element(&self.A) {
            return Err(VerificationFailure::NotAGroupElement.into());
        }
        let mut terms = self.bases.terms();
        terms.push((&signer_key.S, &self.v));
        // Q^ = Z / (S^v * prod base_i^m_i)
        let q_hat = group
            .div(&signer_key.Z, &group.multi_pow(&terms)?)
            .map_err(|_| VerificationFailure::NotAGroupElement)?;
        if group.pow_unsigned(&self.A, &self.e) != q_hat {
            return Err(VerificationFailure::SignatureEquation.into());
        }
        Ok(())
    }

    /// Randomizes the signature as `(A * S^r_A, e, v - e*r_A)` with `r_A` of `l_n + l_statzk` bits. The result
    /// verifies for the same exponents since `(A S^r_A)^e S^(v - e r_A) = A^e S^v`.
    pub fn blind<R: RngCore, K: KeyBases>(
        &self,
        rng: &mut R,
        public_key: &K,
    ) -> Result<Self, GraphSigError> {
        let signer_key = public_key.signer_public_key();
        let r_A = random_unsigned_integer(rng, signer_key.params.blinding_bits());
        let group = signer_key.group();
        let A = group.mul(&self.A, &group.pow_unsigned(&signer_key.S, &r_A));
        let v = &self.v - BigInt::from(&self.e * &r_A);
        Ok(Self {
            A,
            e: self.e.clone(),
            v,
            bases: self.bases.clone(),
        })
    }

    /// `e - 2^(l_e-1)`, the part of `e` hidden in a proof of possession
    pub fn e_offset(&self, params: &KeyGenParameters) -> BigInt {
        BigInt::from(self.e.clone()) - BigInt::from(params.e_offset())
    }

    /// Exponent of the master secret if the signature has one
    pub fn master_secret(&self) -> Option<&BigInt> {
        self.bases.get(BaseType::Base0, 0).map(|r| &r.exponent)
    }
}

/// Prime `e` uniform in `[2^(l_e-1) - 2^(l'_e-1), 2^(l_e-1) + 2^(l'_e-1)]`
pub(crate) fn random_e<R: RngCore>(
    rng: &mut R,
    params: &KeyGenParameters,
) -> Result<BigUint, GraphSigError> {
    Ok(random_prime_in_range(
        rng,
        &params.lower_bound_e(),
        &params.upper_bound_e(),
        params.l_pt,
    )?)
}

/// `Q = Z / prod terms` and `A = Q^(e^-1 mod p'q')`. Returns `A`.
pub(crate) fn root_of_quotient(
    group: &QRGroup,
    Z: &GroupElement,
    terms: &[(&GroupElement, &BigInt)],
    e: &BigUint,
) -> Result<GroupElement, GraphSigError> {
    let Q = quotient(group, Z, terms)?;
    let e_inv = group.invert_exponent(&BigInt::from(e.clone()))?;
    Ok(group.pow_unsigned(&Q, &e_inv))
}

pub(crate) fn quotient(
    group: &QRGroup,
    Z: &GroupElement,
    terms: &[(&GroupElement, &BigInt)],
) -> Result<GroupElement, GraphSigError> {
    Ok(group.div(Z, &group.multi_pow(terms)?)?)
}
