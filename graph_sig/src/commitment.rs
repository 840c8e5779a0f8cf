//! Multi-base commitments `C = S^r * prod base_i^m_i mod N`.
//!
//! A commitment holds its opening, the exponents in the base collection and the randomness `r`. What is sent
//! to another party is the [`GSCommitment::public_clone`], which keeps the structure and value only.

use crate::{
    base_representation::{BaseCollection, KeyBases},
    error::{GraphSigError, VerificationFailure},
};
use ark_std::{rand::RngCore, vec::Vec};
use gs_crypto_utils::{
    group::GroupElement, impl_canonical_serialization, randomness::random_signed_integer,
    serde_utils::ArkObjectBytes,
};
use num_bigint::BigInt;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GSCommitment {
    pub bases: BaseCollection,
    pub randomness: BigInt,
    #[serde_as(as = "ArkObjectBytes")]
    pub value: GroupElement,
}

impl_canonical_serialization!(GSCommitment {
    bases: ark,
    randomness: integer,
    value: ark,
});

impl GSCommitment {
    /// Commits to the exponents of `bases` with the given randomness. Every base must be the key's base for
    /// its slot and used at most once.
    pub fn create<K: KeyBases>(
        bases: BaseCollection,
        randomness: BigInt,
        public_key: &K,
    ) -> Result<Self, GraphSigError> {
        if bases.is_empty() {
            return Err(GraphSigError::EmptyBaseCollection);
        }
        bases
            .check_consistency(public_key)
            .map_err(GraphSigError::InvalidBaseCollection)?;
        let value = compute_value(&bases, &randomness, public_key)?;
        Ok(Self {
            bases,
            randomness,
            value,
        })
    }

    /// Commits with randomness drawn from `±2^(l_n + l_statzk)`
    pub fn create_random<R: RngCore, K: KeyBases>(
        rng: &mut R,
        bases: BaseCollection,
        public_key: &K,
    ) -> Result<Self, GraphSigError> {
        let randomness = random_signed_integer(rng, public_key.params().blinding_bits());
        Self::create(bases, randomness, public_key)
    }

    /// Same value and structure with every exponent and the randomness set to 0
    pub fn public_clone(&self) -> Self {
        Self {
            bases: self.bases.public_clone(),
            randomness: BigInt::zero(),
            value: self.value.clone(),
        }
    }

    /// Compares only the committed value, which is all that two parties can compare
    pub fn same_value(&self, other: &Self) -> bool {
        self.value == other.value
    }

    /// Recomputes the value from the opening and checks it matches
    pub fn verify_opening<K: KeyBases>(&self, public_key: &K) -> Result<(), GraphSigError> {
        self.bases
            .check_consistency(public_key)
            .map_err(GraphSigError::InvalidBaseCollection)?;
        if compute_value(&self.bases, &self.randomness, public_key)? != self.value {
            return Err(VerificationFailure::CommitmentMismatch.into());
        }
        Ok(())
    }
}

fn compute_value<K: KeyBases>(
    bases: &BaseCollection,
    randomness: &BigInt,
    public_key: &K,
) -> Result<GroupElement, GraphSigError> {
    let signer_key = public_key.signer_public_key();
    let mut terms = Vec::with_capacity(bases.len() + 1);
    terms.push((&signer_key.S, randomness));
    terms.extend(bases.terms());
    Ok(signer_key.group().multi_pow(&terms)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        base_representation::{BaseRepresentation, BaseType},
        test_serialization,
        tests::extended_key_pair,
    };
    use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use num_bigint::RandBigInt;

    #[test]
    fn commit_and_open() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let key_pair = extended_key_pair();
        let pk = &key_pair.public_key;
        let l_m = pk.signer_key.params.l_m as u64;

        let mut bases = BaseCollection::new();
        for i in 1..=3 {
            let m = BigInt::from(rng.gen_biguint(l_m));
            bases.add(BaseRepresentation::from_key(pk, BaseType::BaseR, i, m).unwrap());
        }
        let commitment = GSCommitment::create_random(&mut rng, bases.clone(), pk).unwrap();
        commitment.verify_opening(pk).unwrap();

        // Value computed with the secret discrete logs: S^(r + sum x_i*m_i)
        let sk = &key_pair.secret_key;
        let mut exponent = commitment.randomness.clone();
        for r in bases.iter() {
            exponent += BigInt::from(sk.discrete_logs[r.base_index - 1].clone()) * &r.exponent;
        }
        let group = sk.group().unwrap();
        assert_eq!(
            group.pow(&pk.signer_key.S, &exponent).unwrap(),
            commitment.value
        );

        let again = GSCommitment::create(bases.clone(), commitment.randomness.clone(), pk).unwrap();
        assert_eq!(again, commitment);

        let public = commitment.public_clone();
        assert!(public.same_value(&commitment));
        assert_ne!(public, commitment);
        assert!(public.randomness.is_zero());
        assert!(public.bases.iter().all(|r| r.exponent.is_zero()));
        // The public clone cannot be opened
        assert!(matches!(
            public.verify_opening(pk),
            Err(GraphSigError::Verification(VerificationFailure::CommitmentMismatch))
        ));

        let other = GSCommitment::create_random(&mut rng, bases, pk).unwrap();
        assert!(!other.same_value(&commitment));

        test_serialization!(GSCommitment, commitment);
    }

    #[test]
    fn invalid_commitments() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let key_pair = extended_key_pair();
        let pk = &key_pair.public_key;

        assert!(matches!(
            GSCommitment::create_random(&mut rng, BaseCollection::new(), pk),
            Err(GraphSigError::EmptyBaseCollection)
        ));

        let mut bases = BaseCollection::new();
        bases.add(BaseRepresentation::from_key(pk, BaseType::Base0, 0, BigInt::from(3)).unwrap());
        bases.add(BaseRepresentation::from_key(pk, BaseType::Base0, 0, BigInt::from(4)).unwrap());
        assert!(matches!(
            GSCommitment::create_random(&mut rng, bases, pk),
            Err(GraphSigError::InvalidBaseCollection(
                VerificationFailure::DuplicateBase0
            ))
        ));

        let mut bases = BaseCollection::new();
        bases.add(BaseRepresentation::from_key(pk, BaseType::Vertex, 1, BigInt::from(3)).unwrap());
        let mut commitment = GSCommitment::create_random(&mut rng, bases, pk).unwrap();
        commitment.randomness += 1u32;
        assert!(matches!(
            commitment.verify_opening(pk),
            Err(GraphSigError::Verification(VerificationFailure::CommitmentMismatch))
        ));
    }
}
