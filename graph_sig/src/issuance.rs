//! Interactive issuance of a signature on a hidden master secret and messages chosen by the signer.
//!
//! 1. The signer opens a [`SignerSession`] and sends its nonce `n_1` to the recipient.
//! 2. The recipient commits to its master secret as `U = R_0^msk * S^v'` with `v'` from `±2^(l_n + l_statzk)`
//!    and proves knowledge of `msk` and `v'` in a proof bound to the key, `U` and `n_1`. It sends `U`, the proof
//!    and its own nonce `n_2` as a [`RecipientCommitment`].
//! 3. The signer checks the proof, picks a prime `e` and `v''` of `l_v` bits and computes
//!    `A = (Z / (U * S^v'' * prod R_i^m_i))^(1/e)`. It proves that `A` was computed as such, without
//!    revealing `p'q'`, in a proof bound to `n_2` and sends everything as an [`IssuanceResponse`].
//! 4. The recipient checks `e` and the signer's proof and completes the signature with `v = v' + v''` and
//!    `msk` on `R_0`.
//!
//! Both sessions are consumed by their last step so neither party can answer twice with the same state.

use crate::{
    base_representation::{BaseCollection, BaseRepresentation, BaseType, KeyBases},
    error::{GraphSigError, VerificationFailure},
    keys::SignerSecretKey,
    signature::{quotient, random_e, GSSignature},
};
use ark_serialize::SerializationError;
use ark_std::{end_timer, rand::RngCore, start_timer, vec};
use digest::Digest;
use gs_crypto_utils::{
    group::{GroupElement, QRGroup},
    impl_canonical_serialization,
    number_theory::is_probable_prime,
    randomness::{random_integer_with_top_bit, random_signed_integer, random_unsigned_integer},
    serde_utils::ArkObjectBytes,
};
use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use sigma_pok::{
    context::GSContext,
    orchestrator::{ProverOrchestrator, VerifierOrchestrator},
    proof::ProofSignature,
    statement::SigmaStatement,
};

pub const ISSUANCE_COMMITMENT_LABEL: &[u8] = b"GS-IssuanceCommitment";
pub const SIGNATURE_CORRECTNESS_LABEL: &[u8] = b"GS-SignatureCorrectness";

const MASTER_SECRET: &str = "msk";
const V_PRIME: &str = "v_prime";

/// The recipient's commitment to its master secret with a proof of knowledge of the opening
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientCommitment {
    #[serde_as(as = "ArkObjectBytes")]
    pub U: GroupElement,
    pub proof: ProofSignature,
    /// `n_2`
    pub nonce: BigUint,
}

impl_canonical_serialization!(RecipientCommitment {
    U: ark,
    proof: ark,
    nonce: natural,
});

/// Proof that `A = Q^(1/e)`: `c' = H(Q, A, Q^r, n_2)` and `s_e = r - c' * e^-1 mod p'q'`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureCorrectnessProof {
    pub challenge: BigUint,
    pub response: BigUint,
}

impl_canonical_serialization!(SignatureCorrectnessProof {
    challenge: natural,
    response: natural,
});

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceResponse {
    #[serde_as(as = "ArkObjectBytes")]
    pub A: GroupElement,
    pub e: BigUint,
    /// `v''`
    pub v: BigUint,
    /// The messages chosen by the signer
    pub bases: BaseCollection,
    pub proof: SignatureCorrectnessProof,
}

impl_canonical_serialization!(IssuanceResponse {
    A: ark,
    e: natural,
    v: natural,
    bases: ark,
    proof: ark,
});

pub struct SignerSession<'a, K: KeyBases> {
    secret_key: &'a SignerSecretKey,
    public_key: &'a K,
    nonce: BigUint,
}

pub struct RecipientSession<'a, K: KeyBases> {
    public_key: &'a K,
    master_secret: BigInt,
    v_prime: BigInt,
    U: GroupElement,
    nonce: BigUint,
}

fn random_nonce<R: RngCore, K: KeyBases>(rng: &mut R, public_key: &K) -> BigUint {
    random_unsigned_integer(rng, public_key.params().l_H as u64)
}

/// `U = R_0^msk * S^v'`
fn commitment_statement<K: KeyBases>(
    public_key: &K,
    group: QRGroup,
    U: &GroupElement,
) -> Result<SigmaStatement, GraphSigError> {
    let signer_key = public_key.signer_public_key();
    let params = &signer_key.params;
    let mut statement = SigmaStatement::new(group);
    statement.add_secret(MASTER_SECRET, params.l_m as u64)?;
    statement.add_secret(V_PRIME, params.blinding_bits())?;
    statement.add_relation(
        U.clone(),
        vec![
            (signer_key.R_0.clone(), MASTER_SECRET),
            (signer_key.S.clone(), V_PRIME),
        ],
    )?;
    Ok(statement)
}

fn commitment_context<K: KeyBases>(
    public_key: &K,
    U: &GroupElement,
    signer_nonce: &BigUint,
) -> Result<GSContext, SerializationError> {
    let mut context = GSContext::new(ISSUANCE_COMMITMENT_LABEL);
    public_key.append_to_context(&mut context)?;
    context.append_element(U)?;
    context.append_natural(signer_nonce)?;
    Ok(context)
}

fn correctness_challenge<K: KeyBases, D: Digest>(
    public_key: &K,
    Q: &GroupElement,
    A: &GroupElement,
    A_tilde: &GroupElement,
    recipient_nonce: &BigUint,
) -> Result<BigUint, SerializationError> {
    let mut context = GSContext::new(SIGNATURE_CORRECTNESS_LABEL);
    public_key.append_to_context(&mut context)?;
    context.append_elements([Q, A, A_tilde])?;
    context.append_natural(recipient_nonce)?;
    Ok(context.challenge::<D>(public_key.params().l_H))
}

impl<'a, K: KeyBases> SignerSession<'a, K> {
    pub fn new<R: RngCore>(
        rng: &mut R,
        secret_key: &'a SignerSecretKey,
        public_key: &'a K,
    ) -> Result<Self, GraphSigError> {
        secret_key.check_matches(public_key.signer_public_key())?;
        Ok(Self {
            secret_key,
            public_key,
            nonce: random_nonce(rng, public_key),
        })
    }

    /// `n_1`, sent to the recipient
    pub fn nonce(&self) -> &BigUint {
        &self.nonce
    }

    /// Checks the recipient's commitment and signs it together with `messages`, which must not use `R_0`
    pub fn sign<R: RngCore, D: Digest>(
        self,
        rng: &mut R,
        commitment: &RecipientCommitment,
        messages: BaseCollection,
    ) -> Result<IssuanceResponse, GraphSigError> {
        let signer_key = self.public_key.signer_public_key();
        let params = &signer_key.params;
        if messages.contains_type(BaseType::Base0) {
            return Err(GraphSigError::Base0NotAllowed);
        }
        messages
            .check_consistency(self.public_key)
            .map_err(GraphSigError::InvalidBaseCollection)?;
        messages.check_message_lengths(params)?;

        let group = self.secret_key.group()?;
        if !group.is_element(&commitment.U) {
            return Err(VerificationFailure::NotAGroupElement.into());
        }
        let statement = commitment_statement(self.public_key, group.clone(), &commitment.U)?;
        VerifierOrchestrator::<D>::new(
            &statement,
            params.proof_parameters(),
            commitment_context(self.public_key, &commitment.U, &self.nonce)?,
        )
        .verify(&commitment.proof)?;

        let timer = start_timer!(|| "Sign recipient commitment");
        let e = random_e(rng, params)?;
        let v = random_integer_with_top_bit(rng, params.l_v as u64)?;
        let v_int = BigInt::from(v.clone());
        let one = BigInt::from(1u32);
        let mut terms = messages.terms();
        terms.push((&signer_key.S, &v_int));
        terms.push((&commitment.U, &one));
        let Q = quotient(&group, &signer_key.Z, &terms)?;
        let order = group.order()?;
        let e_inv = group.invert_exponent(&BigInt::from(e.clone()))?;
        let A = group.pow_unsigned(&Q, &e_inv);

        let r = rng.gen_biguint_below(order);
        let A_tilde = group.pow_unsigned(&Q, &r);
        let challenge =
            correctness_challenge::<K, D>(self.public_key, &Q, &A, &A_tilde, &commitment.nonce)?;
        // r - c' * e^-1 mod p'q'
        let response = (BigInt::from(r) - BigInt::from(&challenge * &e_inv))
            .mod_floor(&BigInt::from(order.clone()))
            .into_parts()
            .1;
        end_timer!(timer);

        Ok(IssuanceResponse {
            A,
            e,
            v,
            bases: messages,
            proof: SignatureCorrectnessProof {
                challenge,
                response,
            },
        })
    }
}

impl<'a, K: KeyBases> RecipientSession<'a, K> {
    /// Commits to `master_secret`, which must fit in `l_m` bits, in response to the signer's nonce
    pub fn commit<R: RngCore, D: Digest>(
        rng: &mut R,
        public_key: &'a K,
        master_secret: BigInt,
        signer_nonce: &BigUint,
    ) -> Result<(Self, RecipientCommitment), GraphSigError> {
        let signer_key = public_key.signer_public_key();
        let params = &signer_key.params;
        if !params.is_message_in_range(&master_secret) {
            return Err(GraphSigError::MessageTooLong(0));
        }
        let group = signer_key.group();
        let v_prime = random_signed_integer(rng, params.blinding_bits());
        let U = group.multi_pow(&[(&signer_key.R_0, &master_secret), (&signer_key.S, &v_prime)])?;

        let statement = commitment_statement(public_key, group, &U)?;
        let proof = ProverOrchestrator::<D>::new(
            &statement,
            params.proof_parameters(),
            commitment_context(public_key, &U, signer_nonce)?,
        )
        .prove(
            rng,
            vec![
                (MASTER_SECRET, master_secret.clone()),
                (V_PRIME, v_prime.clone()),
            ],
        )?;
        let nonce = random_nonce(rng, public_key);
        let commitment = RecipientCommitment {
            U: U.clone(),
            proof,
            nonce: nonce.clone(),
        };
        Ok((
            Self {
                public_key,
                master_secret,
                v_prime,
                U,
                nonce,
            },
            commitment,
        ))
    }

    /// Checks the signer's response and returns the signature on the master secret and the signer's messages
    pub fn complete<D: Digest>(
        self,
        response: IssuanceResponse,
    ) -> Result<GSSignature, GraphSigError> {
        let signer_key = self.public_key.signer_public_key();
        let params = &signer_key.params;
        if response.bases.contains_type(BaseType::Base0) {
            return Err(VerificationFailure::DuplicateBase0.into());
        }
        response.bases.check_consistency(self.public_key)?;
        if !params.is_e_in_range(&response.e) {
            return Err(VerificationFailure::EOutOfRange.into());
        }
        if !is_probable_prime(&response.e, params.l_pt) {
            return Err(VerificationFailure::ENotPrime.into());
        }
        let group = signer_key.group();
        if !group.is_element(&response.A) {
            return Err(VerificationFailure::NotAGroupElement.into());
        }

        // A^(c' + s_e*e) = Q^r for an honest signer
        let v_double_prime = BigInt::from(response.v.clone());
        let one = BigInt::from(1u32);
        let mut terms = response.bases.terms();
        terms.push((&signer_key.S, &v_double_prime));
        terms.push((&self.U, &one));
        let Q = quotient(&group, &signer_key.Z, &terms)
            .map_err(|_| VerificationFailure::NotAGroupElement)?;
        let proof = &response.proof;
        let A_hat = group.pow_unsigned(
            &response.A,
            &(&proof.challenge + &proof.response * &response.e),
        );
        let challenge =
            correctness_challenge::<K, D>(self.public_key, &Q, &response.A, &A_hat, &self.nonce)?;
        if challenge != proof.challenge {
            return Err(VerificationFailure::SignerProofMismatch.into());
        }

        let mut bases = BaseCollection::new();
        bases.add(BaseRepresentation::from_key(
            self.public_key,
            BaseType::Base0,
            0,
            self.master_secret,
        )?);
        for r in response.bases.iter() {
            bases.add(r.clone());
        }
        let signature = GSSignature {
            A: response.A,
            e: response.e,
            v: self.v_prime + v_double_prime,
            bases,
        };
        signature.verify(self.public_key)?;
        Ok(signature)
    }

    /// `n_2`
    pub fn nonce(&self) -> &BigUint {
        &self.nonce
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_serialization,
        tests::{extended_key_pair, signer_key_pair},
    };
    use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use blake2::Blake2b512;
    use num_traits::One;
    use sha2::Sha256;
    use std::time::Instant;

    fn signer_messages<K: KeyBases>(rng: &mut StdRng, pk: &K, indices: &[usize]) -> BaseCollection {
        let l_m = pk.params().l_m as u64;
        let mut bases = BaseCollection::new();
        for i in indices {
            let m = BigInt::from(rng.gen_biguint(l_m));
            bases.add(BaseRepresentation::from_key(pk, BaseType::BaseR, *i, m).unwrap());
        }
        bases
    }

    fn issue<D: Digest>() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let key_pair = extended_key_pair();
        let pk = &key_pair.public_key;
        let sk = &key_pair.secret_key.signer_key;
        let msk = BigInt::from(rng.gen_biguint(pk.signer_key.params.l_m as u64));

        let start = Instant::now();
        let signer = SignerSession::new(&mut rng, sk, pk).unwrap();
        let (recipient, commitment) =
            RecipientSession::commit::<_, D>(&mut rng, pk, msk.clone(), signer.nonce()).unwrap();
        assert_eq!(recipient.nonce(), &commitment.nonce);
        let messages = signer_messages(&mut rng, pk, &[1, 2, 7]);
        let response = signer
            .sign::<_, D>(&mut rng, &commitment, messages.clone())
            .unwrap();
        let signature = recipient.complete::<D>(response.clone()).unwrap();
        println!("Time to issue a signature {:?}", start.elapsed());

        signature.verify(pk).unwrap();
        assert_eq!(signature.master_secret(), Some(&msk));
        assert_eq!(signature.bases.len(), messages.len() + 1);
        for r in messages.iter() {
            assert_eq!(
                signature.bases.get(r.base_type, r.base_index).unwrap().exponent,
                r.exponent
            );
        }
        signature.blind(&mut rng, pk).unwrap().verify(pk).unwrap();

        test_serialization!(RecipientCommitment, commitment);
        test_serialization!(IssuanceResponse, response);
    }

    #[test]
    fn issuance() {
        issue::<Sha256>();
        issue::<Blake2b512>();
    }

    #[test]
    fn issuance_with_base_key() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let key_pair = signer_key_pair();
        let pk = &key_pair.public_key;
        let msk = BigInt::from(rng.gen_biguint(pk.params.l_m as u64));

        let signer = SignerSession::new(&mut rng, &key_pair.secret_key, pk).unwrap();
        let (recipient, commitment) =
            RecipientSession::commit::<_, Sha256>(&mut rng, pk, msk.clone(), signer.nonce())
                .unwrap();
        let response = signer
            .sign::<_, Sha256>(&mut rng, &commitment, BaseCollection::new())
            .unwrap();
        let signature = recipient.complete::<Sha256>(response).unwrap();
        signature.verify(pk).unwrap();
        assert_eq!(signature.master_secret(), Some(&msk));
    }

    #[test]
    fn signer_rejects_bad_requests() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let key_pair = extended_key_pair();
        let pk = &key_pair.public_key;
        let sk = &key_pair.secret_key.signer_key;
        let msk = BigInt::from(12345u32);

        // Proof bound to another nonce
        let signer = SignerSession::new(&mut rng, sk, pk).unwrap();
        let other = SignerSession::new(&mut rng, sk, pk).unwrap();
        let (_, commitment) =
            RecipientSession::commit::<_, Sha256>(&mut rng, pk, msk.clone(), other.nonce()).unwrap();
        let err = signer
            .sign::<_, Sha256>(&mut rng, &commitment, BaseCollection::new())
            .unwrap_err();
        assert!(err.is_verification_failure());

        // U replaced after proving
        let signer = SignerSession::new(&mut rng, sk, pk).unwrap();
        let (_, mut commitment) =
            RecipientSession::commit::<_, Sha256>(&mut rng, pk, msk.clone(), signer.nonce()).unwrap();
        commitment.U = pk.signer_key.R_0.clone();
        assert!(signer
            .sign::<_, Sha256>(&mut rng, &commitment, BaseCollection::new())
            .unwrap_err()
            .is_verification_failure());

        // Tampered response
        let signer = SignerSession::new(&mut rng, sk, pk).unwrap();
        let (_, mut commitment) =
            RecipientSession::commit::<_, Sha256>(&mut rng, pk, msk.clone(), signer.nonce()).unwrap();
        let urn = commitment.proof.responses.keys().next().unwrap().clone();
        let s = commitment.proof.responses.get_mut(&urn).unwrap();
        *s = s.clone() ^ BigInt::one();
        assert!(signer
            .sign::<_, Sha256>(&mut rng, &commitment, BaseCollection::new())
            .unwrap_err()
            .is_verification_failure());

        // The master secret is never signed directly
        let signer = SignerSession::new(&mut rng, sk, pk).unwrap();
        let (_, commitment) =
            RecipientSession::commit::<_, Sha256>(&mut rng, pk, msk.clone(), signer.nonce()).unwrap();
        let mut messages = BaseCollection::new();
        messages.add(BaseRepresentation::from_key(pk, BaseType::Base0, 0, BigInt::from(1)).unwrap());
        assert!(matches!(
            signer.sign::<_, Sha256>(&mut rng, &commitment, messages),
            Err(GraphSigError::Base0NotAllowed)
        ));

        let signer = SignerSession::new(&mut rng, sk, pk).unwrap();
        let (_, commitment) =
            RecipientSession::commit::<_, Sha256>(&mut rng, pk, msk.clone(), signer.nonce()).unwrap();
        let mut messages = BaseCollection::new();
        messages.add(
            BaseRepresentation::from_key(
                pk,
                BaseType::Vertex,
                2,
                BigInt::one() << (pk.signer_key.params.l_m + 1),
            )
            .unwrap(),
        );
        assert!(matches!(
            signer.sign::<_, Sha256>(&mut rng, &commitment, messages),
            Err(GraphSigError::MessageTooLong(2))
        ));

        // Master secret too long
        let signer = SignerSession::new(&mut rng, sk, pk).unwrap();
        assert!(matches!(
            RecipientSession::commit::<_, Sha256>(
                &mut rng,
                pk,
                BigInt::one() << (pk.signer_key.params.l_m + 1),
                signer.nonce()
            ),
            Err(GraphSigError::MessageTooLong(0))
        ));
    }

    #[test]
    fn recipient_rejects_bad_responses() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let key_pair = extended_key_pair();
        let pk = &key_pair.public_key;
        let sk = &key_pair.secret_key.signer_key;
        let msk = BigInt::from(rng.gen_biguint(pk.signer_key.params.l_m as u64));

        let mut run = |tamper: &dyn Fn(&mut IssuanceResponse)| {
            let signer = SignerSession::new(&mut rng, sk, pk).unwrap();
            let (recipient, commitment) =
                RecipientSession::commit::<_, Sha256>(&mut rng, pk, msk.clone(), signer.nonce())
                    .unwrap();
            let messages = signer_messages(&mut rng, pk, &[3]);
            let mut response = signer
                .sign::<_, Sha256>(&mut rng, &commitment, messages)
                .unwrap();
            tamper(&mut response);
            recipient.complete::<Sha256>(response)
        };

        assert!(run(&|_: &mut IssuanceResponse| ()).is_ok());
        assert!(matches!(
            run(&|r: &mut IssuanceResponse| r.proof.challenge += 1u32),
            Err(GraphSigError::Verification(VerificationFailure::SignerProofMismatch))
        ));
        assert!(matches!(
            run(&|r: &mut IssuanceResponse| r.proof.response += 1u32),
            Err(GraphSigError::Verification(VerificationFailure::SignerProofMismatch))
        ));
        assert!(matches!(
            run(&|r: &mut IssuanceResponse| r.v += 1u32),
            Err(GraphSigError::Verification(VerificationFailure::SignerProofMismatch))
        ));
        assert!(matches!(
            run(&|r: &mut IssuanceResponse| r.e = r.e.clone() * 3u32),
            Err(GraphSigError::Verification(VerificationFailure::EOutOfRange))
        ));
        assert!(matches!(
            run(&|r: &mut IssuanceResponse| r.A = GroupElement::default()),
            Err(GraphSigError::Verification(VerificationFailure::NotAGroupElement))
        ));
        // The signer cannot change the signed messages after proving
        assert!(matches!(
            run(&|r: &mut IssuanceResponse| {
                let mut bases = BaseCollection::new();
                for x in r.bases.iter() {
                    let mut x = x.clone();
                    x.exponent += 1u32;
                    bases.add(x);
                }
                r.bases = bases;
            }),
            Err(GraphSigError::Verification(VerificationFailure::SignerProofMismatch))
        ));
    }
}
