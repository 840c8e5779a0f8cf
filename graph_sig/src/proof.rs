//! Zero-knowledge proofs over a signer's key and signatures.
//!
//! [`GroupSetupProof`] lets the signer show that `R_0`, `Z` and every `R_i` of its extended key are powers of
//! `S`. [`PossessionProof`] lets the holder of a signature show that it knows a signature under the key on
//! hidden exponents of a given base collection, without revealing the signature or the exponents.
//!
//! Both are sigma protocols run through [`sigma_pok::orchestrator`] with challenges computed over the key's
//! public values in their canonical order followed by the proof specific values.

use crate::{
    base_representation::{BaseCollection, KeyBases},
    error::{GraphSigError, VerificationFailure},
    extended_keys::{ExtendedKeyPair, ExtendedPublicKey},
    signature::GSSignature,
};
use ark_serialize::SerializationError;
use ark_std::{end_timer, format, rand::RngCore, start_timer, string::String, vec, vec::Vec};
use digest::Digest;
use gs_crypto_utils::{
    group::{GroupElement, QRGroup},
    impl_canonical_serialization,
    serde_utils::ArkObjectBytes,
};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use sigma_pok::{
    context::GSContext,
    orchestrator::{ProverOrchestrator, VerifierOrchestrator},
    proof::ProofSignature,
    statement::SigmaStatement,
};

pub const GROUP_SETUP_PROOF_LABEL: &[u8] = b"GS-GroupSetupProof";
pub const POSSESSION_PROOF_LABEL: &[u8] = b"GS-PossessionProof";

const X_R0: &str = "x_R0";
const X_Z: &str = "x_Z";
const E_PRIME: &str = "e_prime";
const V_PRIME: &str = "v_prime";

fn base_secret(i: usize) -> String {
    format!("x_{}", i)
}

fn message_secret(position: usize) -> String {
    format!("m_{}", position)
}

/// Proof of knowledge of `x_R0`, `x_Z` and every `x_i` with `R_0 = S^x_R0`, `Z = S^x_Z` and `R_i = S^x_i`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSetupProof {
    pub proof: ProofSignature,
}

impl_canonical_serialization!(GroupSetupProof { proof: ark });

fn group_setup_statement(
    public_key: &ExtendedPublicKey,
    group: QRGroup,
) -> Result<SigmaStatement, GraphSigError> {
    let signer_key = &public_key.signer_key;
    let l_n = signer_key.params.l_n as u64;
    let S = &signer_key.S;
    let mut statement = SigmaStatement::new(group);
    statement.add_secret(X_R0, l_n)?;
    statement.add_secret(X_Z, l_n)?;
    statement.add_relation(signer_key.R_0.clone(), vec![(S.clone(), X_R0)])?;
    statement.add_relation(signer_key.Z.clone(), vec![(S.clone(), X_Z)])?;
    for (j, R) in public_key.bases.iter().enumerate() {
        let name = base_secret(j + 1);
        statement.add_secret(&name, l_n)?;
        statement.add_relation(R.clone(), vec![(S.clone(), name.as_str())])?;
    }
    Ok(statement)
}

fn group_setup_context(public_key: &ExtendedPublicKey) -> Result<GSContext, SerializationError> {
    let mut context = GSContext::new(GROUP_SETUP_PROOF_LABEL);
    KeyBases::append_to_context(public_key, &mut context)?;
    Ok(context)
}

impl GroupSetupProof {
    pub fn new<R: RngCore, D: Digest>(
        rng: &mut R,
        key_pair: &ExtendedKeyPair,
    ) -> Result<Self, GraphSigError> {
        let public_key = &key_pair.public_key;
        let secret_key = &key_pair.secret_key;
        secret_key.check_matches(public_key)?;
        let timer = start_timer!(|| "Create group setup proof");
        let statement = group_setup_statement(public_key, secret_key.group()?)?;
        let mut witnesses = Vec::with_capacity(secret_key.discrete_logs.len() + 2);
        witnesses.push((
            String::from(X_R0),
            BigInt::from(secret_key.signer_key.x_R0.clone()),
        ));
        witnesses.push((
            String::from(X_Z),
            BigInt::from(secret_key.signer_key.x_Z.clone()),
        ));
        for (j, x) in secret_key.discrete_logs.iter().enumerate() {
            witnesses.push((base_secret(j + 1), BigInt::from(x.clone())));
        }
        let proof = ProverOrchestrator::<D>::new(
            &statement,
            public_key.signer_key.params.proof_parameters(),
            group_setup_context(public_key)?,
        )
        .prove(rng, witnesses)?;
        end_timer!(timer);
        Ok(Self { proof })
    }

    pub fn verify<D: Digest>(&self, public_key: &ExtendedPublicKey) -> Result<(), GraphSigError> {
        let timer = start_timer!(|| "Verify group setup proof");
        let statement = group_setup_statement(public_key, public_key.group())?;
        VerifierOrchestrator::<D>::new(
            &statement,
            public_key.signer_key.params.proof_parameters(),
            group_setup_context(public_key)?,
        )
        .verify(&self.proof)?;
        end_timer!(timer);
        Ok(())
    }
}

/// Proof of knowledge of a signature on the hidden exponents of `bases`. `A'` is the `A` of a freshly blinded
/// signature and the proof shows knowledge of `e' = e - 2^(l_e-1)`, `v` and every `m_i` with
/// `Z * A'^(-2^(l_e-1)) = A'^e' * S^v * prod base_i^m_i`. The length check on the response of `e'` shows that
/// `e` is in range.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossessionProof {
    #[serde_as(as = "ArkObjectBytes")]
    pub A_prime: GroupElement,
    /// Public clone of the signature's base collection
    pub bases: BaseCollection,
    pub proof: ProofSignature,
}

impl_canonical_serialization!(PossessionProof {
    A_prime: ark,
    bases: ark,
    proof: ark,
});

fn possession_statement<K: KeyBases>(
    public_key: &K,
    A_prime: &GroupElement,
    bases: &BaseCollection,
) -> Result<(SigmaStatement, Vec<String>), GraphSigError> {
    let signer_key = public_key.signer_public_key();
    let params = &signer_key.params;
    let group = signer_key.group();
    let minus_offset = -BigInt::from(params.e_offset());
    let target = group.mul(
        &signer_key.Z,
        &group
            .pow(A_prime, &minus_offset)
            .map_err(|_| VerificationFailure::NotAGroupElement)?,
    );

    let mut statement = SigmaStatement::new(group);
    statement.add_secret(E_PRIME, params.l_prime_e as u64)?;
    statement.add_secret(V_PRIME, params.blinded_v_bits())?;
    let names = (0..bases.len()).map(message_secret).collect::<Vec<_>>();
    for name in &names {
        statement.add_secret(name, params.l_m as u64)?;
    }
    let mut terms = vec![(A_prime.clone(), E_PRIME), (signer_key.S.clone(), V_PRIME)];
    for (r, name) in bases.iter().zip(names.iter()) {
        terms.push((r.base.clone(), name.as_str()));
    }
    statement.add_relation(target, terms)?;
    Ok((statement, names))
}

fn possession_context<K: KeyBases>(
    public_key: &K,
    A_prime: &GroupElement,
    bases: &BaseCollection,
    nonce: &[u8],
) -> Result<GSContext, SerializationError> {
    let mut context = GSContext::new(POSSESSION_PROOF_LABEL);
    public_key.append_to_context(&mut context)?;
    context.append_element(A_prime)?;
    bases.append_structure_to_context(&mut context)?;
    context.append_bytes(nonce);
    Ok(context)
}

impl PossessionProof {
    /// Blinds `signature` and proves knowledge of it. `nonce` is the verifier's challenge for this proof.
    pub fn new<R: RngCore, D: Digest, K: KeyBases>(
        rng: &mut R,
        signature: &GSSignature,
        public_key: &K,
        nonce: &[u8],
    ) -> Result<Self, GraphSigError> {
        signature.verify(public_key)?;
        let timer = start_timer!(|| "Create possession proof");
        let params = public_key.params();
        let blinded = signature.blind(rng, public_key)?;
        let bases = blinded.bases.public_clone();
        let (statement, names) = possession_statement(public_key, &blinded.A, &bases)?;

        let mut witnesses = Vec::with_capacity(names.len() + 2);
        witnesses.push((String::from(E_PRIME), blinded.e_offset(params)));
        witnesses.push((String::from(V_PRIME), blinded.v.clone()));
        for (r, name) in blinded.bases.iter().zip(names) {
            witnesses.push((name, r.exponent.clone()));
        }
        let proof = ProverOrchestrator::<D>::new(
            &statement,
            params.proof_parameters(),
            possession_context(public_key, &blinded.A, &bases, nonce)?,
        )
        .prove(rng, witnesses)?;
        end_timer!(timer);
        Ok(Self {
            A_prime: blinded.A,
            bases,
            proof,
        })
    }

    pub fn verify<D: Digest, K: KeyBases>(
        &self,
        public_key: &K,
        nonce: &[u8],
    ) -> Result<(), GraphSigError> {
        let timer = start_timer!(|| "Verify possession proof");
        if self.bases.is_empty() {
            return Err(VerificationFailure::MalformedProof.into());
        }
        self.bases.check_consistency(public_key)?;
        let signer_key = public_key.signer_public_key();
        if !signer_key.group().is_element(&self.A_prime) {
            return Err(VerificationFailure::NotAGroupElement.into());
        }
        let (statement, _) = possession_statement(public_key, &self.A_prime, &self.bases)?;
        VerifierOrchestrator::<D>::new(
            &statement,
            signer_key.params.proof_parameters(),
            possession_context(public_key, &self.A_prime, &self.bases, nonce)?,
        )
        .verify(&self.proof)?;
        end_timer!(timer);
        Ok(())
    }
}
