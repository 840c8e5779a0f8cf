//! Self-certification of a signer key.
//!
//! The signer proves knowledge of `x_R0` and `x_Z` with `R_0 = S^x_R0` and `Z = S^x_Z`, which shows that
//! `R_0` and `Z` lie in the group generated by `S`. The challenge hashes `N, R_0, Z, S` and the commitments
//! `T_R0 = S^r_R0`, `T_Z = S^r_Z` in that order.

use crate::{error::GraphSigError, keys::SignerKeyPair, keys::SignerPublicKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, vec};
use digest::Digest;
use gs_crypto_utils::group::QRGroup;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use sigma_pok::{
    context::GSContext,
    orchestrator::{ProverOrchestrator, VerifierOrchestrator},
    proof::ProofSignature,
    statement::SigmaStatement,
};

pub const KEY_SIGNATURE_LABEL: &[u8] = b"GS-KeySignature";

const X_R0: &str = "x_R0";
const X_Z: &str = "x_Z";

#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct KeySignature {
    pub proof: ProofSignature,
}

fn statement(public_key: &SignerPublicKey, group: QRGroup) -> Result<SigmaStatement, GraphSigError> {
    let l_n = public_key.params.l_n as u64;
    let mut statement = SigmaStatement::new(group);
    statement.add_secret(X_R0, l_n)?;
    statement.add_secret(X_Z, l_n)?;
    statement.add_relation(public_key.R_0.clone(), vec![(public_key.S.clone(), X_R0)])?;
    statement.add_relation(public_key.Z.clone(), vec![(public_key.S.clone(), X_Z)])?;
    Ok(statement)
}

fn context(public_key: &SignerPublicKey) -> Result<GSContext, GraphSigError> {
    let mut context = GSContext::new(KEY_SIGNATURE_LABEL);
    public_key.params.append_to_context(&mut context);
    context.append_natural(&public_key.N)?;
    context.append_elements([&public_key.R_0, &public_key.Z, &public_key.S])?;
    Ok(context)
}

impl KeySignature {
    pub fn new<R: RngCore, D: Digest>(
        rng: &mut R,
        key_pair: &SignerKeyPair,
    ) -> Result<Self, GraphSigError> {
        let public_key = &key_pair.public_key;
        let secret_key = &key_pair.secret_key;
        secret_key.check_matches(public_key)?;
        let statement = statement(public_key, secret_key.group()?)?;
        let proof = ProverOrchestrator::<D>::new(
            &statement,
            public_key.params.proof_parameters(),
            context(public_key)?,
        )
        .prove(
            rng,
            vec![
                (X_R0, BigInt::from(secret_key.x_R0.clone())),
                (X_Z, BigInt::from(secret_key.x_Z.clone())),
            ],
        )?;
        Ok(Self { proof })
    }

    pub fn verify<D: Digest>(&self, public_key: &SignerPublicKey) -> Result<(), GraphSigError> {
        let statement = statement(public_key, public_key.group())?;
        VerifierOrchestrator::<D>::new(
            &statement,
            public_key.params.proof_parameters(),
            context(public_key)?,
        )
        .verify(&self.proof)?;
        Ok(())
    }
}
