//! Runs the phases of a proof in their fixed order.
//!
//! Both orchestrators start from a [`GSContext`] that already holds the public values of the statement in
//! the order the caller fixed. The prover appends its commitments `T~` and the verifier the reconstructed
//! `T^`, so for an honest proof both hash the same bytes.

use crate::{
    context::GSContext,
    error::SigmaError,
    proof::ProofSignature,
    protocol::{SigmaProtocol, RELATION_VARIABLE},
    statement::{ProofParameters, SigmaStatement},
    store::ProofStore,
    urn::{Urn, UrnRole},
};
use ark_std::{marker::PhantomData, rand::RngCore, vec::Vec};
use digest::Digest;
use gs_crypto_utils::group::GroupElement;
use num_bigint::BigInt;

pub struct ProverOrchestrator<'a, D: Digest> {
    statement: &'a SigmaStatement,
    params: ProofParameters,
    context: GSContext,
    _digest: PhantomData<D>,
}

pub struct VerifierOrchestrator<'a, D: Digest> {
    statement: &'a SigmaStatement,
    params: ProofParameters,
    context: GSContext,
    reconstructed: ProofStore<GroupElement>,
    _digest: PhantomData<D>,
}

impl<'a, D: Digest> ProverOrchestrator<'a, D> {
    pub fn new(statement: &'a SigmaStatement, params: ProofParameters, context: GSContext) -> Self {
        Self {
            statement,
            params,
            context,
            _digest: PhantomData,
        }
    }

    pub fn prove<R: RngCore, S: AsRef<str>>(
        self,
        rng: &mut R,
        witnesses: Vec<(S, BigInt)>,
    ) -> Result<ProofSignature, SigmaError> {
        let protocol = SigmaProtocol::init(rng, self.statement, witnesses, &self.params)?;
        let mut context = self.context;
        protocol.challenge_contribution(&mut context)?;
        let challenge = context.challenge::<D>(self.params.l_H);
        protocol.gen_proof(&challenge)
    }
}

impl<'a, D: Digest> VerifierOrchestrator<'a, D> {
    pub fn new(statement: &'a SigmaStatement, params: ProofParameters, context: GSContext) -> Self {
        Self {
            statement,
            params,
            context,
            reconstructed: ProofStore::new(),
            _digest: PhantomData,
        }
    }

    /// Reconstructs the commitments, rehashes and compares challenges. Returns the reconstructed commitments
    /// keyed by `urn:gs:hat:relation_<i>`.
    pub fn verify(mut self, proof: &ProofSignature) -> Result<ProofStore<GroupElement>, SigmaError> {
        let t_hats = proof.reconstruct_commitments(self.statement, &self.params)?;
        for (i, t_hat) in t_hats.into_iter().enumerate() {
            self.context.append_element(&t_hat)?;
            self.reconstructed.store(
                Urn::indexed(UrnRole::Reconstructed, RELATION_VARIABLE, i)?,
                t_hat,
            )?;
        }
        let challenge = self.context.challenge::<D>(self.params.l_H);
        proof.verify_challenge(&challenge)?;
        Ok(self.reconstructed)
    }
}
