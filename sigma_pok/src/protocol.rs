//! Prover side of a sigma protocol for a [`SigmaStatement`].
//!
//! 1. [`SigmaProtocol::init`] samples randomness `t~_x` from `±2^(l_x + l_statzk + l_H)` for every secret `x`
//!    and computes the commitment `T~ = prod base^t~` of every relation.
//! 2. The commitments are written to the challenge transcript with [`SigmaProtocol::challenge_contribution`].
//! 3. [`SigmaProtocol::gen_proof`] takes the challenge `c` and computes the responses `s^_x = t~_x + c*x` over
//!    the integers. It consumes the protocol so the randomness can never be used for a second challenge.
//!    The protocol cannot be cloned and clears its witnesses and randomness when dropped.

use crate::{
    error::SigmaError,
    proof::ProofSignature,
    statement::{ProofParameters, SigmaStatement},
    store::ProofStore,
    urn::{Urn, UrnRole},
};
use ark_serialize::CanonicalSerialize;
use ark_std::{cfg_iter, io::Write, rand::RngCore, string::ToString, vec, vec::Vec};
use gs_crypto_utils::{
    group::GroupElement,
    randomness::{is_within_symmetric_range, random_signed_integer},
    zeroize_utils::{zeroize_integer, zeroize_integers},
};
use num_bigint::{BigInt, BigUint};
use zeroize::{Zeroize, ZeroizeOnDrop};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Variable name of the commitment of the `i`-th relation
pub const RELATION_VARIABLE: &str = "relation";

#[derive(Debug)]
pub struct SigmaProtocol<'a> {
    statement: &'a SigmaStatement,
    /// Index aligned with the statement's secrets
    witnesses: Vec<BigInt>,
    randomness: ProofStore<BigInt>,
    commitments: ProofStore<GroupElement>,
}

impl<'a> SigmaProtocol<'a> {
    /// Pre-challenge phase. Every declared secret needs exactly one witness of at most its declared bit length.
    pub fn init<R: RngCore, S: AsRef<str>>(
        rng: &mut R,
        statement: &'a SigmaStatement,
        witnesses: Vec<(S, BigInt)>,
        params: &ProofParameters,
    ) -> Result<Self, SigmaError> {
        let secrets = statement.secrets();
        let mut ordered = vec![None; secrets.len()];
        for (name, witness) in witnesses {
            let name = name.as_ref();
            let i = statement
                .secret_index(name)
                .ok_or_else(|| SigmaError::UnknownSecret(name.to_string()))?;
            if ordered[i].is_some() {
                return Err(SigmaError::DuplicateSecret(name.to_string()));
            }
            if !is_within_symmetric_range(&witness, secrets[i].bit_length) {
                return Err(SigmaError::WitnessOutOfRange(name.to_string()));
            }
            ordered[i] = Some(witness);
        }
        let witnesses = ordered
            .into_iter()
            .zip(secrets)
            .map(|(w, s)| w.ok_or_else(|| SigmaError::MissingWitness(s.name.clone())))
            .collect::<Result<Vec<_>, _>>()?;

        // The RNG is not shared across threads so randomness is sampled before the parallel part
        let mut randomness = ProofStore::new();
        let mut blindings = Vec::with_capacity(secrets.len());
        for s in secrets {
            let t = random_signed_integer(rng, params.randomness_bits(s.bit_length));
            randomness.store(Urn::new(UrnRole::WitnessRandomness, &s.name)?, t.clone())?;
            blindings.push(t);
        }

        let group = statement.group();
        let t_values = cfg_iter!(statement.relations())
            .map(|relation| {
                let terms = relation
                    .terms
                    .iter()
                    .map(|(base, i)| (base, &blindings[*i]))
                    .collect::<Vec<_>>();
                group.multi_pow(&terms)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut commitments = ProofStore::new();
        for (i, t) in t_values.into_iter().enumerate() {
            commitments.store(Urn::indexed(UrnRole::Witness, RELATION_VARIABLE, i)?, t)?;
        }

        Ok(Self {
            statement,
            witnesses,
            randomness,
            commitments,
        })
    }

    /// Commitment `T~` of the `i`-th relation
    pub fn commitment(&self, i: usize) -> Result<&GroupElement, SigmaError> {
        Ok(self
            .commitments
            .retrieve(&Urn::indexed(UrnRole::Witness, RELATION_VARIABLE, i)?)?)
    }

    /// Commitments in relation order, which is the order they are hashed in
    pub fn commitments(&self) -> Result<Vec<&GroupElement>, SigmaError> {
        (0..self.statement.relations().len())
            .map(|i| self.commitment(i))
            .collect()
    }

    pub(crate) fn randomness_store(&self) -> &ProofStore<BigInt> {
        &self.randomness
    }

    pub fn commitment_store(&self) -> &ProofStore<GroupElement> {
        &self.commitments
    }

    /// Writes the commitments in relation order. The public values of the statement are not written and
    /// must already be part of the transcript.
    pub fn challenge_contribution<W: Write>(&self, mut writer: W) -> Result<(), SigmaError> {
        for t in self.commitments()? {
            t.serialize_compressed(&mut writer)?;
        }
        Ok(())
    }

    /// Post-challenge phase and assembly of the proof
    pub fn gen_proof(self, challenge: &BigUint) -> Result<ProofSignature, SigmaError> {
        let c = BigInt::from(challenge.clone());
        let mut responses = ProofStore::new();
        for (i, s) in self.statement.secrets().iter().enumerate() {
            let urn = Urn::new(UrnRole::WitnessRandomness, &s.name)?;
            let t = self.randomness.retrieve(&urn)?;
            let x = self
                .witnesses
                .get(i)
                .ok_or_else(|| SigmaError::MissingWitness(s.name.clone()))?;
            responses.store(urn.with_role(UrnRole::Response), t + &c * x)?;
        }
        Ok(ProofSignature::new(challenge.clone(), responses))
    }
}

impl Zeroize for SigmaProtocol<'_> {
    fn zeroize(&mut self) {
        zeroize_integers(&mut self.witnesses);
        self.randomness.clear_with(zeroize_integer);
    }
}

impl Drop for SigmaProtocol<'_> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for SigmaProtocol<'_> {}
