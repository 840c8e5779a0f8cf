use crate::{
    error::{SigmaError, VerificationFailure},
    statement::{ProofParameters, SigmaStatement},
    store::ProofStore,
    urn::{Urn, UrnRole},
};
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, SerializationError, Valid, Validate,
};
use ark_std::{
    cfg_iter,
    collections::BTreeMap,
    io::{Read, Write},
    string::ToString,
    vec::Vec,
};
use gs_crypto_utils::{
    group::GroupElement,
    randomness::is_within_symmetric_range,
    serde_utils::{
        deserialize_integer, deserialize_natural, integer_serialized_size,
        natural_serialized_size, serialize_integer, serialize_natural,
    },
};
use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Non-interactive proof: the challenge and one response per secret keyed by `urn:gs:response:<secret>`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofSignature {
    pub challenge: BigUint,
    pub responses: BTreeMap<Urn, BigInt>,
}

impl ProofSignature {
    pub fn new(challenge: BigUint, responses: ProofStore<BigInt>) -> Self {
        Self {
            challenge,
            responses: responses.into_iter().collect(),
        }
    }

    pub fn response(&self, secret: &str) -> Option<&BigInt> {
        Urn::new(UrnRole::Response, secret)
            .ok()
            .and_then(|urn| self.responses.get(&urn))
    }

    /// Responses in the order of the statement's secrets after checking that there is exactly one per secret
    /// and that each lies in `±2^(l_x + l_statzk + l_H + 1)`
    pub fn checked_responses(
        &self,
        statement: &SigmaStatement,
        params: &ProofParameters,
    ) -> Result<Vec<&BigInt>, VerificationFailure> {
        let secrets = statement.secrets();
        if let Some(urn) = self.responses.keys().find(|urn| {
            urn.role() != UrnRole::Response || statement.secret_index(urn.variable()).is_none()
        }) {
            return Err(VerificationFailure::UnexpectedResponse(urn.to_string()));
        }
        secrets
            .iter()
            .map(|s| {
                let s_hat = self
                    .response(&s.name)
                    .ok_or_else(|| VerificationFailure::MissingResponse(s.name.clone()))?;
                if !is_within_symmetric_range(s_hat, params.response_bits(s.bit_length)) {
                    return Err(VerificationFailure::ResponseOutOfRange(s.name.clone()));
                }
                Ok(s_hat)
            })
            .collect()
    }

    /// Computes `T^ = target^-c * prod base^s^` for every relation. For an honest proof these equal the
    /// prover's commitments `T~`.
    pub fn reconstruct_commitments(
        &self,
        statement: &SigmaStatement,
        params: &ProofParameters,
    ) -> Result<Vec<GroupElement>, SigmaError> {
        let responses = self.checked_responses(statement, params)?;
        let group = statement.group();
        let minus_c = -BigInt::from(self.challenge.clone());
        let t_hats = cfg_iter!(statement.relations())
            .enumerate()
            .map(|(i, relation)| {
                let mut t_hat = group
                    .pow(&relation.target, &minus_c)
                    .map_err(|_| VerificationFailure::NonInvertibleTarget(i))?;
                for (j, (base, k)) in relation.terms.iter().enumerate() {
                    let p = group
                        .pow(base, responses[*k])
                        .map_err(|_| VerificationFailure::NonInvertibleBase(i, j))?;
                    t_hat = group.mul(&t_hat, &p);
                }
                Ok(t_hat)
            })
            .collect::<Result<Vec<_>, VerificationFailure>>()?;
        Ok(t_hats)
    }

    /// Writes the reconstructed commitments in relation order, matching the prover's
    /// [`crate::protocol::SigmaProtocol::challenge_contribution`] for an honest proof
    pub fn challenge_contribution<W: Write>(
        &self,
        statement: &SigmaStatement,
        params: &ProofParameters,
        mut writer: W,
    ) -> Result<(), SigmaError> {
        for t_hat in self.reconstruct_commitments(statement, params)? {
            t_hat.serialize_compressed(&mut writer)?;
        }
        Ok(())
    }

    pub fn verify_challenge(&self, challenge: &BigUint) -> Result<(), SigmaError> {
        if &self.challenge != challenge {
            return Err(VerificationFailure::ChallengeMismatch.into());
        }
        Ok(())
    }
}

impl CanonicalSerialize for ProofSignature {
    fn serialize_with_mode<W: Write>(
        &self,
        mut writer: W,
        compress: Compress,
    ) -> Result<(), SerializationError> {
        serialize_natural(&self.challenge, &mut writer, compress)?;
        self.responses.len().serialize_with_mode(&mut writer, compress)?;
        for (urn, s) in &self.responses {
            urn.serialize_with_mode(&mut writer, compress)?;
            serialize_integer(s, &mut writer, compress)?;
        }
        Ok(())
    }

    fn serialized_size(&self, compress: Compress) -> usize {
        natural_serialized_size(&self.challenge, compress)
            + self.responses.len().serialized_size(compress)
            + self
                .responses
                .iter()
                .map(|(urn, s)| urn.serialized_size(compress) + integer_serialized_size(s, compress))
                .sum::<usize>()
    }
}

impl Valid for ProofSignature {
    fn check(&self) -> Result<(), SerializationError> {
        self.responses.keys().try_for_each(|urn| urn.check())
    }
}

impl CanonicalDeserialize for ProofSignature {
    fn deserialize_with_mode<R: Read>(
        mut reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        let challenge = deserialize_natural(&mut reader, compress, validate)?;
        let len = usize::deserialize_with_mode(&mut reader, compress, validate)?;
        let mut responses = BTreeMap::new();
        for _ in 0..len {
            let urn = Urn::deserialize_with_mode(&mut reader, compress, validate)?;
            let s = deserialize_integer(&mut reader, compress, validate)?;
            if responses.insert(urn, s).is_some() {
                return Err(SerializationError::InvalidData);
            }
        }
        Ok(Self {
            challenge,
            responses,
        })
    }
}
