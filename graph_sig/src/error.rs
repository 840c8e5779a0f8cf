use crate::base_representation::BaseType;
use ark_serialize::SerializationError;
use ark_std::{fmt::Debug, string::String};
use gs_crypto_utils::{error::GroupError, serde_utils::ArkSerializationError};
use serde::Serialize;
use sigma_pok::error::SigmaError;

/// Every check that can make a signature, commitment or proof be rejected
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum VerificationFailure {
    /// The master secret base `R_0` appears more than once
    DuplicateBase0,
    /// The base of this type and index appears more than once
    DuplicateBase(BaseType, usize),
    /// The key has no base of this type and index
    UnknownBase(BaseType, usize),
    /// The base differs from the key's base of this type and index
    BaseMismatch(BaseType, usize),
    /// `e` is not a probable prime
    ENotPrime,
    /// `e` lies outside `[2^(l_e-1) - 2^(l'_e-1), 2^(l_e-1) + 2^(l'_e-1)]`
    EOutOfRange,
    /// `A^e != Z / (S^v * prod base_i^m_i)`
    SignatureEquation,
    /// A value that must be an element of `QR_N` is not
    NotAGroupElement,
    /// Recomputed commitment differs from its value
    CommitmentMismatch,
    /// The signer's proof that `A` is correctly formed does not verify
    SignerProofMismatch,
    /// The proof does not match its base collection, e.g. a hidden message without a response
    MalformedProof,
}

#[derive(Debug, Serialize)]
pub enum GraphSigError {
    /// Bit lengths contradict each other. The message names the violated constraint.
    InvalidKeyGenParameters(String),
    InvalidGraphEncodingParameters(String),
    /// A commitment or signature needs at least one base
    EmptyBaseCollection,
    /// The base collection given for signing or committing is not consistent with the key
    InvalidBaseCollection(VerificationFailure),
    /// The signer never signs an exponent for `R_0` in issuance since the master secret is only committed in `U`
    Base0NotAllowed,
    /// Exponent of the base with this index is longer than `l_m` bits
    MessageTooLong(usize),
    /// The secret key does not match the public key it is used with
    KeyMismatch,
    VertexOutOfRange(usize),
    DuplicateVertex(usize),
    UnknownEdgeEndpoint(usize),
    LabelOutOfRange(usize),
    /// Number of edges exceeds `l_E`
    TooManyEdges(usize),
    /// An encoded vertex or edge needs this many bits which is more than `l_m`
    ExponentTooLong(u64),
    Verification(VerificationFailure),
    Group(GroupError),
    Sigma(SigmaError),
    #[serde(with = "ArkSerializationError")]
    Serialization(SerializationError),
}

impl GraphSigError {
    /// Returns true if a signature or proof was rejected, as opposed to invalid input or misuse of the API
    pub fn is_verification_failure(&self) -> bool {
        match self {
            Self::Verification(_) => true,
            Self::Sigma(e) => e.is_verification_failure(),
            _ => false,
        }
    }
}

impl From<VerificationFailure> for GraphSigError {
    fn from(e: VerificationFailure) -> Self {
        Self::Verification(e)
    }
}

impl From<GroupError> for GraphSigError {
    fn from(e: GroupError) -> Self {
        Self::Group(e)
    }
}

impl From<SigmaError> for GraphSigError {
    fn from(e: SigmaError) -> Self {
        Self::Sigma(e)
    }
}

impl From<SerializationError> for GraphSigError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
