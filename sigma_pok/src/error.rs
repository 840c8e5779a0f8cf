use ark_serialize::SerializationError;
use ark_std::{fmt, string::String};
use gs_crypto_utils::{error::GroupError, serde_utils::ArkSerializationError};
use serde::Serialize;

/// Failure of the [`crate::store::ProofStore`]. These indicate a bug or corrupted state in the party
/// running the protocol, not a bad proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ProofStoreError {
    /// A value was already stored under this URN in the current session
    DuplicateUrn(String),
    MissingUrn(String),
    /// Not of the form `urn:gs:<role>:<variable>`
    InvalidUrn(String),
}

impl fmt::Display for ProofStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateUrn(urn) => write!(f, "value already stored under {}", urn),
            Self::MissingUrn(urn) => write!(f, "no value stored under {}", urn),
            Self::InvalidUrn(urn) => write!(f, "invalid URN {}", urn),
        }
    }
}

/// The reason a proof was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum VerificationFailure {
    /// The challenge recomputed from the reconstructed commitments differs from the proof's challenge
    ChallengeMismatch,
    /// Response of the given secret lies outside `±2^(l_x + l_statzk + l_H + 1)`
    ResponseOutOfRange(String),
    MissingResponse(String),
    UnexpectedResponse(String),
    /// The target of the relation at this index is not a unit so it cannot be raised to `-c`
    NonInvertibleTarget(usize),
    /// The base of the given relation and position is not a unit and has a negative response
    NonInvertibleBase(usize, usize),
}

#[derive(Debug, Serialize)]
pub enum SigmaError {
    Store(ProofStoreError),
    Verification(VerificationFailure),
    DuplicateSecret(String),
    UnknownSecret(String),
    MissingWitness(String),
    /// The witness is longer than the bit length declared for it
    WitnessOutOfRange(String),
    /// A relation needs at least one base
    EmptyRelation(usize),
    Group(GroupError),
    #[serde(with = "ArkSerializationError")]
    Serialization(SerializationError),
}

impl SigmaError {
    /// Returns true if the error means that a proof did not verify, as opposed to a misuse of the API
    pub fn is_verification_failure(&self) -> bool {
        matches!(self, Self::Verification(_))
    }
}

impl From<ProofStoreError> for SigmaError {
    fn from(e: ProofStoreError) -> Self {
        Self::Store(e)
    }
}

impl From<VerificationFailure> for SigmaError {
    fn from(e: VerificationFailure) -> Self {
        Self::Verification(e)
    }
}

impl From<GroupError> for SigmaError {
    fn from(e: GroupError) -> Self {
        Self::Group(e)
    }
}

impl From<SerializationError> for SigmaError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
