//! Names of the values a party stores during a proof session, `urn:gs:<role>:<variable>`.

use crate::error::ProofStoreError;
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, SerializationError, Valid, Validate,
};
use ark_std::{
    fmt,
    format,
    io::{Read, Write},
    string::{String, ToString},
};
use serde::{Deserialize, Serialize};

pub const URN_PREFIX: &str = "urn:gs:";

/// What a stored value is
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UrnRole {
    /// Randomness `t~` chosen by the prover for a secret
    WitnessRandomness,
    /// Commitment `T~` to the randomness, one per relation
    Witness,
    /// Response `s^ = t~ + c*x`
    Response,
    /// Commitment `T^` reconstructed by the verifier
    Reconstructed,
}

impl UrnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WitnessRandomness => "witnessrandomness",
            Self::Witness => "witness",
            Self::Response => "response",
            Self::Reconstructed => "hat",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "witnessrandomness" => Some(Self::WitnessRandomness),
            "witness" => Some(Self::Witness),
            "response" => Some(Self::Response),
            "hat" => Some(Self::Reconstructed),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Urn {
    role: UrnRole,
    variable: String,
}

impl Urn {
    /// `variable` must be non-empty and consist of ASCII alphanumerics and `_`
    pub fn new(role: UrnRole, variable: &str) -> Result<Self, ProofStoreError> {
        if !is_valid_variable(variable) {
            return Err(ProofStoreError::InvalidUrn(format!(
                "{}{}:{}",
                URN_PREFIX,
                role.as_str(),
                variable
            )));
        }
        Ok(Self {
            role,
            variable: variable.to_string(),
        })
    }

    /// For a variable from an indexed family like the messages `m_i`, named `<variable>_<index>`
    pub fn indexed(role: UrnRole, variable: &str, index: usize) -> Result<Self, ProofStoreError> {
        Self::new(role, &format!("{}_{}", variable, index))
    }

    pub fn parse(s: &str) -> Result<Self, ProofStoreError> {
        let invalid = || ProofStoreError::InvalidUrn(s.to_string());
        let rest = s.strip_prefix(URN_PREFIX).ok_or_else(invalid)?;
        let (role, variable) = rest.split_once(':').ok_or_else(invalid)?;
        let role = UrnRole::from_name(role).ok_or_else(invalid)?;
        Self::new(role, variable)
    }

    pub fn role(&self) -> UrnRole {
        self.role
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Same variable under a different role, e.g. the response for a witness randomness
    pub fn with_role(&self, role: UrnRole) -> Self {
        Self {
            role,
            variable: self.variable.clone(),
        }
    }
}

fn is_valid_variable(variable: &str) -> bool {
    !variable.is_empty()
        && variable
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}:{}", URN_PREFIX, self.role.as_str(), self.variable)
    }
}

impl From<Urn> for String {
    fn from(urn: Urn) -> Self {
        urn.to_string()
    }
}

impl TryFrom<String> for Urn {
    type Error = ProofStoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl CanonicalSerialize for Urn {
    fn serialize_with_mode<W: Write>(
        &self,
        writer: W,
        compress: Compress,
    ) -> Result<(), SerializationError> {
        self.to_string().serialize_with_mode(writer, compress)
    }

    fn serialized_size(&self, compress: Compress) -> usize {
        self.to_string().serialized_size(compress)
    }
}

impl Valid for Urn {
    fn check(&self) -> Result<(), SerializationError> {
        if is_valid_variable(&self.variable) {
            Ok(())
        } else {
            Err(SerializationError::InvalidData)
        }
    }
}

impl CanonicalDeserialize for Urn {
    fn deserialize_with_mode<R: Read>(
        reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        let s = String::deserialize_with_mode(reader, compress, validate)?;
        Self::parse(&s).map_err(|_| SerializationError::InvalidData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_and_parse() {
        let urn = Urn::new(UrnRole::Response, "x_Z").unwrap();
        assert_eq!(urn.to_string(), "urn:gs:response:x_Z");
        assert_eq!(Urn::parse("urn:gs:response:x_Z").unwrap(), urn);
        assert_eq!(urn.role(), UrnRole::Response);
        assert_eq!(urn.variable(), "x_Z");

        let urn = Urn::indexed(UrnRole::WitnessRandomness, "m", 3).unwrap();
        assert_eq!(urn.to_string(), "urn:gs:witnessrandomness:m_3");
        assert_eq!(
            urn.with_role(UrnRole::Response).to_string(),
            "urn:gs:response:m_3"
        );

        for bad in [
            "urn:gs:response:",
            "urn:gs:response",
            "urn:gs:unknown:x",
            "urn:xx:response:x",
            "urn:gs:response:x:y",
            "urn:gs:response:x y",
        ] {
            assert_eq!(
                Urn::parse(bad),
                Err(ProofStoreError::InvalidUrn(bad.to_string()))
            );
        }
    }

    #[test]
    fn serialization() {
        let urn = Urn::new(UrnRole::Witness, "relation_0").unwrap();
        let mut bytes = vec![];
        urn.serialize_compressed(&mut bytes).unwrap();
        assert_eq!(Urn::deserialize_compressed(&bytes[..]).unwrap(), urn);

        let json = serde_json::to_string(&urn).unwrap();
        assert_eq!(json, "\"urn:gs:witness:relation_0\"");
        assert_eq!(serde_json::from_str::<Urn>(&json).unwrap(), urn);
        assert!(serde_json::from_str::<Urn>("\"urn:gs:witness:\"").is_err());
    }
}
