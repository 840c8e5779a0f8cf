//! Declarative description of what a sigma protocol proves.
//!
//! A statement declares named secrets with their maximum bit lengths and relations of the form
//! `target = prod_j base_j^secret_j` over a [`QRGroup`]. A secret may appear in several relations, which
//! proves that the same value is used in all of them.

use crate::{
    error::SigmaError,
    urn::{Urn, UrnRole},
};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{
    string::{String, ToString},
    vec::Vec,
};
use gs_crypto_utils::group::{GroupElement, QRGroup};
use serde::{Deserialize, Serialize};

/// Bit lengths governing soundness and statistical zero-knowledge of every sigma protocol
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
)]
pub struct ProofParameters {
    /// Statistical zero-knowledge slack added to the witness randomness
    pub l_statzk: u32,
    /// Bit length of the challenge
    pub l_H: u32,
}

impl ProofParameters {
    /// Bit length of the witness randomness for a secret of `secret_bits` bits, i.e. `t~` is sampled from
    /// `±2^(secret_bits + l_statzk + l_H)`
    pub fn randomness_bits(&self, secret_bits: u64) -> u64 {
        secret_bits + self.l_statzk as u64 + self.l_H as u64
    }

    /// Bound accepted for a response to a secret of `secret_bits` bits. One bit more than the randomness to
    /// leave room for the carry of `t~ + c*x`.
    pub fn response_bits(&self, secret_bits: u64) -> u64 {
        self.randomness_bits(secret_bits) + 1
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretDeclaration {
    pub name: String,
    pub bit_length: u64,
}

/// `target = prod_j terms_j.0 ^ secret(terms_j.1)` where the secrets are referred to by their index in the
/// statement's declarations
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relation {
    pub target: GroupElement,
    pub terms: Vec<(GroupElement, usize)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigmaStatement {
    group: QRGroup,
    secrets: Vec<SecretDeclaration>,
    relations: Vec<Relation>,
}

impl SigmaStatement {
    /// The prover may pass a group with the factorization to get faster exponentiations. The proof is the
    /// same either way.
    pub fn new(group: QRGroup) -> Self {
        Self {
            group,
            secrets: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Declare a secret of at most `bit_length` bits in absolute value. Returns its index.
    pub fn add_secret(&mut self, name: &str, bit_length: u64) -> Result<usize, SigmaError> {
        if self.secret_index(name).is_some() {
            return Err(SigmaError::DuplicateSecret(name.to_string()));
        }
        // Reject names that cannot appear in a URN now rather than midway through a proof
        Urn::new(UrnRole::Response, name)?;
        self.secrets.push(SecretDeclaration {
            name: name.to_string(),
            bit_length,
        });
        Ok(self.secrets.len() - 1)
    }

    /// Add relation `target = prod base^secret` over previously declared secrets. Returns its index.
    pub fn add_relation(
        &mut self,
        target: GroupElement,
        terms: Vec<(GroupElement, &str)>,
    ) -> Result<usize, SigmaError> {
        if terms.is_empty() {
            return Err(SigmaError::EmptyRelation(self.relations.len()));
        }
        let terms = terms
            .into_iter()
            .map(|(base, name)| {
                self.secret_index(name)
                    .map(|i| (base, i))
                    .ok_or_else(|| SigmaError::UnknownSecret(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.relations.push(Relation { target, terms });
        Ok(self.relations.len() - 1)
    }

    pub fn secret_index(&self, name: &str) -> Option<usize> {
        self.secrets.iter().position(|s| s.name == name)
    }

    pub fn group(&self) -> &QRGroup {
        &self.group
    }

    pub fn secrets(&self) -> &[SecretDeclaration] {
        &self.secrets
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    #[test]
    fn building_statements() {
        let mut statement = SigmaStatement::new(QRGroup::new_n(BigUint::from(77u32)));
        assert_eq!(statement.add_secret("x", 10).unwrap(), 0);
        assert_eq!(statement.add_secret("y", 20).unwrap(), 1);
        assert!(matches!(
            statement.add_secret("x", 10),
            Err(SigmaError::DuplicateSecret(_))
        ));
        assert!(matches!(
            statement.add_secret("not valid", 10),
            Err(SigmaError::Store(_))
        ));

        let g = GroupElement::from(4u32);
        let h = GroupElement::from(9u32);
        assert_eq!(
            statement
                .add_relation(GroupElement::from(16u32), vec![(g.clone(), "x"), (h.clone(), "y")])
                .unwrap(),
            0
        );
        assert!(matches!(
            statement.add_relation(g.clone(), vec![(h.clone(), "z")]),
            Err(SigmaError::UnknownSecret(_))
        ));
        assert!(matches!(
            statement.add_relation(g, vec![]),
            Err(SigmaError::EmptyRelation(1))
        ));
        assert_eq!(statement.relations().len(), 1);
        assert_eq!(statement.relations()[0].terms[1].1, 1);
        assert_eq!(statement.secrets()[1].bit_length, 20);
    }

    #[test]
    fn range_bounds() {
        let params = ProofParameters {
            l_statzk: 80,
            l_H: 256,
        };
        assert_eq!(params.randomness_bits(2048), 2048 + 80 + 256);
        assert_eq!(params.response_bits(2048), 2048 + 80 + 256 + 1);
    }
}
