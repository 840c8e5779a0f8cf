//! Message slots of commitments and signatures.
//!
//! A [`BaseRepresentation`] is a base of the signer's key together with the exponent encoded on it. Its
//! [`BaseType`] and index locate the base in the key:
//!
//! - `Base0` is `R_0` (index 0), the base of the recipient's master secret
//! - `BaseS` is `S` (index 0)
//! - `Vertex` is one of `R_1..R_{l_V}`
//! - `Edge` is one of `R_{l_V+1}..R_{l_V+l_E}`
//! - `BaseR` is any `R_i` with `i >= 1` used as a generic message slot
//!
//! `Base0`, `Vertex`, `Edge` and `BaseR` share the index space of the `R_i` so a base collection can use each
//! `R_i` once, whatever type it is referred to by.

use crate::{
    error::{GraphSigError, VerificationFailure},
    keys::SignerPublicKey,
    setup::KeyGenParameters,
};
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, SerializationError, Valid, Validate,
};
use ark_std::{
    collections::BTreeSet,
    io::{Read, Write},
    vec::Vec,
};
use gs_crypto_utils::{group::GroupElement, impl_canonical_serialization};
use num_bigint::BigInt;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use sigma_pok::context::GSContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BaseType {
    Base0,
    BaseS,
    Vertex,
    Edge,
    BaseR,
}

impl BaseType {
    fn to_byte(self) -> u8 {
        match self {
            Self::Base0 => 0,
            Self::BaseS => 1,
            Self::Vertex => 2,
            Self::Edge => 3,
            Self::BaseR => 4,
        }
    }

    fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Self::Base0),
            1 => Some(Self::BaseS),
            2 => Some(Self::Vertex),
            3 => Some(Self::Edge),
            4 => Some(Self::BaseR),
            _ => None,
        }
    }
}

impl CanonicalSerialize for BaseType {
    fn serialize_with_mode<W: Write>(
        &self,
        writer: W,
        compress: Compress,
    ) -> Result<(), SerializationError> {
        self.to_byte().serialize_with_mode(writer, compress)
    }

    fn serialized_size(&self, compress: Compress) -> usize {
        self.to_byte().serialized_size(compress)
    }
}

impl Valid for BaseType {
    fn check(&self) -> Result<(), SerializationError> {
        Ok(())
    }
}

impl CanonicalDeserialize for BaseType {
    fn deserialize_with_mode<R: Read>(
        reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        let b = u8::deserialize_with_mode(reader, compress, validate)?;
        Self::from_byte(b).ok_or(SerializationError::InvalidData)
    }
}

/// The bases of a signer's key, looked up by type and index
pub trait KeyBases {
    fn signer_public_key(&self) -> &SignerPublicKey;

    /// The key's base for this slot, `None` if the key has no such base
    fn base(&self, base_type: BaseType, index: usize) -> Option<&GroupElement>;

    /// Writes the key's public values in their canonical order
    fn append_to_context(&self, context: &mut GSContext) -> Result<(), SerializationError>;

    fn params(&self) -> &KeyGenParameters {
        &self.signer_public_key().params
    }
}

impl KeyBases for SignerPublicKey {
    fn signer_public_key(&self) -> &SignerPublicKey {
        self
    }

    fn base(&self, base_type: BaseType, index: usize) -> Option<&GroupElement> {
        match (base_type, index) {
            (BaseType::Base0, 0) => Some(&self.R_0),
            (BaseType::BaseS, 0) => Some(&self.S),
            _ => None,
        }
    }

    fn append_to_context(&self, context: &mut GSContext) -> Result<(), SerializationError> {
        self.params.append_to_context(context);
        self.append_public_values(context)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRepresentation {
    pub base: GroupElement,
    pub exponent: BigInt,
    pub base_type: BaseType,
    pub base_index: usize,
}

impl_canonical_serialization!(BaseRepresentation {
    base: ark,
    exponent: integer,
    base_type: ark,
    base_index: ark,
});

/// Identifies what a base collection may use at most once
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Slot {
    S,
    R(usize),
}

impl BaseRepresentation {
    pub fn new(base: GroupElement, exponent: BigInt, base_type: BaseType, base_index: usize) -> Self {
        Self {
            base,
            exponent,
            base_type,
            base_index,
        }
    }

    /// Representation with the key's base for the given slot
    pub fn from_key<K: KeyBases>(
        key: &K,
        base_type: BaseType,
        base_index: usize,
        exponent: BigInt,
    ) -> Result<Self, GraphSigError> {
        let base = key
            .base(base_type, base_index)
            .ok_or(GraphSigError::InvalidBaseCollection(
                VerificationFailure::UnknownBase(base_type, base_index),
            ))?;
        Ok(Self::new(base.clone(), exponent, base_type, base_index))
    }

    fn slot(&self) -> Slot {
        match self.base_type {
            BaseType::BaseS => Slot::S,
            _ => Slot::R(self.base_index),
        }
    }
}

/// The message slots of a commitment or signature
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    CanonicalSerialize,
    Serialize,
    Deserialize,
)]
pub struct BaseCollection {
    representations: Vec<BaseRepresentation>,
}

impl Valid for BaseCollection {
    fn check(&self) -> Result<(), SerializationError> {
        self.check_structure()
            .map_err(|_| SerializationError::InvalidData)
    }
}

impl CanonicalDeserialize for BaseCollection {
    fn deserialize_with_mode<R: Read>(
        reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        let collection = Self {
            representations: Vec::deserialize_with_mode(reader, compress, validate)?,
        };
        if let Validate::Yes = validate {
            collection.check()?;
        }
        Ok(collection)
    }
}

impl BaseCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, representation: BaseRepresentation) {
        self.representations.push(representation)
    }

    pub fn len(&self) -> usize {
        self.representations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.representations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BaseRepresentation> {
        self.representations.iter()
    }

    pub fn get(&self, base_type: BaseType, base_index: usize) -> Option<&BaseRepresentation> {
        self.representations
            .iter()
            .find(|r| r.base_type == base_type && r.base_index == base_index)
    }

    pub fn contains_type(&self, base_type: BaseType) -> bool {
        self.representations.iter().any(|r| r.base_type == base_type)
    }

    /// `(base, exponent)` pairs for multi-exponentiation
    pub fn terms(&self) -> Vec<(&GroupElement, &BigInt)> {
        self.representations
            .iter()
            .map(|r| (&r.base, &r.exponent))
            .collect()
    }

    /// Same structure with every exponent set to 0, which is all another party may learn
    pub fn public_clone(&self) -> Self {
        Self {
            representations: self
                .representations
                .iter()
                .map(|r| BaseRepresentation {
                    exponent: BigInt::zero(),
                    ..r.clone()
                })
                .collect(),
        }
    }

    /// Checks that every base is the key's base for its type and index and that no base is used twice
    pub fn check_consistency<K: KeyBases>(&self, key: &K) -> Result<(), VerificationFailure> {
        let mut seen = BTreeSet::new();
        for r in &self.representations {
            match key.base(r.base_type, r.base_index) {
                None => return Err(VerificationFailure::UnknownBase(r.base_type, r.base_index)),
                Some(b) if b != &r.base => {
                    return Err(VerificationFailure::BaseMismatch(r.base_type, r.base_index))
                }
                _ => (),
            }
            if !seen.insert(r.slot()) {
                return Err(if r.base_type == BaseType::Base0 {
                    VerificationFailure::DuplicateBase0
                } else {
                    VerificationFailure::DuplicateBase(r.base_type, r.base_index)
                });
            }
        }
        Ok(())
    }

    /// Checks what does not need a key: `R_0` and `S` only at index 0, every other type at a positive index
    /// and no base used twice
    pub fn check_structure(&self) -> Result<(), VerificationFailure> {
        let mut seen = BTreeSet::new();
        for r in &self.representations {
            let index_allowed = match r.base_type {
                BaseType::Base0 | BaseType::BaseS => r.base_index == 0,
                _ => r.base_index > 0,
            };
            if !index_allowed {
                return Err(VerificationFailure::UnknownBase(r.base_type, r.base_index));
            }
            if !seen.insert(r.slot()) {
                return Err(if r.base_type == BaseType::Base0 {
                    VerificationFailure::DuplicateBase0
                } else {
                    VerificationFailure::DuplicateBase(r.base_type, r.base_index)
                });
            }
        }
        Ok(())
    }

    /// Checks that every exponent fits in `l_m` bits, as required for signing
    pub fn check_message_lengths(&self, params: &KeyGenParameters) -> Result<(), GraphSigError> {
        match self
            .representations
            .iter()
            .find(|r| !params.is_message_in_range(&r.exponent))
        {
            Some(r) => Err(GraphSigError::MessageTooLong(r.base_index)),
            None => Ok(()),
        }
    }

    /// Writes the type and index of every slot, not the exponents
    pub fn append_structure_to_context(
        &self,
        context: &mut GSContext,
    ) -> Result<(), SerializationError> {
        context.append_u32(self.representations.len() as u32);
        for r in &self.representations {
            context.append(&r.base_type)?;
            context.append(&(r.base_index as u64))?;
            context.append_element(&r.base)?;
        }
        Ok(())
    }
}

impl From<Vec<BaseRepresentation>> for BaseCollection {
    fn from(representations: Vec<BaseRepresentation>) -> Self {
        Self { representations }
    }
}
