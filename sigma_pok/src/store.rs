use crate::{error::ProofStoreError, urn::Urn};
use ark_std::{collections::BTreeMap, string::ToString};

/// Values of one proof session keyed by URN. Every URN can be written once per session and the store is
/// cleared or dropped when the session ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofStore<T> {
    values: BTreeMap<Urn, T>,
}

impl<T> Default for ProofStore<T> {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }
}

impl<T> ProofStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, urn: Urn, value: T) -> Result<(), ProofStoreError> {
        if self.values.contains_key(&urn) {
            return Err(ProofStoreError::DuplicateUrn(urn.to_string()));
        }
        self.values.insert(urn, value);
        Ok(())
    }

    pub fn retrieve(&self, urn: &Urn) -> Result<&T, ProofStoreError> {
        self.values
            .get(urn)
            .ok_or_else(|| ProofStoreError::MissingUrn(urn.to_string()))
    }

    pub fn remove(&mut self, urn: &Urn) -> Result<T, ProofStoreError> {
        self.values
            .remove(urn)
            .ok_or_else(|| ProofStoreError::MissingUrn(urn.to_string()))
    }

    pub fn contains(&self, urn: &Urn) -> bool {
        self.values.contains_key(urn)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// End the session, after which every URN can be written again
    pub fn clear(&mut self) {
        self.values.clear()
    }

    /// Like [`Self::clear`] but passes every value to `wipe` first
    pub fn clear_with<F: FnMut(&mut T)>(&mut self, wipe: F) {
        self.values.values_mut().for_each(wipe);
        self.values.clear()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Urn, &T)> {
        self.values.iter()
    }
}

impl<T> IntoIterator for ProofStore<T> {
    type Item = (Urn, T);
    type IntoIter = ark_std::collections::btree_map::IntoIter<Urn, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
