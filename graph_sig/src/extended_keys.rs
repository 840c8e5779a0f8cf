//! The signer's key extended with one base per graph encoding slot.
//!
//! The extended public key adds bases `R_1..R_k` with `k = l_V + l_E`, each a random power of `S`, and the
//! prime representatives of vertices and labels. The extended private key keeps the discrete logs of the
//! bases, index aligned with them.

use crate::{
    base_representation::{BaseType, KeyBases},
    error::GraphSigError,
    keys::{SignerKeyPair, SignerPublicKey, SignerSecretKey},
    setup::GraphEncodingParameters,
};
use ark_serialize::SerializationError;
use ark_std::{cfg_iter, collections::BTreeSet, end_timer, rand::RngCore, start_timer, vec::Vec};
use gs_crypto_utils::{
    error::GroupError,
    group::{GroupElement, QRGroup},
    impl_canonical_serialization,
    number_theory::{max_generation_attempts, random_prime_of_bit_length},
    serde_utils::ArkObjectBytes,
    zeroize_utils::zeroize_naturals,
};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use sigma_pok::context::GSContext;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedPublicKey {
    pub signer_key: SignerPublicKey,
    pub graph_params: GraphEncodingParameters,
    /// `R_1..R_k`, so `R_i` is at position `i - 1`
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub bases: Vec<GroupElement>,
    pub vertex_representatives: Vec<BigUint>,
    pub label_representatives: Vec<BigUint>,
}

impl_canonical_serialization!(ExtendedPublicKey {
    signer_key: ark,
    graph_params: ark,
    bases: ark,
    vertex_representatives: naturals,
    label_representatives: naturals,
}, check = |pk: &ExtendedPublicKey| {
    if !pk.is_valid() {
        return Err(SerializationError::InvalidData);
    }
    Ok(())
});

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedPrivateKey {
    pub signer_key: SignerSecretKey,
    /// `x_i` with `R_i = S^x_i`, at position `i - 1`
    pub discrete_logs: Vec<BigUint>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedKeyPair {
    pub public_key: ExtendedPublicKey,
    pub secret_key: ExtendedPrivateKey,
}

impl ExtendedKeyPair {
    /// Extends the signer's key with `l_V + l_E` bases and the vertex and label representatives
    pub fn generate<R: RngCore>(
        rng: &mut R,
        key_pair: SignerKeyPair,
        graph_params: GraphEncodingParameters,
    ) -> Result<Self, GraphSigError> {
        graph_params.validate()?;
        let timer = start_timer!(|| "Generate extended key pair");
        let group = key_pair.secret_key.group()?;
        let (bases, discrete_logs) = generate_bases(
            rng,
            &group,
            &key_pair.public_key.S,
            graph_params.num_bases(),
        )?;
        let error_bits = key_pair.public_key.params.l_pt;
        let vertex_representatives = distinct_primes(
            rng,
            graph_params.l_V as usize,
            graph_params.l_prime_V as u64,
            error_bits,
        )?;
        let label_representatives = distinct_primes(
            rng,
            graph_params.l_L as usize,
            graph_params.l_prime_L as u64,
            error_bits,
        )?;
        end_timer!(timer);
        Ok(Self {
            public_key: ExtendedPublicKey {
                signer_key: key_pair.public_key,
                graph_params,
                bases,
                vertex_representatives,
                label_representatives,
            },
            secret_key: ExtendedPrivateKey {
                signer_key: key_pair.secret_key,
                discrete_logs,
            },
        })
    }

    pub fn signer_key_pair(&self) -> SignerKeyPair {
        SignerKeyPair {
            public_key: self.public_key.signer_key.clone(),
            secret_key: self.secret_key.signer_key.clone(),
        }
    }
}

/// `count` bases `S^x_i` and their discrete logs. The exponents are sampled first so that the
/// exponentiations can run in parallel.
pub fn generate_bases<R: RngCore>(
    rng: &mut R,
    group: &QRGroup,
    S: &GroupElement,
    count: usize,
) -> Result<(Vec<GroupElement>, Vec<BigUint>), GraphSigError> {
    let timer = start_timer!(|| "Generate bases");
    let discrete_logs = (0..count)
        .map(|_| group.random_exponent(rng))
        .collect::<Result<Vec<_>, _>>()?;
    let bases = cfg_iter!(discrete_logs)
        .map(|x| group.pow_unsigned(S, x))
        .collect::<Vec<_>>();
    end_timer!(timer);
    Ok((bases, discrete_logs))
}

/// `count` distinct primes of exactly `bits` bits, in the order found
fn distinct_primes<R: RngCore>(
    rng: &mut R,
    count: usize,
    bits: u64,
    error_bits: u32,
) -> Result<Vec<BigUint>, GroupError> {
    let mut seen = BTreeSet::new();
    let mut primes = Vec::with_capacity(count);
    let max_attempts = max_generation_attempts(bits).saturating_add(count);
    for _ in 0..max_attempts {
        if primes.len() == count {
            return Ok(primes);
        }
        let p = random_prime_of_bit_length(rng, bits, error_bits)?;
        if seen.insert(p.clone()) {
            primes.push(p);
        }
    }
    if primes.len() == count {
        return Ok(primes);
    }
    Err(GroupError::RetryLimitExceeded(max_attempts))
}

impl ExtendedPublicKey {
    /// `R_i` for `1 <= i <= k`
    pub fn base_r(&self, i: usize) -> Option<&GroupElement> {
        i.checked_sub(1).and_then(|j| self.bases.get(j))
    }

    /// Representative of vertex `j` for `1 <= j <= l_V`
    pub fn vertex_representative(&self, j: usize) -> Option<&BigUint> {
        j.checked_sub(1)
            .and_then(|i| self.vertex_representatives.get(i))
    }

    /// Representative of label `l` for `1 <= l <= l_L`
    pub fn label_representative(&self, l: usize) -> Option<&BigUint> {
        l.checked_sub(1)
            .and_then(|i| self.label_representatives.get(i))
    }

    pub fn group(&self) -> QRGroup {
        self.signer_key.group()
    }

    /// Checks the shape of the key: one base per slot, all elements of `QR_N`, the right number of
    /// representatives and all of them distinct
    pub fn is_valid(&self) -> bool {
        let group = self.group();
        let g = &self.graph_params;
        let distinct = self
            .vertex_representatives
            .iter()
            .chain(self.label_representatives.iter())
            .collect::<BTreeSet<_>>()
            .len()
            == self.vertex_representatives.len() + self.label_representatives.len();
        self.signer_key.is_valid()
            && g.validate().is_ok()
            && self.bases.len() == g.num_bases()
            && self.vertex_representatives.len() == g.l_V as usize
            && self.label_representatives.len() == g.l_L as usize
            && distinct
            && self.bases.iter().all(|b| group.is_element(b))
    }
}

impl KeyBases for ExtendedPublicKey {
    fn signer_public_key(&self) -> &SignerPublicKey {
        &self.signer_key
    }

    fn base(&self, base_type: BaseType, index: usize) -> Option<&GroupElement> {
        let l_V = self.graph_params.l_V as usize;
        match base_type {
            BaseType::Base0 | BaseType::BaseS => self.signer_key.base(base_type, index),
            BaseType::Vertex if (1..=l_V).contains(&index) => self.base_r(index),
            BaseType::Edge if index > l_V => self.base_r(index),
            BaseType::BaseR => self.base_r(index),
            _ => None,
        }
    }

    fn append_to_context(&self, context: &mut GSContext) -> Result<(), SerializationError> {
        self.signer_key.params.append_to_context(context);
        self.graph_params.append_to_context(context);
        self.signer_key.append_public_values(context)?;
        context.append_elements(&self.bases)?;
        for r in self
            .vertex_representatives
            .iter()
            .chain(self.label_representatives.iter())
        {
            context.append_natural(r)?;
        }
        Ok(())
    }
}

impl Zeroize for ExtendedPrivateKey {
    fn zeroize(&mut self) {
        self.signer_key.zeroize();
        zeroize_naturals(&mut self.discrete_logs);
    }
}

impl Drop for ExtendedPrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for ExtendedPrivateKey {}

impl ExtendedPrivateKey {
    pub fn group(&self) -> Result<QRGroup, GraphSigError> {
        self.signer_key.group()
    }

    /// Returns an error unless this is the private key of `public_key`
    pub fn check_matches(&self, public_key: &ExtendedPublicKey) -> Result<(), GraphSigError> {
        self.signer_key.check_matches(&public_key.signer_key)?;
        if self.discrete_logs.len() != public_key.bases.len() {
            return Err(GraphSigError::KeyMismatch);
        }
        Ok(())
    }
}
