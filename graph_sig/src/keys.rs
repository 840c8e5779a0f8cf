//! The signer's base key pair.
//!
//! The public key is `(N, S, Z, R_0)` where `N` is a special RSA modulus, `S` generates `QR_N` and
//! `Z = S^x_Z`, `R_0 = S^x_R0` for `x_Z, x_R0` uniform in `[2, p'q' - 1]`. `R_0` is the base of the
//! recipient's master secret. The secret key is the factorization of `N` and the discrete logs.

use crate::{error::GraphSigError, setup::KeyGenParameters};
use ark_serialize::SerializationError;
use ark_std::{end_timer, rand::RngCore, start_timer};
use gs_crypto_utils::{
    group::{GroupElement, QRGroup},
    impl_canonical_serialization,
    number_theory::{compute_special_rsa_modulus, SpecialRsaModulus},
    serde_utils::ArkObjectBytes,
    zeroize_utils::zeroize_natural,
};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use sigma_pok::context::GSContext;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerPublicKey {
    pub params: KeyGenParameters,
    pub N: BigUint,
    #[serde_as(as = "ArkObjectBytes")]
    pub S: GroupElement,
    #[serde_as(as = "ArkObjectBytes")]
    pub Z: GroupElement,
    #[serde_as(as = "ArkObjectBytes")]
    pub R_0: GroupElement,
}

impl_canonical_serialization!(SignerPublicKey {
    params: ark,
    N: natural,
    S: ark,
    Z: ark,
    R_0: ark,
}, check = |pk: &SignerPublicKey| {
    if pk.params.validate().is_err() || !pk.is_valid() {
        return Err(SerializationError::InvalidData);
    }
    Ok(())
});

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerSecretKey {
    pub modulus: SpecialRsaModulus,
    pub x_R0: BigUint,
    pub x_Z: BigUint,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerKeyPair {
    pub public_key: SignerPublicKey,
    pub secret_key: SignerSecretKey,
}

impl SignerKeyPair {
    /// Generates a special RSA modulus of `l_n` bits, a generator `S` of `QR_N` and `Z`, `R_0` as random
    /// powers of `S`. Fails before generating anything if the parameters are invalid.
    pub fn generate<R: RngCore>(
        rng: &mut R,
        params: KeyGenParameters,
    ) -> Result<Self, GraphSigError> {
        params.validate()?;
        let timer = start_timer!(|| "Generate signer key pair");
        let modulus = compute_special_rsa_modulus(rng, params.l_n as u64, params.l_pt)?;
        let group = QRGroup::new_pq(modulus.clone())?;
        let S = group.create_generator(rng)?;
        let x_Z = group.random_exponent(rng)?;
        let x_R0 = group.random_exponent(rng)?;
        let Z = group.pow_unsigned(&S, &x_Z);
        let R_0 = group.pow_unsigned(&S, &x_R0);
        end_timer!(timer);
        Ok(Self {
            public_key: SignerPublicKey {
                params,
                N: modulus.n.clone(),
                S,
                Z,
                R_0,
            },
            secret_key: SignerSecretKey {
                modulus,
                x_R0,
                x_Z,
            },
        })
    }
}

impl SignerSecretKey {
    /// `QR_N` with the factorization
    pub fn group(&self) -> Result<QRGroup, GraphSigError> {
        Ok(QRGroup::new_pq(self.modulus.clone())?)
    }

    /// Returns an error unless this is the secret key of `public_key`
    pub fn check_matches(&self, public_key: &SignerPublicKey) -> Result<(), GraphSigError> {
        if self.modulus.n != public_key.N {
            return Err(GraphSigError::KeyMismatch);
        }
        Ok(())
    }
}

impl Zeroize for SignerSecretKey {
    fn zeroize(&mut self) {
        self.modulus.zeroize();
        zeroize_natural(&mut self.x_R0);
        zeroize_natural(&mut self.x_Z);
    }
}

impl Drop for SignerSecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for SignerSecretKey {}

impl SignerPublicKey {
    /// `QR_N` without the factorization
    pub fn group(&self) -> QRGroup {
        QRGroup::new_n(self.N.clone())
    }

    /// Checks what can be checked without the factorization: `N` has `l_n` bits and `S`, `Z`, `R_0` are units
    /// with Jacobi symbol 1 and `S` is not 1. Honest generation is proven with
    /// [`crate::key_signature::KeySignature`] or [`crate::proof::GroupSetupProof`].
    pub fn is_valid(&self) -> bool {
        let group = self.group();
        self.N.bits() == self.params.l_n as u64
            && !self.S.is_one()
            && [&self.S, &self.Z, &self.R_0]
                .into_iter()
                .all(|x| group.is_element(x))
    }

    /// Writes `N, S, Z, R_0`
    pub fn append_public_values(&self, context: &mut GSContext) -> Result<(), SerializationError> {
        context.append_natural(&self.N)?;
        context.append_elements([&self.S, &self.Z, &self.R_0])
    }
}
