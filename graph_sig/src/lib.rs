#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

//! Camenisch-Lysyanskaya signatures on graphs in the group of quadratic residues modulo a special RSA modulus.
//!
//! A signer holds a special RSA modulus `N` and a key `(S, Z, R_0, R_1, ..., R_k)` of elements of `QR_N`. A
//! graph is encoded by mapping vertices and labels to distinct primes and putting the product of the primes of
//! each vertex and edge on its own base `R_i`. The signer issues a signature on the encoded graph and on the
//! recipient's hidden master secret, after which the recipient can prove possession of the signature in zero
//! knowledge without revealing the graph.
//!
//! ## Modules
//!
//! 1. Bit length parameters - [`setup`]
//! 2. Signer key and its extension with one base per graph slot - [`keys`], [`extended_keys`]
//! 3. Proofs that the signer key is well formed - [`key_signature`], [`proof::GroupSetupProof`]
//! 4. Message slots and multi-base commitments - [`base_representation`], [`commitment`]
//! 5. Signing, verification and blinding - [`signature`]
//! 6. Interactive issuance on a hidden master secret - [`issuance`]
//! 7. Proof of possession of a signature - [`proof::PossessionProof`]
//! 8. Graph encoding - [`encoding`]
//!
//! The implementation tries to use the same variable names as the paper and thus violate Rust's naming conventions at places.
//!
//! [`setup`]: crate::setup
//! [`keys`]: crate::keys
//! [`extended_keys`]: crate::extended_keys
//! [`key_signature`]: crate::key_signature
//! [`base_representation`]: crate::base_representation
//! [`commitment`]: crate::commitment
//! [`signature`]: crate::signature
//! [`issuance`]: crate::issuance
//! [`encoding`]: crate::encoding

pub mod base_representation;
pub mod commitment;
pub mod encoding;
pub mod error;
pub mod extended_keys;
pub mod issuance;
pub mod key_signature;
pub mod keys;
pub mod proof;
pub mod setup;
pub mod signature;

pub mod prelude {
    pub use crate::{
        base_representation::{BaseCollection, BaseRepresentation, BaseType, KeyBases},
        commitment::GSCommitment,
        encoding::{Graph, GraphEdge, GraphEncoder, GraphVertex},
        error::{GraphSigError, VerificationFailure},
        extended_keys::{ExtendedKeyPair, ExtendedPrivateKey, ExtendedPublicKey},
        issuance::{IssuanceResponse, RecipientCommitment, RecipientSession, SignerSession},
        key_signature::KeySignature,
        keys::{SignerKeyPair, SignerPublicKey, SignerSecretKey},
        proof::{GroupSetupProof, PossessionProof},
        setup::{GraphEncodingParameters, KeyGenParameters},
        signature::GSSignature,
    };
}

#[cfg(test)]
#[macro_use]
pub mod tests {
    use crate::{
        extended_keys::ExtendedKeyPair,
        keys::SignerKeyPair,
        setup::{GraphEncodingParameters, KeyGenParameters},
    };
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use std::sync::OnceLock;

    #[macro_export]
    macro_rules! test_serialization {
        ($obj_type:ty, $obj: ident) => {
            // Test ark serialization
            let mut serz = vec![];
            CanonicalSerialize::serialize_compressed(&$obj, &mut serz).unwrap();
            let deserz: $obj_type =
                CanonicalDeserialize::deserialize_compressed(&serz[..]).unwrap();
            assert_eq!(deserz, $obj);

            let mut serz = vec![];
            $obj.serialize_uncompressed(&mut serz).unwrap();
            let deserz: $obj_type =
                CanonicalDeserialize::deserialize_uncompressed(&serz[..]).unwrap();
            assert_eq!(deserz, $obj);

            // Test JSON serialization
            let ser = serde_json::to_string(&$obj).unwrap();
            let deser = serde_json::from_str::<$obj_type>(&ser).unwrap();
            assert_eq!($obj, deser);

            // Test Message Pack serialization
            let ser = rmp_serde::to_vec_named(&$obj).unwrap();
            let deser = rmp_serde::from_slice::<$obj_type>(&ser).unwrap();
            assert_eq!($obj, deser);
        };
    }

    /// Smallest parameters satisfying every constraint with a 512 bit modulus
    pub fn test_params() -> KeyGenParameters {
        KeyGenParameters {
            l_n: 512,
            l_gamma: 416,
            l_rho: 64,
            l_m: 64,
            l_res: 1,
            l_e: 237,
            l_prime_e: 60,
            l_v: 788,
            l_statzk: 40,
            l_H: 128,
            l_r: 40,
            l_pt: 40,
        }
    }

    pub fn test_graph_params() -> GraphEncodingParameters {
        GraphEncodingParameters {
            l_V: 4,
            l_prime_V: 16,
            l_E: 6,
            l_L: 8,
            l_prime_L: 8,
        }
    }

    fn generate_signer_key_pair(seed: u64) -> SignerKeyPair {
        let mut rng = StdRng::seed_from_u64(seed);
        SignerKeyPair::generate(&mut rng, test_params()).unwrap()
    }

    fn generate_extended_key_pair(key_pair: &SignerKeyPair, seed: u64) -> ExtendedKeyPair {
        let mut rng = StdRng::seed_from_u64(seed);
        ExtendedKeyPair::generate(&mut rng, key_pair.clone(), test_graph_params()).unwrap()
    }

    // Safe prime generation dominates the running time of the tests so keys are generated once
    pub fn signer_key_pair() -> &'static SignerKeyPair {
        static KEY: OnceLock<SignerKeyPair> = OnceLock::new();
        KEY.get_or_init(|| generate_signer_key_pair(0))
    }

    pub fn other_signer_key_pair() -> &'static SignerKeyPair {
        static KEY: OnceLock<SignerKeyPair> = OnceLock::new();
        KEY.get_or_init(|| generate_signer_key_pair(1))
    }

    pub fn extended_key_pair() -> &'static ExtendedKeyPair {
        static KEY: OnceLock<ExtendedKeyPair> = OnceLock::new();
        KEY.get_or_init(|| generate_extended_key_pair(signer_key_pair(), 2))
    }

    pub fn other_extended_key_pair() -> &'static ExtendedKeyPair {
        static KEY: OnceLock<ExtendedKeyPair> = OnceLock::new();
        KEY.get_or_init(|| generate_extended_key_pair(other_signer_key_pair(), 3))
    }
}
