#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

//! Fiat-Shamir sigma protocols proving knowledge of discrete logs in the group of quadratic residues modulo
//! an RSA modulus, whose order is unknown to the prover.
//!
//! Since the order is unknown, responses cannot be reduced modulo it. They are computed over the integers and
//! the witness randomness is chosen `l_statzk + l_H` bits longer than the secret so that `t~ + c*x` hides `x`
//! statistically. The verifier checks the length of each response, which also proves a bound on the secret.
//!
//! ## Modules
//!
//! 1. Description of what is proven: secrets and relations - [`statement`]
//! 2. Naming and storage of per-session values - [`urn`], [`store`]
//! 3. Transcript hashed into the challenge - [`context`]
//! 4. Prover's commitment and response phases - [`protocol`]
//! 5. The proof and its verification - [`proof`]
//! 6. Running a complete proof or verification - [`orchestrator`]
//!
//! [`statement`]: crate::statement
//! [`urn`]: crate::urn
//! [`store`]: crate::store
//! [`context`]: crate::context
//! [`protocol`]: crate::protocol
//! [`proof`]: crate::proof
//! [`orchestrator`]: crate::orchestrator

pub mod context;
pub mod error;
pub mod orchestrator;
pub mod proof;
pub mod protocol;
pub mod statement;
pub mod store;
pub mod urn;

pub mod prelude {
    pub use crate::{
        context::GSContext,
        error::{ProofStoreError, SigmaError, VerificationFailure},
        orchestrator::{ProverOrchestrator, VerifierOrchestrator},
        proof::ProofSignature,
        protocol::SigmaProtocol,
        statement::{ProofParameters, SigmaStatement},
        store::ProofStore,
        urn::{Urn, UrnRole},
    };
}

#[cfg(test)]
#[macro_use]
pub mod tests {
    #[macro_export]
    macro_rules! test_serialization {
        ($obj_type:ty, $obj: ident) => {
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

            let ser = serde_json::to_string(&$obj).unwrap();
            let deser = serde_json::from_str::<$obj_type>(&ser).unwrap();
            assert_eq!($obj, deser);

            let ser = rmp_serde::to_vec_named(&$obj).unwrap();
            let deser = rmp_serde::from_slice::<$obj_type>(&ser).unwrap();
            assert_eq!($obj, deser);
        };
    }
}
