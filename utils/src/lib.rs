#![cfg_attr(not(feature = "std"), no_std)]

//! Arithmetic shared by the graph signature crates.
//!
//! 1. Primality testing, safe primes and special RSA moduli - [`number_theory`]
//! 2. Chinese remaindering - [`crt`]
//! 3. The group of quadratic residues modulo a special RSA modulus, with or without its
//!    factorization - [`group`]
//! 4. Sampling of integers from the ranges used by statistical zero-knowledge proofs - [`randomness`]
//! 5. Hashing bytes to challenge integers - [`hashing_utils`]
//! 6. Clearing secret integers - [`zeroize_utils`]
//!
//! [`number_theory`]: crate::number_theory
//! [`crt`]: crate::crt
//! [`group`]: crate::group
//! [`randomness`]: crate::randomness
//! [`hashing_utils`]: crate::hashing_utils
//! [`zeroize_utils`]: crate::zeroize_utils

#[macro_use]
pub mod macros;
#[macro_use]
pub mod serde_utils;
pub mod crt;
pub mod error;
pub mod group;
pub mod hashing_utils;
pub mod number_theory;
pub mod randomness;
pub mod zeroize_utils;
