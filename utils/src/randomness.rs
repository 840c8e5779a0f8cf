//! Sampling integers from the ranges used by the proofs.
//!
//! Witness randomness in a statistical zero-knowledge proof is drawn from a symmetric interval
//! `[-2^b, 2^b]` that is `l_statzk + l_H` bits longer than the secret it hides, so that the response
//! `t + c*x` reveals nothing about the bit length of `x` except with probability `2^-l_statzk`.

use crate::error::GroupError;
use ark_std::rand::RngCore;
use num_bigint::{BigInt, BigUint, RandBigInt};
use num_traits::One;

/// Uniform integer in the closed interval `[-2^bits, 2^bits]`
pub fn random_signed_integer<R: RngCore>(rng: &mut R, bits: u64) -> BigInt {
    let bound = BigInt::one() << bits;
    let upper = &bound + 1u32;
    rng.gen_bigint_range(&-bound, &upper)
}

/// Uniform integer in `[0, 2^bits)`
pub fn random_unsigned_integer<R: RngCore>(rng: &mut R, bits: u64) -> BigUint {
    rng.gen_biguint(bits)
}

/// Uniform integer of exactly `bits` bits, i.e. in `[2^(bits-1), 2^bits)`
pub fn random_integer_with_top_bit<R: RngCore>(
    rng: &mut R,
    bits: u64,
) -> Result<BigUint, GroupError> {
    if bits == 0 {
        return Err(GroupError::InvalidBitLength(bits));
    }
    Ok((BigUint::one() << (bits - 1)) + rng.gen_biguint(bits - 1))
}

/// Returns true if `-2^bits <= x <= 2^bits`
pub fn is_within_symmetric_range(x: &BigInt, bits: u64) -> bool {
    x.magnitude() <= &(BigUint::one() << bits)
}
