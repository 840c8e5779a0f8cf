//! Clearing secret big integers.
//!
//! `num-bigint` does not expose the digits of a value mutably, so clearing resets the value to 0 and
//! releases its digits. The memory they occupied is not overwritten.

use ark_std::vec::Vec;
use num_bigint::{BigInt, BigUint};
use num_traits::Zero;

pub fn zeroize_natural(x: &mut BigUint) {
    x.set_zero()
}

pub fn zeroize_integer(x: &mut BigInt) {
    x.set_zero()
}

/// Clears every element and then the vector
pub fn zeroize_naturals(xs: &mut Vec<BigUint>) {
    xs.iter_mut().for_each(zeroize_natural);
    xs.clear()
}

/// Clears every element and then the vector
pub fn zeroize_integers(xs: &mut Vec<BigInt>) {
    xs.iter_mut().for_each(zeroize_integer);
    xs.clear()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleared_values_are_zero() {
        let mut x = BigUint::from(u64::MAX) << 100;
        zeroize_natural(&mut x);
        assert!(x.is_zero());

        let mut y = BigInt::from(-12345);
        zeroize_integer(&mut y);
        assert!(y.is_zero());

        let mut xs = vec![BigUint::from(3u32), BigUint::from(5u32)];
        zeroize_naturals(&mut xs);
        assert!(xs.is_empty());

        let mut ys = vec![BigInt::from(-3), BigInt::from(5)];
        zeroize_integers(&mut ys);
        assert!(ys.is_empty());
    }
}
