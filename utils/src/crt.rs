//! Chinese remaindering for 2 coprime moduli.

use crate::error::GroupError;
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::One;

/// Returns the unique `x` modulo `p*q` with `x = x_p mod p` and `x = x_q mod q`.
///
/// With Bezout coefficients `a*p + b*q = 1` from the extended Euclidean algorithm,
/// `x = x_p*b*q + x_q*a*p mod pq`.
pub fn compute_crt(
    x_p: &BigUint,
    p: &BigUint,
    x_q: &BigUint,
    q: &BigUint,
) -> Result<BigUint, GroupError> {
    let p = BigInt::from(p.clone());
    let q = BigInt::from(q.clone());
    let egcd = p.extended_gcd(&q);
    if !egcd.gcd.is_one() {
        return Err(GroupError::NotCoprime);
    }
    let n = &p * &q;
    let x = BigInt::from(x_p.clone()) * &egcd.y * &q + BigInt::from(x_q.clone()) * &egcd.x * &p;
    Ok(x.mod_floor(&n).into_parts().1)
}

/// Precomputed Garner coefficient for repeated recombination modulo the same `p` and `q`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrtParams {
    pub p: BigUint,
    pub q: BigUint,
    /// `p^-1 mod q`
    p_inv_q: BigUint,
}

impl CrtParams {
    pub fn new(p: BigUint, q: BigUint) -> Result<Self, GroupError> {
        let p_inv_q = crate::number_theory::mod_inverse(&BigInt::from(p.clone()), &q)
            .map_err(|_| GroupError::NotCoprime)?;
        Ok(Self { p, q, p_inv_q })
    }

    /// Same result as [`compute_crt`] but with 1 multiplication modulo `q` and no gcd.
    pub fn combine(&self, x_p: &BigUint, x_q: &BigUint) -> BigUint {
        let x_p = x_p % &self.p;
        let x_q = x_q % &self.q;
        // h = (x_q - x_p) * p^-1 mod q, computed without leaving the naturals
        let diff = (&x_q + &self.q - (&x_p % &self.q)) % &self.q;
        let h = (diff * &self.p_inv_q) % &self.q;
        x_p + h * &self.p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number_theory::generate_safe_prime;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use num_bigint::RandBigInt;

    #[test]
    fn crt_recombines_residues() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let p = generate_safe_prime(&mut rng, 64, 80).unwrap().p;
        let q = generate_safe_prime(&mut rng, 64, 80).unwrap().p;
        let n = &p * &q;
        let params = CrtParams::new(p.clone(), q.clone()).unwrap();

        let mut samples = vec![BigUint::from(0u32), BigUint::from(1u32), &n - 1u32, p.clone(), q.clone()];
        for _ in 0..50 {
            samples.push(rng.gen_biguint_below(&n));
        }
        for x in samples {
            let expected = &x % &n;
            assert_eq!(compute_crt(&(&x % &p), &p, &(&x % &q), &q).unwrap(), expected);
            assert_eq!(params.combine(&(&x % &p), &(&x % &q)), expected);
        }
    }

    #[test]
    fn crt_rejects_common_factors() {
        let six = BigUint::from(6u32);
        let nine = BigUint::from(9u32);
        assert_eq!(
            compute_crt(&BigUint::from(1u32), &six, &BigUint::from(2u32), &nine),
            Err(GroupError::NotCoprime)
        );
        assert_eq!(CrtParams::new(six, nine), Err(GroupError::NotCoprime));
    }
}
