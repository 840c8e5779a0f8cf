//! Primality testing, safe prime generation and special RSA moduli.
//!
//! A safe prime is a prime `p = 2p' + 1` where `p'` is also prime. A special RSA modulus is `N = p*q` for
//! distinct safe primes `p` and `q`. The group of quadratic residues modulo such an `N` is cyclic of order `p'q'`
//! which is what the signature scheme and the proofs rely on.
//!
//! All generation routines resample internally until their tests pass but the number of attempts is bounded
//! so that impossible parameters surface as [`GroupError::RetryLimitExceeded`] rather than a hang.

use crate::{error::GroupError, zeroize_utils::zeroize_natural};
use ark_std::{
    end_timer,
    rand::{rngs::StdRng, RngCore, SeedableRng},
    start_timer,
};
use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

/// Error bound used when the caller has no specific requirement, i.e. a composite passes with probability
/// at most `2^-80`.
pub const DEFAULT_PRIMALITY_ERROR_BITS: u32 = 80;

/// Odd primes below 256, used to discard most composite candidates before running Miller-Rabin.
const SMALL_PRIMES: [u32; 53] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97, 101,
    103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193, 197,
    199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Number of attempts at finding a distinct second safe prime before giving up.
const MAX_DISTINCT_PRIME_ATTEMPTS: usize = 16;

/// A prime `p = 2p' + 1` with `p'` prime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafePrime {
    pub p: BigUint,
    pub p_prime: BigUint,
}

/// `N = p*q` for distinct safe primes `p` and `q`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialRsaModulus {
    pub n: BigUint,
    pub p: SafePrime,
    pub q: SafePrime,
}

impl SpecialRsaModulus {
    pub fn new(p: SafePrime, q: SafePrime) -> Result<Self, GroupError> {
        if p.p == q.p {
            return Err(GroupError::IdenticalSafePrimes);
        }
        Ok(Self {
            n: &p.p * &q.p,
            p,
            q,
        })
    }

    /// Order of the group of quadratic residues modulo `N`, i.e. `p'q'`
    pub fn qr_order(&self) -> BigUint {
        &self.p.p_prime * &self.q.p_prime
    }
}

impl Zeroize for SafePrime {
    fn zeroize(&mut self) {
        zeroize_natural(&mut self.p);
        zeroize_natural(&mut self.p_prime);
    }
}

/// Clears the factorization. `n` is public and kept.
impl Zeroize for SpecialRsaModulus {
    fn zeroize(&mut self) {
        self.p.zeroize();
        self.q.zeroize();
    }
}

/// Number of Miller-Rabin rounds so that a composite passes with probability at most `2^-error_bits`.
/// Each round errs with probability at most `1/4`.
pub fn primality_rounds(error_bits: u32) -> usize {
    ((error_bits as usize + 1) / 2).max(1)
}

/// Probabilistic primality test. Composite numbers pass with probability at most `2^-error_bits`.
///
/// Miller-Rabin witnesses come from an RNG seeded with the hash of `n` so the answer is deterministic for
/// a given `n`, which lets verifiers check primality of values such as a signature's `e` without an RNG.
pub fn is_probable_prime(n: &BigUint, error_bits: u32) -> bool {
    let two = BigUint::from(2u32);
    if n < &two {
        return false;
    }
    if n == &two {
        return true;
    }
    if n.is_even() {
        return false;
    }
    for sp in SMALL_PRIMES {
        if (n % sp).is_zero() {
            return n == &BigUint::from(sp);
        }
    }
    // No odd factor below 256, so a composite `n` here is at least 257^2
    if n < &BigUint::from(65536u32) {
        return true;
    }
    miller_rabin(n, primality_rounds(error_bits))
}

fn miller_rabin(n: &BigUint, rounds: usize) -> bool {
    let one = BigUint::one();
    let two = BigUint::from(2u32);
    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    let mut seed = [0u8; 32];
    seed.copy_from_slice(&Sha256::digest(n.to_bytes_be()));
    let mut rng = StdRng::from_seed(seed);

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
            if x == one {
                return false;
            }
        }
        return false;
    }
    true
}

/// Returns true if `n` has a factor among the small odd primes other than `n` itself.
fn has_small_factor(n: &BigUint) -> bool {
    SMALL_PRIMES
        .iter()
        .any(|sp| (n % *sp).is_zero() && n != &BigUint::from(*sp))
}

/// Upper bound on candidates tried when searching for a prime of `bits` bits. Far above the expected
/// number of candidates so only impossible searches hit it.
pub fn max_generation_attempts(bits: u64) -> usize {
    let bits = bits as usize;
    bits.saturating_mul(bits).saturating_mul(64).max(1024)
}

/// Random odd integer of exactly `bits` bits with its 2 most significant bits set. `bits` must be at least 2.
fn random_candidate<R: RngCore>(rng: &mut R, bits: u64) -> BigUint {
    let mut candidate = rng.gen_biguint(bits);
    candidate |= (BigUint::from(3u32) << (bits - 2)) | BigUint::one();
    candidate
}

/// Generate a safe prime `p` of exactly `bits` bits. `p'` is sampled as a random odd number of `bits - 1`
/// bits with its top 2 bits set, so that `p >= 3 * 2^(bits-2)` and the product of 2 such primes has exactly
/// `2 * bits` bits.
pub fn generate_safe_prime<R: RngCore>(
    rng: &mut R,
    bits: u64,
    error_bits: u32,
) -> Result<SafePrime, GroupError> {
    if bits < 3 {
        return Err(GroupError::InvalidBitLength(bits));
    }
    let timer = start_timer!(|| "Generate safe prime");
    let max_attempts = max_generation_attempts(bits);
    for _ in 0..max_attempts {
        let p_prime = random_candidate(rng, bits - 1);
        let p = (&p_prime << 1) + 1u32;
        if has_small_factor(&p_prime) || has_small_factor(&p) {
            continue;
        }
        if is_probable_prime(&p_prime, error_bits) && is_probable_prime(&p, error_bits) {
            end_timer!(timer);
            return Ok(SafePrime { p, p_prime });
        }
    }
    end_timer!(timer);
    Err(GroupError::RetryLimitExceeded(max_attempts))
}

/// Generate a special RSA modulus of exactly `modulus_bits` bits from 2 independent safe primes of
/// `modulus_bits / 2` bits each.
pub fn compute_special_rsa_modulus<R: RngCore>(
    rng: &mut R,
    modulus_bits: u64,
    error_bits: u32,
) -> Result<SpecialRsaModulus, GroupError> {
    if modulus_bits % 2 != 0 {
        return Err(GroupError::ModulusBitLengthMustBeEven(modulus_bits));
    }
    if modulus_bits < 6 {
        return Err(GroupError::InvalidBitLength(modulus_bits));
    }
    let timer = start_timer!(|| "Compute special RSA modulus");
    let half = modulus_bits / 2;
    let p = generate_safe_prime(rng, half, error_bits)?;
    for _ in 0..MAX_DISTINCT_PRIME_ATTEMPTS {
        let q = generate_safe_prime(rng, half, error_bits)?;
        if q.p != p.p {
            end_timer!(timer);
            return SpecialRsaModulus::new(p, q);
        }
    }
    end_timer!(timer);
    Err(GroupError::IdenticalSafePrimes)
}

/// Random prime in the closed interval `[low, high]`.
pub fn random_prime_in_range<R: RngCore>(
    rng: &mut R,
    low: &BigUint,
    high: &BigUint,
    error_bits: u32,
) -> Result<BigUint, GroupError> {
    if low > high {
        return Err(GroupError::EmptyRange);
    }
    let upper = high + 1u32;
    let max_attempts = max_generation_attempts(high.bits());
    for _ in 0..max_attempts {
        let candidate = rng.gen_biguint_range(low, &upper);
        if is_probable_prime(&candidate, error_bits) {
            return Ok(candidate);
        }
    }
    Err(GroupError::RetryLimitExceeded(max_attempts))
}

/// Random prime of exactly `bits` bits.
pub fn random_prime_of_bit_length<R: RngCore>(
    rng: &mut R,
    bits: u64,
    error_bits: u32,
) -> Result<BigUint, GroupError> {
    if bits < 2 {
        return Err(GroupError::InvalidBitLength(bits));
    }
    let low = BigUint::one() << (bits - 1);
    let high = (BigUint::one() << bits) - 1u32;
    random_prime_in_range(rng, &low, &high, error_bits)
}

/// Inverse of `a` modulo `m` using the extended Euclidean algorithm. `a` may be negative.
pub fn mod_inverse(a: &BigInt, m: &BigUint) -> Result<BigUint, GroupError> {
    if m.is_zero() {
        return Err(GroupError::NotInvertible);
    }
    let m = BigInt::from(m.clone());
    let a = a.mod_floor(&m);
    let egcd = a.extended_gcd(&m);
    if !egcd.gcd.is_one() {
        return Err(GroupError::NotInvertible);
    }
    Ok(egcd.x.mod_floor(&m).into_parts().1)
}

/// Jacobi symbol `(a/n)` for odd `n`. Returns 0 when `gcd(a, n) != 1`.
pub fn jacobi(a: &BigUint, n: &BigUint) -> i8 {
    let low_bits = |x: &BigUint, m: u32| (x % m).to_u32().unwrap_or(0);
    let mut a = a % n;
    let mut n = n.clone();
    let mut result = 1i8;
    while !a.is_zero() {
        while a.is_even() {
            a >>= 1;
            let r = low_bits(&n, 8);
            if r == 3 || r == 5 {
                result = -result;
            }
        }
        core::mem::swap(&mut a, &mut n);
        if low_bits(&a, 4) == 3 && low_bits(&n, 4) == 3 {
            result = -result;
        }
        a = &a % &n;
    }
    if n.is_one() {
        result
    } else {
        0
    }
}

/// `|n|` as a natural number
pub fn magnitude(n: &BigInt) -> BigUint {
    n.abs().into_parts().1
}
