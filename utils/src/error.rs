use serde::Serialize;

/// Errors raised by the number theory and group arithmetic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum GroupError {
    /// Requested bit length cannot produce the requested object
    InvalidBitLength(u64),
    /// A special RSA modulus is the product of two primes of equal length
    ModulusBitLengthMustBeEven(u64),
    /// Resampling did not succeed within the given number of attempts
    RetryLimitExceeded(usize),
    NotInvertible,
    /// Operation needs `p'` and `q'` but only the modulus is known
    FactorizationUnknown,
    IdenticalSafePrimes,
    NotCoprime,
    EmptyRange,
}
