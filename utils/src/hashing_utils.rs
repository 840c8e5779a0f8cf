use digest::Digest;
use num_bigint::BigUint;

/// Hash bytes to a natural number of at most `bits` bits. When the digest output is shorter than `bits`,
/// it is extended by hashing the input again with an incrementing 4 byte big-endian counter. The result
/// keeps the most significant `bits` bits of the expanded output.
/// This is vulnerable to timing attack and is only used when the input is public anyway like the
/// transcript of a Fiat-Shamir proof.
pub fn integer_from_hash<D: Digest>(bytes: &[u8], bits: u64) -> BigUint {
    let byte_len = ((bits + 7) / 8) as usize;
    let mut out = D::digest(bytes).to_vec();
    let mut counter = 1u32;
    while out.len() < byte_len {
        out.extend_from_slice(&D::digest(concat_slices!(bytes, counter.to_be_bytes())));
        counter += 1;
    }
    out.truncate(byte_len);
    BigUint::from_bytes_be(&out) >> (byte_len as u64 * 8 - bits)
}

/// Hash bytes to a natural number of exactly `bits` bits by forcing the top bit. Used for nonces and
/// other values which should have a fixed length.
pub fn integer_with_top_bit_from_hash<D: Digest>(bytes: &[u8], bits: u64) -> BigUint {
    let mut n = integer_from_hash::<D>(bytes, bits);
    if bits > 0 {
        n |= BigUint::from(1u32) << (bits - 1);
    }
    n
}
