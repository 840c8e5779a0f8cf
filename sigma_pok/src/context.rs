//! The transcript hashed into a Fiat-Shamir challenge.
//!
//! Prover and verifier must feed byte-identical input, so every value is appended in a canonical encoding:
//! labels and byte strings are length prefixed, `u32`s are written little-endian as by `CanonicalSerialize`,
//! integers as a sign byte followed by their length prefixed big-endian magnitude and group elements as
//! their length prefixed big-endian residue.

use ark_serialize::{CanonicalSerialize, Compress, SerializationError};
use ark_std::{io::Write, vec::Vec};
use digest::Digest;
use gs_crypto_utils::{
    group::GroupElement,
    hashing_utils::integer_from_hash,
    serde_utils::{serialize_integer, serialize_natural},
};
use num_bigint::{BigInt, BigUint};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GSContext {
    bytes: Vec<u8>,
}

impl GSContext {
    /// Start a transcript with a label identifying the kind of proof, so that a proof of one kind cannot be
    /// replayed as another
    pub fn new(domain_label: &[u8]) -> Self {
        let mut context = Self::default();
        context.append_bytes(domain_label);
        context
    }

    pub fn append_bytes(&mut self, bytes: &[u8]) {
        self.bytes
            .extend_from_slice(&(bytes.len() as u64).to_le_bytes());
        self.bytes.extend_from_slice(bytes);
    }

    pub fn append_u32(&mut self, x: u32) {
        self.bytes.extend_from_slice(&x.to_le_bytes());
    }

    pub fn append_element(&mut self, element: &GroupElement) -> Result<(), SerializationError> {
        element.serialize_compressed(&mut self.bytes)
    }

    pub fn append_elements<'a>(
        &mut self,
        elements: impl IntoIterator<Item = &'a GroupElement>,
    ) -> Result<(), SerializationError> {
        for e in elements {
            self.append_element(e)?;
        }
        Ok(())
    }

    pub fn append_natural(&mut self, n: &BigUint) -> Result<(), SerializationError> {
        serialize_natural(n, &mut self.bytes, Compress::Yes)
    }

    pub fn append_integer(&mut self, n: &BigInt) -> Result<(), SerializationError> {
        serialize_integer(n, &mut self.bytes, Compress::Yes)
    }

    pub fn append<T: CanonicalSerialize>(&mut self, value: &T) -> Result<(), SerializationError> {
        value.serialize_compressed(&mut self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Challenge of `bits` bits derived from the transcript so far
    pub fn challenge<D: Digest>(&self, bits: u32) -> BigUint {
        integer_from_hash::<D>(&self.bytes, bits as u64)
    }
}

impl Write for GSContext {
    fn write(&mut self, buf: &[u8]) -> ark_std::io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> ark_std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blake2::Blake2b512;
    use sha2::Sha256;

    fn sample_context() -> GSContext {
        let mut context = GSContext::new(b"test");
        context.append_u32(2048);
        context.append_element(&GroupElement::from(12345u32)).unwrap();
        context.append_integer(&BigInt::from(-77)).unwrap();
        context.append_natural(&BigUint::from(77u32)).unwrap();
        context
    }

    #[test]
    fn challenge_is_deterministic() {
        let a = sample_context();
        let b = sample_context();
        assert_eq!(a, b);
        assert_eq!(a.challenge::<Sha256>(256), b.challenge::<Sha256>(256));
        assert_eq!(
            a.challenge::<Blake2b512>(128),
            b.challenge::<Blake2b512>(128)
        );
        assert!(a.challenge::<Sha256>(80).bits() <= 80);
    }

    #[test]
    fn every_field_changes_challenge() {
        let base = sample_context().challenge::<Sha256>(256);

        let mut altered = vec![];
        let mut c = GSContext::new(b"tesT");
        c.append_u32(2048);
        c.append_element(&GroupElement::from(12345u32)).unwrap();
        c.append_integer(&BigInt::from(-77)).unwrap();
        c.append_natural(&BigUint::from(77u32)).unwrap();
        altered.push(c);

        let mut c = GSContext::new(b"test");
        c.append_u32(2049);
        c.append_element(&GroupElement::from(12345u32)).unwrap();
        c.append_integer(&BigInt::from(-77)).unwrap();
        c.append_natural(&BigUint::from(77u32)).unwrap();
        altered.push(c);

        let mut c = GSContext::new(b"test");
        c.append_u32(2048);
        c.append_element(&GroupElement::from(12346u32)).unwrap();
        c.append_integer(&BigInt::from(-77)).unwrap();
        c.append_natural(&BigUint::from(77u32)).unwrap();
        altered.push(c);

        // Only the sign differs
        let mut c = GSContext::new(b"test");
        c.append_u32(2048);
        c.append_element(&GroupElement::from(12345u32)).unwrap();
        c.append_integer(&BigInt::from(77)).unwrap();
        c.append_natural(&BigUint::from(77u32)).unwrap();
        altered.push(c);

        let mut c = sample_context();
        c.append_bytes(b"");
        altered.push(c);

        for c in altered {
            assert_ne!(c.challenge::<Sha256>(256), base);
        }
    }

    #[test]
    fn write_appends_raw_bytes() {
        let mut c = GSContext::default();
        c.write_all(&[1, 2, 3]).unwrap();
        assert_eq!(c.as_bytes(), &[1, 2, 3]);

        // Length prefixes keep concatenations of labels apart
        let mut a = GSContext::new(b"ab");
        a.append_bytes(b"c");
        let mut b = GSContext::new(b"a");
        b.append_bytes(b"bc");
        assert_ne!(a.as_bytes(), b.as_bytes());
    }
}
