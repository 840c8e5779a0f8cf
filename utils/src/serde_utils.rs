//! Serialization helpers.
//!
//! Objects implementing `CanonicalSerialize` are given serde support through [`ArkObjectBytes`], and
//! arbitrary precision integers, which do not implement the arkworks traits, are given a canonical
//! encoding of a sign byte followed by the length prefixed big-endian magnitude.

use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, SerializationError, Validate,
};
use ark_std::{
    io::{self, Read, Write},
    string::ToString,
    vec::Vec,
};
use num_bigint::{BigInt, BigUint, Sign};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{DeserializeAs, SerializeAs};

pub type ArkObjectBytes = AsCanonical;

// This is taken from the expanded [`serde_with::serde_conv!`] macro but generalized for any `T: CanonicalSerialize + CanonicalDeserialize`

pub struct AsCanonical;
impl AsCanonical {
    pub fn serialize<S, T>(x: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: CanonicalSerialize,
        S: Serializer,
    {
        let size = x.compressed_size();
        let mut bytes = Vec::with_capacity(size);
        x.serialize_compressed(&mut bytes)
            .map_err(serde::ser::Error::custom)?;
        Serialize::serialize(&bytes, serializer)
    }
    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        T: CanonicalDeserialize,
        D: Deserializer<'de>,
    {
        let y: Vec<u8> = Deserialize::deserialize(deserializer)?;
        T::deserialize_compressed(y.as_slice()).map_err(serde::de::Error::custom)
    }
}

impl<T> SerializeAs<T> for AsCanonical
where
    T: CanonicalSerialize,
{
    fn serialize_as<S>(x: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Self::serialize(x, serializer)
    }
}
impl<'de, T> DeserializeAs<'de, T> for AsCanonical
where
    T: CanonicalDeserialize,
{
    fn deserialize_as<D>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
    {
        Self::deserialize(deserializer)
    }
}

#[derive(Serialize)]
#[serde(remote = "SerializationError")]
pub enum ArkSerializationError {
    /// During serialization, we didn't have enough space to write extra info.
    NotEnoughSpace,
    /// During serialization, the data was invalid.
    InvalidData,
    /// During serialization, non-empty flags were given where none were
    /// expected.
    UnexpectedFlags,
    /// During serialization, we countered an I/O error.
    #[serde(serialize_with = "io_error_string")]
    IoError(io::Error),
}

fn io_error_string<S>(error: &io::Error, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&error.to_string())
}

/// Write a natural number as its length prefixed big-endian bytes. Zero is written as an empty byte string.
pub fn serialize_natural<W: Write>(
    n: &BigUint,
    writer: W,
    compress: Compress,
) -> Result<(), SerializationError> {
    natural_bytes(n).serialize_with_mode(writer, compress)
}

pub fn natural_serialized_size(n: &BigUint, compress: Compress) -> usize {
    natural_bytes(n).serialized_size(compress)
}

pub fn deserialize_natural<R: Read>(
    reader: R,
    compress: Compress,
    validate: Validate,
) -> Result<BigUint, SerializationError> {
    let bytes = Vec::<u8>::deserialize_with_mode(reader, compress, validate)?;
    // Leading zeros would give 2 encodings of the same number
    if validate == Validate::Yes && bytes.first() == Some(&0) {
        return Err(SerializationError::InvalidData);
    }
    Ok(BigUint::from_bytes_be(&bytes))
}

/// Write an integer as a sign byte (1 for negative, 0 otherwise) followed by its magnitude as in
/// [`serialize_natural`].
pub fn serialize_integer<W: Write>(
    n: &BigInt,
    mut writer: W,
    compress: Compress,
) -> Result<(), SerializationError> {
    let sign_byte = u8::from(n.sign() == Sign::Minus);
    sign_byte.serialize_with_mode(&mut writer, compress)?;
    serialize_natural(n.magnitude(), writer, compress)
}

pub fn integer_serialized_size(n: &BigInt, compress: Compress) -> usize {
    1 + natural_serialized_size(n.magnitude(), compress)
}

pub fn deserialize_integer<R: Read>(
    mut reader: R,
    compress: Compress,
    validate: Validate,
) -> Result<BigInt, SerializationError> {
    let sign_byte = u8::deserialize_with_mode(&mut reader, compress, validate)?;
    let magnitude = deserialize_natural(reader, compress, validate)?;
    match sign_byte {
        0 => Ok(BigInt::from(magnitude)),
        // Negative zero is not a canonical encoding
        1 if magnitude != BigUint::default() => Ok(-BigInt::from(magnitude)),
        _ => Err(SerializationError::InvalidData),
    }
}

/// Write a vector of natural numbers as its length followed by each number as in [`serialize_natural`]
pub fn serialize_naturals<W: Write>(
    v: &[BigUint],
    mut writer: W,
    compress: Compress,
) -> Result<(), SerializationError> {
    (v.len() as u64).serialize_with_mode(&mut writer, compress)?;
    for n in v {
        serialize_natural(n, &mut writer, compress)?;
    }
    Ok(())
}

pub fn naturals_serialized_size(v: &[BigUint], compress: Compress) -> usize {
    8 + v
        .iter()
        .map(|n| natural_serialized_size(n, compress))
        .sum::<usize>()
}

pub fn deserialize_naturals<R: Read>(
    mut reader: R,
    compress: Compress,
    validate: Validate,
) -> Result<Vec<BigUint>, SerializationError> {
    let len = u64::deserialize_with_mode(&mut reader, compress, validate)?;
    (0..len)
        .map(|_| deserialize_natural(&mut reader, compress, validate))
        .collect()
}

/// Implements `CanonicalSerialize`, `Valid` and `CanonicalDeserialize` for a struct with named fields by
/// serializing the fields in the given order. Each field is marked `natural` for a `BigUint`, `naturals` for
/// a `Vec<BigUint>`, `integer` for a `BigInt` or `ark` for any type already implementing the arkworks traits.
///
/// An optional `check = f` names a `fn(&Self) -> Result<(), SerializationError>` used by `Valid`, which
/// deserialization runs with `Validate::Yes`.
#[macro_export]
macro_rules! impl_canonical_serialization {
    ($type:ident { $($field:ident: $kind:ident),+ $(,)? }) => {
        $crate::impl_canonical_serialization!($type { $($field: $kind),+ }, check = |_: &$type| Ok(()));
    };
    ($type:ident { $($field:ident: $kind:ident),+ $(,)? }, check = $check:expr) => {
        impl ark_serialize::CanonicalSerialize for $type {
            fn serialize_with_mode<W: ark_std::io::Write>(
                &self,
                mut writer: W,
                compress: ark_serialize::Compress,
            ) -> Result<(), ark_serialize::SerializationError> {
                $( $crate::canonical_field!(serialize, $kind, &self.$field, &mut writer, compress)?; )+
                Ok(())
            }

            fn serialized_size(&self, compress: ark_serialize::Compress) -> usize {
                0 $( + $crate::canonical_field!(size, $kind, &self.$field, compress) )+
            }
        }

        impl ark_serialize::Valid for $type {
            fn check(&self) -> Result<(), ark_serialize::SerializationError> {
                let check: fn(&$type) -> Result<(), ark_serialize::SerializationError> = $check;
                check(self)
            }
        }

        impl ark_serialize::CanonicalDeserialize for $type {
            fn deserialize_with_mode<R: ark_std::io::Read>(
                mut reader: R,
                compress: ark_serialize::Compress,
                validate: ark_serialize::Validate,
            ) -> Result<Self, ark_serialize::SerializationError> {
                let result = Self {
                    $( $field: $crate::canonical_field!(deserialize, $kind, &mut reader, compress, validate)?, )+
                };
                if let ark_serialize::Validate::Yes = validate {
                    ark_serialize::Valid::check(&result)?;
                }
                Ok(result)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! canonical_field {
    (serialize, natural, $v:expr, $w:expr, $c:expr) => {
        $crate::serde_utils::serialize_natural($v, $w, $c)
    };
    (serialize, naturals, $v:expr, $w:expr, $c:expr) => {
        $crate::serde_utils::serialize_naturals($v, $w, $c)
    };
    (serialize, integer, $v:expr, $w:expr, $c:expr) => {
        $crate::serde_utils::serialize_integer($v, $w, $c)
    };
    (serialize, ark, $v:expr, $w:expr, $c:expr) => {
        ark_serialize::CanonicalSerialize::serialize_with_mode($v, $w, $c)
    };
    (size, natural, $v:expr, $c:expr) => {
        $crate::serde_utils::natural_serialized_size($v, $c)
    };
    (size, naturals, $v:expr, $c:expr) => {
        $crate::serde_utils::naturals_serialized_size($v, $c)
    };
    (size, integer, $v:expr, $c:expr) => {
        $crate::serde_utils::integer_serialized_size($v, $c)
    };
    (size, ark, $v:expr, $c:expr) => {
        ark_serialize::CanonicalSerialize::serialized_size($v, $c)
    };
    (deserialize, natural, $r:expr, $c:expr, $val:expr) => {
        $crate::serde_utils::deserialize_natural($r, $c, $val)
    };
    (deserialize, naturals, $r:expr, $c:expr, $val:expr) => {
        $crate::serde_utils::deserialize_naturals($r, $c, $val)
    };
    (deserialize, integer, $r:expr, $c:expr, $val:expr) => {
        $crate::serde_utils::deserialize_integer($r, $c, $val)
    };
    (deserialize, ark, $r:expr, $c:expr, $val:expr) => {
        ark_serialize::CanonicalDeserialize::deserialize_with_mode($r, $c, $val)
    };
}

fn natural_bytes(n: &BigUint) -> Vec<u8> {
    if n == &BigUint::default() {
        Vec::new()
    } else {
        n.to_bytes_be()
    }
}
