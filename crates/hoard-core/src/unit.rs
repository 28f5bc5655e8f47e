//! Primitive unit families that element coders marshal into.
//!
//! Every storable element type picks exactly one unit family through
//! [`Coder::Unit`](crate::coder::Coder::Unit). The family fixes the in-memory
//! buffer type used by array-like stores and the on-disk encoding used by the
//! virtual store.
//!
//! Fixed-width families (byte, short, int, long, bool, char) are encoded
//! little-endian with a constant width, so a file of `size × unit_count` of them
//! can be addressed positionally. Text families (string, big-integer text,
//! big-decimal text) are encoded as a `u32` length prefix followed by UTF-8.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::error::StorageError;

mod sealed {
    pub trait Sealed {}
}

/// Tag identifying a unit family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// Unsigned 8-bit units (`u8`).
    Byte,
    /// Signed 16-bit units (`i16`).
    Short,
    /// Signed 32-bit units (`i32`).
    Int,
    /// Signed 64-bit units (`i64`).
    Long,
    /// Boolean units.
    Bool,
    /// Unicode scalar units (`char`).
    Char,
    /// Owned UTF-8 string units.
    Str,
    /// Arbitrary-precision integers, persisted as decimal text.
    BigIntText,
    /// Arbitrary-precision decimals, persisted as decimal text.
    BigDecimalText,
}

impl UnitKind {
    /// Short lowercase name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Str => "string",
            Self::BigIntText => "big-integer-text",
            Self::BigDecimalText => "big-decimal-text",
        }
    }

    /// Whether units of this family have a constant on-disk width.
    pub fn is_fixed_width(self) -> bool {
        !matches!(self, Self::Str | Self::BigIntText | Self::BigDecimalText)
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A primitive unit an element can be marshalled into.
///
/// This trait is sealed: the set of unit families is closed, which lets the
/// stores reason about widths and encodings without per-element hooks.
/// `Default` must be the family's zero value; freshly allocated stores are
/// filled with it.
pub trait Unit: Clone + Default + fmt::Debug + PartialEq + Send + Sync + 'static + sealed::Sealed {
    /// Family tag.
    const KIND: UnitKind;

    /// On-disk width in bytes, or `None` for length-prefixed text families.
    const ENCODED_WIDTH: Option<usize>;

    /// Append the on-disk encoding of this unit to `out`.
    ///
    /// Fails with [`StorageError::InvalidArgument`] for text longer than the
    /// `u32` length prefix can describe.
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), StorageError>;

    /// Decode one unit from the front of `bytes`.
    ///
    /// Returns the unit and the number of bytes consumed.
    fn decode(bytes: &[u8]) -> Result<(Self, usize), StorageError>;
}

fn truncated(kind: UnitKind, needed: usize, available: usize) -> StorageError {
    StorageError::CorruptUnit {
        detail: format!("{kind} unit needs {needed} bytes, only {available} available"),
    }
}

fn take_fixed<const W: usize>(kind: UnitKind, bytes: &[u8]) -> Result<[u8; W], StorageError> {
    bytes
        .get(..W)
        .and_then(|s| <[u8; W]>::try_from(s).ok())
        .ok_or_else(|| truncated(kind, W, bytes.len()))
}

macro_rules! fixed_width_unit {
    ($ty:ty, $kind:expr, $width:expr) => {
        impl sealed::Sealed for $ty {}

        impl Unit for $ty {
            const KIND: UnitKind = $kind;
            const ENCODED_WIDTH: Option<usize> = Some($width);

            fn encode(&self, out: &mut Vec<u8>) -> Result<(), StorageError> {
                out.extend_from_slice(&self.to_le_bytes());
                Ok(())
            }

            fn decode(bytes: &[u8]) -> Result<(Self, usize), StorageError> {
                let raw = take_fixed::<{ $width }>($kind, bytes)?;
                Ok((<$ty>::from_le_bytes(raw), $width))
            }
        }
    };
}

fixed_width_unit!(u8, UnitKind::Byte, 1);
fixed_width_unit!(i16, UnitKind::Short, 2);
fixed_width_unit!(i32, UnitKind::Int, 4);
fixed_width_unit!(i64, UnitKind::Long, 8);

impl sealed::Sealed for bool {}

impl Unit for bool {
    const KIND: UnitKind = UnitKind::Bool;
    const ENCODED_WIDTH: Option<usize> = Some(1);

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), StorageError> {
        out.push(u8::from(*self));
        Ok(())
    }

    fn decode(bytes: &[u8]) -> Result<(Self, usize), StorageError> {
        let [b] = take_fixed::<1>(UnitKind::Bool, bytes)?;
        match b {
            0 => Ok((false, 1)),
            1 => Ok((true, 1)),
            other => Err(StorageError::CorruptUnit {
                detail: format!("bool unit byte {other:#04x} is neither 0 nor 1"),
            }),
        }
    }
}

impl sealed::Sealed for char {}

impl Unit for char {
    const KIND: UnitKind = UnitKind::Char;
    const ENCODED_WIDTH: Option<usize> = Some(4);

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), StorageError> {
        out.extend_from_slice(&u32::from(*self).to_le_bytes());
        Ok(())
    }

    fn decode(bytes: &[u8]) -> Result<(Self, usize), StorageError> {
        let raw = u32::from_le_bytes(take_fixed::<4>(UnitKind::Char, bytes)?);
        let c = char::from_u32(raw).ok_or_else(|| StorageError::CorruptUnit {
            detail: format!("{raw:#x} is not a unicode scalar value"),
        })?;
        Ok((c, 4))
    }
}

fn text_prefix(kind: UnitKind, len: usize) -> Result<[u8; 4], StorageError> {
    let len = u32::try_from(len).map_err(|_| {
        StorageError::invalid(format!(
            "{kind} unit of {len} bytes exceeds the u32 length prefix"
        ))
    })?;
    Ok(len.to_le_bytes())
}

fn encode_text(kind: UnitKind, text: &str, out: &mut Vec<u8>) -> Result<(), StorageError> {
    out.extend_from_slice(&text_prefix(kind, text.len())?);
    out.extend_from_slice(text.as_bytes());
    Ok(())
}

fn decode_text(kind: UnitKind, bytes: &[u8]) -> Result<(&str, usize), StorageError> {
    let len = u32::from_le_bytes(take_fixed::<4>(kind, bytes)?) as usize;
    let body = bytes
        .get(4..4 + len)
        .ok_or_else(|| truncated(kind, 4 + len, bytes.len()))?;
    let text = std::str::from_utf8(body).map_err(|e| StorageError::CorruptUnit {
        detail: format!("{kind} unit is not valid UTF-8: {e}"),
    })?;
    Ok((text, 4 + len))
}

impl sealed::Sealed for String {}

impl Unit for String {
    const KIND: UnitKind = UnitKind::Str;
    const ENCODED_WIDTH: Option<usize> = None;

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), StorageError> {
        encode_text(UnitKind::Str, self, out)
    }

    fn decode(bytes: &[u8]) -> Result<(Self, usize), StorageError> {
        let (text, used) = decode_text(UnitKind::Str, bytes)?;
        Ok((text.to_owned(), used))
    }
}

impl sealed::Sealed for BigInt {}

impl Unit for BigInt {
    const KIND: UnitKind = UnitKind::BigIntText;
    const ENCODED_WIDTH: Option<usize> = None;

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), StorageError> {
        encode_text(UnitKind::BigIntText, &self.to_str_radix(10), out)
    }

    fn decode(bytes: &[u8]) -> Result<(Self, usize), StorageError> {
        let (text, used) = decode_text(UnitKind::BigIntText, bytes)?;
        let value = BigInt::parse_bytes(text.as_bytes(), 10).ok_or_else(|| {
            StorageError::CorruptUnit {
                detail: format!("'{text}' is not a decimal integer"),
            }
        })?;
        Ok((value, used))
    }
}

impl sealed::Sealed for BigDecimal {}

impl Unit for BigDecimal {
    const KIND: UnitKind = UnitKind::BigDecimalText;
    const ENCODED_WIDTH: Option<usize> = None;

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), StorageError> {
        encode_text(UnitKind::BigDecimalText, &self.to_string(), out)
    }

    fn decode(bytes: &[u8]) -> Result<(Self, usize), StorageError> {
        let (text, used) = decode_text(UnitKind::BigDecimalText, bytes)?;
        let value = BigDecimal::from_str(text).map_err(|e| StorageError::CorruptUnit {
            detail: format!("'{text}' is not a decimal: {e}"),
        })?;
        Ok((value, used))
    }
}
