//! Field wrapper library.
//!
//! Every value that can appear in a record implements [`Wire`]: decode from a
//! [`ByteReader`], encode into a `Vec<u8>`, report its exact encoded size, and
//! convert to and from a JSON value.  The offset hooks default to "nothing to
//! report"; hash identifiers and containers of other values override them.
//!
//! | Wrapper              | Binary form                          | Text form                      |
//! | -------------------- | ------------------------------------ | ------------------------------ |
//! | integers, `f32`      | native width, little-endian          | number (floats rounded to 3dp) |
//! | [`PrecisionFloat`]   | `f32`                                | number rounded to 3dp          |
//! | [`HashId`]           | `u32`                                | resolved name or `0x%08X`      |
//! | [`SizedString<S>`]   | `S` length, then UTF-8 bytes         | string                         |
//! | [`Array<T, S, H>`]   | `S` count, then elements             | list                           |
//! | `[T; N]`             | `N` elements                         | list of exactly `N`            |
//! | [`Optional<T>`]      | `T` or nothing                       | value or `null`                |
//! | [`Enum<E>`]          | `E::Repr`                            | declared symbolic name         |
//! | [`Raw`]              | every remaining payload byte         | hex string                     |

use std::io;

use byteorder::{LittleEndian, WriteBytesExt};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::bytes::ByteReader;
use crate::hash::{HashDictionary, HashId};

mod array;
mod enumeration;
mod float;
mod optional;
mod raw;
mod string;

pub use array::Array;
pub use enumeration::{Enum, Symbolic};
pub use float::PrecisionFloat;
pub use optional::Optional;
pub use raw::Raw;
pub use string::SizedString;

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum WireError {
    /// Decode needed more bytes than the buffer holds.
    #[error("unexpected end of data at offset {offset}: needed {needed} byte(s), {available} available")]
    Truncated { offset: usize, needed: usize, available: usize },
    #[error("{container}: no variant declared for tag {tag}")]
    UnknownTag { container: &'static str, tag: u8 },
    #[error("{container}: no variant named \"{name}\"")]
    UnknownType { container: &'static str, name: String },
    #[error("missing field \"{0}\"")]
    MissingField(String),
    #[error("expected {expected}, found {found}")]
    TextMismatch { expected: &'static str, found: String },
    #[error("{enum_name}: value {value} has no symbolic name")]
    UnknownEnumValue { enum_name: &'static str, value: String },
    #[error("{enum_name}: unknown symbolic name \"{name}\"")]
    UnknownEnumName { enum_name: &'static str, name: String },
    /// Content does not fit the width of its size prefix.
    #[error("length {len} exceeds the maximum of {max} for its size prefix")]
    LengthOverflow { len: usize, max: usize },
    #[error("fixed array expects {expected} element(s), found {found}")]
    FixedLength { expected: usize, found: usize },
    #[error("presence mask {mask:#010x} sets bits beyond the {fields} declared field(s)")]
    UnknownPresenceBits { mask: u32, fields: usize },
    #[error("string at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },
    #[error("cannot render non-finite float {0} as text")]
    NonFiniteFloat(f32),
    #[error("{field}: {source}")]
    InField { field: String, #[source] source: Box<WireError> },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl WireError {
    /// Prefix the error with the name of the field it occurred in.
    pub fn in_field(self, field: impl Into<String>) -> Self {
        WireError::InField { field: field.into(), source: Box::new(self) }
    }

    /// The innermost error once field context is stripped.
    pub fn root(&self) -> &WireError {
        match self {
            WireError::InField { source, .. } => source.root(),
            other => other,
        }
    }
}

// ── Wire trait ───────────────────────────────────────────────────────────────

/// The four-operation contract shared by every field wrapper and record.
pub trait Wire: Sized {
    fn decode(r: &mut ByteReader<'_>) -> Result<Self, WireError>;

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), WireError>;

    /// Exact number of bytes `encode` will append.
    fn size(&self) -> usize;

    fn to_text(&self, dict: &HashDictionary) -> Result<Value, WireError>;

    fn from_text(value: &Value) -> Result<Self, WireError>;

    /// The hash this value holds, if it is a hash identifier.
    fn hash_value(&self) -> Option<HashId> {
        None
    }

    /// Report absolute offsets of flagged hash references inside this value,
    /// which starts at `at`.
    fn hash_offsets(&self, _at: u32, _out: &mut Vec<u32>) {}

    fn archive_offsets(&self, _at: u32, _out: &mut Vec<u32>) {}

    /// Collect the archive references themselves.
    fn archive_refs(&self, _out: &mut Vec<HashId>) {}
}

// ── Size prefixes ────────────────────────────────────────────────────────────

/// Integer type used as a length or count prefix.
pub trait SizeTag {
    const WIDTH: usize;
    const LIMIT: usize;

    fn read(r: &mut ByteReader<'_>) -> Result<usize, WireError>;

    /// Write `n`, rejecting values the prefix cannot hold.
    fn write(out: &mut Vec<u8>, n: usize) -> Result<(), WireError>;
}

fn check_len(len: usize, max: usize) -> Result<(), WireError> {
    if len > max {
        return Err(WireError::LengthOverflow { len, max });
    }
    Ok(())
}

impl SizeTag for u8 {
    const WIDTH: usize = 1;
    const LIMIT: usize = u8::MAX as usize;

    fn read(r: &mut ByteReader<'_>) -> Result<usize, WireError> {
        Ok(r.read_u8()? as usize)
    }

    fn write(out: &mut Vec<u8>, n: usize) -> Result<(), WireError> {
        check_len(n, Self::LIMIT)?;
        out.write_u8(n as u8)?;
        Ok(())
    }
}

impl SizeTag for u16 {
    const WIDTH: usize = 2;
    const LIMIT: usize = u16::MAX as usize;

    fn read(r: &mut ByteReader<'_>) -> Result<usize, WireError> {
        Ok(r.read_u16()? as usize)
    }

    fn write(out: &mut Vec<u8>, n: usize) -> Result<(), WireError> {
        check_len(n, Self::LIMIT)?;
        out.write_u16::<LittleEndian>(n as u16)?;
        Ok(())
    }
}

impl SizeTag for u32 {
    const WIDTH: usize = 4;
    const LIMIT: usize = u32::MAX as usize;

    fn read(r: &mut ByteReader<'_>) -> Result<usize, WireError> {
        Ok(r.read_u32()? as usize)
    }

    fn write(out: &mut Vec<u8>, n: usize) -> Result<(), WireError> {
        check_len(n, Self::LIMIT)?;
        out.write_u32::<LittleEndian>(n as u32)?;
        Ok(())
    }
}

// ── Text helpers ─────────────────────────────────────────────────────────────

/// Short description of a JSON value for mismatch messages.
pub(crate) fn describe(value: &Value) -> String {
    let s = value.to_string();
    if s.len() > 40 {
        format!("{}…", &s[..s.char_indices().nth(40).map_or(s.len(), |(i, _)| i)])
    } else {
        s
    }
}

pub fn expect_object(value: &Value) -> Result<&Map<String, Value>, WireError> {
    value.as_object().ok_or_else(|| WireError::TextMismatch {
        expected: "object",
        found:    describe(value),
    })
}

pub fn expect_array(value: &Value) -> Result<&Vec<Value>, WireError> {
    value.as_array().ok_or_else(|| WireError::TextMismatch {
        expected: "list",
        found:    describe(value),
    })
}

/// Look up a field that must be present.
pub fn required<'v>(map: &'v Map<String, Value>, name: &str) -> Result<&'v Value, WireError> {
    map.get(name).ok_or_else(|| WireError::MissingField(name.to_owned()))
}

/// Round to three decimal places for text output.
pub(crate) fn float_to_text(v: f32) -> Result<Value, WireError> {
    let rounded = ((v as f64) * 1000.0).round() / 1000.0;
    Number::from_f64(rounded)
        .map(Value::Number)
        .ok_or(WireError::NonFiniteFloat(v))
}

pub(crate) fn float_from_text(value: &Value) -> Result<f32, WireError> {
    value.as_f64().map(|v| v as f32).ok_or_else(|| WireError::TextMismatch {
        expected: "number",
        found:    describe(value),
    })
}

// ── Fixed values ─────────────────────────────────────────────────────────────

macro_rules! fixed_int {
    ($ty:ty, $read:ident, |$out:ident, $v:ident| $write:expr, $as:ident) => {
        impl Wire for $ty {
            #[inline]
            fn decode(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
                r.$read()
            }

            #[inline]
            fn encode(&self, $out: &mut Vec<u8>) -> Result<(), WireError> {
                let $v = *self;
                $write?;
                Ok(())
            }

            #[inline]
            fn size(&self) -> usize {
                std::mem::size_of::<$ty>()
            }

            fn to_text(&self, _dict: &HashDictionary) -> Result<Value, WireError> {
                Ok(Value::from(*self))
            }

            fn from_text(value: &Value) -> Result<Self, WireError> {
                value
                    .$as()
                    .and_then(|n| <$ty>::try_from(n).ok())
                    .ok_or_else(|| WireError::TextMismatch {
                        expected: stringify!($ty),
                        found:    describe(value),
                    })
            }
        }
    };
}

fixed_int!(u8,  read_u8,  |out, v| out.write_u8(v),                     as_u64);
fixed_int!(i8,  read_i8,  |out, v| out.write_i8(v),                     as_i64);
fixed_int!(u16, read_u16, |out, v| out.write_u16::<LittleEndian>(v),    as_u64);
fixed_int!(i16, read_i16, |out, v| out.write_i16::<LittleEndian>(v),    as_i64);
fixed_int!(u32, read_u32, |out, v| out.write_u32::<LittleEndian>(v),    as_u64);
fixed_int!(i32, read_i32, |out, v| out.write_i32::<LittleEndian>(v),    as_i64);
fixed_int!(u64, read_u64, |out, v| out.write_u64::<LittleEndian>(v),    as_u64);
fixed_int!(i64, read_i64, |out, v| out.write_i64::<LittleEndian>(v),    as_i64);

impl Wire for f32 {
    fn decode(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        r.read_f32()
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), WireError> {
        out.write_f32::<LittleEndian>(*self)?;
        Ok(())
    }

    fn size(&self) -> usize {
        4
    }

    fn to_text(&self, _dict: &HashDictionary) -> Result<Value, WireError> {
        float_to_text(*self)
    }

    fn from_text(value: &Value) -> Result<Self, WireError> {
        float_from_text(value)
    }
}

impl Wire for HashId {
    fn decode(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(HashId(r.read_u32()?))
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), WireError> {
        out.write_u32::<LittleEndian>(self.0)?;
        Ok(())
    }

    fn size(&self) -> usize {
        4
    }

    fn to_text(&self, dict: &HashDictionary) -> Result<Value, WireError> {
        Ok(Value::String(dict.resolve(*self)))
    }

    fn from_text(value: &Value) -> Result<Self, WireError> {
        match value {
            Value::String(s) => Ok(HashId::parse_fallback(s).unwrap_or_else(|| HashDictionary::compute(s))),
            Value::Number(n) => n
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .map(HashId)
                .ok_or_else(|| WireError::TextMismatch { expected: "u32 hash", found: n.to_string() }),
            other => Err(WireError::TextMismatch { expected: "hash string", found: describe(other) }),
        }
    }

    fn hash_value(&self) -> Option<HashId> {
        Some(*self)
    }
}
