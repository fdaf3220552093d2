use serde_json::Value;

use super::{Wire, WireError};
use crate::bytes::ByteReader;
use crate::hash::{HashDictionary, HashId};

/// A value that may be physically absent.
///
/// There is no presence marker of its own: the owning optional record's
/// bitmask decides whether `decode` is called at all.  `decode` therefore
/// always produces a present value.
#[derive(Debug, Clone, PartialEq)]
pub struct Optional<T>(pub Option<T>);

impl<T> Optional<T> {
    pub const fn absent() -> Self {
        Optional(None)
    }

    pub const fn present(value: T) -> Self {
        Optional(Some(value))
    }

    #[inline]
    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }
}

impl<T> Default for Optional<T> {
    fn default() -> Self {
        Self::absent()
    }
}

impl<T> From<T> for Optional<T> {
    fn from(value: T) -> Self {
        Self::present(value)
    }
}

impl<T: Wire> Wire for Optional<T> {
    fn decode(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        T::decode(r).map(Self::present)
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), WireError> {
        match &self.0 {
            Some(v) => v.encode(out),
            None    => Ok(()),
        }
    }

    fn size(&self) -> usize {
        self.0.as_ref().map_or(0, Wire::size)
    }

    fn to_text(&self, dict: &HashDictionary) -> Result<Value, WireError> {
        match &self.0 {
            Some(v) => v.to_text(dict),
            None    => Ok(Value::Null),
        }
    }

    fn from_text(value: &Value) -> Result<Self, WireError> {
        match value {
            Value::Null => Ok(Self::absent()),
            v           => T::from_text(v).map(Self::present),
        }
    }

    fn hash_value(&self) -> Option<HashId> {
        self.0.as_ref().and_then(Wire::hash_value)
    }

    fn hash_offsets(&self, at: u32, out: &mut Vec<u32>) {
        if let Some(v) = &self.0 {
            v.hash_offsets(at, out);
        }
    }

    fn archive_offsets(&self, at: u32, out: &mut Vec<u32>) {
        if let Some(v) = &self.0 {
            v.archive_offsets(at, out);
        }
    }

    fn archive_refs(&self, out: &mut Vec<HashId>) {
        if let Some(v) = &self.0 {
            v.archive_refs(out);
        }
    }
}
