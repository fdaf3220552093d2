use serde_json::Value;

use super::{describe, Wire, WireError};
use crate::bytes::ByteReader;
use crate::hash::HashDictionary;

/// Opaque bytes running to the end of the enclosing payload.
///
/// Only meaningful as the last field of a container variant, where the reader
/// is already bounded to the payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Raw {
    pub bytes: Vec<u8>,
}

impl From<Vec<u8>> for Raw {
    fn from(bytes: Vec<u8>) -> Self {
        Raw { bytes }
    }
}

impl Wire for Raw {
    fn decode(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Raw { bytes: r.rest().to_vec() })
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), WireError> {
        out.extend_from_slice(&self.bytes);
        Ok(())
    }

    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn to_text(&self, _dict: &HashDictionary) -> Result<Value, WireError> {
        Ok(Value::String(hex::encode(&self.bytes)))
    }

    fn from_text(value: &Value) -> Result<Self, WireError> {
        value
            .as_str()
            .and_then(|s| hex::decode(s).ok())
            .map(Raw::from)
            .ok_or_else(|| WireError::TextMismatch { expected: "hex string", found: describe(value) })
    }
}
