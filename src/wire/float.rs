use serde_json::Value;

use super::{float_from_text, float_to_text, Wire, WireError};
use crate::bytes::ByteReader;
use crate::hash::HashDictionary;

/// 32-bit float whose text form is rounded to three decimal places.
///
/// Binary round trips are exact.  Text is not: `3.14159` renders as `3.142`,
/// which then re-renders as `3.142` forever after.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PrecisionFloat(pub f32);

impl From<f32> for PrecisionFloat {
    fn from(v: f32) -> Self {
        PrecisionFloat(v)
    }
}

impl From<PrecisionFloat> for f32 {
    fn from(v: PrecisionFloat) -> Self {
        v.0
    }
}

impl Wire for PrecisionFloat {
    fn decode(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        f32::decode(r).map(PrecisionFloat)
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), WireError> {
        self.0.encode(out)
    }

    fn size(&self) -> usize {
        4
    }

    fn to_text(&self, _dict: &HashDictionary) -> Result<Value, WireError> {
        float_to_text(self.0)
    }

    fn from_text(value: &Value) -> Result<Self, WireError> {
        float_from_text(value).map(PrecisionFloat)
    }
}
