use std::fmt;
use std::marker::PhantomData;

use serde_json::Value;

use super::{describe, SizeTag, Wire, WireError};
use crate::bytes::ByteReader;
use crate::hash::HashDictionary;

/// Length-prefixed UTF-8 string; `S` is the width of the length prefix.
pub struct SizedString<S = u8> {
    pub text: String,
    _tag:     PhantomData<S>,
}

impl<S> SizedString<S> {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), _tag: PhantomData }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl<S> Default for SizedString<S> {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl<S> Clone for SizedString<S> {
    fn clone(&self) -> Self {
        Self::new(self.text.clone())
    }
}

impl<S> PartialEq for SizedString<S> {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl<S> fmt::Debug for SizedString<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.text, f)
    }
}

impl<S> From<&str> for SizedString<S> {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl<S: SizeTag> Wire for SizedString<S> {
    fn decode(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        let len = S::read(r)?;
        let offset = r.position();
        let bytes = r.take(len)?;
        let text = std::str::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8 { offset })?;
        Ok(Self::new(text))
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), WireError> {
        S::write(out, self.text.len())?;
        out.extend_from_slice(self.text.as_bytes());
        Ok(())
    }

    fn size(&self) -> usize {
        S::WIDTH + self.text.len()
    }

    fn to_text(&self, _dict: &HashDictionary) -> Result<Value, WireError> {
        Ok(Value::String(self.text.clone()))
    }

    fn from_text(value: &Value) -> Result<Self, WireError> {
        match value {
            Value::String(s) => Ok(Self::new(s.as_str())),
            other => Err(WireError::TextMismatch { expected: "string", found: describe(other) }),
        }
    }
}
