use std::fmt;
use std::marker::PhantomData;

use serde_json::Value;

use super::{expect_array, SizeTag, Wire, WireError};
use crate::bytes::ByteReader;
use crate::hash::{HashDictionary, HashId};

/// Count-prefixed homogeneous sequence.
///
/// `S` is the count prefix.  `HASHES` marks the elements themselves as hash
/// references for offset extraction; when it is `false` the elements are
/// asked for their own nested references instead.
pub struct Array<T, S = u8, const HASHES: bool = false> {
    pub items: Vec<T>,
    _tag:      PhantomData<S>,
}

impl<T, S, const HASHES: bool> Array<T, S, HASHES> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, _tag: PhantomData }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T, S, const HASHES: bool> Default for Array<T, S, HASHES> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Clone, S, const HASHES: bool> Clone for Array<T, S, HASHES> {
    fn clone(&self) -> Self {
        Self::new(self.items.clone())
    }
}

impl<T: PartialEq, S, const HASHES: bool> PartialEq for Array<T, S, HASHES> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: fmt::Debug, S, const HASHES: bool> fmt::Debug for Array<T, S, HASHES> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl<T, S, const HASHES: bool> From<Vec<T>> for Array<T, S, HASHES> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T: Wire, S: SizeTag, const HASHES: bool> Wire for Array<T, S, HASHES> {
    fn decode(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        let count = S::read(r)?;
        // Bounded by what the buffer could possibly hold so a corrupt count
        // cannot force a huge allocation.
        let mut items = Vec::with_capacity(count.min(r.remaining()));
        for _ in 0..count {
            items.push(T::decode(r)?);
        }
        Ok(Self::new(items))
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), WireError> {
        S::write(out, self.items.len())?;
        for item in &self.items {
            item.encode(out)?;
        }
        Ok(())
    }

    fn size(&self) -> usize {
        S::WIDTH + self.items.iter().map(Wire::size).sum::<usize>()
    }

    fn to_text(&self, dict: &HashDictionary) -> Result<Value, WireError> {
        seq_to_text(&self.items, dict)
    }

    fn from_text(value: &Value) -> Result<Self, WireError> {
        Ok(Self::new(seq_from_text(expect_array(value)?)?))
    }

    fn hash_offsets(&self, at: u32, out: &mut Vec<u32>) {
        let mut at = at + S::WIDTH as u32;
        for item in &self.items {
            if HASHES {
                crate::offsets::push_reference(item, at, out);
            } else {
                item.hash_offsets(at, out);
            }
            at += item.size() as u32;
        }
    }

    fn archive_offsets(&self, at: u32, out: &mut Vec<u32>) {
        let mut at = at + S::WIDTH as u32;
        for item in &self.items {
            item.archive_offsets(at, out);
            at += item.size() as u32;
        }
    }

    fn archive_refs(&self, out: &mut Vec<HashId>) {
        for item in &self.items {
            item.archive_refs(out);
        }
    }
}

fn seq_to_text<T: Wire>(items: &[T], dict: &HashDictionary) -> Result<Value, WireError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| item.to_text(dict).map_err(|e| e.in_field(format!("[{i}]"))))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn seq_from_text<T: Wire>(values: &[Value]) -> Result<Vec<T>, WireError> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| T::from_text(v).map_err(|e| e.in_field(format!("[{i}]"))))
        .collect()
}

// ── Fixed-size arrays ────────────────────────────────────────────────────────

impl<T: Wire, const N: usize> Wire for [T; N] {
    fn decode(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(T::decode(r)?);
        }
        items
            .try_into()
            .map_err(|v: Vec<T>| WireError::FixedLength { expected: N, found: v.len() })
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), WireError> {
        for item in self {
            item.encode(out)?;
        }
        Ok(())
    }

    fn size(&self) -> usize {
        self.iter().map(Wire::size).sum()
    }

    fn to_text(&self, dict: &HashDictionary) -> Result<Value, WireError> {
        seq_to_text(self, dict)
    }

    fn from_text(value: &Value) -> Result<Self, WireError> {
        let values = expect_array(value)?;
        if values.len() != N {
            return Err(WireError::FixedLength { expected: N, found: values.len() });
        }
        seq_from_text::<T>(values)?
            .try_into()
            .map_err(|v: Vec<T>| WireError::FixedLength { expected: N, found: v.len() })
    }

    fn hash_offsets(&self, at: u32, out: &mut Vec<u32>) {
        let mut at = at;
        for item in self {
            item.hash_offsets(at, out);
            at += item.size() as u32;
        }
    }

    fn archive_offsets(&self, at: u32, out: &mut Vec<u32>) {
        let mut at = at;
        for item in self {
            item.archive_offsets(at, out);
            at += item.size() as u32;
        }
    }

    fn archive_refs(&self, out: &mut Vec<HashId>) {
        for item in self {
            item.archive_refs(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn five_elements_roundtrip_in_order() {
        let a: Array<u32, u8> = vec![5, 4, 3, 2, 1].into();
        let mut out = Vec::new();
        a.encode(&mut out).unwrap();
        assert_eq!(out.len(), a.size());
        assert_eq!(out.len(), 1 + 5 * 4);
        assert_eq!(out[0], 5);
        let back = Array::<u32, u8>::decode(&mut ByteReader::new(&out)).unwrap();
        assert_eq!(back.items, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn count_overflow_is_rejected_not_truncated() {
        let a: Array<u32, u8> = vec![0; 256].into();
        let mut out = Vec::new();
        assert!(matches!(a.encode(&mut out), Err(WireError::LengthOverflow { len: 256, max: 255 })));
        let wide: Array<u32, u16> = vec![0; 256].into();
        out.clear();
        wide.encode(&mut out).unwrap();
        assert_eq!(&out[..2], &[0, 1]);
    }

    #[test]
    fn hash_array_reports_non_sentinel_elements() {
        let a: Array<HashId, u8, true> = vec![HashId(1), HashId::NONE, HashId(3)].into();
        let mut out = Vec::new();
        a.hash_offsets(10, &mut out);
        assert_eq!(out, vec![11, 19]);
    }

    #[test]
    fn plain_hash_array_reports_nothing() {
        let a: Array<HashId, u8> = vec![HashId(1), HashId(2)].into();
        let mut out = Vec::new();
        a.hash_offsets(0, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn fixed_array_text_length_checked() {
        let dict = HashDictionary::new();
        let v: [u8; 3] = [1, 2, 3];
        assert_eq!(v.to_text(&dict).unwrap(), json!([1, 2, 3]));
        assert_eq!(<[u8; 3]>::from_text(&json!([4, 5, 6])).unwrap(), [4, 5, 6]);
        assert!(matches!(
            <[u8; 3]>::from_text(&json!([1, 2])),
            Err(WireError::FixedLength { expected: 3, found: 2 })
        ));
    }

    #[test]
    fn element_errors_carry_index() {
        let err = Array::<u8>::from_text(&json!([1, "x"])).unwrap_err();
        assert_eq!(err.to_string(), "[1]: expected u8, found \"x\"");
    }
}
