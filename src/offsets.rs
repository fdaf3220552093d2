//! Offset extraction.
//!
//! The engine that loads these files patches every hash reference in place,
//! so a file carries the absolute offset of each one.  The tables are never
//! edited by hand: they are recomputed by walking the decoded tree in encode
//! order, with each value reporting the references it holds relative to the
//! position it will occupy.

use serde::Serialize;

use crate::hash::HashId;
use crate::wire::Wire;

/// Record `at` if `value` is a hash identifier other than the sentinel.
pub fn push_reference<T: Wire>(value: &T, at: u32, out: &mut Vec<u32>) {
    if let Some(id) = value.hash_value() {
        if !id.is_none() {
            out.push(at);
        }
    }
}

/// Collect the identifier itself when it is not the sentinel.
pub fn push_archive_ref<T: Wire>(value: &T, out: &mut Vec<HashId>) {
    if let Some(id) = value.hash_value() {
        if !id.is_none() {
            out.push(id);
        }
    }
}

/// Both offset tables for one or more values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Offsets {
    pub hash:    Vec<u32>,
    pub archive: Vec<u32>,
}

impl Offsets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offsets of the references in `value`, which starts at `at`.
    pub fn of<T: Wire>(value: &T, at: u32) -> Self {
        let mut offsets = Self::new();
        offsets.append(value, at);
        offsets
    }

    pub fn append<T: Wire>(&mut self, value: &T, at: u32) {
        value.hash_offsets(at, &mut self.hash);
        value.archive_offsets(at, &mut self.archive);
    }

    pub fn is_empty(&self) -> bool {
        self.hash.is_empty() && self.archive.is_empty()
    }
}

/// Expands to `true` when the optional field flag matches the first token.
#[doc(hidden)]
#[macro_export]
macro_rules! __field_flag {
    (hash)             => { false };
    (hash, hash)       => { true };
    (hash, archive)    => { false };
    (archive)          => { false };
    (archive, archive) => { true };
    (archive, hash)    => { false };
}

/// Report one field's hash offsets, honouring a `[hash]` flag.
#[doc(hidden)]
#[macro_export]
macro_rules! __field_hash_offsets {
    ($field:expr, $at:expr, $out:expr $(, $flag:ident)?) => {
        if $crate::__field_flag!(hash $(, $flag)?) {
            $crate::offsets::push_reference($field, $at, $out);
        } else {
            $crate::wire::Wire::hash_offsets($field, $at, $out);
        }
    };
}

/// Report one field's archive offsets, honouring an `[archive]` flag.
#[doc(hidden)]
#[macro_export]
macro_rules! __field_archive_offsets {
    ($field:expr, $at:expr, $out:expr $(, $flag:ident)?) => {
        if $crate::__field_flag!(archive $(, $flag)?) {
            $crate::offsets::push_reference($field, $at, $out);
        } else {
            $crate::wire::Wire::archive_offsets($field, $at, $out);
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_archive_refs {
    ($field:expr, $out:expr $(, $flag:ident)?) => {
        if $crate::__field_flag!(archive $(, $flag)?) {
            $crate::offsets::push_archive_ref($field, $out);
        } else {
            $crate::wire::Wire::archive_refs($field, $out);
        }
    };
}
