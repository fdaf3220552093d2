//! Hash identifiers and the preimage dictionary.
//!
//! The metadata files never store names; they store a 32-bit Jenkins
//! one-at-a-time hash of the name instead.  Before hashing, ASCII letters are
//! lower-cased and `\` is folded to `/`, so `"Audio\SFX"` and `"audio/sfx"`
//! hash identically.
//!
//! [`HashDictionary`] maps hashes back to the strings that produced them.  It
//! is populated through `&mut` access (word list at startup, names discovered
//! while reading files) and then shared read-only; there is no global instance.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// A 32-bit name hash as stored in the binary format.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HashId(pub u32);

impl HashId {
    /// "No reference".  Never resolved, never reported as an offset.
    pub const NONE: HashId = HashId(0xFFFF_FFFF);

    /// Hash `text` the way the format's producer does.
    pub fn of(text: &str) -> HashId {
        HashId(joaat(text))
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Numeric rendering used when the preimage is unknown.
    pub fn fallback(self) -> String {
        format!("0x{:08X}", self.0)
    }

    /// Parse the numeric rendering back.  Returns `None` for anything that is
    /// not `0x` followed by one to eight hex digits.
    pub fn parse_fallback(text: &str) -> Option<HashId> {
        let digits = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))?;
        if digits.is_empty() || digits.len() > 8 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(HashId)
    }
}

impl Default for HashId {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Debug for HashId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashId(0x{:08X})", self.0)
    }
}

impl fmt::Display for HashId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

impl From<u32> for HashId {
    fn from(v: u32) -> Self {
        HashId(v)
    }
}

#[inline]
fn fold(b: u8) -> u8 {
    match b {
        b'\\' => b'/',
        _     => b.to_ascii_lowercase(),
    }
}

/// Jenkins one-at-a-time over the case- and separator-folded bytes of `text`.
pub fn joaat(text: &str) -> u32 {
    let mut h: u32 = 0;
    for b in text.bytes() {
        h = h.wrapping_add(fold(b) as u32);
        h = h.wrapping_add(h << 10);
        h ^= h >> 6;
    }
    h = h.wrapping_add(h << 3);
    h ^= h >> 11;
    h.wrapping_add(h << 15)
}

// ── Dictionary ───────────────────────────────────────────────────────────────

/// Hash → preimage lookup table.
#[derive(Debug, Default, Clone)]
pub struct HashDictionary {
    known: HashMap<u32, String>,
}

impl HashDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary from a newline-separated word list on disk.
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let mut dict = Self::new();
        dict.extend_from_reader(BufReader::new(File::open(path)?))?;
        Ok(dict)
    }

    /// Register every non-blank line of `reader`.  Returns the number of lines
    /// that added a new hash.
    pub fn extend_from_reader<R: BufRead>(&mut self, reader: R) -> io::Result<usize> {
        let mut added = 0;
        for line in reader.lines() {
            let line = line?;
            let word = line.trim_end();
            if word.is_empty() {
                continue;
            }
            let before = self.known.len();
            self.register(word);
            added += self.known.len() - before;
        }
        Ok(added)
    }

    /// Add `text` to the known preimages.  On a collision the first
    /// registration wins.
    pub fn register(&mut self, text: &str) -> HashId {
        let id = Self::compute(text);
        self.known.entry(id.0).or_insert_with(|| text.to_owned());
        id
    }

    #[inline]
    pub fn compute(text: &str) -> HashId {
        HashId::of(text)
    }

    pub fn lookup(&self, id: HashId) -> Option<&str> {
        if id.is_none() {
            return None;
        }
        self.known.get(&id.0).map(String::as_str)
    }

    /// Preimage when known, numeric fallback otherwise.  A preimage that
    /// itself reads as a numeric rendering is not used, it would reload as a
    /// different hash.
    pub fn resolve(&self, id: HashId) -> String {
        match self.lookup(id) {
            Some(s) if HashId::parse_fallback(s).is_none() => s.to_owned(),
            _ => id.fallback(),
        }
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}
