//! Whole metadata files.
//!
//! ## On-disk layout
//!
//! All integers are little-endian `u32`.
//!
//! ```text
//! 0x00  version          per-format constant
//! 0x04  trailer_offset   absolute offset of the trailer
//! 0x08  objects...       containers back to back
//!
//! trailer:
//!   name_table_size, name_table      NUL-terminated entry names
//!   object_count, {offset, size}*    absolute position of each container
//!   hash_count, offset*              absolute offsets of hash references
//!   archive_count, offset*           absolute offsets of archive references
//! ```
//!
//! A container's name offset indexes the name table.  The offset tables are
//! derived data: they are rebuilt on every write and only compared against
//! the recomputed ones on read.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::bytes::{patch_u32, ByteReader};
use crate::container::{Container, Variants};
use crate::hash::{HashDictionary, HashId};
use crate::offsets::Offsets;
use crate::wire::{expect_object, Wire, WireError};

/// Offset of the first container.
pub const OBJECTS_START: u32 = 8;

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum FileError {
    #[error("{format}: unsupported version {found} (expected {expected})")]
    UnsupportedVersion { format: &'static str, expected: u32, found: u32 },
    #[error("entry {index} \"{name}\": {source}")]
    Entry { index: usize, name: String, #[source] source: WireError },
    #[error("name offset {offset} is outside the {len}-byte name table")]
    BadNameOffset { offset: u32, len: usize },
    #[error("duplicate entry name \"{0}\"")]
    DuplicateName(String),
    #[error("entry name {0:?} contains a NUL byte")]
    InvalidName(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Wire(#[from] WireError),
}

// ── Formats ──────────────────────────────────────────────────────────────────

/// A concrete metadata file kind: version constant plus container schema.
pub trait Format {
    const NAME: &'static str;
    const VERSION: u32;

    type Header: Wire + Clone + PartialEq + fmt::Debug;
    type Payload: Variants + Clone + PartialEq + fmt::Debug;
}

/// One named object of a file of format `F`.
pub type Entry<F> = Container<<F as Format>::Header, <F as Format>::Payload>;

// ── File ─────────────────────────────────────────────────────────────────────

/// Every entry of one metadata file, in file order.
pub struct MetadataFile<F: Format> {
    pub entries: Vec<Entry<F>>,
}

impl<F: Format> Default for MetadataFile<F> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<F: Format> Clone for MetadataFile<F> {
    fn clone(&self) -> Self {
        Self { entries: self.entries.clone() }
    }
}

impl<F: Format> PartialEq for MetadataFile<F> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<F: Format> fmt::Debug for MetadataFile<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataFile")
            .field("format", &F::NAME)
            .field("entries", &self.entries)
            .finish()
    }
}

impl<F: Format> MetadataFile<F> {
    pub fn new(entries: Vec<Entry<F>>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Entry<F>> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Read a file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FileError> {
        let data = fs::read(path)?;
        Self::read(&data)
    }

    /// Parse a complete binary file.
    pub fn read(data: &[u8]) -> Result<Self, FileError> {
        let mut r = ByteReader::new(data);
        let version = r.read_u32()?;
        if version != F::VERSION {
            return Err(FileError::UnsupportedVersion {
                format:   F::NAME,
                expected: F::VERSION,
                found:    version,
            });
        }
        let trailer_offset = r.read_u32()?;
        r.seek(trailer_offset as usize)?;

        let name_table_size = r.read_u32()? as usize;
        let names = r.take(name_table_size)?;

        let object_count = r.read_u32()? as usize;
        let mut objects = Vec::with_capacity(object_count.min(r.remaining() / 8));
        for _ in 0..object_count {
            let offset = r.read_u32()?;
            let size = r.read_u32()?;
            objects.push((offset, size));
        }
        let stored = Offsets { hash: read_table(&mut r)?, archive: read_table(&mut r)? };

        let mut entries = Vec::with_capacity(objects.len());
        for (index, &(offset, size)) in objects.iter().enumerate() {
            let mut object = ByteReader::new(data);
            let decoded = object
                .seek(offset as usize)
                .and_then(|_| Entry::<F>::decode(&mut object, size as usize));
            let (mut entry, name_offset) = decoded.map_err(|source| FileError::Entry {
                index,
                name: peek_name(data, offset, names),
                source,
            })?;
            if let Some(name_offset) = name_offset {
                entry.name = name_at(names, name_offset)?;
            }
            entries.push(entry);
        }

        let file = Self { entries };
        let recomputed = file.offsets();
        if recomputed.hash != stored.hash {
            warn!(
                format = F::NAME,
                stored = stored.hash.len(),
                recomputed = recomputed.hash.len(),
                "stored hash offset table differs from the recomputed one"
            );
        }
        if recomputed.archive != stored.archive {
            warn!(
                format = F::NAME,
                stored = stored.archive.len(),
                recomputed = recomputed.archive.len(),
                "stored archive offset table differs from the recomputed one"
            );
        }
        debug!(format = F::NAME, entries = file.len(), bytes = data.len(), "decoded metadata file");
        Ok(file)
    }

    /// Serialize to the binary layout, rebuilding the name table and both
    /// offset tables.
    pub fn write(&self) -> Result<Vec<u8>, FileError> {
        let mut out = Vec::with_capacity(self.encoded_hint());
        out.write_u32::<LittleEndian>(F::VERSION)?;
        out.write_u32::<LittleEndian>(0)?;

        let mut names = Vec::new();
        let mut objects = Vec::with_capacity(self.entries.len());
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.name.as_bytes().contains(&0) {
                return Err(FileError::InvalidName(entry.name.clone()));
            }
            let name_offset = offset32(names.len())?;
            names.extend_from_slice(entry.name.as_bytes());
            names.push(0);

            let at = out.len();
            entry.encode(&mut out, name_offset).map_err(|source| FileError::Entry {
                index,
                name: entry.name.clone(),
                source,
            })?;
            objects.push((offset32(at)?, offset32(out.len() - at)?));
        }

        let trailer_offset = offset32(out.len())?;
        patch_u32(&mut out, 4, trailer_offset);

        out.write_u32::<LittleEndian>(offset32(names.len())?)?;
        out.extend_from_slice(&names);
        out.write_u32::<LittleEndian>(offset32(objects.len())?)?;
        for (offset, size) in &objects {
            out.write_u32::<LittleEndian>(*offset)?;
            out.write_u32::<LittleEndian>(*size)?;
        }
        let offsets = self.offsets();
        write_table(&mut out, &offsets.hash)?;
        write_table(&mut out, &offsets.archive)?;

        debug!(format = F::NAME, entries = self.len(), bytes = out.len(), "encoded metadata file");
        Ok(out)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), FileError> {
        fs::write(path, self.write()?)?;
        Ok(())
    }

    /// Hash and archive offsets for the layout `write` produces.
    pub fn offsets(&self) -> Offsets {
        let mut offsets = Offsets::new();
        let mut at = OBJECTS_START;
        for entry in &self.entries {
            entry.hash_offsets(at, &mut offsets.hash);
            entry.archive_offsets(at, &mut offsets.archive);
            at += entry.size() as u32;
        }
        offsets
    }

    /// Distinct archive references in first-seen order.
    pub fn archive_refs(&self) -> Vec<HashId> {
        let mut refs = Vec::new();
        for entry in &self.entries {
            entry.archive_refs(&mut refs);
        }
        let mut seen = std::collections::HashSet::new();
        refs.retain(|id| seen.insert(*id));
        refs
    }

    /// Make every entry name resolvable, so references between entries render
    /// as names.
    pub fn register_names(&self, dict: &mut HashDictionary) {
        for name in self.names() {
            dict.register(name);
        }
    }

    /// One JSON object keyed by entry name, in file order.
    pub fn to_text(&self, dict: &HashDictionary) -> Result<Value, FileError> {
        let mut map = Map::new();
        for (index, entry) in self.entries.iter().enumerate() {
            if map.contains_key(&entry.name) {
                return Err(FileError::DuplicateName(entry.name.clone()));
            }
            let value = entry.to_text(dict).map_err(|source| FileError::Entry {
                index,
                name: entry.name.clone(),
                source,
            })?;
            map.insert(entry.name.clone(), value);
        }
        Ok(Value::Object(map))
    }

    pub fn from_text(value: &Value) -> Result<Self, FileError> {
        let map = expect_object(value)?;
        let mut entries = Vec::with_capacity(map.len());
        for (index, (name, v)) in map.iter().enumerate() {
            let entry = Entry::<F>::from_text(name.as_str(), v).map_err(|source| FileError::Entry {
                index,
                name: name.clone(),
                source,
            })?;
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    fn encoded_hint(&self) -> usize {
        OBJECTS_START as usize + self.entries.iter().map(|e| e.size()).sum::<usize>()
    }
}

fn offset32(n: usize) -> Result<u32, WireError> {
    u32::try_from(n).map_err(|_| WireError::LengthOverflow { len: n, max: u32::MAX as usize })
}

fn read_table(r: &mut ByteReader<'_>) -> Result<Vec<u32>, WireError> {
    let count = r.read_u32()? as usize;
    let mut table = Vec::with_capacity(count.min(r.remaining() / 4));
    for _ in 0..count {
        table.push(r.read_u32()?);
    }
    Ok(table)
}

fn write_table(out: &mut Vec<u8>, table: &[u32]) -> Result<(), FileError> {
    out.write_u32::<LittleEndian>(offset32(table.len())?)?;
    for v in table {
        out.write_u32::<LittleEndian>(*v)?;
    }
    Ok(())
}

/// NUL-terminated string starting at `offset` within the name table.
fn name_at(names: &[u8], offset: u32) -> Result<String, FileError> {
    let tail = names
        .get(offset as usize..)
        .filter(|t| !t.is_empty())
        .ok_or(FileError::BadNameOffset { offset, len: names.len() })?;
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    String::from_utf8(tail[..end].to_vec())
        .map_err(|_| FileError::Wire(WireError::InvalidUtf8 { offset: offset as usize }))
}

/// Best-effort name of the object at `offset`, for error messages.
fn peek_name(data: &[u8], offset: u32, names: &[u8]) -> String {
    let start = offset as usize + 1;
    data.get(start..start + 4)
        .and_then(|b| name_at(names, LittleEndian::read_u32(b)).ok())
        .unwrap_or_default()
}
