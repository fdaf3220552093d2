//! File-level conversion driver used by the CLI.
//!
//! ```no_run
//! use std::path::Path;
//! use audmeta::convert::{self, ConvertOptions};
//! use audmeta::hash::HashDictionary;
//!
//! let mut dict = HashDictionary::load("Hashes.txt")?;
//! let opts = ConvertOptions::default();
//! convert::unpack(Path::new("SOUNDS.DAT15"), None, &mut dict, &opts)?;
//! convert::pack(Path::new("SOUNDS.DAT15.json"), None, &opts)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::file::FileError;
use crate::formats::{CategoriesFile, CurvesFile, FormatKind, GameFile, SoundsFile, WELL_KNOWN_FILES};
use crate::hash::HashDictionary;
use crate::offsets::Offsets;

// ── ConvertOptions ───────────────────────────────────────────────────────────

/// Configuration shared by every conversion entry point.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Skip file-name detection and treat every input as this format.
    pub format:         Option<FormatKind>,
    /// Indent JSON output four spaces per level.
    pub pretty:         bool,
    /// Add every entry name to the dictionary before rendering, so references
    /// between entries come out as names.
    pub register_names: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            format:         None,
            pretty:         true,
            register_names: true,
        }
    }
}

impl ConvertOptions {
    pub fn detect(&self, path: &Path) -> Result<FormatKind, ConvertError> {
        self.format
            .or_else(|| FormatKind::from_path(path))
            .ok_or_else(|| ConvertError::UnknownFormat(path.to_path_buf()))
    }
}

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("cannot tell the metadata format of {0}; pass --format")]
    UnknownFormat(PathBuf),
    #[error(transparent)]
    File(#[from] FileError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

// ── Document ─────────────────────────────────────────────────────────────────

/// A decoded file of any shipped format.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Curves(CurvesFile),
    Categories(CategoriesFile),
    Sounds(SoundsFile),
    Game(GameFile),
}

macro_rules! each_format {
    ($doc:expr, $file:ident => $body:expr) => {
        match $doc {
            Document::Curves($file)     => $body,
            Document::Categories($file) => $body,
            Document::Sounds($file)     => $body,
            Document::Game($file)       => $body,
        }
    };
}

impl Document {
    pub fn read(kind: FormatKind, data: &[u8]) -> Result<Self, FileError> {
        Ok(match kind {
            FormatKind::Curves     => Document::Curves(CurvesFile::read(data)?),
            FormatKind::Categories => Document::Categories(CategoriesFile::read(data)?),
            FormatKind::Sounds     => Document::Sounds(SoundsFile::read(data)?),
            FormatKind::Game       => Document::Game(GameFile::read(data)?),
        })
    }

    pub fn from_text(kind: FormatKind, value: &Value) -> Result<Self, FileError> {
        Ok(match kind {
            FormatKind::Curves     => Document::Curves(CurvesFile::from_text(value)?),
            FormatKind::Categories => Document::Categories(CategoriesFile::from_text(value)?),
            FormatKind::Sounds     => Document::Sounds(SoundsFile::from_text(value)?),
            FormatKind::Game       => Document::Game(GameFile::from_text(value)?),
        })
    }

    pub fn kind(&self) -> FormatKind {
        match self {
            Document::Curves(_)     => FormatKind::Curves,
            Document::Categories(_) => FormatKind::Categories,
            Document::Sounds(_)     => FormatKind::Sounds,
            Document::Game(_)       => FormatKind::Game,
        }
    }

    pub fn len(&self) -> usize {
        each_format!(self, f => f.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn write(&self) -> Result<Vec<u8>, FileError> {
        each_format!(self, f => f.write())
    }

    pub fn to_text(&self, dict: &HashDictionary) -> Result<Value, FileError> {
        each_format!(self, f => f.to_text(dict))
    }

    pub fn register_names(&self, dict: &mut HashDictionary) {
        each_format!(self, f => f.register_names(dict))
    }

    pub fn offsets(&self) -> Offsets {
        each_format!(self, f => f.offsets())
    }

    pub fn archive_refs(&self) -> Vec<crate::hash::HashId> {
        each_format!(self, f => f.archive_refs())
    }
}

// ── Paths ────────────────────────────────────────────────────────────────────

/// `SOUNDS.DAT15` → `SOUNDS.DAT15.json`
pub fn default_json_path(input: &Path) -> PathBuf {
    let mut s = input.as_os_str().to_owned();
    s.push(".json");
    PathBuf::from(s)
}

/// `SOUNDS.DAT15.json` → `SOUNDS.DAT15.GEN`
pub fn default_gen_path(input: &Path) -> PathBuf {
    let stem = match input.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("json") => input.with_extension(""),
        _ => input.to_path_buf(),
    };
    let mut s = stem.into_os_string();
    s.push(".GEN");
    PathBuf::from(s)
}

fn render_json(value: &Value, pretty: bool) -> Result<Vec<u8>, serde_json::Error> {
    if !pretty {
        return serde_json::to_vec(value);
    }
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    out.push(b'\n');
    Ok(out)
}

// ── Single-file operations ───────────────────────────────────────────────────

/// Result of one conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertSummary {
    pub format:    &'static str,
    pub output:    PathBuf,
    pub entries:   usize,
    pub bytes_in:  usize,
    pub bytes_out: usize,
}

/// Decode a binary file from disk.
pub fn load(input: &Path, opts: &ConvertOptions) -> Result<(Document, usize), ConvertError> {
    let kind = opts.detect(input)?;
    let data = fs::read(input)?;
    let doc = Document::read(kind, &data)?;
    debug!(path = %input.display(), format = kind.name(), entries = doc.len(), "loaded");
    Ok((doc, data.len()))
}

fn render(
    doc: &Document,
    bytes_in: usize,
    output: PathBuf,
    dict: &HashDictionary,
    opts: &ConvertOptions,
) -> Result<ConvertSummary, ConvertError> {
    let json = render_json(&doc.to_text(dict)?, opts.pretty)?;
    fs::write(&output, &json)?;
    Ok(ConvertSummary {
        format: doc.kind().name(),
        output,
        entries: doc.len(),
        bytes_in,
        bytes_out: json.len(),
    })
}

/// Binary → JSON.  `output` defaults to `<input>.json`.
pub fn unpack(
    input:  &Path,
    output: Option<&Path>,
    dict:   &mut HashDictionary,
    opts:   &ConvertOptions,
) -> Result<ConvertSummary, ConvertError> {
    let (doc, bytes_in) = load(input, opts)?;
    if opts.register_names {
        doc.register_names(dict);
    }
    let output = output.map_or_else(|| default_json_path(input), Path::to_path_buf);
    let summary = render(&doc, bytes_in, output, dict, opts)?;
    info!(input = %input.display(), output = %summary.output.display(), entries = summary.entries, "unpacked");
    Ok(summary)
}

/// JSON → binary.  `output` defaults to `<input without .json>.GEN`.
pub fn pack(input: &Path, output: Option<&Path>, opts: &ConvertOptions) -> Result<ConvertSummary, ConvertError> {
    let kind = opts.detect(input)?;
    let text = fs::read(input)?;
    let value: Value = serde_json::from_slice(&text)?;
    let doc = Document::from_text(kind, &value)?;
    let bytes = doc.write()?;

    let output = output.map_or_else(|| default_gen_path(input), Path::to_path_buf);
    fs::write(&output, &bytes)?;
    info!(input = %input.display(), output = %output.display(), entries = doc.len(), "packed");
    Ok(ConvertSummary {
        format:    kind.name(),
        output,
        entries:   doc.len(),
        bytes_in:  text.len(),
        bytes_out: bytes.len(),
    })
}

/// Outcome of decoding and re-encoding a file without touching the disk.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    pub format:            &'static str,
    pub entries:           usize,
    pub original_crc32:    u32,
    pub reencoded_crc32:   u32,
    /// Decode → encode reproduced the input byte for byte.
    pub binary_identical:  bool,
    /// Decode → JSON → encode reproduced the re-encoded bytes.
    pub text_identical:    bool,
}

pub fn verify(input: &Path, dict: &mut HashDictionary, opts: &ConvertOptions) -> Result<VerifyReport, ConvertError> {
    let kind = opts.detect(input)?;
    let data = fs::read(input)?;
    let doc = Document::read(kind, &data)?;
    let reencoded = doc.write()?;

    if opts.register_names {
        doc.register_names(dict);
    }
    let through_text = Document::from_text(kind, &doc.to_text(dict)?)?.write()?;

    let report = VerifyReport {
        format:           kind.name(),
        entries:          doc.len(),
        original_crc32:   crc32fast::hash(&data),
        reencoded_crc32:  crc32fast::hash(&reencoded),
        binary_identical: data == reencoded,
        text_identical:   through_text == reencoded,
    };
    if !report.binary_identical {
        warn!(path = %input.display(), "re-encoded bytes differ from the input");
    }
    Ok(report)
}

/// Recomputed offset tables and the archives a file depends on.
#[derive(Debug, Clone, Serialize)]
pub struct OffsetsReport {
    pub format:          &'static str,
    pub entries:         usize,
    pub hash_offsets:    Vec<String>,
    pub archive_offsets: Vec<String>,
    pub archives:        Vec<String>,
}

pub fn offsets(input: &Path, dict: &HashDictionary, opts: &ConvertOptions) -> Result<OffsetsReport, ConvertError> {
    let (doc, _) = load(input, opts)?;
    let tables = doc.offsets();
    let hex32 = |v: &u32| hex::encode(v.to_be_bytes());
    Ok(OffsetsReport {
        format:          doc.kind().name(),
        entries:         doc.len(),
        hash_offsets:    tables.hash.iter().map(hex32).collect(),
        archive_offsets: tables.archive.iter().map(hex32).collect(),
        archives:        doc.archive_refs().into_iter().map(|id| dict.resolve(id)).collect(),
    })
}

// ── Batch ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Binary files → `<name>.json`
    Unpack,
    /// `<name>.json` → `<name>.GEN`
    Pack,
}

/// Per-file outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<ConvertSummary>,
    pub missing:   Vec<PathBuf>,
    pub failed:    Vec<(PathBuf, ConvertError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run `f` over `items`, in parallel when the `parallel` feature is on.
/// Results keep the input order.
fn map_files<T, R, F>(items: Vec<T>, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items.into_par_iter().map(f).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        items.into_iter().map(f).collect()
    }
}

/// Convert the well-known file set of a game directory in one direction.
///
/// A failing file is logged and recorded; the rest still run.  When
/// unpacking, every file is decoded before any is rendered so that names
/// from one file resolve in the others.
pub fn batch(dir: &Path, direction: Direction, dict: &mut HashDictionary, opts: &ConvertOptions) -> BatchReport {
    let mut report = BatchReport::default();
    let mut present = Vec::new();
    for name in WELL_KNOWN_FILES {
        let binary = dir.join(name);
        let input = match direction {
            Direction::Unpack => binary,
            Direction::Pack   => default_json_path(&binary),
        };
        if input.is_file() {
            present.push(input);
        } else {
            debug!(path = %input.display(), "not present, skipping");
            report.missing.push(input);
        }
    }

    let results: Vec<(PathBuf, Result<ConvertSummary, ConvertError>)> = match direction {
        Direction::Pack => map_files(present, |input| {
            let result = pack(&input, None, opts);
            (input, result)
        }),
        Direction::Unpack => {
            let decoded = map_files(present, |input| {
                let result = load(&input, opts);
                (input, result)
            });
            if opts.register_names {
                for (_, result) in &decoded {
                    if let Ok((doc, _)) = result {
                        doc.register_names(dict);
                    }
                }
            }
            let dict: &HashDictionary = dict;
            map_files(decoded, |(input, result)| {
                let rendered = result.and_then(|(doc, bytes_in)| {
                    render(&doc, bytes_in, default_json_path(&input), dict, opts)
                });
                (input, rendered)
            })
        }
    };

    for (input, result) in results {
        match result {
            Ok(summary) => {
                info!(input = %input.display(), output = %summary.output.display(), entries = summary.entries, "converted");
                report.converted.push(summary);
            }
            Err(e) => {
                warn!(input = %input.display(), error = %e, "conversion failed");
                report.failed.push((input, e));
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_names() {
        assert_eq!(default_json_path(Path::new("dir/SOUNDS.DAT15")), Path::new("dir/SOUNDS.DAT15.json"));
        assert_eq!(default_gen_path(Path::new("dir/SOUNDS.DAT15.json")), Path::new("dir/SOUNDS.DAT15.GEN"));
        assert_eq!(default_gen_path(Path::new("CURVES.DAT12")), Path::new("CURVES.DAT12.GEN"));
    }

    #[test]
    fn explicit_format_overrides_detection() {
        let opts = ConvertOptions { format: Some(FormatKind::Curves), ..Default::default() };
        assert_eq!(opts.detect(Path::new("whatever.bin")).unwrap(), FormatKind::Curves);
        assert!(matches!(
            ConvertOptions::default().detect(Path::new("whatever.bin")),
            Err(ConvertError::UnknownFormat(_))
        ));
    }

    #[test]
    fn pretty_json_uses_four_spaces() {
        let out = render_json(&serde_json::json!({"a": 1}), true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n    \"a\": 1\n}\n");
    }

    #[test]
    fn empty_document_roundtrips() {
        let doc = Document::Categories(CategoriesFile::default());
        let bytes = doc.write().unwrap();
        let back = Document::read(FormatKind::Categories, &bytes).unwrap();
        assert_eq!(back, doc);
        assert!(back.is_empty());
        assert!(matches!(
            Document::read(FormatKind::Curves, &bytes),
            Err(FileError::UnsupportedVersion { expected: 12, found: 15, .. })
        ));
    }
}
