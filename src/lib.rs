pub mod bytes;
pub mod hash;
pub mod wire;
pub mod offsets;
pub mod record;
pub mod optional_record;
pub mod container;
pub mod file;
pub mod formats;
pub mod convert;

pub use bytes::ByteReader;
pub use container::{Container, Variants};
pub use convert::{ConvertError, ConvertOptions, Document};
pub use file::{Entry, FileError, Format, MetadataFile};
pub use formats::FormatKind;
pub use hash::{HashDictionary, HashId};
pub use offsets::Offsets;
pub use record::Identified;
pub use wire::{Wire, WireError};

/// Re-exports used by the record macros.
#[doc(hidden)]
pub mod __private {
    pub use serde_json::{Map, Value};
}
