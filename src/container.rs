//! Polymorphic tagged containers.
//!
//! On disk a container is
//!
//! ```text
//! tag          u8       selects the payload variant
//! name_offset  u32      only when NAME_OFFSET is true; index into the file's name table
//! header       H        shared by every variant of this container
//! payload      V        the variant selected by tag
//! trailing     bytes    whatever the variant left unread, up to the object size
//! ```
//!
//! The variant set is a closed Rust enum generated by [`variants!`](crate::variants).
//! Dispatch walks the variants in declaration order and binds the first whose
//! tag matches; a tag nothing claims is [`WireError::UnknownTag`].

use byteorder::{LittleEndian, WriteBytesExt};
use serde_json::{Map, Value};
use tracing::warn;

use crate::bytes::ByteReader;
use crate::hash::{HashDictionary, HashId};
use crate::wire::{describe, expect_object, required, Wire, WireError};

/// Closed set of payload variants for one container kind.
pub trait Variants: Sized {
    /// Container name used in error messages.
    const CONTAINER: &'static str;

    fn tag(&self) -> u8;

    fn type_name(&self) -> &'static str;

    /// Decode the variant declared for `tag`, first match wins.
    fn decode_tagged(tag: u8, r: &mut ByteReader<'_>) -> Result<Self, WireError>;

    /// Load the variant whose name is `type_name` from its text metadata.
    fn from_text_named(type_name: &str, metadata: &Value) -> Result<Self, WireError>;

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), WireError>;

    fn size(&self) -> usize;

    fn to_text(&self, dict: &HashDictionary) -> Result<Value, WireError>;

    fn hash_offsets(&self, at: u32, out: &mut Vec<u32>);

    fn archive_offsets(&self, at: u32, out: &mut Vec<u32>);

    fn archive_refs(&self, out: &mut Vec<HashId>);
}

/// One named object of a metadata file.
#[derive(Debug, Clone, PartialEq)]
pub struct Container<H, V, const NAME_OFFSET: bool = true> {
    pub name:     String,
    pub header:   H,
    pub payload:  V,
    /// Payload bytes the variant did not consume.  Written back verbatim and
    /// carried in text as a hex string under [`TRAILING_KEY`].
    pub trailing: Vec<u8>,
}

/// Text key holding [`Container::trailing`]; omitted when there is none.
pub const TRAILING_KEY: &str = "__trailing";

impl<H: Wire, V: Variants, const NAME_OFFSET: bool> Container<H, V, NAME_OFFSET> {
    pub fn new(name: impl Into<String>, header: H, payload: V) -> Self {
        Self { name: name.into(), header, payload, trailing: Vec::new() }
    }

    /// Width of the tag and optional name offset.
    #[inline]
    pub const fn prefix_size() -> usize {
        if NAME_OFFSET { 5 } else { 1 }
    }

    /// Bytes before the payload: prefix plus header.
    pub fn header_size(&self) -> usize {
        Self::prefix_size() + self.header.size()
    }

    pub fn size(&self) -> usize {
        self.header_size() + self.payload.size() + self.trailing.len()
    }

    /// Decode a container occupying exactly `size` bytes at the reader's
    /// position.  The name is left empty; the stored name offset, if this
    /// container kind has one, is returned alongside for the caller to
    /// resolve.
    pub fn decode(r: &mut ByteReader<'_>, size: usize) -> Result<(Self, Option<u32>), WireError> {
        let start = r.position();
        let tag = r.read_u8()?;
        let name_offset = if NAME_OFFSET { Some(r.read_u32()?) } else { None };
        let header = H::decode(r).map_err(|e| e.in_field("header"))?;

        let header_len = r.position() - start;
        let payload_len = size.checked_sub(header_len).ok_or_else(|| WireError::Truncated {
            offset:    start + size,
            needed:    header_len - size,
            available: 0,
        })?;
        let mut body = r.split(payload_len)?;
        let payload = V::decode_tagged(tag, &mut body)?;

        if !body.is_empty() {
            warn!(
                container = V::CONTAINER,
                variant = payload.type_name(),
                offset = body.position(),
                unread = body.remaining(),
                "payload bytes left unread, keeping them as trailing data"
            );
        }
        let trailing = body.rest().to_vec();

        Ok((Self { name: String::new(), header, payload, trailing }, name_offset))
    }

    /// Encode with the given name-table offset.  The offset is ignored for
    /// container kinds without one.
    pub fn encode(&self, out: &mut Vec<u8>, name_offset: u32) -> Result<(), WireError> {
        out.write_u8(self.payload.tag())?;
        if NAME_OFFSET {
            out.write_u32::<LittleEndian>(name_offset)?;
        }
        self.header.encode(out).map_err(|e| e.in_field("header"))?;
        self.payload.encode(out)?;
        out.extend_from_slice(&self.trailing);
        Ok(())
    }

    /// `{"Type": ..., <header fields>, "Metadata": {...}}`
    pub fn to_text(&self, dict: &HashDictionary) -> Result<Value, WireError> {
        let mut map = Map::new();
        map.insert("Type".to_owned(), Value::String(self.payload.type_name().to_owned()));
        match self.header.to_text(dict)? {
            Value::Object(fields) => map.extend(fields),
            other => {
                return Err(WireError::TextMismatch { expected: "header object", found: describe(&other) })
            }
        }
        map.insert("Metadata".to_owned(), self.payload.to_text(dict)?);
        if !self.trailing.is_empty() {
            map.insert(TRAILING_KEY.to_owned(), Value::String(hex::encode(&self.trailing)));
        }
        Ok(Value::Object(map))
    }

    pub fn from_text(name: impl Into<String>, value: &Value) -> Result<Self, WireError> {
        let map = expect_object(value)?;
        let header = H::from_text(value)?;
        let type_value = required(map, "Type")?;
        let type_name = type_value.as_str().ok_or_else(|| WireError::TextMismatch {
            expected: "variant name",
            found:    describe(type_value),
        })?;
        let payload = V::from_text_named(type_name, required(map, "Metadata")?)?;
        let trailing = match map.get(TRAILING_KEY) {
            None | Some(Value::Null) => Vec::new(),
            Some(v) => v
                .as_str()
                .and_then(|s| hex::decode(s).ok())
                .ok_or_else(|| WireError::TextMismatch { expected: "hex string", found: describe(v) })
                .map_err(|e| e.in_field(TRAILING_KEY))?,
        };
        Ok(Self { name: name.into(), header, payload, trailing })
    }

    /// Hash offsets for a container starting at `at`.
    pub fn hash_offsets(&self, at: u32, out: &mut Vec<u32>) {
        self.header.hash_offsets(at + Self::prefix_size() as u32, out);
        self.payload.hash_offsets(at + self.header_size() as u32, out);
    }

    pub fn archive_offsets(&self, at: u32, out: &mut Vec<u32>) {
        self.header.archive_offsets(at + Self::prefix_size() as u32, out);
        self.payload.archive_offsets(at + self.header_size() as u32, out);
    }

    pub fn archive_refs(&self, out: &mut Vec<HashId>) {
        self.header.archive_refs(out);
        self.payload.archive_refs(out);
    }
}

/// Declare the closed variant set of a container.
///
/// ```text
/// variants! {
///     pub enum CurveVariant in "CurvesMetadataContainer" {
///         Constant(CurveConstant),
///         Linear(CurveLinear),
///     }
/// }
/// ```
///
/// Every payload type must implement [`Identified`](crate::record::Identified).
#[macro_export]
macro_rules! variants {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident in $container:literal {
            $( $(#[$vmeta:meta])* $variant:ident ( $ty:ty ) ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant($ty), )*
        }

        impl $crate::container::Variants for $name {
            const CONTAINER: &'static str = $container;

            fn tag(&self) -> u8 {
                match self {
                    $( Self::$variant(_) => <$ty as $crate::record::Identified>::TAG, )*
                }
            }

            fn type_name(&self) -> &'static str {
                match self {
                    $( Self::$variant(_) => <$ty as $crate::record::Identified>::NAME, )*
                }
            }

            fn decode_tagged(
                tag: u8,
                r: &mut $crate::bytes::ByteReader<'_>,
            ) -> ::std::result::Result<Self, $crate::wire::WireError> {
                $(
                    if tag == <$ty as $crate::record::Identified>::TAG {
                        return <$ty as $crate::wire::Wire>::decode(r)
                            .map(Self::$variant)
                            .map_err(|e| e.in_field(<$ty as $crate::record::Identified>::NAME));
                    }
                )*
                Err($crate::wire::WireError::UnknownTag { container: $container, tag })
            }

            fn from_text_named(
                type_name: &str,
                metadata: &$crate::__private::Value,
            ) -> ::std::result::Result<Self, $crate::wire::WireError> {
                $(
                    if type_name == <$ty as $crate::record::Identified>::NAME {
                        return <$ty as $crate::wire::Wire>::from_text(metadata)
                            .map(Self::$variant)
                            .map_err(|e| e.in_field("Metadata"));
                    }
                )*
                Err($crate::wire::WireError::UnknownType { container: $container, name: type_name.to_owned() })
            }

            fn encode(&self, out: &mut Vec<u8>) -> ::std::result::Result<(), $crate::wire::WireError> {
                match self {
                    $( Self::$variant(v) => $crate::wire::Wire::encode(v, out)
                        .map_err(|e| e.in_field(<$ty as $crate::record::Identified>::NAME)), )*
                }
            }

            fn size(&self) -> usize {
                match self {
                    $( Self::$variant(v) => $crate::wire::Wire::size(v), )*
                }
            }

            fn to_text(
                &self,
                dict: &$crate::hash::HashDictionary,
            ) -> ::std::result::Result<$crate::__private::Value, $crate::wire::WireError> {
                match self {
                    $( Self::$variant(v) => $crate::wire::Wire::to_text(v, dict).map_err(|e| e.in_field("Metadata")), )*
                }
            }

            fn hash_offsets(&self, at: u32, out: &mut Vec<u32>) {
                match self {
                    $( Self::$variant(v) => $crate::wire::Wire::hash_offsets(v, at, out), )*
                }
            }

            fn archive_offsets(&self, at: u32, out: &mut Vec<u32>) {
                match self {
                    $( Self::$variant(v) => $crate::wire::Wire::archive_offsets(v, at, out), )*
                }
            }

            fn archive_refs(&self, out: &mut Vec<$crate::hash::HashId>) {
                match self {
                    $( Self::$variant(v) => $crate::wire::Wire::archive_refs(v, out), )*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::Raw;
    use serde_json::json;

    crate::record! {
        struct Head {
            flags: u32 => "Flags",
        }
    }

    crate::identified_record! {
        struct First = 1, "audFirst" {
            a: u32 => "A",
        }
    }

    crate::identified_record! {
        struct Second = 2, "audSecond" {
            sound: HashId => "Sound" [hash],
        }
    }

    crate::identified_record! {
        struct Shadow = 2, "audShadow" {
            b: u8 => "B",
        }
    }

    crate::identified_record! {
        struct Empty = 5, "audEmpty" {}
    }

    crate::identified_record! {
        struct Blob = 7, "audBlob" {
            kind: u8  => "Kind",
            data: Raw => "Data",
        }
    }

    crate::variants! {
        enum Kind in "TestContainer" {
            First(First),
            Second(Second),
            Shadow(Shadow),
            Empty(Empty),
            Blob(Blob),
        }
    }

    type Named = Container<Head, Kind>;
    type Unnamed = Container<Head, Kind, false>;

    fn bytes_of(c: &Named, name_offset: u32) -> Vec<u8> {
        let mut out = Vec::new();
        c.encode(&mut out, name_offset).unwrap();
        assert_eq!(out.len(), c.size());
        out
    }

    #[test]
    fn tag_selects_first_declared_variant() {
        let data = [2u8, 9, 0, 0, 0, 1, 0, 0, 0, 0xDD, 0xCC, 0xBB, 0xAA];
        let (c, name_offset) = Named::decode(&mut ByteReader::new(&data), data.len()).unwrap();
        assert_eq!(name_offset, Some(9));
        assert_eq!(c.header.flags, 1);
        assert_eq!(c.payload, Kind::Second(Second { sound: HashId(0xAABB_CCDD) }));
        assert_eq!(bytes_of(&c, 9), data);
    }

    #[test]
    fn unknown_tag_names_the_container() {
        let data = [3u8, 0, 0, 0, 0, 0, 0, 0, 0];
        match Named::decode(&mut ByteReader::new(&data), data.len()) {
            Err(WireError::UnknownTag { container, tag }) => {
                assert_eq!(container, "TestContainer");
                assert_eq!(tag, 3);
            }
            other => panic!("expected unknown tag, got {other:?}"),
        }
    }

    #[test]
    fn bodyless_variant_consumes_nothing() {
        let c = Unnamed::new("x", Head { flags: 4 }, Kind::Empty(Empty {}));
        let mut out = Vec::new();
        c.encode(&mut out, 0).unwrap();
        assert_eq!(out, [5, 4, 0, 0, 0]);
        out.extend_from_slice(&[0xEE, 0xEE]);
        let mut r = ByteReader::new(&out);
        let (back, name_offset) = Unnamed::decode(&mut r, out.len()).unwrap();
        assert_eq!(name_offset, None);
        assert_eq!(back.payload, Kind::Empty(Empty {}));
        assert_eq!(back.trailing, [0xEE, 0xEE]);
        assert!(r.is_empty());
    }

    #[test]
    fn payload_after_the_header_decodes() {
        let c = Named::new("x", Head { flags: 1 }, Kind::First(First { a: 7 }));
        let out = bytes_of(&c, 0);
        assert!(out.len() > Named::prefix_size() + 4);
        let (back, _) = Named::decode(&mut ByteReader::new(&out), out.len()).unwrap();
        assert_eq!(back.header.flags, 1);
        assert_eq!(back.payload, Kind::First(First { a: 7 }));
        assert!(back.trailing.is_empty());
    }

    #[test]
    fn unread_payload_bytes_survive_reencoding() {
        let data = [1u8, 0, 0, 0, 0, 2, 0, 0, 0, 8, 0, 0, 0, 0xAB, 0xCD];
        let (c, _) = Named::decode(&mut ByteReader::new(&data), data.len()).unwrap();
        assert_eq!(c.payload, Kind::First(First { a: 8 }));
        assert_eq!(c.trailing, [0xAB, 0xCD]);
        assert_eq!(c.size(), data.len());
        assert_eq!(bytes_of(&c, 0), data);

        let text = c.to_text(&HashDictionary::new()).unwrap();
        assert_eq!(text[TRAILING_KEY], "abcd");
        let back = Named::from_text("", &text).unwrap();
        assert_eq!(bytes_of(&back, 0), data);
    }

    #[test]
    fn raw_tail_is_bounded_by_the_object_size() {
        let mut data = vec![7u8, 0, 0, 0, 0, 0, 0, 0, 0, 3, 0x10, 0x20];
        let size = data.len();
        data.extend_from_slice(&[0xFF; 4]);
        let mut r = ByteReader::new(&data);
        let (c, _) = Named::decode(&mut r, size).unwrap();
        match &c.payload {
            Kind::Blob(b) => assert_eq!(b.data.bytes, [0x10, 0x20]),
            other => panic!("unexpected variant {other:?}"),
        }
        assert_eq!(r.remaining(), 4);
    }

    #[test]
    fn size_shorter_than_header_is_truncation() {
        let data = [1u8, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            Named::decode(&mut ByteReader::new(&data), 4),
            Err(WireError::Truncated { .. })
        ));
    }

    #[test]
    fn text_has_type_header_and_metadata() {
        let dict = HashDictionary::new();
        let c = Named::new("engine", Head { flags: 3 }, Kind::First(First { a: 8 }));
        let text = c.to_text(&dict).unwrap();
        assert_eq!(text.to_string(), r#"{"Type":"audFirst","Flags":3,"Metadata":{"A":8}}"#);

        let back = Named::from_text("engine", &text).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn unknown_type_name_is_a_schema_error() {
        let text = json!({"Type": "audNothing", "Flags": 0, "Metadata": {}});
        assert!(matches!(Named::from_text("x", &text), Err(WireError::UnknownType { .. })));
        let text = json!({"Type": "audFirst", "Flags": 0});
        assert!(matches!(Named::from_text("x", &text), Err(WireError::MissingField(_))));
    }

    #[test]
    fn offsets_are_relative_to_the_container_start() {
        let c = Named::new("n", Head { flags: 0 }, Kind::Second(Second { sound: HashId(1) }));
        let mut out = Vec::new();
        c.hash_offsets(100, &mut out);
        assert_eq!(out, vec![100 + 5 + 4]);

        let unnamed = Unnamed::new("n", Head { flags: 0 }, Kind::Second(Second { sound: HashId(1) }));
        out.clear();
        unnamed.hash_offsets(100, &mut out);
        assert_eq!(out, vec![100 + 1 + 4]);
    }
}
