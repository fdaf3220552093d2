//! Declarative records.
//!
//! A record is an ordered list of named fields.  [`record!`](crate::record)
//! generates the struct and its [`Wire`](crate::wire::Wire) impl: binary
//! fields back to back in declaration order, text as a JSON object keyed by
//! each field's text name.  A field whose text name is `""` is padding: it is
//! carried in binary form, left out of the text, and defaulted when loading
//! from text.
//!
//! ```text
//! record! {
//!     pub struct CurvePoint {
//!         x: f32 => "x",
//!         y: f32 => "y",
//!     }
//! }
//! ```
//!
//! Append `[hash]` or `[archive]` after a field's text name to have its
//! offset reported by offset extraction.

/// A record that can stand as a container variant.
pub trait Identified {
    /// Tag byte selecting this variant on disk.
    const TAG: u8;
    /// Variant name used in the text `"Type"` key.
    const NAME: &'static str;
}

#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $ty:ty => $text:literal $([$flag:ident])?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default)]
        $vis struct $name {
            $( $(#[$fmeta])* pub $field: $ty, )*
        }

        #[allow(unused_variables, unused_mut, unused_assignments)]
        impl $crate::wire::Wire for $name {
            fn decode(r: &mut $crate::bytes::ByteReader<'_>) -> ::std::result::Result<Self, $crate::wire::WireError> {
                Ok(Self {
                    $(
                        $field: <$ty as $crate::wire::Wire>::decode(r)
                            .map_err(|e| e.in_field($crate::__field_label!($field, $text)))?,
                    )*
                })
            }

            fn encode(&self, out: &mut Vec<u8>) -> ::std::result::Result<(), $crate::wire::WireError> {
                $(
                    $crate::wire::Wire::encode(&self.$field, out)
                        .map_err(|e| e.in_field($crate::__field_label!($field, $text)))?;
                )*
                Ok(())
            }

            fn size(&self) -> usize {
                0 $( + $crate::wire::Wire::size(&self.$field) )*
            }

            fn to_text(
                &self,
                dict: &$crate::hash::HashDictionary,
            ) -> ::std::result::Result<$crate::__private::Value, $crate::wire::WireError> {
                let mut map = $crate::__private::Map::new();
                $(
                    if !$text.is_empty() {
                        let v = $crate::wire::Wire::to_text(&self.$field, dict).map_err(|e| e.in_field($text))?;
                        map.insert($text.to_owned(), v);
                    }
                )*
                Ok($crate::__private::Value::Object(map))
            }

            fn from_text(value: &$crate::__private::Value) -> ::std::result::Result<Self, $crate::wire::WireError> {
                let map = $crate::wire::expect_object(value)?;
                Ok(Self {
                    $(
                        $field: if $text.is_empty() {
                            <$ty as ::std::default::Default>::default()
                        } else {
                            <$ty as $crate::wire::Wire>::from_text($crate::wire::required(map, $text)?)
                                .map_err(|e| e.in_field($text))?
                        },
                    )*
                })
            }

            fn hash_offsets(&self, at: u32, out: &mut Vec<u32>) {
                let mut at = at;
                $(
                    $crate::__field_hash_offsets!(&self.$field, at, out $(, $flag)?);
                    at += $crate::wire::Wire::size(&self.$field) as u32;
                )*
            }

            fn archive_offsets(&self, at: u32, out: &mut Vec<u32>) {
                let mut at = at;
                $(
                    $crate::__field_archive_offsets!(&self.$field, at, out $(, $flag)?);
                    at += $crate::wire::Wire::size(&self.$field) as u32;
                )*
            }

            fn archive_refs(&self, out: &mut Vec<$crate::hash::HashId>) {
                $( $crate::__field_archive_refs!(&self.$field, out $(, $flag)?); )*
            }
        }
    };
}

/// [`record!`](crate::record) plus an [`Identified`] impl:
/// `pub struct Name = TAG, "TypeName" { ... }`.
#[macro_export]
macro_rules! identified_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident = $tag:expr, $type_name:literal { $($body:tt)* }
    ) => {
        $crate::record! {
            $(#[$meta])*
            $vis struct $name { $($body)* }
        }

        impl $crate::record::Identified for $name {
            const TAG: u8 = $tag;
            const NAME: &'static str = $type_name;
        }
    };
}

/// Text name of a field for error context, falling back to the Rust name.
#[doc(hidden)]
#[macro_export]
macro_rules! __field_label {
    ($field:ident, $text:literal) => {
        if $text.is_empty() { stringify!($field) } else { $text }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytes::ByteReader;
    use crate::hash::{HashDictionary, HashId};
    use crate::wire::{Array, SizedString, Wire, WireError};
    use serde_json::json;

    crate::record! {
        struct Named {
            flags: u32          => "Flags",
            name:  SizedString  => "Name",
        }
    }

    crate::record! {
        struct Padded {
            a:    u8  => "A",
            pad:  u16 => "",
            b:    u8  => "B",
        }
    }

    crate::identified_record! {
        struct Refs = 4, "audRefs" {
            sound:    HashId                    => "Sound" [hash],
            volume:   i16                       => "Volume",
            bank:     HashId                    => "Bank" [archive],
            children: Array<HashId, u8, true>   => "Children",
        }
    }

    #[test]
    fn flags_and_name_end_to_end() {
        let dict = HashDictionary::new();
        let rec = Named::from_text(&json!({"Flags": 7, "Name": "engine"})).unwrap();
        let mut out = Vec::new();
        rec.encode(&mut out).unwrap();
        assert_eq!(out, [0x07, 0, 0, 0, 0x06, 0x65, 0x6E, 0x67, 0x69, 0x6E, 0x65]);
        assert_eq!(rec.size(), out.len());

        let back = Named::decode(&mut ByteReader::new(&out)).unwrap();
        assert_eq!(back, rec);
        assert_eq!(back.to_text(&dict).unwrap().to_string(), r#"{"Flags":7,"Name":"engine"}"#);
    }

    #[test]
    fn empty_named_fields_stay_binary_only() {
        let data = [1u8, 0xAA, 0xBB, 2];
        let rec = Padded::decode(&mut ByteReader::new(&data)).unwrap();
        assert_eq!(rec.pad, 0xBBAA);
        let text = rec.to_text(&HashDictionary::new()).unwrap();
        assert_eq!(text, json!({"A": 1, "B": 2}));

        let loaded = Padded::from_text(&text).unwrap();
        assert_eq!(loaded, Padded { a: 1, pad: 0, b: 2 });
    }

    #[test]
    fn missing_field_is_named() {
        let err = Named::from_text(&json!({"Flags": 1})).unwrap_err();
        assert_eq!(err.to_string(), "missing field \"Name\"");
        let err = Named::from_text(&json!({"Flags": "x", "Name": ""})).unwrap_err();
        assert!(err.to_string().starts_with("Flags: "));
    }

    #[test]
    fn decode_errors_carry_field_context() {
        let err = Named::decode(&mut ByteReader::new(&[7, 0, 0, 0, 9, b'a'])).unwrap_err();
        assert!(err.to_string().starts_with("Name: "));
        assert!(matches!(err.root(), WireError::Truncated { .. }));
    }

    #[test]
    fn flagged_fields_report_offsets() {
        assert_eq!(Refs::TAG, 4);
        assert_eq!(Refs::NAME, "audRefs");
        let rec = Refs {
            sound:    HashId(1),
            volume:   -100,
            bank:     HashId(2),
            children: vec![HashId::NONE, HashId(3)].into(),
        };
        let mut hashes = Vec::new();
        rec.hash_offsets(100, &mut hashes);
        assert_eq!(hashes, vec![100, 100 + 4 + 2 + 4 + 1 + 4]);

        let mut archives = Vec::new();
        rec.archive_offsets(100, &mut archives);
        assert_eq!(archives, vec![106]);

        let mut refs = Vec::new();
        rec.archive_refs(&mut refs);
        assert_eq!(refs, vec![HashId(2)]);
    }

    #[test]
    fn sentinel_fields_are_skipped() {
        let rec = Refs { sound: HashId::NONE, bank: HashId::NONE, ..Refs::default() };
        let mut hashes = Vec::new();
        rec.hash_offsets(0, &mut hashes);
        rec.archive_offsets(0, &mut hashes);
        assert!(hashes.is_empty());
    }
}
