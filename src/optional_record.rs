//! Bitmask-guarded records.
//!
//! Binary form is a little-endian `u32` presence mask followed by the present
//! fields in declaration order.  Bit `i` stands for the `i`-th declared field,
//! so at most 32 fields fit; [`optional_record!`](crate::optional_record)
//! refuses to compile a longer list.  Absent fields cost zero bytes.

#[macro_export]
macro_rules! optional_record {
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
            $( $(#[$fmeta])* pub $field: $crate::wire::Optional<$ty>, )*
        }

        const _: () = assert!(
            <[&'static str]>::len(&[$($text),*]) <= 32,
            concat!(stringify!($name), " declares more fields than a u32 presence mask can hold"),
        );

        #[allow(unused_mut, unused_assignments)]
        impl $name {
            pub const FIELD_COUNT: usize = <[&'static str]>::len(&[$($text),*]);

            /// Mask with bit `i` set for every present field `i`.
            pub fn presence_mask(&self) -> u32 {
                let mut mask = 0u32;
                let mut bit = 0u32;
                $(
                    if self.$field.is_present() {
                        mask |= 1 << bit;
                    }
                    bit += 1;
                )*
                mask
            }
        }

        #[allow(unused_variables, unused_mut, unused_assignments)]
        impl $crate::wire::Wire for $name {
            fn decode(r: &mut $crate::bytes::ByteReader<'_>) -> ::std::result::Result<Self, $crate::wire::WireError> {
                let mask = r.read_u32()?;
                if mask.checked_shr(Self::FIELD_COUNT as u32).unwrap_or(0) != 0 {
                    return Err($crate::wire::WireError::UnknownPresenceBits { mask, fields: Self::FIELD_COUNT });
                }
                let mut bit = 0u32;
                Ok(Self {
                    $(
                        $field: {
                            let present = mask & (1 << bit) != 0;
                            bit += 1;
                            if present {
                                <$crate::wire::Optional<$ty> as $crate::wire::Wire>::decode(r)
                                    .map_err(|e| e.in_field($crate::__field_label!($field, $text)))?
                            } else {
                                $crate::wire::Optional::absent()
                            }
                        },
                    )*
                })
            }

            fn encode(&self, out: &mut Vec<u8>) -> ::std::result::Result<(), $crate::wire::WireError> {
                let at = out.len();
                out.extend_from_slice(&[0; 4]);
                $(
                    $crate::wire::Wire::encode(&self.$field, out)
                        .map_err(|e| e.in_field($crate::__field_label!($field, $text)))?;
                )*
                $crate::bytes::patch_u32(out, at, self.presence_mask());
                Ok(())
            }

            fn size(&self) -> usize {
                4 $( + $crate::wire::Wire::size(&self.$field) )*
            }

            fn to_text(
                &self,
                dict: &$crate::hash::HashDictionary,
            ) -> ::std::result::Result<$crate::__private::Value, $crate::wire::WireError> {
                let mut map = $crate::__private::Map::new();
                $(
                    if let Some(v) = self.$field.get() {
                        if !$text.is_empty() {
                            let v = $crate::wire::Wire::to_text(v, dict).map_err(|e| e.in_field($text))?;
                            map.insert($text.to_owned(), v);
                        }
                    }
                )*
                Ok($crate::__private::Value::Object(map))
            }

            fn from_text(value: &$crate::__private::Value) -> ::std::result::Result<Self, $crate::wire::WireError> {
                let map = $crate::wire::expect_object(value)?;
                Ok(Self {
                    $(
                        $field: match map.get($text) {
                            Some(v) if !$text.is_empty() => {
                                <$crate::wire::Optional<$ty> as $crate::wire::Wire>::from_text(v)
                                    .map_err(|e| e.in_field($text))?
                            }
                            _ => $crate::wire::Optional::absent(),
                        },
                    )*
                })
            }

            fn hash_offsets(&self, at: u32, out: &mut Vec<u32>) {
                let mut at = at + 4;
                $(
                    $crate::__field_hash_offsets!(&self.$field, at, out $(, $flag)?);
                    at += $crate::wire::Wire::size(&self.$field) as u32;
                )*
            }

            fn archive_offsets(&self, at: u32, out: &mut Vec<u32>) {
                let mut at = at + 4;
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

#[cfg(test)]
mod tests {
    use crate::bytes::ByteReader;
    use crate::hash::{HashDictionary, HashId};
    use crate::wire::{Optional, Wire, WireError};
    use serde_json::json;

    crate::optional_record! {
        struct Trio {
            a: u32    => "A",
            b: u16    => "B",
            c: HashId => "C" [hash],
        }
    }

    #[test]
    fn only_present_fields_are_written() {
        let rec = Trio { b: Optional::present(0x0102), ..Trio::default() };
        assert_eq!(rec.presence_mask(), 0b010);
        let mut out = Vec::new();
        rec.encode(&mut out).unwrap();
        assert_eq!(out, [2, 0, 0, 0, 0x02, 0x01]);
        assert_eq!(rec.size(), 4 + 2);

        let back = Trio::decode(&mut ByteReader::new(&out)).unwrap();
        assert_eq!(back, rec);
        assert!(!back.a.is_present());
        assert!(!back.c.is_present());
    }

    #[test]
    fn all_absent_is_just_the_mask() {
        let mut out = Vec::new();
        Trio::default().encode(&mut out).unwrap();
        assert_eq!(out, [0, 0, 0, 0]);
    }

    #[test]
    fn undeclared_bits_are_rejected() {
        let data = [0b1000u8, 0, 0, 0];
        assert!(matches!(
            Trio::decode(&mut ByteReader::new(&data)),
            Err(WireError::UnknownPresenceBits { mask: 8, fields: 3 })
        ));
    }

    #[test]
    fn text_holds_present_fields_only() {
        let dict = HashDictionary::new();
        let rec = Trio { a: Optional::present(9), c: Optional::present(HashId(0x10)), ..Trio::default() };
        let text = rec.to_text(&dict).unwrap();
        assert_eq!(text, json!({"A": 9, "C": "0x00000010"}));

        let loaded = Trio::from_text(&json!({"A": 9, "B": null, "C": "0x00000010"})).unwrap();
        assert_eq!(loaded, rec);
    }

    #[test]
    fn offsets_skip_the_mask_and_absent_fields() {
        let rec = Trio { a: Optional::present(1), c: Optional::present(HashId(5)), ..Trio::default() };
        let mut out = Vec::new();
        rec.hash_offsets(20, &mut out);
        assert_eq!(out, vec![20 + 4 + 4]);

        let none = Trio { c: Optional::present(HashId::NONE), ..Trio::default() };
        out.clear();
        none.hash_offsets(0, &mut out);
        assert!(out.is_empty());
    }
}
