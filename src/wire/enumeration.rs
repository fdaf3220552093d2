use std::fmt;
use std::marker::PhantomData;

use serde_json::Value;

use super::{describe, Wire, WireError};
use crate::bytes::ByteReader;
use crate::hash::HashDictionary;

/// A closed table of symbolic names over an integer representation.
///
/// Implemented on uninhabited marker types by [`symbolic_enum!`](crate::symbolic_enum).
pub trait Symbolic: 'static {
    type Repr: Wire + Copy + PartialEq + fmt::Debug + fmt::Display + Default + 'static;

    const NAME: &'static str;
    const VALUES: &'static [(&'static str, Self::Repr)];

    fn name_of(value: Self::Repr) -> Option<&'static str> {
        Self::VALUES.iter().find(|(_, v)| *v == value).map(|(n, _)| *n)
    }

    fn value_of(name: &str) -> Option<Self::Repr> {
        Self::VALUES.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }
}

/// Integer field rendered as one of the names declared by `E`.
///
/// The binary value passes through untouched, declared or not.  Only the
/// text conversion insists on a declared name.
pub struct Enum<E: Symbolic> {
    pub value: E::Repr,
    _tag:      PhantomData<fn() -> E>,
}

impl<E: Symbolic> Enum<E> {
    pub fn new(value: E::Repr) -> Self {
        Self { value, _tag: PhantomData }
    }

    pub fn name(&self) -> Option<&'static str> {
        E::name_of(self.value)
    }
}

impl<E: Symbolic> Default for Enum<E> {
    fn default() -> Self {
        Self::new(E::Repr::default())
    }
}

impl<E: Symbolic> Clone for Enum<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Symbolic> Copy for Enum<E> {}

impl<E: Symbolic> PartialEq for Enum<E> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<E: Symbolic> fmt::Debug for Enum<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None       => write!(f, "{}({})", E::NAME, self.value),
        }
    }
}

impl<E: Symbolic> Wire for Enum<E> {
    fn decode(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
        E::Repr::decode(r).map(Self::new)
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), WireError> {
        self.value.encode(out)
    }

    fn size(&self) -> usize {
        self.value.size()
    }

    fn to_text(&self, _dict: &HashDictionary) -> Result<Value, WireError> {
        self.name()
            .map(|n| Value::String(n.to_owned()))
            .ok_or_else(|| WireError::UnknownEnumValue {
                enum_name: E::NAME,
                value:     self.value.to_string(),
            })
    }

    fn from_text(value: &Value) -> Result<Self, WireError> {
        let name = value.as_str().ok_or_else(|| WireError::TextMismatch {
            expected: "enumeration name",
            found:    describe(value),
        })?;
        E::value_of(name)
            .map(Self::new)
            .ok_or_else(|| WireError::UnknownEnumName { enum_name: E::NAME, name: name.to_owned() })
    }
}

/// Declare a symbolic enumeration and the [`Enum`] alias that stores it.
///
/// ```
/// audmeta::symbolic_enum! {
///     /// Comparison applied by a conditional.
///     pub enum ConditionNames as Condition: u8 {
///         "LESS_THAN"    = 0,
///         "GREATER_THAN" = 1,
///     }
/// }
/// let c = Condition::new(1);
/// assert_eq!(c.name(), Some("GREATER_THAN"));
/// ```
#[macro_export]
macro_rules! symbolic_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $marker:ident as $alias:ident : $repr:ty {
            $( $name:literal = $value:expr ),* $(,)?
        }
    ) => {
        #[derive(Debug)]
        $vis enum $marker {}

        impl $crate::wire::Symbolic for $marker {
            type Repr = $repr;

            const NAME: &'static str = stringify!($alias);
            const VALUES: &'static [(&'static str, $repr)] = &[ $( ($name, $value) ),* ];
        }

        $(#[$meta])*
        $vis type $alias = $crate::wire::Enum<$marker>;
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    crate::symbolic_enum! {
        enum OpNames as Op: u8 {
            "ADD" = 0,
            "SUB" = 1,
            "MUL" = 7,
        }
    }

    #[test]
    fn names_map_both_ways() {
        let dict = HashDictionary::new();
        let op = Op::decode(&mut ByteReader::new(&[7])).unwrap();
        assert_eq!(op.to_text(&dict).unwrap(), json!("MUL"));
        assert_eq!(Op::from_text(&json!("SUB")).unwrap(), Op::new(1));
        let mut out = Vec::new();
        op.encode(&mut out).unwrap();
        assert_eq!(out, [7]);
    }

    #[test]
    fn undeclared_value_has_no_text() {
        let op = Op::decode(&mut ByteReader::new(&[3])).unwrap();
        match op.to_text(&HashDictionary::new()) {
            Err(WireError::UnknownEnumValue { enum_name, value }) => {
                assert_eq!(enum_name, "Op");
                assert_eq!(value, "3");
            }
            other => panic!("expected enumeration mismatch, got {other:?}"),
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(matches!(Op::from_text(&json!("DIV")), Err(WireError::UnknownEnumName { .. })));
        assert!(matches!(Op::from_text(&json!(1)), Err(WireError::TextMismatch { .. })));
    }
}
