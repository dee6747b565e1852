//! Built-in scalar types and their keyword / target-language spellings.
//!
//! Every table here is a `const` slice indexed by the enum, so there is no runtime
//! initialisation and no mutation. The generator consumes [`Scalar::target_type`];
//! the parser only needs [`Scalar::from_keyword`].

use std::fmt;

/// One of the 15 primitive kinds a field, request or response can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    SFixed32,
    SFixed64,
    Bool,
    String,
    Bytes,
}

/// `(scalar, source keyword, target spelling)` rows in declaration order.
const SCALAR_TABLE: &[(Scalar, &str, &str)] = &[
    (Scalar::Double, "double", "float64"),
    (Scalar::Float, "float", "float32"),
    (Scalar::Int32, "int32", "int32"),
    (Scalar::Int64, "int64", "int64"),
    (Scalar::Uint32, "uint32", "uint32"),
    (Scalar::Uint64, "uint64", "uint64"),
    (Scalar::Sint32, "sint32", "int32"),
    (Scalar::Sint64, "sint64", "int64"),
    (Scalar::Fixed32, "fixed32", "uint32"),
    (Scalar::Fixed64, "fixed64", "uint64"),
    (Scalar::SFixed32, "sfixed32", "int32"),
    (Scalar::SFixed64, "sfixed64", "int64"),
    (Scalar::Bool, "bool", "bool"),
    (Scalar::String, "string", "string"),
    (Scalar::Bytes, "bytes", "[]byte"),
];

impl Scalar {
    /// All scalar kinds, in the order the table declares them.
    pub const ALL: [Scalar; 15] = [
        Scalar::Double,
        Scalar::Float,
        Scalar::Int32,
        Scalar::Int64,
        Scalar::Uint32,
        Scalar::Uint64,
        Scalar::Sint32,
        Scalar::Sint64,
        Scalar::Fixed32,
        Scalar::Fixed64,
        Scalar::SFixed32,
        Scalar::SFixed64,
        Scalar::Bool,
        Scalar::String,
        Scalar::Bytes,
    ];

    /// Look up a scalar by its source keyword (`"int32"`, `"bytes"`, ...).
    pub fn from_keyword(word: &str) -> Option<Scalar> {
        SCALAR_TABLE
            .iter()
            .find(|(_, keyword, _)| *keyword == word)
            .map(|(scalar, _, _)| *scalar)
    }

    fn row(self) -> &'static (Scalar, &'static str, &'static str) {
        // Rows are declared in discriminant order.
        &SCALAR_TABLE[self as usize]
    }

    /// The keyword used in `.serv` source.
    pub fn keyword(self) -> &'static str {
        self.row().1
    }

    /// The primitive spelling emitted by the server code generator.
    pub fn target_type(self) -> &'static str {
        self.row().2
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rows_match_discriminants() {
        for (i, (scalar, _, _)) in SCALAR_TABLE.iter().enumerate() {
            assert_eq!(*scalar as usize, i, "row {} out of order", i);
        }
        assert_eq!(SCALAR_TABLE.len(), Scalar::ALL.len());
    }

    #[test]
    fn keyword_lookup_is_total_and_inverse() {
        for scalar in Scalar::ALL {
            assert_eq!(Scalar::from_keyword(scalar.keyword()), Some(scalar));
            assert!(!scalar.target_type().is_empty());
        }
        assert_eq!(Scalar::from_keyword("int"), None);
        assert_eq!(Scalar::from_keyword("String"), None);
    }

    #[test]
    fn target_spellings() {
        assert_eq!(Scalar::Double.target_type(), "float64");
        assert_eq!(Scalar::Float.target_type(), "float32");
        assert_eq!(Scalar::Sint32.target_type(), "int32");
        assert_eq!(Scalar::Fixed64.target_type(), "uint64");
        assert_eq!(Scalar::SFixed32.target_type(), "int32");
        assert_eq!(Scalar::Bytes.target_type(), "[]byte");
        assert_eq!(Scalar::String.to_string(), "string");
    }
}
