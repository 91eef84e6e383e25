//! Primitive type tags and ownership qualifiers shared by every later stage.

use std::fmt;

/// A primitive type tag. The source language has no user-defined types
/// beyond primitives and arrays of them (see spec Non-goals).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Int,
    Bool,
    Str,
    Char,
    Void,
    /// The type of the `null` literal itself, assignable to any nullable
    /// pointer type.
    NullLiteral,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypeTag::Int => "int",
            TypeTag::Bool => "bool",
            TypeTag::Str => "str",
            TypeTag::Char => "char",
            TypeTag::Void => "void",
            TypeTag::NullLiteral => "null",
        };
        f.write_str(s)
    }
}

impl TypeTag {
    /// The C type this tag lowers to, ignoring ownership (see
    /// `Ownership::c_suffix` for the pointer/value distinction).
    #[must_use]
    pub const fn c_base_type(self) -> &'static str {
        match self {
            TypeTag::Int => "int64_t",
            TypeTag::Bool => "bool",
            TypeTag::Str => "const char*",
            TypeTag::Char => "char",
            TypeTag::Void => "void",
            TypeTag::NullLiteral => "void*",
        }
    }

    #[must_use]
    pub const fn is_printable(self) -> bool {
        matches!(self, TypeTag::Int | TypeTag::Bool | TypeTag::Str)
    }
}

/// The ownership qualifier of a symbol or parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// Plain value; no heap responsibility.
    None,
    /// Exclusive heap ownership of the referent.
    Own,
    /// A non-owning borrow of an `Own` symbol.
    Ref,
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Ownership::None => "none",
            Ownership::Own => "own",
            Ownership::Ref => "ref",
        };
        f.write_str(s)
    }
}

impl Ownership {
    /// The mangled-name suffix used by the emitter: `own`/`ref` qualifiers
    /// participate in name mangling, plain values do not (see spec §4.8).
    #[must_use]
    pub const fn mangle_suffix(self) -> &'static str {
        match self {
            Ownership::None => "",
            Ownership::Own => "own",
            Ownership::Ref => "ref",
        }
    }

    #[must_use]
    pub const fn is_pointer(self) -> bool {
        matches!(self, Ownership::Own | Ownership::Ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_display_matches_source_syntax() {
        assert_eq!(Ownership::Own.to_string(), "own");
        assert_eq!(Ownership::Ref.to_string(), "ref");
        assert_eq!(Ownership::None.to_string(), "none");
    }

    #[test]
    fn type_tag_c_base_types() {
        assert_eq!(TypeTag::Int.c_base_type(), "int64_t");
        assert_eq!(TypeTag::Bool.c_base_type(), "bool");
    }
}
