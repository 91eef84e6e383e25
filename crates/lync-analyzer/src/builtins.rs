//! The `std.io` prelude and the always-available `print`/`length`
//! built-ins (spec §3.5, §4.4, §6.6).

use lync_common::TypeTag;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    Print,
    Length,
    ReadInt,
    ReadStr,
    ReadBool,
    ReadChar,
    ReadKey,
}

impl Builtin {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Builtin> {
        Some(match name {
            "print" => Builtin::Print,
            "length" => Builtin::Length,
            "read_int" => Builtin::ReadInt,
            "read_str" => Builtin::ReadStr,
            "read_bool" => Builtin::ReadBool,
            "read_char" => Builtin::ReadChar,
            "read_key" => Builtin::ReadKey,
            _ => return None,
        })
    }

    /// Readers must be gated by the import registry; `print`/`length` are
    /// always available.
    #[must_use]
    pub fn is_reader(self) -> bool {
        matches!(
            self,
            Builtin::ReadInt | Builtin::ReadStr | Builtin::ReadBool | Builtin::ReadChar | Builtin::ReadKey
        )
    }

    #[must_use]
    pub fn return_type(self) -> TypeTag {
        match self {
            Builtin::Print => TypeTag::Void,
            Builtin::Length => TypeTag::Int,
            Builtin::ReadInt => TypeTag::Int,
            Builtin::ReadStr => TypeTag::Str,
            Builtin::ReadBool => TypeTag::Bool,
            Builtin::ReadChar => TypeTag::Char,
            Builtin::ReadKey => TypeTag::Char,
        }
    }

    /// All readers return a nullable value (EOF/parse failure -> null);
    /// `print`/`length` do not.
    #[must_use]
    pub fn returns_nullable(self) -> bool {
        self.is_reader()
    }
}

/// Reader names gated by `std.io` import (spec §6.6); `print` and `length`
/// are not part of this set — they need no import.
pub const READER_NAMES: [&str; 5] = ["read_int", "read_str", "read_bool", "read_char", "read_key"];

#[derive(Default)]
pub struct ImportRegistry {
    imported: rustc_hash::FxHashSet<String>,
}

impl ImportRegistry {
    #[must_use]
    pub fn new() -> Self {
        ImportRegistry::default()
    }

    pub fn import_all_std_io(&mut self) {
        for r in READER_NAMES {
            self.imported.insert(r.to_string());
        }
    }

    /// Returns `false` if `name` is not a recognized `std.io` member.
    pub fn import_named(&mut self, name: &str) -> bool {
        if READER_NAMES.contains(&name) {
            self.imported.insert(name.to_string());
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn permits(&self, name: &str) -> bool {
        self.imported.contains(name)
    }
}
