//! Symbol attributes and state machine (spec §3.3, §4.9).

use lync_common::{Ownership, TypeTag};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolState {
    Alive,
    Moved,
    Freed,
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: String,
    pub type_tag: TypeTag,
    pub ownership: Ownership,
    pub nullable: bool,
    pub is_const: bool,
    pub state: SymbolState,
    /// For `ref` symbols: the name of the `own` symbol being borrowed.
    pub owner: Option<String>,
    /// Set when the owner transitions to non-`alive`.
    pub dangling: bool,
    /// Scoped-flow fact: permits reading a nullable symbol as if non-null.
    pub unwrapped: bool,
    pub is_array: bool,
    pub element_ownership: Ownership,
    /// Constant size if statically known; `None` otherwise (dynamic size).
    pub array_size: Option<i64>,
}

impl Symbol {
    #[must_use]
    pub fn new(
        name: String,
        type_tag: TypeTag,
        ownership: Ownership,
        nullable: bool,
        is_const: bool,
        is_array: bool,
        array_size: Option<i64>,
    ) -> Self {
        Symbol {
            name,
            type_tag,
            ownership,
            nullable,
            is_const,
            state: SymbolState::Alive,
            owner: None,
            dangling: false,
            unwrapped: false,
            is_array,
            element_ownership: Ownership::None,
            array_size,
        }
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state == SymbolState::Alive
    }

    /// Per spec §4.6/§4.9: a nullable `own` symbol may drop out of scope;
    /// any other `own` symbol still `alive` at scope end is a leak.
    #[must_use]
    pub fn leaks_at_scope_end(&self) -> bool {
        self.ownership == Ownership::Own && self.is_alive() && !self.nullable
    }
}
