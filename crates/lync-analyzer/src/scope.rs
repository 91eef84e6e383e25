//! The symbol environment: a lexically nested scope stack (spec §3.4,
//! §4.2).
//!
//! Scopes are stored in a flat arena (`Vec<Scope>`) addressed by
//! [`ScopeId`], the way the teacher's binder addresses its scope tree by
//! index rather than by a graph of `Rc`/`RefCell` nodes. `pop` does not
//! physically remove a scope from the arena — the arena owns every scope
//! for the lifetime of one analysis so that diagnostics and cleanup can
//! still reference symbols in a scope that has lexically ended — it only
//! matters for bookkeeping at the call site (the analyzer does not re-enter
//! a scope after leaving it).

use indexmap::IndexMap;

use lync_common::Ownership;

use crate::symbol::Symbol;

/// Names no symbol may use (spec §3.3, §3.5).
pub const RESERVED_NAMES: [&str; 7] =
    ["print", "length", "read_int", "read_str", "read_bool", "read_char", "read_key"];

#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

pub type ScopeId = usize;

pub struct Scope {
    pub parent: Option<ScopeId>,
    pub symbols: IndexMap<String, Symbol>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum DeclareError {
    Reserved,
    Duplicate,
}

#[derive(Default)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Environment {
    #[must_use]
    pub fn new() -> Self {
        Environment { scopes: Vec::new() }
    }

    pub fn push(&mut self, parent: Option<ScopeId>) -> ScopeId {
        self.scopes.push(Scope { parent, symbols: IndexMap::new() });
        self.scopes.len() - 1
    }

    /// Marks a scope as lexically closed. The environment does not reclaim
    /// storage (see module docs); callers run end-of-scope cleanup before
    /// calling this.
    pub fn pop(&mut self, _scope: ScopeId) {}

    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: String,
        type_tag: lync_common::TypeTag,
        ownership: Ownership,
        nullable: bool,
        is_const: bool,
        is_array: bool,
        array_size: Option<i64>,
    ) -> Result<(), DeclareError> {
        if is_reserved(&name) {
            return Err(DeclareError::Reserved);
        }
        if self.scopes[scope].symbols.contains_key(&name) {
            return Err(DeclareError::Duplicate);
        }
        let symbol = Symbol::new(name.clone(), type_tag, ownership, nullable, is_const, is_array, array_size);
        self.scopes[scope].symbols.insert(name, symbol);
        Ok(())
    }

    pub fn declare_symbol(&mut self, scope: ScopeId, symbol: Symbol) -> Result<(), DeclareError> {
        if is_reserved(&symbol.name) {
            return Err(DeclareError::Reserved);
        }
        if self.scopes[scope].symbols.contains_key(&symbol.name) {
            return Err(DeclareError::Duplicate);
        }
        self.scopes[scope].symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    #[must_use]
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        let mut cur = Some(scope);
        while let Some(id) = cur {
            if let Some(sym) = self.scopes[id].symbols.get(name) {
                return Some(sym);
            }
            cur = self.scopes[id].parent;
        }
        None
    }

    fn owning_scope(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let mut cur = Some(scope);
        while let Some(id) = cur {
            if self.scopes[id].symbols.contains_key(name) {
                return Some(id);
            }
            cur = self.scopes[id].parent;
        }
        None
    }

    pub fn lookup_mut(&mut self, scope: ScopeId, name: &str) -> Option<&mut Symbol> {
        let owner = self.owning_scope(scope, name)?;
        self.scopes[owner].symbols.get_mut(name)
    }

    /// Walks outward from `scope`, flipping the dangling flag on every
    /// `ref` whose owner matches `owner_name` (spec §4.2). Any `ref` of
    /// `owner_name` is either in `scope` itself or one of its open
    /// ancestors — a ref can only be declared once its owner is already
    /// visible, so it can never live in a scope not yet entered at the
    /// point the owner is consumed.
    pub fn mark_dangling(&mut self, scope: ScopeId, owner_name: &str) {
        let mut cur = Some(scope);
        while let Some(id) = cur {
            for sym in self.scopes[id].symbols.values_mut() {
                if sym.ownership == Ownership::Ref && sym.owner.as_deref() == Some(owner_name) {
                    sym.dangling = true;
                }
            }
            cur = self.scopes[id].parent;
        }
    }

    #[must_use]
    pub fn symbols_in_scope(&self, scope: ScopeId) -> impl Iterator<Item = &Symbol> {
        self.scopes[scope].symbols.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lync_common::TypeTag;

    #[test]
    fn child_scope_can_shadow_parent() {
        let mut env = Environment::new();
        let parent = env.push(None);
        env.declare(parent, "x".into(), TypeTag::Int, Ownership::None, false, false, false, None).unwrap();
        let child = env.push(Some(parent));
        env.declare(child, "x".into(), TypeTag::Bool, Ownership::None, false, false, false, None).unwrap();
        assert_eq!(env.lookup(child, "x").unwrap().type_tag, TypeTag::Bool);
        assert_eq!(env.lookup(parent, "x").unwrap().type_tag, TypeTag::Int);
    }

    #[test]
    fn duplicate_in_same_scope_is_rejected() {
        let mut env = Environment::new();
        let s = env.push(None);
        env.declare(s, "x".into(), TypeTag::Int, Ownership::None, false, false, false, None).unwrap();
        let err = env.declare(s, "x".into(), TypeTag::Int, Ownership::None, false, false, false, None).unwrap_err();
        assert_eq!(err, DeclareError::Duplicate);
    }

    #[test]
    fn reserved_names_rejected() {
        let mut env = Environment::new();
        let s = env.push(None);
        let err = env.declare(s, "print".into(), TypeTag::Int, Ownership::None, false, false, false, None).unwrap_err();
        assert_eq!(err, DeclareError::Reserved);
    }

    #[test]
    fn mark_dangling_flips_ref_in_same_scope() {
        let mut env = Environment::new();
        let s = env.push(None);
        env.declare(s, "x".into(), TypeTag::Int, Ownership::Own, false, false, false, None).unwrap();
        let mut r = Symbol::new("r".into(), TypeTag::Int, Ownership::Ref, false, false, false, None);
        r.owner = Some("x".into());
        env.declare_symbol(s, r).unwrap();
        env.mark_dangling(s, "x");
        assert!(env.lookup(s, "r").unwrap().dangling);
    }
}
