//! Side tables carrying analyzer-resolved facts, keyed by [`NodeId`].
//!
//! Per spec §9 "Mutable state on the tree": an implementation may either
//! mutate the parser's tree in place or maintain side tables keyed by node
//! identity. This implementation takes the side-table approach so the AST
//! itself stays plain data; the emitter consumes an [`AnalysisResult`]
//! alongside the tree it was computed from.

use rustc_hash::FxHashMap;

use lync_common::{Ownership, TypeTag};
use lync_parser::{FuncSign, NodeId};

use crate::builtins::Builtin;

#[derive(Clone, Debug)]
pub enum CallResolution {
    User(FuncSign),
    Builtin(Builtin),
}

/// Resolved facts attached to an expression node (spec §3.6, §4.4, §6.3).
#[derive(Clone, Debug, Default)]
pub struct ExprFacts {
    pub type_tag: Option<TypeTag>,
    pub nullable: bool,
    pub ownership: Option<Ownership>,
    pub is_const: bool,
    /// Set for `Var` nodes naming an array symbol — the emitter must not
    /// auto-dereference these even when `ownership`/`nullable` say pointer.
    pub is_array: bool,
    pub call: Option<CallResolution>,
    /// Set when `length(arr)` was constant-folded (spec §4.4, §4.8): the
    /// emitter emits this literal instead of a call.
    pub folded_int: Option<i64>,
}

/// Cascading-free metadata attached to a `free` statement (spec §4.6,
/// §6.3).
#[derive(Clone, Copy, Debug, Default)]
pub struct FreeFacts {
    pub is_array_of_own: bool,
    pub array_size: Option<i64>,
}

/// The unwrapped element type carried by a `some(b)` match arm (spec §3.6,
/// §4.5, §6.3).
#[derive(Default)]
pub struct AnalysisResult {
    pub expr_facts: FxHashMap<NodeId, ExprFacts>,
    pub free_facts: FxHashMap<NodeId, FreeFacts>,
    pub match_arm_unwrap_type: FxHashMap<NodeId, TypeTag>,
    /// The ownership of a `StmtKind::Assign` target, keyed by the statement's
    /// own node id (the statement has no `Expr` node to hang this on). The
    /// emitter uses this to decide whether the right-hand side should be
    /// read as a raw pointer (copying an `own`/`ref` symbol) or as its
    /// auto-dereferenced value.
    pub assign_target_ownership: FxHashMap<NodeId, Ownership>,
    /// Whether `read_key` was referenced anywhere in the program — gates
    /// the platform-conditional preamble helper (spec §6.6).
    pub uses_read_key: bool,
}

impl AnalysisResult {
    #[must_use]
    pub fn new() -> Self {
        AnalysisResult::default()
    }

    pub fn set_expr(&mut self, id: NodeId, facts: ExprFacts) {
        self.expr_facts.insert(id, facts);
    }

    #[must_use]
    pub fn expr(&self, id: NodeId) -> Option<&ExprFacts> {
        self.expr_facts.get(&id)
    }
}
