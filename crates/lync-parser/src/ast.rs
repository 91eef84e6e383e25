//! Syntax tree node definitions (spec §3.6–§3.7, §6.2).
//!
//! Every node carries a [`NodeId`], assigned in parse order by the
//! [`crate::parser::Parser`], and a source [`Span`]. Resolved semantic facts
//! (type tag, nullability, resolved call signature, unwrapped-element type,
//! cascading-free metadata) are *not* stored here; they live in id-keyed
//! side tables owned by the analyzer (`lync_analyzer::resolved`) and
//! consumed by the emitter.

use lync_common::{Ownership, Span, TypeTag};

/// Identifies a node for the purpose of attaching analyzer-resolved facts.
/// Assigned sequentially by the parser; stable for the lifetime of one
/// compilation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

#[derive(Clone, Debug)]
pub struct Program {
    pub imports: Vec<Import>,
    pub funcs: Vec<Func>,
}

#[derive(Clone, Debug)]
pub enum ImportItem {
    All,
    Named(String),
}

#[derive(Clone, Debug)]
pub struct Import {
    /// Dot-separated path segments, e.g. `std.io` -> `["std", "io"]`.
    pub path: Vec<String>,
    pub item: ImportItem,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct Param {
    pub name: String,
    pub type_tag: TypeTag,
    pub ownership: Ownership,
    pub nullable: bool,
    pub is_const: bool,
    pub is_array: bool,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct FuncSign {
    pub name: String,
    pub params: Vec<Param>,
    pub ret_type: TypeTag,
    pub ret_ownership: Ownership,
    pub ret_nullable: bool,
    pub span: Span,
}

impl FuncSign {
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Two signatures are equal iff they share name, arity, and each
    /// parameter's (type, ownership) — per spec §3.5. Nullability/const do
    /// not participate in signature identity.
    #[must_use]
    pub fn same_signature(&self, other: &FuncSign) -> bool {
        self.name == other.name
            && self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(other.params.iter())
                .all(|(a, b)| a.type_tag == b.type_tag && a.ownership == b.ownership)
    }
}

#[derive(Clone, Debug)]
pub struct Func {
    pub sign: FuncSign,
    pub body: Stmt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

#[derive(Clone, Debug)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    IntLit(i64),
    BoolLit(bool),
    StrLit(String),
    CharLit(char),
    NullLit,
    Var(String),
    Index { array: Box<Expr>, index: Box<Expr> },
    ArrayLit(Vec<Expr>),
    Unary { op: UnaryOp, expr: Box<Expr> },
    Binary { op: BinaryOp, lhs: Box<Expr>, rhs: Box<Expr> },
    Call { name: String, args: Vec<Expr> },
    Match { subject: Box<Expr>, arms: Vec<MatchArm> },
    Some(Box<Expr>),
    Alloc(Box<Expr>),
    /// The `void` placeholder expression (used where an expression is
    /// grammatically required but nothing is produced).
    Void,
}

#[derive(Clone, Debug)]
pub enum Pattern {
    Value(Expr),
    Wildcard,
    Null,
    Some(String),
}

#[derive(Clone, Debug)]
pub enum MatchBody {
    Expr(Expr),
    Stmts(Vec<Stmt>),
}

#[derive(Clone, Debug)]
pub struct MatchArm {
    pub id: NodeId,
    pub pattern: Pattern,
    pub body: MatchBody,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct Stmt {
    pub id: NodeId,
    pub span: Span,
    pub kind: StmtKind,
}

#[derive(Clone, Debug)]
pub enum StmtKind {
    VarDecl {
        name: String,
        type_tag: TypeTag,
        ownership: Ownership,
        nullable: bool,
        is_const: bool,
        is_array: bool,
        array_size: Option<i64>,
        init: Expr,
    },
    Assign {
        name: String,
        value: Expr,
    },
    IndexAssign {
        name: String,
        index: Expr,
        value: Expr,
    },
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        cond: Expr,
    },
    For {
        var: String,
        min: Expr,
        max: Expr,
        body: Box<Stmt>,
    },
    Block(Vec<Stmt>),
    Match {
        subject: Expr,
        arms: Vec<MatchArm>,
    },
    Free {
        name: String,
    },
    ExprStmt(Expr),
    Return(Option<Expr>),
}
