//! Thin, explicitly non-load-bearing optimization pass (SPEC_FULL.md §4.11).
//!
//! `original_source/optimizer.c` is a stub of a handful of lines, confirming
//! the optimizer was never load-bearing in the original system. This pass
//! mirrors that: it selects a small set of peephole rewrites by level and
//! never changes diagnostics or observable program behavior, only the
//! literal shape of the tree the emitter walks afterward.

use lync_parser::{Expr, ExprKind, Program, Stmt, StmtKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OptLevel {
    #[default]
    O0,
    O1,
    O2,
    O3,
    Os,
}

impl OptLevel {
    /// Parses the value attached to the `-O` flag (spec §6.1: `-O0 | -O1 |
    /// -O2 | -O3 | -Os`).
    #[must_use]
    pub fn parse_flag(s: &str) -> Option<Self> {
        match s {
            "0" => Some(OptLevel::O0),
            "1" => Some(OptLevel::O1),
            "2" => Some(OptLevel::O2),
            "3" => Some(OptLevel::O3),
            "s" | "S" => Some(OptLevel::Os),
            _ => None,
        }
    }

    fn folds_constants(self) -> bool {
        !matches!(self, OptLevel::O0)
    }

    fn removes_dead_blocks(self) -> bool {
        matches!(self, OptLevel::O2 | OptLevel::O3)
    }
}

/// Runs the selected peephole rewrites over every function body in place.
pub fn optimize(program: &mut Program, level: OptLevel) {
    if level == OptLevel::O0 {
        return;
    }
    for func in &mut program.funcs {
        optimize_stmt(&mut func.body, level);
    }
}

fn optimize_stmt(stmt: &mut Stmt, level: OptLevel) {
    match &mut stmt.kind {
        StmtKind::VarDecl { init, .. } => fold_expr(init, level),
        StmtKind::Assign { value, .. } => fold_expr(value, level),
        StmtKind::IndexAssign { index, value, .. } => {
            fold_expr(index, level);
            fold_expr(value, level);
        }
        StmtKind::If { cond, then_branch, else_branch } => {
            fold_expr(cond, level);
            optimize_stmt(then_branch, level);
            if let Some(e) = else_branch {
                optimize_stmt(e, level);
            }
        }
        StmtKind::While { cond, body } => {
            fold_expr(cond, level);
            optimize_stmt(body, level);
        }
        StmtKind::DoWhile { body, cond } => {
            optimize_stmt(body, level);
            fold_expr(cond, level);
        }
        StmtKind::For { min, max, body, .. } => {
            fold_expr(min, level);
            fold_expr(max, level);
            optimize_stmt(body, level);
        }
        StmtKind::Block(stmts) => {
            for s in stmts.iter_mut() {
                optimize_stmt(s, level);
            }
            if level.removes_dead_blocks() {
                stmts.retain(|s| !is_empty_block(s));
            }
        }
        StmtKind::Match { subject, arms } => {
            fold_expr(subject, level);
            for arm in arms.iter_mut() {
                match &mut arm.body {
                    lync_parser::MatchBody::Expr(e) => fold_expr(e, level),
                    lync_parser::MatchBody::Stmts(stmts) => {
                        for s in stmts.iter_mut() {
                            optimize_stmt(s, level);
                        }
                    }
                }
            }
        }
        StmtKind::ExprStmt(e) => fold_expr(e, level),
        StmtKind::Return(Some(e)) => fold_expr(e, level),
        StmtKind::Return(None) | StmtKind::Free { .. } => {}
    }
}

/// A nested block with no statements at all contributes nothing the emitter
/// would otherwise observe; `-O2`/`-O3` drop it.
fn is_empty_block(stmt: &Stmt) -> bool {
    matches!(&stmt.kind, StmtKind::Block(stmts) if stmts.is_empty())
}

fn fold_expr(expr: &mut Expr, level: OptLevel) {
    if !level.folds_constants() {
        return;
    }
    match &mut expr.kind {
        ExprKind::Binary { op, lhs, rhs } => {
            fold_expr(lhs, level);
            fold_expr(rhs, level);
            if let (ExprKind::IntLit(a), ExprKind::IntLit(b)) = (&lhs.kind, &rhs.kind) {
                if let Some(folded) = fold_int_binary(*op, *a, *b) {
                    expr.kind = ExprKind::IntLit(folded);
                }
            }
        }
        ExprKind::Unary { op, expr: inner } => {
            fold_expr(inner, level);
            if let (lync_parser::UnaryOp::Neg, ExprKind::IntLit(n)) = (op, &inner.kind) {
                expr.kind = ExprKind::IntLit(-n);
            }
        }
        ExprKind::Index { array, index } => {
            fold_expr(array, level);
            fold_expr(index, level);
        }
        ExprKind::ArrayLit(elems) => {
            for e in elems.iter_mut() {
                fold_expr(e, level);
            }
        }
        ExprKind::Call { args, .. } => {
            for a in args.iter_mut() {
                fold_expr(a, level);
            }
        }
        ExprKind::Some(inner) | ExprKind::Alloc(inner) => fold_expr(inner, level),
        ExprKind::Match { subject, arms } => {
            fold_expr(subject, level);
            for arm in arms.iter_mut() {
                match &mut arm.body {
                    lync_parser::MatchBody::Expr(e) => fold_expr(e, level),
                    lync_parser::MatchBody::Stmts(stmts) => {
                        for s in stmts.iter_mut() {
                            optimize_stmt(s, level);
                        }
                    }
                }
            }
        }
        ExprKind::IntLit(_)
        | ExprKind::BoolLit(_)
        | ExprKind::StrLit(_)
        | ExprKind::CharLit(_)
        | ExprKind::NullLit
        | ExprKind::Var(_)
        | ExprKind::Void => {}
    }
}

/// Only folds operators whose result stays representable without consulting
/// the analyzer's type facts again; comparisons and boolean ops are left for
/// the analyzer's own constant-propagation-free semantics.
fn fold_int_binary(op: lync_parser::BinaryOp, a: i64, b: i64) -> Option<i64> {
    use lync_parser::BinaryOp;
    match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::Div if b != 0 => a.checked_div(b),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lync_common::Span;
    use lync_parser::NodeId;

    fn id() -> NodeId {
        NodeId(0)
    }

    fn span() -> Span {
        Span { start: 0, end: 0 }
    }

    fn lit(n: i64) -> Expr {
        Expr { id: id(), span: span(), kind: ExprKind::IntLit(n) }
    }

    #[test]
    fn o0_leaves_arithmetic_untouched() {
        let mut e = Expr {
            id: id(),
            span: span(),
            kind: ExprKind::Binary { op: lync_parser::BinaryOp::Add, lhs: Box::new(lit(2)), rhs: Box::new(lit(3)) },
        };
        fold_expr(&mut e, OptLevel::O0);
        assert!(matches!(e.kind, ExprKind::Binary { .. }));
    }

    #[test]
    fn o1_folds_integer_literal_arithmetic() {
        let mut e = Expr {
            id: id(),
            span: span(),
            kind: ExprKind::Binary { op: lync_parser::BinaryOp::Mul, lhs: Box::new(lit(6)), rhs: Box::new(lit(7)) },
        };
        fold_expr(&mut e, OptLevel::O1);
        assert!(matches!(e.kind, ExprKind::IntLit(42)));
    }

    #[test]
    fn o2_drops_empty_nested_blocks() {
        let mut body = Stmt { id: id(), span: span(), kind: StmtKind::Block(vec![Stmt { id: id(), span: span(), kind: StmtKind::Block(vec![]) }]) };
        optimize_stmt(&mut body, OptLevel::O2);
        assert!(matches!(&body.kind, StmtKind::Block(stmts) if stmts.is_empty()));
    }

    #[test]
    fn parse_flag_accepts_all_documented_levels() {
        assert_eq!(OptLevel::parse_flag("0"), Some(OptLevel::O0));
        assert_eq!(OptLevel::parse_flag("3"), Some(OptLevel::O3));
        assert_eq!(OptLevel::parse_flag("s"), Some(OptLevel::Os));
        assert_eq!(OptLevel::parse_flag("4"), None);
    }
}
