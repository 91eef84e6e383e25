//! Statement analysis: ownership lifecycle rules (spec §4.6) and
//! control-flow constructs (spec §4.7).

use lync_common::{Location, Ownership, Stage, TypeTag};
use lync_parser::{Expr, ExprKind, Stmt, StmtKind};

use crate::builtins::Builtin;
use crate::cleanup::check_scope_cleanup;
use crate::ctx::Ctx;
use crate::pattern;
use crate::resolved::FreeFacts;
use crate::scope::{DeclareError, ScopeId};
use crate::symbol::{Symbol, SymbolState};

pub fn analyze_stmt(ctx: &mut Ctx, scope: ScopeId, stmt: &Stmt) {
    let loc = ctx.line_map.span_location(stmt.span);
    match &stmt.kind {
        StmtKind::VarDecl { name, type_tag, ownership, nullable, is_const, is_array, array_size, init } => {
            analyze_var_decl(ctx, scope, loc, name, *type_tag, *ownership, *nullable, *is_const, *is_array, *array_size, init);
        }
        StmtKind::Assign { name, value } => analyze_assign(ctx, scope, loc, name, value, stmt.id),
        StmtKind::IndexAssign { name, index, value } => analyze_index_assign(ctx, scope, loc, name, index, value),
        StmtKind::If { cond, then_branch, else_branch } => analyze_if(ctx, scope, loc, cond, then_branch, else_branch.as_deref()),
        StmtKind::While { cond, body } => analyze_while(ctx, scope, loc, cond, body),
        StmtKind::DoWhile { body, cond } => analyze_do_while(ctx, scope, loc, body, cond),
        StmtKind::For { var, min, max, body } => analyze_for(ctx, scope, loc, var, min, max, body),
        StmtKind::Block(stmts) => analyze_block(ctx, scope, loc, stmts),
        StmtKind::Match { subject, arms } => pattern::analyze_match_stmt(ctx, scope, loc, subject, arms),
        StmtKind::Free { name } => analyze_free(ctx, scope, loc, name, stmt.id),
        StmtKind::ExprStmt(e) => {
            ctx.analyze_expr(scope, e, false);
        }
        StmtKind::Return(value) => analyze_return(ctx, scope, loc, value.as_ref()),
    }
}

fn is_valid_own_initializer(ctx: &Ctx, scope: ScopeId, init: &Expr) -> bool {
    match &init.kind {
        ExprKind::Alloc(_) => true,
        ExprKind::NullLit => true,
        ExprKind::Call { name, args } => {
            if let Some(b) = Builtin::from_name(name) {
                b.is_reader()
            } else {
                ctx.funcs.candidates(name, args.len()).any(|s| s.ret_ownership == Ownership::Own)
            }
        }
        ExprKind::Var(src) => ctx.env.lookup(scope, src).map(|s| s.ownership == Ownership::Own).unwrap_or(false),
        _ => false,
    }
}

#[allow(clippy::too_many_arguments)]
fn analyze_var_decl(
    ctx: &mut Ctx,
    scope: ScopeId,
    loc: Location,
    name: &str,
    type_tag: TypeTag,
    ownership: Ownership,
    nullable: bool,
    is_const: bool,
    is_array: bool,
    array_size: Option<i64>,
    init: &Expr,
) {
    let mut owner: Option<String> = None;
    let mut effective_const = is_const;

    match ownership {
        Ownership::Own => {
            if !is_valid_own_initializer(ctx, scope, init) {
                ctx.diags.error(Stage::Analyzer, loc.clone(), format!("invalid 'own' initializer for '{name}'"));
            }
            let init_tag = ctx.analyze_expr(scope, init, true);
            if let ExprKind::Var(src_name) = &init.kind {
                if let Some(sym) = ctx.env.lookup_mut(scope, src_name) {
                    if sym.ownership == Ownership::Own {
                        sym.state = SymbolState::Moved;
                    }
                }
            }
            if !matches!(init.kind, ExprKind::NullLit) && init_tag != type_tag {
                ctx.diags.error(Stage::Analyzer, loc.clone(), format!("cannot initialize '{name}: {type_tag}' with a value of type '{init_tag}'"));
            }
        }
        Ownership::Ref => match &init.kind {
            ExprKind::Var(src_name) => {
                match ctx.env.lookup(scope, src_name) {
                    Some(src) if src.ownership == Ownership::Own => {
                        owner = Some(src_name.clone());
                        effective_const = src.is_const;
                    }
                    _ => {
                        ctx.diags.error(
                            Stage::Analyzer,
                            loc.clone(),
                            "'ref' declaration requires its initializer to be a simple variable use of an 'own' symbol",
                        );
                    }
                }
                ctx.analyze_expr(scope, init, false);
            }
            _ => {
                ctx.diags.error(
                    Stage::Analyzer,
                    loc.clone(),
                    "'ref' declaration requires its initializer to be a simple variable use of an 'own' symbol",
                );
                ctx.analyze_expr(scope, init, false);
            }
        },
        Ownership::None => {
            let init_tag = ctx.analyze_expr(scope, init, false);
            if init_tag != type_tag {
                ctx.diags.error(Stage::Analyzer, loc.clone(), format!("cannot initialize '{name}: {type_tag}' with a value of type '{init_tag}'"));
            }
        }
    }

    let element_ownership = if is_array { ownership } else { Ownership::None };
    let mut sym = Symbol::new(name.to_string(), type_tag, ownership, nullable, effective_const, is_array, array_size);
    sym.owner = owner;
    sym.element_ownership = element_ownership;
    match ctx.env.declare_symbol(scope, sym) {
        Ok(()) => {}
        Err(DeclareError::Reserved) => {
            ctx.diags.error(Stage::Analyzer, loc, format!("'{name}' is a reserved name and cannot be used as a symbol"));
        }
        Err(DeclareError::Duplicate) => {
            ctx.diags.error(Stage::Analyzer, loc, format!("duplicate declaration of '{name}' in this scope"));
        }
    }
}

fn analyze_assign(ctx: &mut Ctx, scope: ScopeId, loc: Location, name: &str, value: &Expr, stmt_id: lync_parser::NodeId) {
    let Some(sym_info) = ctx.env.lookup(scope, name).cloned() else {
        ctx.diags.error(Stage::Analyzer, loc, format!("undeclared variable '{name}'"));
        ctx.analyze_expr(scope, value, false);
        return;
    };
    ctx.result.assign_target_ownership.insert(stmt_id, sym_info.ownership);
    if sym_info.is_const {
        ctx.diags.error(Stage::Analyzer, loc.clone(), format!("cannot assign to const variable '{name}'"));
    }
    if sym_info.is_array && !matches!(value.kind, ExprKind::Alloc(_)) {
        ctx.diags.error(
            Stage::Analyzer,
            loc.clone(),
            format!("array '{name}' may only be whole-reassigned via 'alloc'; use element assignment instead"),
        );
    }

    match sym_info.ownership {
        Ownership::Own => {
            if sym_info.state == SymbolState::Freed && !matches!(value.kind, ExprKind::Alloc(_)) {
                ctx.diags.error(
                    Stage::Analyzer,
                    loc.clone(),
                    format!("assignment to freed variable '{name}' requires an 'alloc(e)' right-hand side"),
                );
            }
            let value_tag = ctx.analyze_expr(scope, value, true);
            if value_tag != sym_info.type_tag && !matches!(value.kind, ExprKind::NullLit) {
                ctx.diags.error(Stage::Analyzer, loc.clone(), format!("cannot assign '{value_tag}' to '{name}: {}'", sym_info.type_tag));
            }
            if matches!(value.kind, ExprKind::Alloc(_)) {
                if let Some(sym) = ctx.env.lookup_mut(scope, name) {
                    sym.state = SymbolState::Alive;
                }
            }
        }
        Ownership::Ref => match &value.kind {
            ExprKind::Var(src) if ctx.env.lookup(scope, src).map(|s| s.ownership == Ownership::Own).unwrap_or(false) => {
                ctx.analyze_expr(scope, value, false);
                let src = src.clone();
                if let Some(sym) = ctx.env.lookup_mut(scope, name) {
                    sym.owner = Some(src);
                }
            }
            _ => {
                ctx.diags.error(Stage::Analyzer, loc.clone(), "'ref' reassignment requires a simple variable use of an 'own' symbol");
                ctx.analyze_expr(scope, value, false);
            }
        },
        Ownership::None => {
            let value_tag = ctx.analyze_expr(scope, value, false);
            if value_tag != sym_info.type_tag {
                ctx.diags.error(Stage::Analyzer, loc, format!("cannot assign '{value_tag}' to '{name}: {}'", sym_info.type_tag));
            }
        }
    }
}

fn analyze_index_assign(ctx: &mut Ctx, scope: ScopeId, loc: Location, name: &str, index: &Expr, value: &Expr) {
    let Some(sym) = ctx.env.lookup(scope, name).cloned() else {
        ctx.diags.error(Stage::Analyzer, loc, format!("undeclared variable '{name}'"));
        ctx.analyze_expr(scope, index, false);
        ctx.analyze_expr(scope, value, false);
        return;
    };
    if !sym.is_array {
        ctx.diags.error(Stage::Analyzer, loc.clone(), format!("'{name}' is not an array"));
    }
    if sym.is_const {
        ctx.diags.error(Stage::Analyzer, loc.clone(), format!("cannot assign into const array '{name}'"));
    }
    let idx_tag = ctx.analyze_expr(scope, index, false);
    if idx_tag != TypeTag::Int {
        ctx.diags.error(Stage::Analyzer, loc.clone(), "array index must be 'int'");
    }
    let value_tag = ctx.analyze_expr(scope, value, false);
    if value_tag != sym.type_tag {
        ctx.diags.error(Stage::Analyzer, loc, format!("cannot assign '{value_tag}' into array of '{}'", sym.type_tag));
    }
}

fn analyze_free(ctx: &mut Ctx, scope: ScopeId, loc: Location, name: &str, stmt_id: lync_parser::NodeId) {
    let Some(sym) = ctx.env.lookup(scope, name).cloned() else {
        ctx.diags.error(Stage::Analyzer, loc, format!("undeclared variable '{name}'"));
        return;
    };
    if sym.ownership != Ownership::Own {
        ctx.diags.error(Stage::Analyzer, loc, format!("cannot free non-'own' variable '{name}'"));
        return;
    }
    match sym.state {
        SymbolState::Freed => {
            ctx.diags.error(Stage::Analyzer, loc, format!("double free: variable '{name}' has already been freed"));
            return;
        }
        SymbolState::Moved => {
            ctx.diags.error(Stage::Analyzer, loc, format!("cannot free '{name}': it has already been moved"));
            return;
        }
        SymbolState::Alive => {}
    }
    if let Some(s) = ctx.env.lookup_mut(scope, name) {
        s.state = SymbolState::Freed;
    }
    ctx.env.mark_dangling(scope, name);
    ctx.result.free_facts.insert(
        stmt_id,
        FreeFacts { is_array_of_own: sym.is_array && sym.element_ownership == Ownership::Own, array_size: sym.array_size },
    );
}

fn analyze_if(ctx: &mut Ctx, scope: ScopeId, loc: Location, cond: &Expr, then_branch: &Stmt, else_branch: Option<&Stmt>) {
    let cond_tag = ctx.analyze_expr(scope, cond, false);
    if cond_tag != TypeTag::Bool {
        ctx.diags.error(Stage::Analyzer, loc.clone(), "'if' condition must be 'bool'");
    }
    let then_scope = pattern::open_then_scope_with_unwrap(ctx, scope, cond);
    analyze_stmt(ctx, then_scope, then_branch);
    check_scope_cleanup(ctx, then_scope, ctx.line_map.span_location(then_branch.span));
    ctx.env.pop(then_scope);

    if let Some(else_stmt) = else_branch {
        let else_scope = ctx.env.push(Some(scope));
        analyze_stmt(ctx, else_scope, else_stmt);
        check_scope_cleanup(ctx, else_scope, ctx.line_map.span_location(else_stmt.span));
        ctx.env.pop(else_scope);
    }
}

fn analyze_while(ctx: &mut Ctx, scope: ScopeId, loc: Location, cond: &Expr, body: &Stmt) {
    let cond_tag = ctx.analyze_expr(scope, cond, false);
    if cond_tag != TypeTag::Bool {
        ctx.diags.error(Stage::Analyzer, loc, "'while' condition must be 'bool'");
    }
    let body_scope = ctx.env.push(Some(scope));
    analyze_stmt(ctx, body_scope, body);
    check_scope_cleanup(ctx, body_scope, ctx.line_map.span_location(body.span));
    ctx.env.pop(body_scope);
}

fn analyze_do_while(ctx: &mut Ctx, _scope: ScopeId, loc: Location, body: &Stmt, cond: &Expr) {
    let body_scope = ctx.env.push(Some(_scope));
    analyze_stmt(ctx, body_scope, body);
    let cond_tag = ctx.analyze_expr(body_scope, cond, false);
    if cond_tag != TypeTag::Bool {
        ctx.diags.error(Stage::Analyzer, loc, "'do...while' condition must be 'bool'");
    }
    check_scope_cleanup(ctx, body_scope, ctx.line_map.span_location(body.span));
    ctx.env.pop(body_scope);
}

fn analyze_for(ctx: &mut Ctx, scope: ScopeId, loc: Location, var: &str, min: &Expr, max: &Expr, body: &Stmt) {
    let min_tag = ctx.analyze_expr(scope, min, false);
    let max_tag = ctx.analyze_expr(scope, max, false);
    if min_tag != TypeTag::Int {
        ctx.diags.error(Stage::Analyzer, loc.clone(), "'for' lower bound must be 'int'");
    }
    if max_tag != TypeTag::Int {
        ctx.diags.error(Stage::Analyzer, loc.clone(), "'for' upper bound must be 'int'");
    }
    let body_scope = ctx.env.push(Some(scope));
    let induction = Symbol::new(var.to_string(), TypeTag::Int, Ownership::None, false, true, false, None);
    if ctx.env.declare_symbol(body_scope, induction).is_err() {
        ctx.diags.error(Stage::Analyzer, loc.clone(), format!("duplicate declaration of induction variable '{var}'"));
    }
    analyze_stmt(ctx, body_scope, body);
    check_scope_cleanup(ctx, body_scope, loc);
    ctx.env.pop(body_scope);
}

fn analyze_block(ctx: &mut Ctx, scope: ScopeId, loc: Location, stmts: &[Stmt]) {
    let block_scope = ctx.env.push(Some(scope));
    for s in stmts {
        analyze_stmt(ctx, block_scope, s);
    }
    check_scope_cleanup(ctx, block_scope, loc);
    ctx.env.pop(block_scope);
}

fn analyze_return(ctx: &mut Ctx, scope: ScopeId, loc: Location, value: Option<&Expr>) {
    let ret_type = ctx.current_func.ret_type;
    let ret_ownership = ctx.current_func.ret_ownership;
    match value {
        None => {
            if ret_type != TypeTag::Void {
                ctx.diags.error(Stage::Analyzer, loc, format!("function must return a value of type '{ret_type}'"));
            }
        }
        Some(e) => match &e.kind {
            ExprKind::Var(name) => {
                let sym_ownership = ctx.env.lookup(scope, name).map(|s| s.ownership);
                let t = ctx.analyze_expr(scope, e, ret_ownership == Ownership::Own);
                match sym_ownership {
                    Some(Ownership::Own) => {
                        if ret_ownership == Ownership::Own {
                            if let Some(sym) = ctx.env.lookup_mut(scope, name) {
                                sym.state = SymbolState::Moved;
                            }
                        } else {
                            ctx.diags.error(
                                Stage::Analyzer,
                                loc.clone(),
                                format!("returning 'own' variable '{name}' from a function whose return ownership is not 'own'"),
                            );
                        }
                    }
                    Some(Ownership::Ref) if ret_ownership == Ownership::Own => {
                        ctx.diags.error(Stage::Analyzer, loc.clone(), format!("cannot return 'ref' variable '{name}' as 'own' (would dangle)"));
                    }
                    Some(Ownership::None) if ret_ownership == Ownership::Own => {
                        ctx.diags.error(Stage::Analyzer, loc.clone(), format!("cannot return non-'own' variable '{name}' as 'own' (would leak)"));
                    }
                    _ => {}
                }
                if t != ret_type {
                    ctx.diags.error(Stage::Analyzer, loc, format!("cannot return '{t}' from a function declared to return '{ret_type}'"));
                }
            }
            ExprKind::Alloc(_) => {
                if ret_ownership != Ownership::Own {
                    ctx.diags.error(Stage::Analyzer, loc.clone(), "'alloc' as a return expression requires the function's return ownership to be 'own'");
                }
                let t = ctx.analyze_expr(scope, e, true);
                if t != ret_type {
                    ctx.diags.error(Stage::Analyzer, loc, format!("cannot return '{t}' from a function declared to return '{ret_type}'"));
                }
            }
            _ => {
                let t = ctx.analyze_expr(scope, e, false);
                if ret_ownership == Ownership::Own {
                    ctx.diags.error(Stage::Analyzer, loc.clone(), "returning 'own' requires a simple variable use or 'alloc(e)'");
                }
                if t != ret_type {
                    ctx.diags.error(Stage::Analyzer, loc, format!("cannot return '{t}' from a function declared to return '{ret_type}'"));
                }
            }
        },
    }
}
