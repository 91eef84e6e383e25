//! Pattern matching and flow-sensitive unwrap (spec §4.5, §4.9).
//!
//! Shared between expression-matches (`ExprKind::Match`), statement-matches
//! (`StmtKind::Match`), and `if (some(v))` (handled separately in
//! `stmt.rs`, which reuses [`unwrap_copy_for_some`]).

use lync_common::{Location, Ownership, Stage, TypeTag};
use lync_parser::{Expr, ExprKind, MatchArm, MatchBody, Pattern};

use crate::cleanup::check_scope_cleanup;
use crate::ctx::Ctx;
use crate::resolved::ExprFacts;
use crate::scope::ScopeId;
use crate::symbol::Symbol;

/// If `subject` is a simple variable, returns `(name, is_nullable)`.
fn subject_var(ctx: &Ctx, scope: ScopeId, subject: &Expr) -> Option<(String, bool, TypeTag)> {
    let ExprKind::Var(name) = &subject.kind else { return None };
    let sym = ctx.env.lookup(scope, name)?;
    Some((name.clone(), sym.nullable, sym.type_tag))
}

/// Builds the scoped unwrap copy described in spec §4.9: a shadow symbol
/// visible only in the child scope, cloned from the subject with
/// `unwrapped` set.
fn unwrap_copy_for_some(ctx: &mut Ctx, parent: ScopeId, arm_scope: ScopeId, subject_name: &str, binder: &str) {
    let Some(mut shadow) = ctx.env.lookup(parent, subject_name).cloned() else { return };
    shadow.unwrapped = true;
    let subject_ownership = shadow.ownership;
    let subject_const = shadow.is_const;
    let subject_tag = shadow.type_tag;
    let _ = ctx.env.declare_symbol(arm_scope, shadow);

    let (binder_ownership, owner) = match subject_ownership {
        Ownership::Own | Ownership::Ref => (Ownership::Ref, Some(subject_name.to_string())),
        Ownership::None => (Ownership::None, None),
    };
    let mut binder_sym = Symbol::new(binder.to_string(), subject_tag, binder_ownership, false, subject_const, false, None);
    binder_sym.owner = owner;
    let _ = ctx.env.declare_symbol(arm_scope, binder_sym);
}

/// Opens the child scope for one arm and applies the scoped fact
/// introduction rules (spec §4.5).
fn open_arm_scope(ctx: &mut Ctx, parent: ScopeId, subject: &Expr, pattern: &Pattern) -> ScopeId {
    let arm_scope = ctx.env.push(Some(parent));
    if let Pattern::Some(binder) = pattern {
        if let Some((subject_name, _, _)) = subject_var(ctx, parent, subject) {
            unwrap_copy_for_some(ctx, parent, arm_scope, &subject_name, binder);
        }
    }
    arm_scope
}

fn validate_pattern(ctx: &mut Ctx, pattern: &Pattern, pattern_loc: Location, subject_nullable: bool, subject_tag: TypeTag, scope: ScopeId) {
    match pattern {
        Pattern::Null | Pattern::Some(_) => {
            if !subject_nullable {
                ctx.diags.error(Stage::Analyzer, pattern_loc, "'null'/'some(...)' patterns require a nullable subject");
            }
        }
        Pattern::Wildcard => {}
        Pattern::Value(value_expr) => {
            let t = ctx.analyze_expr(scope, value_expr, false);
            if t != subject_tag {
                ctx.diags.error(Stage::Analyzer, pattern_loc, format!("pattern type '{t}' does not match subject type '{subject_tag}'"));
            }
        }
    }
}

fn check_exhaustiveness(ctx: &mut Ctx, loc: Location, arms: &[MatchArm], subject_nullable: bool) {
    let has_wildcard = arms.iter().any(|a| matches!(a.pattern, Pattern::Wildcard));
    let has_some = arms.iter().any(|a| matches!(a.pattern, Pattern::Some(_)));
    let has_null = arms.iter().any(|a| matches!(a.pattern, Pattern::Null));
    if subject_nullable {
        let covers_some = has_some || has_wildcard;
        let covers_null = has_null || has_wildcard;
        if !(covers_some && covers_null) {
            ctx.diags.error(Stage::Analyzer, loc, "match must handle both some and null cases");
        }
    } else if !has_wildcard {
        ctx.diags.error(Stage::Analyzer, loc, "match must have a default '_' branch");
    }
}

pub fn analyze_match_expr(ctx: &mut Ctx, scope: ScopeId, match_expr: &Expr, subject: &Expr, arms: &[MatchArm]) -> TypeTag {
    let subject_tag = ctx.analyze_expr(scope, subject, false);
    let subject_nullable = subject_var(ctx, scope, subject).map(|(_, n, _)| n).unwrap_or(false);
    let match_loc = ctx.loc(match_expr);
    check_exhaustiveness(ctx, match_loc.clone(), arms, subject_nullable);

    let mut unified: Option<TypeTag> = None;
    for arm in arms {
        let arm_scope = open_arm_scope(ctx, scope, subject, &arm.pattern);
        let pattern_loc = ctx.line_map.span_location(arm.span);
        validate_pattern(ctx, &arm.pattern, pattern_loc, subject_nullable, subject_tag, arm_scope);
        if let Pattern::Some(_) = &arm.pattern {
            ctx.result.match_arm_unwrap_type.insert(arm.id, subject_tag);
        }
        let body_tag = match &arm.body {
            MatchBody::Expr(e) => ctx.analyze_expr(arm_scope, e, false),
            MatchBody::Stmts(stmts) => {
                for s in stmts {
                    crate::stmt::analyze_stmt(ctx, arm_scope, s);
                }
                TypeTag::Void
            }
        };
        match unified {
            None => unified = Some(body_tag),
            Some(first) if first != body_tag => {
                ctx.diags.error(Stage::Analyzer, ctx.line_map.span_location(arm.span), "match arms must produce the same type");
            }
            Some(_) => {}
        }
        ctx.env.pop(arm_scope);
    }
    let tag = unified.unwrap_or(TypeTag::Void);
    ctx.record(match_expr, ExprFacts { type_tag: Some(tag), ..Default::default() })
}

/// Statement-matches (spec §4.5 final line): identical arm-opening and
/// exhaustiveness rules, but each branch runs end-of-scope cleanup instead
/// of type unification.
pub fn analyze_match_stmt(ctx: &mut Ctx, scope: ScopeId, stmt_loc: Location, subject: &Expr, arms: &[MatchArm]) {
    let subject_tag = ctx.analyze_expr(scope, subject, false);
    let subject_nullable = subject_var(ctx, scope, subject).map(|(_, n, _)| n).unwrap_or(false);
    check_exhaustiveness(ctx, stmt_loc.clone(), arms, subject_nullable);

    for arm in arms {
        let arm_scope = open_arm_scope(ctx, scope, subject, &arm.pattern);
        let pattern_loc = ctx.line_map.span_location(arm.span);
        validate_pattern(ctx, &arm.pattern, pattern_loc, subject_nullable, subject_tag, arm_scope);
        if let Pattern::Some(_) = &arm.pattern {
            ctx.result.match_arm_unwrap_type.insert(arm.id, subject_tag);
        }
        match &arm.body {
            MatchBody::Expr(e) => {
                ctx.analyze_expr(arm_scope, e, false);
            }
            MatchBody::Stmts(stmts) => {
                for s in stmts {
                    crate::stmt::analyze_stmt(ctx, arm_scope, s);
                }
            }
        }
        check_scope_cleanup(ctx, arm_scope, ctx.line_map.span_location(arm.span));
        ctx.env.pop(arm_scope);
    }
}

/// `if (some(v)) then` (spec §4.7): `v` is flagged unwrapped in the
/// then-scope only.
pub fn open_then_scope_with_unwrap(ctx: &mut Ctx, parent: ScopeId, cond: &Expr) -> ScopeId {
    let then_scope = ctx.env.push(Some(parent));
    if let ExprKind::Some(inner) = &cond.kind {
        if let ExprKind::Var(name) = &inner.kind {
            if let Some(mut shadow) = ctx.env.lookup(parent, name).cloned() {
                shadow.unwrapped = true;
                let _ = ctx.env.declare_symbol(then_scope, shadow);
            }
        }
    }
    then_scope
}
