//! Expression analysis: the type/side-effect table of spec §4.4, plus
//! overload resolution's per-argument own-parameter move rule (§4.3.5).

use lync_common::{Location, Ownership, Stage, TypeTag};
use lync_parser::{BinaryOp, Expr, ExprKind, UnaryOp};

use crate::builtins::Builtin;
use crate::ctx::Ctx;
use crate::overload;
use crate::resolved::{CallResolution, ExprFacts};
use crate::scope::ScopeId;
use crate::symbol::SymbolState;

impl<'a> Ctx<'a> {
    pub(crate) fn loc(&self, expr: &Expr) -> Location {
        self.line_map.span_location(expr.span)
    }

    pub(crate) fn record(&mut self, expr: &Expr, facts: ExprFacts) -> TypeTag {
        let tag = facts.type_tag.unwrap_or(TypeTag::Void);
        self.result.set_expr(expr.id, facts);
        tag
    }

    pub(crate) fn simple_tag(&mut self, expr: &Expr, tag: TypeTag) -> TypeTag {
        self.record(expr, ExprFacts { type_tag: Some(tag), ..Default::default() })
    }

    /// Analyzes `expr` in `scope`. `alloc_allowed` is true only when `expr`
    /// is the direct initializer of an `own` declaration or an `own`
    /// return/reassignment (spec §4.4 `alloc(e)` row, §4.6).
    pub fn analyze_expr(&mut self, scope: ScopeId, expr: &Expr, alloc_allowed: bool) -> TypeTag {
        match &expr.kind {
            ExprKind::IntLit(_) => self.simple_tag(expr, TypeTag::Int),
            ExprKind::BoolLit(_) => self.simple_tag(expr, TypeTag::Bool),
            ExprKind::StrLit(_) => self.simple_tag(expr, TypeTag::Str),
            ExprKind::CharLit(_) => self.simple_tag(expr, TypeTag::Char),
            ExprKind::Void => self.simple_tag(expr, TypeTag::Void),
            ExprKind::NullLit => {
                self.record(expr, ExprFacts { type_tag: Some(TypeTag::NullLiteral), nullable: true, ..Default::default() })
            }
            ExprKind::Var(name) => self.analyze_var(scope, expr, name),
            ExprKind::Index { array, index } => self.analyze_index(scope, expr, array, index),
            ExprKind::ArrayLit(elems) => self.analyze_array_lit(scope, expr, elems),
            ExprKind::Unary { op, expr: inner } => self.analyze_unary(scope, expr, *op, inner),
            ExprKind::Binary { op, lhs, rhs } => self.analyze_binary(scope, expr, *op, lhs, rhs),
            ExprKind::Call { name, args } => self.analyze_call(scope, expr, name, args),
            ExprKind::Some(inner) => self.analyze_some_test(scope, expr, inner),
            ExprKind::Alloc(inner) => self.analyze_alloc(scope, expr, inner, alloc_allowed),
            ExprKind::Match { subject, arms } => {
                crate::pattern::analyze_match_expr(self, scope, expr, subject, arms)
            }
        }
    }

    fn analyze_var(&mut self, scope: ScopeId, expr: &Expr, name: &str) -> TypeTag {
        let loc = self.loc(expr);
        let Some(sym) = self.env.lookup(scope, name) else {
            self.diags.error(Stage::Analyzer, loc, format!("undeclared variable '{name}'"));
            return self.simple_tag(expr, TypeTag::Void);
        };
        let tag = sym.type_tag;
        let ownership = sym.ownership;
        let is_const = sym.is_const;
        let nullable = sym.nullable;
        let unwrapped = sym.unwrapped;
        let dangling = sym.dangling;
        let owner = sym.owner.clone();
        match sym.state {
            SymbolState::Moved => {
                self.diags.error(Stage::Analyzer, loc.clone(), format!("use after move: variable '{name}' has been moved"));
            }
            SymbolState::Freed => {
                self.diags.error(Stage::Analyzer, loc.clone(), format!("use after free: variable '{name}' has already been freed"));
            }
            SymbolState::Alive => {}
        }
        if dangling {
            let owner_name = owner.as_deref().unwrap_or("?");
            self.diags.error(
                Stage::Analyzer,
                loc.clone(),
                format!("use after owner no longer in scope: owner '{owner_name}' of '{name}' is out of scope"),
            );
        }
        if nullable && !unwrapped {
            self.diags.error(Stage::Analyzer, loc.clone(), format!("use of nullable variable '{name}' without unwrap"));
            self.diags.note(
                Stage::Analyzer,
                loc,
                format!("unwrap '{name}' with 'match {name} {{ some(v): ... null: ... }}' or 'if (some({name})) ...'"),
            );
        }
        let is_array = self.env.lookup(scope, name).map(|s| s.is_array).unwrap_or(false);
        self.record(
            expr,
            ExprFacts { type_tag: Some(tag), nullable, ownership: Some(ownership), is_const, is_array, ..Default::default() },
        )
    }

    fn analyze_index(&mut self, scope: ScopeId, expr: &Expr, array: &Expr, index: &Expr) -> TypeTag {
        let array_tag = self.analyze_expr(scope, array, false);
        let index_tag = self.analyze_expr(scope, index, false);
        let loc = self.loc(expr);
        if index_tag != TypeTag::Int {
            self.diags.error(Stage::Analyzer, loc.clone(), "array index must be 'int'");
        }
        let is_array = match &array.kind {
            ExprKind::Var(name) => self.env.lookup(scope, name).map(|s| s.is_array).unwrap_or(false),
            _ => true,
        };
        if !is_array {
            self.diags.error(Stage::Analyzer, loc, "indexed value must be an array");
        }
        self.simple_tag(expr, array_tag)
    }

    fn analyze_array_lit(&mut self, scope: ScopeId, expr: &Expr, elems: &[Expr]) -> TypeTag {
        let loc = self.loc(expr);
        if elems.is_empty() {
            self.diags.error(Stage::Analyzer, loc, "array literal must not be empty");
            return self.simple_tag(expr, TypeTag::Void);
        }
        let first = self.analyze_expr(scope, &elems[0], false);
        for e in &elems[1..] {
            let t = self.analyze_expr(scope, e, false);
            if t != first {
                self.diags.error(Stage::Analyzer, self.loc(e), "array literal elements must share one type");
            }
        }
        self.simple_tag(expr, first)
    }

    fn analyze_unary(&mut self, scope: ScopeId, expr: &Expr, op: UnaryOp, inner: &Expr) -> TypeTag {
        let t = self.analyze_expr(scope, inner, false);
        let loc = self.loc(expr);
        match op {
            UnaryOp::Neg => {
                if t != TypeTag::Int {
                    self.diags.error(Stage::Analyzer, loc, "unary '-' requires an 'int' operand");
                }
                self.simple_tag(expr, TypeTag::Int)
            }
            UnaryOp::Not => {
                if t != TypeTag::Bool {
                    self.diags.error(Stage::Analyzer, loc, "unary '!' requires a 'bool' operand");
                }
                self.simple_tag(expr, TypeTag::Bool)
            }
        }
    }

    fn analyze_binary(&mut self, scope: ScopeId, expr: &Expr, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> TypeTag {
        let lt = self.analyze_expr(scope, lhs, false);
        let rt = self.analyze_expr(scope, rhs, false);
        let loc = self.loc(expr);
        use BinaryOp::*;
        match op {
            Add | Sub | Mul | Div => {
                if lt != TypeTag::Int || rt != TypeTag::Int {
                    self.diags.error(Stage::Analyzer, loc, "arithmetic operators require 'int' operands");
                }
                self.simple_tag(expr, TypeTag::Int)
            }
            Lt | Gt | Le | Ge => {
                if lt != TypeTag::Int || rt != TypeTag::Int {
                    self.diags.error(Stage::Analyzer, loc, "comparison operators require 'int' operands");
                }
                self.simple_tag(expr, TypeTag::Bool)
            }
            Eq | Ne => {
                if lt != rt {
                    self.diags.error(Stage::Analyzer, loc, format!("cannot compare '{lt}' with '{rt}'"));
                }
                self.simple_tag(expr, TypeTag::Bool)
            }
            And | Or => {
                if lt != TypeTag::Bool || rt != TypeTag::Bool {
                    self.diags.error(Stage::Analyzer, loc, "logical operators require 'bool' operands");
                }
                self.simple_tag(expr, TypeTag::Bool)
            }
        }
    }

    fn analyze_some_test(&mut self, scope: ScopeId, expr: &Expr, inner: &Expr) -> TypeTag {
        let nullable = match &inner.kind {
            ExprKind::Var(name) => self.env.lookup(scope, name).map(|s| s.nullable).unwrap_or(false),
            _ => {
                self.analyze_expr(scope, inner, false);
                true
            }
        };
        if !nullable {
            self.diags.warning(Stage::Analyzer, self.loc(expr), "'some(...)' test on a non-nullable value is always true");
        }
        self.simple_tag(expr, TypeTag::Bool)
    }

    fn analyze_alloc(&mut self, scope: ScopeId, expr: &Expr, inner: &Expr, alloc_allowed: bool) -> TypeTag {
        let loc = self.loc(expr);
        if !alloc_allowed {
            self.diags.error(Stage::Analyzer, loc, "'alloc' is only valid as the initializer of an 'own' declaration, assignment, or return");
        }
        let t = self.analyze_expr(scope, inner, false);
        self.simple_tag(expr, t)
    }

    fn analyze_call(&mut self, scope: ScopeId, expr: &Expr, name: &str, args: &[Expr]) -> TypeTag {
        let loc = self.loc(expr);
        if let Some(builtin) = Builtin::from_name(name) {
            return self.analyze_builtin_call(scope, expr, builtin, args);
        }
        let arg_types: Vec<TypeTag> = args.iter().map(|a| self.analyze_expr(scope, a, false)).collect();
        let Some(sign) = overload::resolve_call(self.funcs, name, &arg_types, self.diags, &loc) else {
            return self.simple_tag(expr, TypeTag::Void);
        };
        // Own-parameter move rule (spec §4.3.5).
        for (param, arg) in sign.params.iter().zip(args.iter()) {
            if param.ownership != Ownership::Own {
                continue;
            }
            match &arg.kind {
                ExprKind::Var(var_name) => {
                    let info = self.env.lookup(scope, var_name).map(|s| (s.ownership, s.state));
                    match info {
                        Some((Ownership::Own, SymbolState::Alive)) => {
                            if let Some(sym) = self.env.lookup_mut(scope, var_name) {
                                sym.state = SymbolState::Moved;
                            }
                        }
                        Some((Ownership::Own, _)) => {
                            self.diags.error(
                                Stage::Analyzer,
                                self.loc(arg),
                                format!("argument '{var_name}' passed to 'own' parameter is not alive"),
                            );
                        }
                        _ => {
                            self.diags.error(
                                Stage::Analyzer,
                                self.loc(arg),
                                format!("argument '{var_name}' passed to 'own' parameter must itself be 'own'"),
                            );
                        }
                    }
                }
                _ => {
                    self.diags.error(
                        Stage::Analyzer,
                        self.loc(arg),
                        "argument to an 'own' parameter must be a simple variable use",
                    );
                }
            }
        }
        let ret = sign.ret_type;
        let nullable = sign.ret_nullable;
        self.record(
            expr,
            ExprFacts {
                type_tag: Some(ret),
                nullable,
                call: Some(CallResolution::User(sign)),
                ..Default::default()
            },
        )
    }

    fn analyze_builtin_call(&mut self, scope: ScopeId, expr: &Expr, builtin: Builtin, args: &[Expr]) -> TypeTag {
        let loc = self.loc(expr);
        match builtin {
            Builtin::Print => {
                if args.is_empty() {
                    self.diags.warning(Stage::Analyzer, loc, "'print()' with no arguments produces an empty line");
                }
                for a in args {
                    let t = self.analyze_expr(scope, a, false);
                    if !t.is_printable() {
                        self.diags.error(Stage::Analyzer, self.loc(a), format!("'{t}' is not printable"));
                    }
                }
                self.record(
                    expr,
                    ExprFacts { type_tag: Some(TypeTag::Void), call: Some(CallResolution::Builtin(builtin)), ..Default::default() },
                )
            }
            Builtin::Length => self.analyze_length_call(scope, expr, args),
            _ => {
                if !args.is_empty() {
                    self.diags.error(Stage::Analyzer, loc.clone(), format!("'{}' takes no arguments", builtin_name(builtin)));
                }
                if !self.imports.permits(builtin_name(builtin)) {
                    self.diags.error(
                        Stage::Analyzer,
                        loc,
                        format!("'{}' is not imported; add 'using std.io.(*);' or 'using std.io.({});'", builtin_name(builtin), builtin_name(builtin)),
                    );
                }
                self.result.uses_read_key |= builtin == Builtin::ReadKey;
                self.record(
                    expr,
                    ExprFacts {
                        type_tag: Some(builtin.return_type()),
                        nullable: builtin.returns_nullable(),
                        call: Some(CallResolution::Builtin(builtin)),
                        ..Default::default()
                    },
                )
            }
        }
    }

    fn analyze_length_call(&mut self, scope: ScopeId, expr: &Expr, args: &[Expr]) -> TypeTag {
        let loc = self.loc(expr);
        if args.len() != 1 {
            self.diags.error(Stage::Analyzer, loc, "'length' takes exactly one argument");
            return self.simple_tag(expr, TypeTag::Int);
        }
        let ExprKind::Var(name) = &args[0].kind else {
            self.analyze_expr(scope, &args[0], false);
            self.diags.error(Stage::Analyzer, loc, "'length' requires a simple array variable");
            return self.simple_tag(expr, TypeTag::Int);
        };
        let Some(sym) = self.env.lookup(scope, name) else {
            self.diags.error(Stage::Analyzer, loc, format!("undeclared variable '{name}'"));
            return self.simple_tag(expr, TypeTag::Int);
        };
        if !sym.is_array {
            self.diags.error(Stage::Analyzer, loc, format!("'{name}' is not an array"));
            return self.simple_tag(expr, TypeTag::Int);
        }
        if sym.ownership == Ownership::Own {
            self.diags.error(Stage::Analyzer, loc, "'length' of a heap-allocated array is not supported");
            return self.simple_tag(expr, TypeTag::Int);
        }
        let Some(size) = sym.array_size else {
            self.diags.error(Stage::Analyzer, loc, "'length' of a dynamic-size array is not supported");
            return self.simple_tag(expr, TypeTag::Int);
        };
        self.record(
            expr,
            ExprFacts {
                type_tag: Some(TypeTag::Int),
                call: Some(CallResolution::Builtin(Builtin::Length)),
                folded_int: Some(size),
                ..Default::default()
            },
        )
    }
}

fn builtin_name(b: Builtin) -> &'static str {
    match b {
        Builtin::Print => "print",
        Builtin::Length => "length",
        Builtin::ReadInt => "read_int",
        Builtin::ReadStr => "read_str",
        Builtin::ReadBool => "read_bool",
        Builtin::ReadChar => "read_char",
        Builtin::ReadKey => "read_key",
    }
}
