//! Semantic analysis: scope/symbol tracking, ownership and null-safety
//! checking, overload resolution, and the resolved-fact side tables the
//! emitter consumes (spec §4).
//!
//! Two-pass driver, mirroring `original_source/analyzer.c`'s
//! `analyze_program`: every function signature is registered before any
//! body is analyzed, so forward calls between functions resolve.

pub mod builtins;
pub mod cleanup;
pub mod ctx;
pub mod expr;
pub mod overload;
pub mod pattern;
pub mod registry;
pub mod resolved;
pub mod scope;
pub mod stmt;
pub mod symbol;

#[cfg(test)]
mod e2e_tests;

use lync_common::{DiagnosticSink, LineMap, Ownership, Stage, TypeTag};
use lync_parser::{Func, Program};

pub use builtins::{Builtin, ImportRegistry};
pub use ctx::{Ctx, ReturnContract};
pub use registry::{FuncRegistry, RegisterError};
pub use resolved::{AnalysisResult, CallResolution, ExprFacts, FreeFacts};
pub use scope::{DeclareError, Environment, ScopeId};
pub use symbol::{Symbol, SymbolState};

/// Runs full semantic analysis over `program`, returning the resolved-fact
/// side tables the emitter needs. Diagnostics are pushed into `diags`;
/// callers check `diags.has_errors()` before handing the result to the
/// emitter (spec §4, §7).
pub fn analyze_program(program: &Program, diags: &mut DiagnosticSink, line_map: &LineMap) -> AnalysisResult {
    let mut env = Environment::new();
    let mut funcs = FuncRegistry::new();
    let mut imports = ImportRegistry::new();
    let mut result = AnalysisResult::new();

    for import in &program.imports {
        apply_import(&mut imports, import, diags, line_map);
    }

    for func in &program.funcs {
        let loc = line_map.span_location(func.sign.span);
        match funcs.register(func.sign.clone()) {
            Ok(()) => {}
            Err(RegisterError::Reserved) => {
                diags.error(Stage::Analyzer, loc, format!("'{}' is a reserved name and cannot be used as a function name", func.sign.name));
            }
            Err(RegisterError::Duplicate) => {
                diags.error(Stage::Analyzer, loc, format!("duplicate overload of '{}' with the same parameter types", func.sign.name));
            }
        }
    }

    check_entry_point(&funcs, diags, line_map, program);

    for func in &program.funcs {
        analyze_func(&mut env, &funcs, &imports, diags, &mut result, line_map, func);
    }

    result
}

fn apply_import(
    imports: &mut ImportRegistry,
    import: &lync_parser::Import,
    diags: &mut DiagnosticSink,
    line_map: &LineMap,
) {
    let loc = line_map.span_location(import.span);
    if import.path != ["std", "io"] {
        diags.error(Stage::Analyzer, loc, format!("unknown module '{}'", import.path.join(".")));
        return;
    }
    match &import.item {
        lync_parser::ImportItem::All => imports.import_all_std_io(),
        lync_parser::ImportItem::Named(name) => {
            if !imports.import_named(name) {
                diags.error(Stage::Analyzer, loc, format!("'std.io' has no member '{name}'"));
            }
        }
    }
}

/// Spec §3.7: exactly one function named `main`, returning `int`, taking no
/// parameters.
fn check_entry_point(funcs: &FuncRegistry, diags: &mut DiagnosticSink, line_map: &LineMap, program: &Program) {
    let mains: Vec<_> = funcs.all().iter().filter(|s| s.name == "main").collect();
    let program_loc = program
        .funcs
        .first()
        .map(|f| line_map.span_location(f.sign.span))
        .unwrap_or_else(lync_common::Location::no_loc);
    if mains.is_empty() {
        diags.error(Stage::Analyzer, program_loc, "program must define a function named 'main'");
        return;
    }
    if mains.len() > 1 {
        diags.error(Stage::Analyzer, program_loc.clone(), "only one function may be named 'main'");
    }
    let main = mains[0];
    let loc = line_map.span_location(main.span);
    if main.ret_type != TypeTag::Int || main.ret_ownership != Ownership::None {
        diags.error(Stage::Analyzer, loc.clone(), "'main' must return 'int'");
    }
    if main.arity() != 0 {
        diags.error(Stage::Analyzer, loc, "'main' must take no parameters");
    }
}

fn analyze_func(
    env: &mut Environment,
    funcs: &FuncRegistry,
    imports: &ImportRegistry,
    diags: &mut DiagnosticSink,
    result: &mut AnalysisResult,
    line_map: &LineMap,
    func: &Func,
) {
    let func_scope = env.push(None);
    for param in &func.sign.params {
        let mut sym = Symbol::new(param.name.clone(), param.type_tag, param.ownership, param.nullable, param.is_const, param.is_array, None);
        sym.element_ownership = if param.is_array { param.ownership } else { Ownership::None };
        if env.declare_symbol(func_scope, sym).is_err() {
            let loc = line_map.span_location(param.span);
            diags.error(Stage::Analyzer, loc, format!("duplicate parameter name '{}'", param.name));
        }
    }

    let current_func =
        ReturnContract { ret_type: func.sign.ret_type, ret_ownership: func.sign.ret_ownership, ret_nullable: func.sign.ret_nullable };

    let mut ctx = Ctx { env, funcs, imports, diags, result, line_map, current_func };
    stmt::analyze_stmt(&mut ctx, func_scope, &func.body);

    let func_end_loc = line_map.span_location(func.sign.span);
    cleanup::check_scope_cleanup(&mut ctx, func_scope, func_end_loc);
    ctx.env.pop(func_scope);
}
