//! Module resolution for `using` statements (spec §6.4).
//!
//! The `std.io` prelude is handled internally by the analyzer and is never
//! file-loaded (see [`lync_analyzer::builtins::ImportRegistry`]). Every other
//! `using <path>.(*|name);` is resolved here: dots become path separators,
//! `.lync` is appended, and the file is looked up relative to the directory
//! of the file that imported it. Included files are fully lexed and parsed
//! and their functions merged into the including program.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use rustc_hash::FxHashSet;

use lync_common::{DiagnosticSink, LineMap, Stage};
use lync_lexer::Lexer;
use lync_parser::{Func, Import, ImportItem, Parser, Program};

const MAX_DEPTH: usize = lync_common::limits::MAX_INCLUDE_DEPTH;

fn is_std_io(import: &Import) -> bool {
    import.path.first().map(String::as_str) == Some("std")
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn module_path(import: &Import, base_dir: &Path) -> PathBuf {
    let mut p = base_dir.to_path_buf();
    for seg in &import.path {
        p.push(seg);
    }
    p.set_extension("lync");
    p
}

/// Resolves every non-`std.io` `using` statement reachable from `program`,
/// merging the imported functions into `program.funcs` in place. `program`
/// must be the parse of the file at `entry_path` (used as the include-cycle
/// root and as the base directory for top-level `using` statements).
pub fn resolve_includes(
    program: &mut Program,
    entry_path: &Path,
    diags: &mut DiagnosticSink,
) -> Result<()> {
    let mut loaded = FxHashSet::default();
    loaded.insert(canonical(entry_path));
    let base_dir = entry_path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    let imports = std::mem::take(&mut program.imports);
    let mut kept_imports = Vec::new();
    let mut merged = Vec::new();

    for import in imports {
        if is_std_io(&import) {
            kept_imports.push(import);
            continue;
        }
        let funcs = load_module(&import, &base_dir, &mut loaded, 1, diags)?;
        merged.extend(funcs);
    }

    program.imports = kept_imports;
    merge_funcs(program, merged, diags);
    Ok(())
}

/// A function merged in from another file, paired with the [`LineMap`] of
/// the file it was parsed from so duplicate-signature diagnostics point at
/// the right source.
struct MergedFunc {
    func: Func,
    line_map: Rc<LineMap>,
}

fn load_module(
    import: &Import,
    base_dir: &Path,
    loaded: &mut FxHashSet<PathBuf>,
    depth: usize,
    diags: &mut DiagnosticSink,
) -> Result<Vec<MergedFunc>> {
    if depth > MAX_DEPTH {
        bail!("include depth exceeded {MAX_DEPTH} while resolving module '{}'", import.path.join("."));
    }
    let path = module_path(import, base_dir);
    if !path.is_file() {
        bail!("module '{}' not found (looked for {})", import.path.join("."), path.display());
    }
    let canon = canonical(&path);
    if !loaded.insert(canon) {
        bail!("circular include detected while resolving module '{}'", import.path.join("."));
    }

    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("reading module file {}", path.display()))?;
    let file: Rc<str> = Rc::from(path.to_string_lossy().as_ref());
    let line_map = Rc::new(Lexer::line_map(&source, file.clone()));
    let tokens = Lexer::new(file.clone(), &source).tokenize(diags, &line_map);
    let mut parser = Parser::new(tokens, diags, &line_map, file);
    let module_program = parser.parse_program();

    let module_base = path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let mut available = Vec::new();
    for nested in &module_program.imports {
        if is_std_io(nested) {
            continue;
        }
        available.extend(load_module(nested, &module_base, loaded, depth + 1, diags)?);
    }
    available.extend(
        module_program.funcs.into_iter().map(|func| MergedFunc { func, line_map: line_map.clone() }),
    );

    match &import.item {
        ImportItem::All => Ok(available),
        ImportItem::Named(name) => {
            let matches: Vec<MergedFunc> =
                available.into_iter().filter(|m| m.func.sign.name == *name).collect();
            if matches.is_empty() {
                bail!("function '{name}' not found in module '{}'", import.path.join("."));
            }
            Ok(matches)
        }
    }
}

/// Duplicate merged signatures are errors, not fatal: recorded on the shared
/// sink so the rest of analysis can still surface other problems in one run
/// (spec §7's "surface as many diagnostics as possible").
fn merge_funcs(program: &mut Program, incoming: Vec<MergedFunc>, diags: &mut DiagnosticSink) {
    for merged in incoming {
        if program.funcs.iter().any(|f| f.sign.same_signature(&merged.func.sign)) {
            let loc = merged.line_map.span_location(merged.func.sign.span);
            diags.error(
                Stage::Parser,
                loc,
                format!("duplicate merged signature for '{}' from an included module", merged.func.sign.name),
            );
            continue;
        }
        program.funcs.push(merged.func);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lync_parser::{FuncSign, NodeId, Stmt, StmtKind};
    use lync_common::{Ownership, TypeTag, Span};

    fn sign(name: &str) -> FuncSign {
        FuncSign {
            name: name.to_string(),
            params: vec![],
            ret_type: TypeTag::Int,
            ret_ownership: Ownership::None,
            ret_nullable: false,
            span: Span::dummy(),
        }
    }

    fn func(name: &str) -> Func {
        Func { sign: sign(name), body: Stmt { id: NodeId(0), span: Span::dummy(), kind: StmtKind::Block(vec![]) } }
    }

    fn merged(name: &str) -> MergedFunc {
        MergedFunc { func: func(name), line_map: Rc::new(LineMap::build(Rc::from("mod.lync"), "")) }
    }

    #[test]
    fn merge_funcs_rejects_duplicate_signatures() {
        let mut program = Program { imports: vec![], funcs: vec![func("helper")] };
        let mut diags = DiagnosticSink::new(20, false);
        merge_funcs(&mut program, vec![merged("helper")], &mut diags);
        assert_eq!(program.funcs.len(), 1);
        assert!(diags.has_errors());
    }

    #[test]
    fn merge_funcs_accepts_distinct_signatures() {
        let mut program = Program { imports: vec![], funcs: vec![func("a")] };
        let mut diags = DiagnosticSink::new(20, false);
        merge_funcs(&mut program, vec![merged("b")], &mut diags);
        assert_eq!(program.funcs.len(), 2);
        assert!(!diags.has_errors());
    }

    #[test]
    fn module_path_joins_dotted_segments_with_lync_extension() {
        let import = Import { path: vec!["util".into(), "math".into()], item: ImportItem::All, span: Span::dummy() };
        let path = module_path(&import, Path::new("/proj"));
        assert_eq!(path, PathBuf::from("/proj/util/math.lync"));
    }
}
