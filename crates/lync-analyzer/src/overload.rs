//! Overload resolution (spec §4.3, §9).
//!
//! One pass over the insertion-ordered registry; candidates are never
//! pre-grouped by name, so the observed first-exact-match tie-break
//! depends purely on registration order.

use lync_common::{DiagnosticSink, Location, Stage, TypeTag};
use lync_parser::FuncSign;
use smallvec::SmallVec;

use crate::registry::FuncRegistry;

/// Overload sets are almost always one or two signatures deep; inline
/// storage for up to four avoids a heap allocation for the common case.
type Candidates<'a> = SmallVec<[&'a FuncSign; 4]>;

#[must_use]
pub fn resolve_call(
    registry: &FuncRegistry,
    name: &str,
    arg_types: &[TypeTag],
    diags: &mut DiagnosticSink,
    loc: &Location,
) -> Option<FuncSign> {
    let k = arg_types.len();
    let candidates: Candidates = registry.candidates(name, k).collect();
    tracing::trace!("resolving '{name}' against {} candidate(s) with {k} arg(s)", candidates.len());
    if candidates.is_empty() {
        diags.error(Stage::Analyzer, loc.clone(), format!("no function '{name}' takes {k} arguments"));
        return None;
    }

    for (idx, cand) in candidates.iter().enumerate() {
        let exact = cand.params.iter().zip(arg_types.iter()).all(|(p, t)| p.type_tag == *t);
        tracing::trace!("candidate {idx} ('{}') exact match: {exact}", cand.name);
        if exact {
            return Some((*cand).clone());
        }
    }

    diags.error(Stage::Analyzer, loc.clone(), format!("no matching overload for '{name}'"));
    let arg_list = arg_types.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
    diags.note(Stage::Analyzer, loc.clone(), format!("argument types: ({arg_list})"));
    for cand in &candidates {
        let params = cand.params.iter().map(|p| p.type_tag.to_string()).collect::<Vec<_>>().join(", ");
        diags.note(Stage::Analyzer, loc.clone(), format!("candidate: {}({})", cand.name, params));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use lync_common::{Ownership, Span};
    use lync_parser::Param;

    fn loc() -> Location {
        Location { file: std::rc::Rc::from("t.lync"), line: 1, column: 1 }
    }

    fn param(type_tag: TypeTag) -> Param {
        Param { name: "p".into(), type_tag, ownership: Ownership::None, nullable: false, is_const: false, is_array: false, span: Span::dummy() }
    }

    fn sign(name: &str, params: Vec<Param>, ret: TypeTag) -> FuncSign {
        FuncSign { name: name.into(), params, ret_type: ret, ret_ownership: Ownership::None, ret_nullable: false, span: Span::dummy() }
    }

    #[test]
    fn first_registration_order_wins() {
        let mut reg = FuncRegistry::new();
        reg.register(sign("add", vec![param(TypeTag::Int), param(TypeTag::Int)], TypeTag::Int)).unwrap();
        reg.register(sign("add", vec![param(TypeTag::Bool), param(TypeTag::Bool)], TypeTag::Bool)).unwrap();
        let mut diags = DiagnosticSink::new(20, false);
        let resolved = resolve_call(&reg, "add", &[TypeTag::Int, TypeTag::Int], &mut diags, &loc()).unwrap();
        assert_eq!(resolved.ret_type, TypeTag::Int);
        assert!(!diags.has_errors());
    }

    #[test]
    fn no_arity_match_errors() {
        let reg = FuncRegistry::new();
        let mut diags = DiagnosticSink::new(20, false);
        assert!(resolve_call(&reg, "add", &[TypeTag::Int], &mut diags, &loc()).is_none());
        assert!(diags.has_errors());
    }

    #[test]
    fn no_type_match_reports_candidates() {
        let mut reg = FuncRegistry::new();
        reg.register(sign("add", vec![param(TypeTag::Int), param(TypeTag::Int)], TypeTag::Int)).unwrap();
        let mut diags = DiagnosticSink::new(20, false);
        assert!(resolve_call(&reg, "add", &[TypeTag::Bool, TypeTag::Bool], &mut diags, &loc()).is_none());
        assert!(diags.has_errors());
        assert!(diags.messages().len() >= 2);
    }
}
