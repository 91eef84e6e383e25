//! The shared mutable context threaded through expression, pattern, and
//! statement analysis.

use lync_common::{DiagnosticSink, LineMap, Ownership, TypeTag};

use crate::builtins::ImportRegistry;
use crate::registry::FuncRegistry;
use crate::resolved::AnalysisResult;
use crate::scope::Environment;

/// The enclosing function's return contract, needed by `return` analysis
/// (spec §4.6) and independent of any one expression or statement.
#[derive(Clone, Copy, Debug)]
pub struct ReturnContract {
    pub ret_type: TypeTag,
    pub ret_ownership: Ownership,
    pub ret_nullable: bool,
}

pub struct Ctx<'a> {
    pub env: &'a mut Environment,
    pub funcs: &'a FuncRegistry,
    pub imports: &'a ImportRegistry,
    pub diags: &'a mut DiagnosticSink,
    pub result: &'a mut AnalysisResult,
    pub line_map: &'a LineMap,
    pub current_func: ReturnContract,
}
