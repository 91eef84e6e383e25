//! C code generation from an analyzed Lync program (spec §4.8, §6.3, §6.6).

pub mod emitter;
pub mod mangle;
pub mod preamble;

use lync_analyzer::AnalysisResult;
use lync_parser::Program;

pub use emitter::Emitter;
pub use mangle::mangled_name;

/// Emits a complete, self-contained C translation unit for `program`, using
/// the resolved facts in `analysis`. Callers must have confirmed
/// `!diags.has_errors()` before calling this — the emitter trusts the
/// analyzer's invariants and does not re-validate them.
#[must_use]
pub fn emit(program: &Program, analysis: &AnalysisResult) -> String {
    Emitter::new(analysis).emit_program(program)
}
