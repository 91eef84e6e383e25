//! End-to-end scenarios driving the full lex -> parse -> analyze pipeline
//! on literal source text (spec §8's concrete scenario list).

use std::rc::Rc;

use lync_common::DiagnosticSink;
use lync_lexer::Lexer;
use lync_parser::Parser;

use crate::analyze_program;

fn analyze(src: &str) -> DiagnosticSink {
    let file: Rc<str> = Rc::from("t.lync");
    let line_map = Lexer::line_map(src, file.clone());
    let mut diags = DiagnosticSink::new(20, false);
    let tokens = Lexer::new(file.clone(), src).tokenize(&mut diags, &line_map);
    let mut parser = Parser::new(tokens, &mut diags, &line_map, file);
    let program = parser.parse_program();
    analyze_program(&program, &mut diags, &line_map);
    diags
}

fn message_contains(diags: &DiagnosticSink, needle: &str) -> bool {
    diags.messages().iter().any(|d| d.message.contains(needle))
}

#[test]
fn move_then_use_is_an_error() {
    let diags = analyze("def main(): int { x: own int = alloc(7); y: own int = x; print(x); free y; return 0; }");
    assert!(diags.has_errors());
    assert!(message_contains(&diags, "use after move: variable 'x' has been moved"));
}

#[test]
fn double_free_is_an_error() {
    let diags = analyze("def main(): int { x: own int = alloc(1); free x; free x; return 0; }");
    assert!(diags.has_errors());
    assert!(message_contains(&diags, "double free: variable 'x' has already been freed"));
}

#[test]
fn unreleased_own_at_function_end_is_a_leak() {
    let diags = analyze("def main(): int { x: own int = alloc(1); return 0; }");
    assert!(diags.has_errors());
    assert!(message_contains(&diags, "Memory leak: 'x' is not freed or moved"));
}

#[test]
fn nullable_unwrap_via_match_analyzes_cleanly() {
    let diags = analyze(
        "def main(): int { p: own? int = null; match p { some(v): { print(v); } null: { print(0); } } return 0; }",
    );
    assert!(!diags.has_errors(), "unexpected diagnostics: {:?}", diags.messages());
}

#[test]
fn overload_selection_is_arity_and_type_directed() {
    let src = "def add(a: int, b: int): int { return a; } \
               def add(a: bool, b: bool): bool { return a; } \
               def main(): int { add(1, 2); add(true, false); return 0; }";
    let diags = analyze(src);
    assert!(!diags.has_errors(), "unexpected diagnostics: {:?}", diags.messages());
}

#[test]
fn dangling_ref_after_owner_freed_is_an_error() {
    let diags = analyze(
        "def main(): int { x: own int = alloc(1); r: ref int = x; free x; print(r); return 0; }",
    );
    assert!(diags.has_errors());
    assert!(message_contains(&diags, "out of scope"));
}
