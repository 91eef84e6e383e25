//! The diagnostic sink: accumulates errors, warnings, and notes with source
//! locations, and supports bounded reporting plus a final summary.
//!
//! Severities and buffering follow `tsz_common::diagnostics`; the stage
//! tagging and fatal/recoverable split follow `original_source/common.h`'s
//! `ErrorStage` and `stage_error`/`stage_fatal` macros.

use std::fmt;
use std::io::Write;

use colored::Colorize;

use crate::span::Location;

/// Which pipeline stage raised a diagnostic. Mirrors the original
/// implementation's `ErrorStage` enum so that `-trace` output and error
/// summaries can be grouped by stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Lexer,
    Parser,
    Analyzer,
    Optimizer,
    Emitter,
    Internal,
}

impl Stage {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Stage::Lexer => "lexer",
            Stage::Parser => "parser",
            Stage::Analyzer => "analyzer",
            Stage::Optimizer => "optimizer",
            Stage::Emitter => "emitter",
            Stage::Internal => "internal",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Severity {
    const fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub stage: Stage,
    pub loc: Location,
    pub message: String,
}

impl Diagnostic {
    fn render(&self, color: bool) -> String {
        let header = format!("{}: {}:", self.loc, self.stage);
        let label = self.severity.label();
        if color {
            let colored_label = match self.severity {
                Severity::Error => label.red().bold().to_string(),
                Severity::Warning => label.yellow().bold().to_string(),
                Severity::Note => label.cyan().to_string(),
            };
            format!("{} {}: {}", header, colored_label, self.message)
        } else {
            format!("{} {}: {}", header, label, self.message)
        }
    }
}

/// Accumulates diagnostics for a single compilation run.
///
/// Per spec §4.1: messages are buffered, notes are attached context for the
/// preceding error/warning, an error-count cap truncates further *errors*
/// (never notes or warnings), and color is only emitted when requested by
/// the caller (the CLI driver gates this on both `-no-color` and a TTY
/// check before constructing the sink).
pub struct DiagnosticSink {
    messages: Vec<Diagnostic>,
    error_count: u32,
    cap: u32,
    color: bool,
}

impl DiagnosticSink {
    #[must_use]
    pub fn new(cap: u32, color: bool) -> Self {
        DiagnosticSink { messages: Vec::new(), error_count: 0, cap, color }
    }

    #[must_use]
    pub fn with_default_cap(color: bool) -> Self {
        Self::new(crate::limits::DEFAULT_ERROR_CAP, color)
    }

    fn push(&mut self, severity: Severity, stage: Stage, loc: Location, message: String) {
        if severity == Severity::Error {
            if self.error_count >= self.cap {
                return;
            }
            self.error_count += 1;
        }
        self.messages.push(Diagnostic { severity, stage, loc, message });
    }

    pub fn error(&mut self, stage: Stage, loc: Location, message: impl Into<String>) {
        self.push(Severity::Error, stage, loc, message.into());
    }

    pub fn warning(&mut self, stage: Stage, loc: Location, message: impl Into<String>) {
        self.push(Severity::Warning, stage, loc, message.into());
    }

    /// Attaches a note to the diagnostic immediately preceding it in issue
    /// order (per spec §4.1, notes are context for the preceding
    /// error/warning and are never themselves capped).
    pub fn note(&mut self, stage: Stage, loc: Location, message: impl Into<String>) {
        self.push(Severity::Note, stage, loc, message.into());
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    #[must_use]
    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    #[must_use]
    pub fn messages(&self) -> &[Diagnostic] {
        &self.messages
    }

    /// Prints every buffered message followed by a summary line, the way
    /// `original_source/error.c`'s `print_messages` does.
    pub fn print_all(&self, mut out: impl Write) {
        for diag in &self.messages {
            let _ = writeln!(out, "{}", diag.render(self.color));
        }
        let n = self.error_count;
        let _ = writeln!(out, "{} error{} generated.", n, if n == 1 { "" } else { "s" });
    }

    /// Used only for parser desynchronization and catastrophic internal
    /// states (spec §4.1): prints the single fatal diagnostic plus whatever
    /// was already buffered, then terminates the process.
    pub fn fatal(&mut self, stage: Stage, loc: Location, message: impl Into<String>) -> ! {
        self.push(Severity::Error, stage, loc, message.into());
        self.print_all(std::io::stderr());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> Location {
        Location { file: std::rc::Rc::from("t.lync"), line: 1, column: 1 }
    }

    #[test]
    fn error_cap_truncates_errors_not_notes() {
        let mut sink = DiagnosticSink::new(2, false);
        for _ in 0..5 {
            sink.error(Stage::Analyzer, loc(), "boom");
        }
        sink.note(Stage::Analyzer, loc(), "a trailing note");
        assert_eq!(sink.error_count(), 2);
        assert_eq!(sink.messages().iter().filter(|d| d.severity == Severity::Note).count(), 1);
    }

    #[test]
    fn has_errors_reflects_only_errors() {
        let mut sink = DiagnosticSink::new(20, false);
        sink.warning(Stage::Lexer, loc(), "careful");
        assert!(!sink.has_errors());
        sink.error(Stage::Lexer, loc(), "bad");
        assert!(sink.has_errors());
    }
}
