//! Shared types for the Lync compiler pipeline.
//!
//! This crate sits at the bottom of the dependency graph so that no pipeline
//! stage (lexer, parser, analyzer, emitter, cli) needs to depend on one that
//! comes after it:
//!
//! ```text
//! lync-common (base layer)
//!   ↓
//! lync-lexer → lync-parser → lync-analyzer → lync-emitter → lync-cli
//! ```
//!
//! - `span` — byte-range `Span`s and materialized `Location`s
//! - `diagnostics` — the diagnostic sink (errors/warnings/notes)
//! - `types` — `TypeTag` and `Ownership`, shared across every later crate
//! - `limits` — centralized constants (error cap, include depth)

pub mod diagnostics;
pub mod limits;
pub mod span;
pub mod types;

pub use diagnostics::{Diagnostic, DiagnosticSink, Severity, Stage};
pub use span::{Location, LineMap, Span};
pub use types::{Ownership, TypeTag};
