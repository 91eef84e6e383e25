//! Tokenizer for the Lync source language.
//!
//! Treated as an external collaborator by the specification (the core
//! concentration is the analyzer), but fully implemented here so the
//! pipeline runs end to end.
//!
//! - `token` — `TokenKind`/`Token`
//! - `lexer` — the scanning loop

pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};
