//! Abstract syntax tree and recursive-descent parser for Lync.
//!
//! Treated as an external collaborator by the specification, but fully
//! implemented so the pipeline runs end to end. Every node is assigned a
//! [`NodeId`] at parse time; the analyzer attaches resolved facts to nodes
//! via id-keyed side tables rather than mutating the tree in place (an
//! explicitly sanctioned alternative per spec §9 "Mutable state on the
//! tree").

pub mod ast;
pub mod parser;

pub use ast::*;
pub use parser::Parser;
