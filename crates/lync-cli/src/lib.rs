//! Driver crate for the `lync` binary: argument parsing, module resolution,
//! the non-load-bearing optimizer pass, compilation orchestration, and
//! trace logging (spec §6.1, §6.4, SPEC_FULL.md §4.11).

pub mod args;
pub mod driver;
pub mod includes;
pub mod optimizer;
pub mod trace;
