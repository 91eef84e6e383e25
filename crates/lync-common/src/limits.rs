//! Centralized limits and thresholds.
//!
//! Mirrors the original implementation's reliance on a handful of fixed
//! constants (`original_source/common.h`) rather than scattering magic
//! numbers through the analyzer and driver.

/// Default number of errors the diagnostic sink will report before
/// truncating further errors. Warnings and notes are never capped.
pub const DEFAULT_ERROR_CAP: u32 = 20;

/// Maximum `using` include depth before the driver reports a circular or
/// runaway include chain.
pub const MAX_INCLUDE_DEPTH: usize = 32;
