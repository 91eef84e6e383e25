//! Stage-prefixed trace logging on stderr, gated by `-trace`/`--trace`
//! (spec §6.1).
//!
//! Each pipeline stage opens a [`tracing::info_span!`] named after itself
//! (`lex`, `parse`, `analyze`, `optimize`, `emit`, `backend`); `tracing-tree`
//! renders the span nesting as indentation so the trace reads top-to-bottom
//! in pipeline order without any manual prefix bookkeeping in the driver.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};
use tracing_tree::HierarchicalLayer;

/// Installs the global subscriber. A no-op (but still callable exactly
/// once) when tracing wasn't requested, so the driver doesn't need a
/// separate "did we init" branch.
pub fn init(enabled: bool) {
    if !enabled {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lync=trace"));
    let layer = HierarchicalLayer::new(2)
        .with_indent_lines(true)
        .with_targets(true)
        .with_writer(std::io::stderr);
    let subscriber = Registry::default().with(filter).with(layer);
    // Only the CLI binary ever calls this, and at most once per process, so
    // a failed `set_global_default` (already installed, e.g. in a test
    // harness) is safe to ignore rather than panic on.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_disabled_does_not_touch_the_global_subscriber() {
        init(false);
    }
}
