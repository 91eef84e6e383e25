//! End-of-scope cleanup (`check_function_cleanup`, spec §4.6): run at every
//! block end, match-branch end, and function end.

use lync_common::{Location, Stage};

use crate::ctx::Ctx;
use crate::scope::ScopeId;

pub fn check_scope_cleanup(ctx: &mut Ctx, scope: ScopeId, loc: Location) {
    let leaks: Vec<String> =
        ctx.env.symbols_in_scope(scope).filter(|s| s.leaks_at_scope_end()).map(|s| s.name.clone()).collect();
    for name in leaks {
        ctx.diags.error(Stage::Analyzer, loc.clone(), format!("Memory leak: '{name}' is not freed or moved"));
    }
}
