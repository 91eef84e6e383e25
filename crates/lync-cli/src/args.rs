//! Command-line argument parsing for the `lync` driver (spec §6.1).
//!
//! Invocation: `lync [flags] [input-file]` or `lync run [flags] [input-file]`.
//! `run` is a leading mode word, not a clap subcommand sharing none of the
//! other flags' surface — it is stripped out of `argv` before delegating to
//! [`CliArgs`], the same way the rest of the flags are normalized first.

use std::path::PathBuf;

use clap::Parser;

/// Input path used when none is given on the command line.
pub const DEFAULT_INPUT: &str = "demos/hello.lync";

#[derive(Parser, Debug, Clone)]
#[command(name = "lync", version, about = "Compiles Lync programs to native executables via a C backend")]
pub struct CliArgs {
    /// Source file to compile. Defaults to a built-in sample program.
    pub input: Option<PathBuf>,

    /// Name of the produced executable.
    #[arg(short = 'o', value_name = "path")]
    pub output: Option<PathBuf>,

    /// Stop after emitting assembly via the C backend.
    #[arg(short = 'S')]
    pub emit_asm: bool,

    /// Keep the intermediate C file instead of deleting it after the
    /// backend runs.
    #[arg(long = "emit-c")]
    pub emit_c: bool,

    /// Enable stage-prefixed trace logging on stderr.
    #[arg(long = "trace")]
    pub trace: bool,

    /// Suppress ANSI color in diagnostic output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Optimization level: 0 (default, none), 1 (constant fold), 2/3 (+dead
    /// block removal), s (same as 1 — no size metric without native codegen).
    #[arg(short = 'O', value_name = "level", default_value = "0")]
    pub opt_level: String,
}

/// A parsed invocation, carrying whether `run` preceded the flags.
pub struct Invocation {
    pub run_mode: bool,
    pub args: CliArgs,
}

impl Invocation {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_argv(std::env::args())
    }

    #[must_use]
    pub fn from_argv(argv: impl IntoIterator<Item = String>) -> Self {
        let mut argv: Vec<String> = argv.into_iter().collect();
        let run_mode = argv.get(1).map(String::as_str) == Some("run");
        if run_mode {
            argv.remove(1);
        }
        let argv = normalize_single_dash_flags(argv);
        Invocation { run_mode, args: CliArgs::parse_from(argv) }
    }
}

/// `clap` only recognizes single-char flags after one dash; `-trace` and
/// `-no-color` are documented (spec §6.1) as accepted alongside their
/// double-dash spellings, so rewrite them before parsing rather than
/// teaching clap a third flag style.
fn normalize_single_dash_flags(argv: Vec<String>) -> Vec<String> {
    argv.into_iter()
        .map(|arg| match arg.as_str() {
            "-trace" => "--trace".to_string(),
            "-no-color" => "--no-color".to_string(),
            other => other.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_mode_is_detected_and_stripped() {
        let inv = Invocation::from_argv(["lync", "run", "prog.lync"].map(String::from));
        assert!(inv.run_mode);
        assert_eq!(inv.args.input, Some(PathBuf::from("prog.lync")));
    }

    #[test]
    fn plain_invocation_is_not_run_mode() {
        let inv = Invocation::from_argv(["lync", "prog.lync"].map(String::from));
        assert!(!inv.run_mode);
    }

    #[test]
    fn single_dash_trace_and_no_color_are_normalized() {
        let inv = Invocation::from_argv(["lync", "-trace", "-no-color", "prog.lync"].map(String::from));
        assert!(inv.args.trace);
        assert!(inv.args.no_color);
    }

    #[test]
    fn attached_optimization_level_is_parsed() {
        let inv = Invocation::from_argv(["lync", "-O2", "prog.lync"].map(String::from));
        assert_eq!(inv.args.opt_level, "2");
    }

    #[test]
    fn defaults_apply_with_no_flags() {
        let inv = Invocation::from_argv(["lync"].map(String::from));
        assert_eq!(inv.args.input, None);
        assert_eq!(inv.args.opt_level, "0");
        assert!(!inv.args.emit_c);
    }
}
