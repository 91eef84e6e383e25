//! Orchestrates one compilation: lex, parse, resolve includes, analyze,
//! optimize, emit, invoke the C backend, and (in `run` mode) execute the
//! result (spec §6.1, §7).

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use tracing::info_span;

use lync_common::DiagnosticSink;
use lync_lexer::Lexer;
use lync_parser::Parser;

use crate::args::CliArgs;
use crate::includes;
use crate::optimizer;

/// Outcome of a full driver run: the exit code the `lync` binary should
/// return (spec §6.1: 0 on success, or the compiled program's own exit
/// status in `run` mode; 1 on any failure).
pub struct RunOutcome {
    pub exit_code: i32,
}

pub fn run(args: &CliArgs, run_mode: bool) -> Result<RunOutcome> {
    let input_path = args.input.clone().unwrap_or_else(|| PathBuf::from(crate::args::DEFAULT_INPUT));
    let color = !args.no_color && std::io::stderr().is_terminal();
    let mut diags = DiagnosticSink::with_default_cap(color);

    let opt_level = optimizer::OptLevel::parse_flag(&args.opt_level)
        .with_context(|| format!("invalid optimization level '-O{}'", args.opt_level))?;

    let source = std::fs::read_to_string(&input_path)
        .with_context(|| format!("reading source file {}", input_path.display()))?;
    let file: Rc<str> = Rc::from(input_path.to_string_lossy().as_ref());

    let line_map = {
        let _span = info_span!("lex").entered();
        Lexer::line_map(&source, file.clone())
    };
    let tokens = {
        let _span = info_span!("lex").entered();
        Lexer::new(file.clone(), &source).tokenize(&mut diags, &line_map)
    };

    let mut program = {
        let _span = info_span!("parse").entered();
        let mut parser = Parser::new(tokens, &mut diags, &line_map, file.clone());
        parser.parse_program()
    };

    {
        let _span = info_span!("resolve_includes").entered();
        if let Err(e) = includes::resolve_includes(&mut program, &input_path, &mut diags) {
            diags.print_all(std::io::stderr());
            return Err(e);
        }
    }

    let analysis = {
        let _span = info_span!("analyze").entered();
        lync_analyzer::analyze_program(&program, &mut diags, &line_map)
    };

    if diags.has_errors() {
        diags.print_all(std::io::stderr());
        return Ok(RunOutcome { exit_code: 1 });
    }

    {
        let _span = info_span!("optimize").entered();
        optimizer::optimize(&mut program, opt_level);
    }

    let c_source = {
        let _span = info_span!("emit").entered();
        lync_emitter::emit(&program, &analysis)
    };

    diags.print_all(std::io::stderr());

    let c_path = c_file_path(&input_path);
    std::fs::write(&c_path, &c_source).with_context(|| format!("writing {}", c_path.display()))?;

    let backend_result = run_backend(&c_path, args, &input_path);

    if !args.emit_c {
        let _ = std::fs::remove_file(&c_path);
    }

    let output_path = backend_result?;

    if args.emit_asm {
        return Ok(RunOutcome { exit_code: 0 });
    }

    if run_mode {
        let _span = info_span!("run").entered();
        let status = Command::new(&output_path)
            .status()
            .with_context(|| format!("running compiled program {}", output_path.display()))?;
        return Ok(RunOutcome { exit_code: status.code().unwrap_or(1) });
    }

    Ok(RunOutcome { exit_code: 0 })
}

fn c_file_path(input_path: &Path) -> PathBuf {
    input_path.with_extension("c")
}

fn default_output_path(input_path: &Path) -> PathBuf {
    input_path.with_extension("")
}

/// Shells out to the system C compiler. `-S` stops at assembly; otherwise a
/// native executable is produced at `-o`'s path (or a name derived from the
/// input file).
fn run_backend(c_path: &Path, args: &CliArgs, input_path: &Path) -> Result<PathBuf> {
    let output_path = args.output.clone().unwrap_or_else(|| default_output_path(input_path));

    let mut cmd = Command::new("cc");
    cmd.arg(c_path);
    if args.emit_asm {
        cmd.arg("-S");
    }
    cmd.arg("-o").arg(&output_path);

    let status = cmd.status().context("invoking 'cc' (is a C compiler installed?)")?;
    if !status.success() {
        bail!("'cc' exited with status {}", status);
    }
    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn c_file_path_swaps_extension() {
        assert_eq!(c_file_path(Path::new("prog.lync")), PathBuf::from("prog.c"));
    }

    #[test]
    fn default_output_path_strips_extension() {
        assert_eq!(default_output_path(Path::new("prog.lync")), PathBuf::from("prog"));
    }

    #[test]
    fn end_to_end_compiles_and_runs_a_trivial_program() {
        let mut src_file = NamedTempFile::with_suffix(".lync").expect("temp source file");
        src_file.write_all(b"def main(): int { print(\"hi\"); return 0; }\n").unwrap();
        src_file.flush().unwrap();

        let out_dir = tempfile::tempdir().expect("temp output dir");
        let output_path = out_dir.path().join("hi_bin");

        let args = CliArgs {
            input: Some(src_file.path().to_path_buf()),
            output: Some(output_path.clone()),
            emit_asm: false,
            emit_c: false,
            trace: false,
            no_color: true,
            opt_level: "0".to_string(),
        };

        let outcome = run(&args, true).expect("compilation and run should succeed");
        assert_eq!(outcome.exit_code, 0);
        assert!(!c_file_path(src_file.path()).exists(), "intermediate .c file should be removed without --emit-c");
    }
}
