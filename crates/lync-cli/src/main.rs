//! `lync` binary entry point: `lync [flags] [input-file]` or
//! `lync run [flags] [input-file]` (spec §6.1).

use lync_cli::args::Invocation;
use lync_cli::{driver, trace};

fn main() {
    let Invocation { run_mode, args } = Invocation::from_env();
    trace::init(args.trace);

    match driver::run(&args, run_mode) {
        Ok(outcome) => std::process::exit(outcome.exit_code),
        Err(err) => {
            eprintln!("lync: {err:?}");
            std::process::exit(1);
        }
    }
}
