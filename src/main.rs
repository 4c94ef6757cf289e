//! Binary entrypoint for the `devlens` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    devlens::init_logging();
    // Recording is handled in commands::dispatch via DEVLENS_RECORD=<file>.
    match devlens::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
