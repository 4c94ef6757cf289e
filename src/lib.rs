//! Core library for the `devlens` CLI.
//!
//! `devlens` imports GitHub repositories and turns them into a semantic
//! graph: a file hierarchy with complexity tiers, schema entities parsed from
//! Prisma and Django model files, on-demand outlines of classes and
//! functions, repository statistics, and optional LLM audits.
//!
//! Every side effect goes through a port in [`ports`]. A [`context::ServiceContext`]
//! bundles live, recording or replaying adapters for those ports.

pub mod adapters;
pub mod analysis;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod hierarchy;
pub mod outline;
pub mod ports;
pub mod project;
pub mod schema;
pub mod stack;
pub mod stats;
pub mod store;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `devlens=debug`.
pub const LOG_ENV: &str = "DEVLENS_LOG";

/// Installs the stderr log subscriber. Filters come from [`LOG_ENV`] and
/// default to `warn`. Calling this twice is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution
/// fails. `--help` and `--version` print to stdout and succeed.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return err.print().map_err(|e| format!("write error: {e}"));
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["devlens", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn help_and_version_succeed() {
        assert!(run(["devlens", "--help"]).is_ok());
        assert!(run(["devlens", "--version"]).is_ok());
        assert!(run(["devlens", "schema", "--help"]).is_ok());
    }

    #[test]
    fn run_reports_missing_local_file() {
        let err = run(["devlens", "outline-file", "/nonexistent/devlens/app.py"]).unwrap_err();
        assert!(err.contains("/nonexistent/devlens/app.py"), "{err}");
    }

    #[test]
    fn init_logging_twice_is_harmless() {
        super::init_logging();
        super::init_logging();
    }
}
