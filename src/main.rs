//! `cc-sdd` entry point.

use anyhow::Result;
use clap::Parser;

use cc_sdd_cli::cli::Cli;
use cc_sdd_cli::commands::{self, TerminalConfirm};
use cc_sdd_cli::logging::{self, Logger};
use cc_sdd_cli::platform::Platform;

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    logging::init_subscriber(args.verbose, "setup");
    let log = Logger::new("setup");

    let result = commands::setup::run(
        &args,
        &Platform::detect(),
        &mut std::io::stdout().lock(),
        &TerminalConfirm,
        &log,
    );
    if result.is_err()
        && let Some(path) = log.log_path()
    {
        log.info(&format!("log: {}", path.display()));
    }
    result
}
