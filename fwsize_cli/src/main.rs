use clap::Parser;
use fwsize::{FwError, FwResult, Outcome, Reporter, ReporterConfig, SystemRunner};
use log::debug;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::io;
use std::process;

/// Prints the per crate code size of the firmware in the current directory,
/// then its flash and RAM usage against the target's budget.
///
/// Needs cargo-bloat and cargo-binutils installed for the firmware's target.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Opts {}

fn setup_logger() -> FwResult<()> {
    // stdout carries the report, diagnostics stay on stderr.
    #[cfg(debug_assertions)]
    let level = LevelFilter::Debug;
    #[cfg(not(debug_assertions))]
    let level = LevelFilter::Warn;

    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .map_err(|e| FwError::new_with_cause("Failed to set up the logger", e))
}

fn main() -> FwResult<()> {
    let _opts = Opts::parse();
    setup_logger()?;

    let config = ReporterConfig::baked()?;
    debug!(
        "budget: flash {}KiB, ram {}KiB",
        config.budget.flash_kib, config.budget.ram_kib
    );
    let reporter = Reporter::new(config, SystemRunner);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match reporter.run(&mut out)? {
        Outcome::Reported(_) => Ok(()),
        failed @ Outcome::CompilationFailed => process::exit(failed.exit_code()),
    }
}
