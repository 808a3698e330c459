//! The reporting pipeline: crate breakdown first, then the flash/RAM summary.

use crate::config::ReporterConfig;
use crate::sections::Totals;
use crate::tool::CommandRunner;
use crate::usage::UsageReport;
use crate::{FwError, FwResult};
use log::{debug, info};
use std::io::Write;

/// Printed instead of any report when the firmware does not build.
pub const COMPILATION_FAILED: &str = "Compilation failed.";

/// Result of the crate breakdown step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    Compiled,
    CompilationFailed,
}

/// Result of a full run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Reported(UsageReport),
    CompilationFailed,
}

impl Outcome {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Reported(_) => 0,
            Outcome::CompilationFailed => 1,
        }
    }
}

/// Drops the last `trailer_len` characters of `text`.
pub fn strip_trailer(text: &str, trailer_len: usize) -> &str {
    if trailer_len == 0 {
        return text;
    }
    match text.char_indices().rev().nth(trailer_len - 1) {
        Some((start, _)) => &text[..start],
        None => "",
    }
}

fn write_failed(e: std::io::Error) -> FwError {
    FwError::new_with_cause("Failed to write the report", e)
}

pub struct Reporter<R: CommandRunner> {
    config: ReporterConfig,
    runner: R,
}

impl<R: CommandRunner> Reporter<R> {
    pub fn new(config: ReporterConfig, runner: R) -> Self {
        Reporter { config, runner }
    }

    /// Prints the per crate code size table.
    /// Reports a failed build, without printing the table, when the tool's stderr carries the failure marker.
    pub fn report_crate_sizes(&self, out: &mut impl Write) -> FwResult<BuildStatus> {
        let output = self.runner.run(&self.config.crate_sizes)?;
        if output.stderr.contains(&self.config.failure_marker) {
            info!("{} reported a build failure", self.config.crate_sizes.program);
            writeln!(out, "{}", COMPILATION_FAILED).map_err(write_failed)?;
            return Ok(BuildStatus::CompilationFailed);
        }
        let table = strip_trailer(&output.stdout, self.config.trailer_len);
        writeln!(out, "{}", table).map_err(write_failed)?;
        Ok(BuildStatus::Compiled)
    }

    /// Sums the section sizes into flash and RAM and prints them against the budget.
    pub fn report_flash_and_ram_usage(&self, out: &mut impl Write) -> FwResult<UsageReport> {
        let output = self.runner.run(&self.config.section_sizes)?;
        let totals = Totals::from_listing(&output.stdout);
        info!(
            "flash: {} bytes, ram: {} bytes",
            totals.rom_bytes, totals.ram_bytes
        );
        let report = UsageReport::new(&totals, &self.config.budget);
        write!(out, "{}", report).map_err(write_failed)?;
        Ok(report)
    }

    /// Runs both steps, stopping after the first one if the firmware does not build.
    pub fn run(&self, out: &mut impl Write) -> FwResult<Outcome> {
        let outcome = match self.report_crate_sizes(out)? {
            BuildStatus::CompilationFailed => {
                debug!("skipping section sizes");
                Outcome::CompilationFailed
            }
            BuildStatus::Compiled => Outcome::Reported(self.report_flash_and_ram_usage(out)?),
        };
        out.flush().map_err(write_failed)?;
        Ok(outcome)
    }
}
