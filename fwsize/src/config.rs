//! This module defines the configuration of the reporter.
//! The configuration is serialized in the RON format and baked into the binary at build time:
//! the hardware budgets and the tool invocations are fixed for a given firmware.

use crate::{FwError, FwResult};
use ron::extensions::Extensions;
use ron::Options;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Display;

/// The configuration document compiled into the binary.
pub const BAKED_CONFIG: &str = include_str!("../fwsize.ron");

/// Flash and RAM capacity of the target, in KiB.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBudget {
    pub flash_kib: u64,
    pub ram_kib: u64,
}

/// An external analysis tool and its fixed arguments.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: &str, args: &[&str]) -> Self {
        ToolCommand {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

// The configuration Serialization format is as follows:
// (
//   budget: (flash_kib: 512, ram_kib: 256),
//   crate_sizes: (program: "cargo", args: ["bloat", ...]),
//   section_sizes: (program: "cargo", args: ["size", ...]),
//   failure_marker: "error: could not compile",
//   trailer_len: 93,
// )

/// Everything the reporter needs to know about the target and the tools.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    pub budget: SizeBudget,
    /// Per crate code size breakdown (cargo bloat).
    pub crate_sizes: ToolCommand,
    /// Per section sizes with addresses (cargo size -A).
    pub section_sizes: ToolCommand,
    /// Substring of the crate size tool's stderr meaning the firmware did not build.
    pub failure_marker: String,
    /// Number of trailing characters the crate size tool appends after its table.
    pub trailer_len: usize,
}

impl ReporterConfig {
    fn get_options() -> Options {
        Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .with_default_extension(Extensions::UNWRAP_NEWTYPES)
    }

    /// The configuration shipped with the binary.
    pub fn baked() -> FwResult<Self> {
        read_configuration_str(BAKED_CONFIG)
    }
}

/// Read a reporter configuration from a RON string.
pub fn read_configuration_str(config_content: &str) -> FwResult<ReporterConfig> {
    ReporterConfig::get_options()
        .from_str(config_content)
        .map_err(|e| FwError::new_with_cause("Syntax Error in config", e))
}
