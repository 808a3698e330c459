//! Flash and RAM usage reporting for an embedded firmware build.
//!
//! The heavy lifting is done by `cargo bloat` and `cargo size`; this crate runs them,
//! reads their text output back and folds the section sizes into a flash/RAM budget report.

pub mod config;
pub mod reporter;
pub mod sections;
pub mod tool;
pub mod usage;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub use config::{ReporterConfig, SizeBudget, ToolCommand};
pub use reporter::{BuildStatus, Outcome, Reporter, COMPILATION_FAILED};
pub use sections::{MemoryRegion, SectionRecord, Totals};
pub use tool::{CommandRunner, SystemRunner, ToolOutput};
pub use usage::{RegionUsage, UsageReport};

/// Common fwsize Error type.
#[derive(Debug)]
pub struct FwError {
    message: String,
    cause: Option<String>,
}

impl Display for FwError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(c) => write!(f, "{}\n   cause: {}", self.message, c),
            None => write!(f, "{}", self.message),
        }
    }
}

impl Error for FwError {}

impl From<&str> for FwError {
    fn from(s: &str) -> FwError {
        FwError {
            message: s.to_string(),
            cause: None,
        }
    }
}

impl From<String> for FwError {
    fn from(s: String) -> FwError {
        FwError {
            message: s,
            cause: None,
        }
    }
}

impl FwError {
    pub fn new_with_cause(message: &str, cause: impl Error) -> FwError {
        FwError {
            message: message.to_string(),
            cause: Some(cause.to_string()),
        }
    }

    pub fn add_cause(mut self, cause: &str) -> FwError {
        self.cause = Some(cause.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

// Generic Result type for fwsize.
pub type FwResult<T> = Result<T, FwError>;
