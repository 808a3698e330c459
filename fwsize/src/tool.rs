//! Invocation of the external size analysis tools.

use crate::config::ToolCommand;
use crate::{FwError, FwResult};
use log::{debug, warn};
use std::process::{Command, Stdio};

/// Captured result of one tool run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, None if the tool was killed by a signal.
    pub status: Option<i32>,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Runs a tool to completion and hands back what it printed.
pub trait CommandRunner {
    fn run(&self, command: &ToolCommand) -> FwResult<ToolOutput>;
}

/// Spawns the tools as child processes of the current directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ToolCommand) -> FwResult<ToolOutput> {
        debug!("running {}", command);
        let output = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                FwError::from(format!("Failed to run {}", command))
                    .add_cause(e.to_string().as_str())
            })?;

        let output = ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status.code(),
        };
        if !output.success() {
            warn!("{} exited with status {:?}", command, output.status);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_an_error() {
        let command = ToolCommand::new("fwsize-this-tool-does-not-exist", &["--release"]);
        let err = SystemRunner.run(&command).unwrap_err();
        assert_eq!(
            err.message(),
            "Failed to run fwsize-this-tool-does-not-exist --release"
        );
        // the spawn error is kept as the cause
        assert!(err.to_string().contains("\n   cause: "));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_both_streams_and_status() {
        let command = ToolCommand::new("sh", &["-c", "echo out; echo err >&2; exit 3"]);
        let output = SystemRunner.run(&command).unwrap();
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
        assert_eq!(output.status, Some(3));
        assert!(!output.success());
    }
}
