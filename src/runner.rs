//! External tool execution.
//!
//! The pipeline never spawns processes directly; it goes through a
//! [`ToolRunner`], so tests can substitute a fake that records calls.

use crate::error::{ExitStatusCode, PipelineError};
use std::{
    io::{self, ErrorKind},
    process::Command,
};
use tracing::debug;

/// Captured result of one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub status: ExitStatusCode,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == ExitStatusCode::Code(0)
    }
}

/// Runs external programs to completion.
pub trait ToolRunner {
    /// Runs `program` with `args` and waits for it to finish.
    ///
    /// # Errors
    ///
    /// Returns the spawn error; an error of kind [`ErrorKind::NotFound`]
    /// means the executable does not exist.
    fn execute(&self, program: &str, args: &[String]) -> io::Result<ToolOutput>;

    /// Probes for `program` by running `<program> -version`.
    ///
    /// Only a missing executable counts as unavailable; the probe's own exit
    /// status is ignored since tools disagree on what `-version` returns.
    fn is_available(&self, program: &str) -> bool {
        match self.execute(program, &["-version".to_string()]) {
            Ok(_) => true,
            Err(e) => e.kind() != ErrorKind::NotFound,
        }
    }
}

/// Runs tools as child processes of this one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn execute(&self, program: &str, args: &[String]) -> io::Result<ToolOutput> {
        debug!(program, args = ?args, "Spawning external tool");
        let output = Command::new(program).args(args).output()?;
        Ok(ToolOutput {
            status: output
                .status
                .code()
                .map_or(ExitStatusCode::Signal, ExitStatusCode::Code),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Runs a tool and turns spawn failures and non-zero exits into errors.
///
/// `hint` is shown when the executable is missing.
pub(crate) fn run_checked<R: ToolRunner + ?Sized>(
    runner: &R,
    program: &str,
    args: &[String],
    hint: &str,
) -> Result<ToolOutput, PipelineError> {
    let output = runner
        .execute(program, args)
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => not_found(program, hint),
            _ => PipelineError::io(program, e),
        })?;

    if output.success() {
        Ok(output)
    } else {
        Err(PipelineError::ExternalTool {
            tool: program.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
        })
    }
}

/// Fails with [`PipelineError::ToolNotFound`] unless `program` can be run.
pub(crate) fn ensure_available<R: ToolRunner + ?Sized>(
    runner: &R,
    program: &str,
    hint: &str,
) -> Result<(), PipelineError> {
    if runner.is_available(program) {
        Ok(())
    } else {
        Err(not_found(program, hint))
    }
}

fn not_found(program: &str, hint: &str) -> PipelineError {
    PipelineError::ToolNotFound {
        tool: program.to_string(),
        hint: hint.to_string(),
    }
}
