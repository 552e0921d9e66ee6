//! K-mer depth profiling with BBMap's `khist.sh`.

use crate::{
    config::{PipelineConfig, ProfileSettings},
    error::PipelineError,
    reads::ReadPair,
    runner::{ensure_available, run_checked, ToolRunner},
};
use std::path::Path;
use tracing::info;

pub(crate) const MISSING_KHIST: &str = "try 'module load bbmap'";

/// Builds the khist argument list (without the executable).
#[must_use]
pub fn khist_args(
    settings: &ProfileSettings,
    threads: usize,
    reads: &ReadPair,
    table: &Path,
) -> Vec<String> {
    vec![
        format!("in={}", reads.forward.display()),
        format!("in2={}", reads.reverse.display()),
        format!("khist={}", table.display()),
        format!("threads={threads}"),
        format!("k={}", settings.kmer_size),
    ]
}

/// Fails unless the khist executable can be run.
///
/// # Errors
///
/// Returns [`PipelineError::ToolNotFound`] if it is missing.
pub fn ensure_khist<R: ToolRunner + ?Sized>(
    runner: &R,
    settings: &ProfileSettings,
) -> Result<(), PipelineError> {
    ensure_available(runner, &settings.executable, MISSING_KHIST)
}

/// Runs khist on `reads`, writing the histogram to `table`.
///
/// # Errors
///
/// - [`PipelineError::ToolNotFound`] if khist cannot be run
/// - [`PipelineError::ExternalTool`] if it exits unsuccessfully
pub fn profile<R: ToolRunner + ?Sized>(
    runner: &R,
    config: &PipelineConfig,
    reads: &ReadPair,
    table: &Path,
) -> Result<(), PipelineError> {
    let settings = &config.profile;
    let args = khist_args(settings, config.threads, reads, table);

    info!(
        k = settings.kmer_size,
        table = ?table,
        "Beginning k-mer profile with khist"
    );
    run_checked(runner, &settings.executable, &args, MISSING_KHIST)?;
    Ok(())
}
