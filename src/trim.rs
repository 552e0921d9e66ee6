//! Adapter and quality trimming with Trimmomatic.
//!
//! Runs Trimmomatic in paired-end mode and hands back the pair of reads
//! that survived together. Reads whose mate was dropped go to the unpaired
//! outputs and are not used further.

use crate::{
    config::{PipelineConfig, TrimSettings},
    error::PipelineError,
    reads::ReadPair,
    runner::{ensure_available, run_checked, ToolRunner},
    stem::{strip_fastq_extension, strip_read_identifier, OutputLayout},
};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const MISSING_TRIMMOMATIC: &str = "try 'module load trimmomatic'";

/// How the trimmed output files are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrimNaming {
    /// `<stem>_1P.fastq.gz`, `<stem>_1U.fastq.gz`, `<stem>_2P.fastq.gz`, `<stem>_2U.fastq.gz`
    #[default]
    Stem,
    /// Each input name minus its extension and read identifier, plus `_1P.fastq.gz` etc.
    Suffix,
}

/// The four files Trimmomatic writes in paired-end mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrimOutputs {
    pub forward_paired: PathBuf,
    pub forward_unpaired: PathBuf,
    pub reverse_paired: PathBuf,
    pub reverse_unpaired: PathBuf,
}

impl TrimOutputs {
    /// Derives the output names for `reads` under `naming`.
    #[must_use]
    pub fn derive(naming: TrimNaming, layout: &OutputLayout, reads: &ReadPair) -> Self {
        let (forward_base, reverse_base) = match naming {
            TrimNaming::Stem => {
                let stem = layout.stem().as_str().to_string();
                (stem.clone(), stem)
            }
            TrimNaming::Suffix => (sample_base(&reads.forward), sample_base(&reads.reverse)),
        };
        Self {
            forward_paired: layout.path(&format!("{forward_base}_1P.fastq.gz")),
            forward_unpaired: layout.path(&format!("{forward_base}_1U.fastq.gz")),
            reverse_paired: layout.path(&format!("{reverse_base}_2P.fastq.gz")),
            reverse_unpaired: layout.path(&format!("{reverse_base}_2U.fastq.gz")),
        }
    }

    /// The pair that goes on to profiling.
    #[must_use]
    pub fn paired(&self) -> ReadPair {
        ReadPair::new(&self.forward_paired, &self.reverse_paired)
    }
}

/// File name with the FASTQ extension and read identifier removed.
fn sample_base(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = strip_fastq_extension(&name);
    strip_read_identifier(base).unwrap_or(base).to_string()
}

/// Builds the Trimmomatic argument list (without the executable).
#[must_use]
pub fn trimmomatic_args(
    settings: &TrimSettings,
    threads: usize,
    reads: &ReadPair,
    outputs: &TrimOutputs,
) -> Vec<String> {
    let path = |p: &Path| p.display().to_string();
    vec![
        "PE".to_string(),
        "-threads".to_string(),
        threads.to_string(),
        path(&reads.forward),
        path(&reads.reverse),
        path(&outputs.forward_paired),
        path(&outputs.forward_unpaired),
        path(&outputs.reverse_paired),
        path(&outputs.reverse_unpaired),
        format!(
            "ILLUMINACLIP:{}:{}:{}:{}",
            settings.adapters.display(),
            settings.seed_mismatches,
            settings.palindrome_clip_threshold,
            settings.simple_clip_threshold
        ),
        format!("LEADING:{}", settings.leading_quality),
        format!("TRAILING:{}", settings.trailing_quality),
        format!(
            "SLIDINGWINDOW:{}:{}",
            settings.window_size, settings.window_quality
        ),
        format!("MINLEN:{}", settings.min_length),
    ]
}

/// Trims `reads` and returns the output files.
///
/// The adapter file is checked before Trimmomatic is touched, then the
/// executable is probed, then the trim runs.
///
/// # Errors
///
/// - [`PipelineError::Configuration`] if the adapter file is missing
/// - [`PipelineError::ToolNotFound`] if Trimmomatic cannot be run
/// - [`PipelineError::ExternalTool`] if Trimmomatic exits unsuccessfully
pub fn trim<R: ToolRunner + ?Sized>(
    runner: &R,
    config: &PipelineConfig,
    reads: &ReadPair,
    layout: &OutputLayout,
) -> Result<TrimOutputs, PipelineError> {
    let settings = &config.trim;
    if !settings.adapters.is_file() {
        return Err(PipelineError::configuration(format!(
            "could not find adapter file '{}' for trimmomatic",
            settings.adapters.display()
        )));
    }
    debug!(adapters = ?settings.adapters, "Found adapter file");

    ensure_available(runner, &settings.executable, MISSING_TRIMMOMATIC)?;

    let outputs = TrimOutputs::derive(settings.naming, layout, reads);
    let args = trimmomatic_args(settings, config.threads, reads, &outputs);

    info!(
        forward = ?reads.forward,
        reverse = ?reads.reverse,
        threads = config.threads,
        "Beginning trimming with trimmomatic"
    );
    run_checked(runner, &settings.executable, &args, MISSING_TRIMMOMATIC)?;
    info!(
        forward = ?outputs.forward_paired,
        reverse = ?outputs.reverse_paired,
        "Trimming finished"
    );

    Ok(outputs)
}
