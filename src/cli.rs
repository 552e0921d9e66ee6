//! Command-line interface definition.

use crate::{
    config::PipelineConfig,
    error::PipelineError,
    pipeline::RunRequest,
    plot::AxisBounds,
    reads::ReadPair,
    stem::{OutputLayout, Stem},
    trim::TrimNaming,
};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

const LONG_ABOUT: &str = "\
Take raw paired-end reads, optionally trim them, calculate a 31-mer depth \
histogram and draw it.

Requires trimmomatic (for --trim) and bbmap's khist.sh on the path. The khist \
step can use a lot of memory (around 70 GB for a HiSeq lane).";

/// Trim paired-end reads, profile k-mer depth with khist and plot the histogram.
#[derive(Parser, Debug)]
#[command(name = "kmerpeak")]
#[command(version, about, long_about = LONG_ABOUT, arg_required_else_help = true)]
pub struct Args {
    /// FASTQ forward reads
    #[arg(short = '1', long = "forward_reads", value_name = "FASTQ")]
    pub forward_reads: PathBuf,

    /// FASTQ reverse reads
    #[arg(short = '2', long = "reverse_reads", value_name = "FASTQ")]
    pub reverse_reads: PathBuf,

    /// Stem name for the output files, e.g. sample_405 [default: derived from the forward reads]
    #[arg(short, long)]
    pub stem: Option<String>,

    /// Trim reads with trimmomatic before profiling
    #[arg(long)]
    pub trim: bool,

    /// Threads for trimming and khist [default: 16]
    #[arg(short, long, value_parser = parse_positive)]
    pub threads: Option<usize>,

    /// Directory for all output files [default: current directory]
    #[arg(short, long, value_name = "DIR")]
    pub outdir: Option<PathBuf>,

    /// JSON configuration file; flags given here override it
    #[arg(short, long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Adapter FASTA for trimmomatic's ILLUMINACLIP step
    #[arg(long, value_name = "FASTA")]
    pub adapters: Option<PathBuf>,

    /// How trimmed output files are named
    #[arg(long, value_enum)]
    pub trim_naming: Option<TrimNaming>,

    /// K-mer length passed to khist [default: 31]
    #[arg(short, long, value_parser = parse_positive)]
    pub kmer_size: Option<usize>,

    /// Axis range preset for the plot
    #[arg(long, value_enum)]
    pub bounds: Option<BoundsPreset>,

    /// Upper bound of the depth axis
    #[arg(long, allow_negative_numbers = true)]
    pub x_max: Option<f64>,

    /// Upper bound of the unique k-mer axis
    #[arg(long, allow_negative_numbers = true)]
    pub y_max: Option<f64>,

    /// Plot resolution in dots per inch [default: 300]
    #[arg(long, value_parser = parse_positive)]
    pub dpi: Option<usize>,

    /// Trimmomatic executable
    #[arg(long, value_name = "EXE")]
    pub trimmomatic: Option<String>,

    /// khist executable
    #[arg(long, value_name = "EXE")]
    pub khist: Option<String>,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log more detail (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Axis range presets for the plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum BoundsPreset {
    /// Depth 0-80000, unique k-mers 0-1000
    #[default]
    Default,
    /// Depth 0-10000, unique k-mers 0-3000
    Zoomed,
}

impl From<BoundsPreset> for AxisBounds {
    fn from(preset: BoundsPreset) -> Self {
        match preset {
            BoundsPreset::Default => AxisBounds::DEFAULT,
            BoundsPreset::Zoomed => AxisBounds::ZOOMED,
        }
    }
}

impl Args {
    /// Loads the config file, if any, and applies the flags on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or if the
    /// merged values fail [`PipelineConfig::validate`].
    pub fn pipeline_config(&self) -> Result<PipelineConfig, PipelineError> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(adapters) = &self.adapters {
            config.trim.adapters.clone_from(adapters);
        }
        if let Some(naming) = self.trim_naming {
            config.trim.naming = naming;
        }
        if let Some(exe) = &self.trimmomatic {
            config.trim.executable.clone_from(exe);
        }
        if let Some(k) = self.kmer_size {
            config.profile.kmer_size = k;
        }
        if let Some(exe) = &self.khist {
            config.profile.executable.clone_from(exe);
        }
        if let Some(preset) = self.bounds {
            config.plot.bounds = preset.into();
        }
        if let Some(x_max) = self.x_max {
            config.plot.bounds.x_max = x_max;
        }
        if let Some(y_max) = self.y_max {
            config.plot.bounds.y_max = y_max;
        }
        if let Some(dpi) = self.dpi {
            config.plot.dpi = u32::try_from(dpi)
                .map_err(|_| PipelineError::configuration(format!("dpi {dpi} is too large")))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// The reads, stem and output layout for this invocation.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] if the stem is invalid or
    /// cannot be derived from the forward reads.
    pub fn run_request(&self) -> Result<RunRequest, PipelineError> {
        let stem = match &self.stem {
            Some(stem) => Stem::new(stem.as_str())?,
            None => Stem::from_forward_reads(&self.forward_reads)?,
        };
        Ok(RunRequest {
            reads: ReadPair::new(&self.forward_reads, &self.reverse_reads),
            layout: OutputLayout::new(stem, self.outdir.clone()),
            trim: self.trim,
        })
    }

    /// Default log filter for the requested verbosity.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}

fn parse_positive(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if n == 0 {
        return Err("must be at least 1".to_string());
    }
    Ok(n)
}
