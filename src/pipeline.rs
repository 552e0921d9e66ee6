//! The trim → profile → render pipeline.
//!
//! A run moves linearly through [`Stage`]s and stops at the first error.
//! Files written before the failure are left in place.

use crate::{
    config::PipelineConfig,
    error::PipelineError,
    histogram::{histogram_stats, HistogramStats, HistogramTable},
    plot,
    profile::{ensure_khist, profile},
    reads::ReadPair,
    runner::ToolRunner,
    stem::OutputLayout,
    trim::{trim, TrimOutputs},
};
use serde::Serialize;
use std::{fmt, path::PathBuf};
use tracing::{info, warn};

/// Progress of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    NotStarted,
    Trimmed,
    Profiled,
    Rendered,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "not started",
            Self::Trimmed => "trimmed",
            Self::Profiled => "profiled",
            Self::Rendered => "rendered",
        };
        f.write_str(name)
    }
}

/// What to run on.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub reads: ReadPair,
    pub layout: OutputLayout,
    /// Trim before profiling.
    pub trim: bool,
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub stage: Stage,
    pub stem: String,
    pub trimmed: Option<TrimOutputs>,
    pub profiled_reads: ReadPair,
    pub histogram: PathBuf,
    pub plot: PathBuf,
    pub stats: HistogramStats,
}

/// Runs the stages with one configuration and one tool runner.
#[derive(Debug)]
pub struct Pipeline<R> {
    config: PipelineConfig,
    runner: R,
}

impl<R: ToolRunner> Pipeline<R> {
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] if `config` does not validate.
    pub fn new(config: PipelineConfig, runner: R) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self { config, runner })
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs the pipeline to completion.
    ///
    /// khist is probed first, before any file is touched, so a missing
    /// BBMap install fails fast instead of after a long trim.
    ///
    /// # Errors
    ///
    /// Returns the first [`PipelineError`] raised by any stage.
    pub fn run(&self, request: &RunRequest) -> Result<RunSummary, PipelineError> {
        let mut stage = Stage::NotStarted;
        let layout = &request.layout;
        info!(stem = %layout.stem(), trim = request.trim, "Starting k-mer profile run");

        ensure_khist(&self.runner, &self.config.profile)?;
        request.reads.validate()?;
        if let Some(dir) = layout.out_dir() {
            std::fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;
        }

        let trimmed = if request.trim {
            let outputs = trim(&self.runner, &self.config, &request.reads, layout)?;
            advance(&mut stage, Stage::Trimmed);
            Some(outputs)
        } else {
            None
        };
        let reads = trimmed
            .as_ref()
            .map_or_else(|| request.reads.clone(), TrimOutputs::paired);

        let table_path = layout.khist_table();
        profile(&self.runner, &self.config, &reads, &table_path)?;
        advance(&mut stage, Stage::Profiled);

        let table = HistogramTable::load(&table_path)?;
        if table.is_empty() {
            warn!(table = ?table_path, "Histogram has no rows; plot will be empty");
        }
        let plot_path = layout.khist_plot();
        info!(plot = ?plot_path, "Drawing k-mer figure");
        plot::render(&table, &self.config.plot, &plot_path)?;
        advance(&mut stage, Stage::Rendered);

        let stats = histogram_stats(&table);
        info!(
            peak_depth = ?stats.peak_depth,
            genome_size = ?stats.genome_size_estimate,
            "Run complete"
        );

        Ok(RunSummary {
            stage,
            stem: layout.stem().to_string(),
            trimmed,
            profiled_reads: reads,
            histogram: table_path,
            plot: plot_path,
            stats,
        })
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug_assert!(next > *stage, "stages only move forward");
    info!(from = %stage, to = %next, "Stage complete");
    *stage = next;
}
