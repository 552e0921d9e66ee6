//! # kmerpeak
//!
//! Draws k-mer depth profiles of paired-end sequencing runs.
//!
//! The work is done by two external tools: Trimmomatic trims the reads
//! (optional) and BBMap's `khist.sh` counts 31-mers into a depth histogram.
//! This crate builds their command lines, checks that they and their inputs
//! exist, then plots the histogram and summarises its coverage peak.
//!
//! ## Example
//!
//! ```rust,no_run
//! use kmerpeak::{
//!     config::PipelineConfig,
//!     pipeline::{Pipeline, RunRequest},
//!     reads::ReadPair,
//!     runner::SystemRunner,
//!     stem::{OutputLayout, Stem},
//! };
//!
//! let pipeline = Pipeline::new(PipelineConfig::default(), SystemRunner)?;
//! let summary = pipeline.run(&RunRequest {
//!     reads: ReadPair::new("sample_405_R1.fastq.gz", "sample_405_R2.fastq.gz"),
//!     layout: OutputLayout::new(Stem::new("sample_405")?, None),
//!     trim: true,
//! })?;
//! println!("plot written to {}", summary.plot.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod histogram;
pub mod pipeline;
pub mod plot;
pub mod profile;
pub mod reads;
pub mod runner;
pub mod stem;
pub mod trim;
