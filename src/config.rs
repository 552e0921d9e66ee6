//! Run configuration.
//!
//! Every path and constant the pipeline relies on lives here with its
//! default. A JSON file may supply any subset of the fields; command-line
//! flags are applied on top and the result is validated once.
//!
//! ```rust
//! use kmerpeak::config::PipelineConfig;
//!
//! let config: PipelineConfig = serde_json::from_str(r#"{"threads": 4, "profile": {"kmer_size": 25}}"#)?;
//! assert_eq!(config.threads, 4);
//! assert_eq!(config.profile.kmer_size, 25);
//! assert_eq!(config.trim.min_length, 50);
//! # Ok::<(), serde_json::Error>(())
//! ```

use crate::{error::PipelineError, plot::AxisBounds, trim::TrimNaming};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Adapter FASTA shipped with Trimmomatic 0.36 on the cluster image.
pub const DEFAULT_ADAPTERS: &str = "/apps/trimmomatic/0.36/adapters/TruSeq3-PE-2.fa";

/// Largest image edge accepted, in pixels.
const MAX_IMAGE_EDGE: f64 = 20_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Threads handed to both external tools.
    pub threads: usize,
    pub trim: TrimSettings,
    pub profile: ProfileSettings,
    pub plot: PlotSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threads: 16,
            trim: TrimSettings::default(),
            profile: ProfileSettings::default(),
            plot: PlotSettings::default(),
        }
    }
}

/// Trimmomatic invocation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrimSettings {
    pub executable: String,
    /// Adapter FASTA for `ILLUMINACLIP`.
    pub adapters: PathBuf,
    pub seed_mismatches: u32,
    pub palindrome_clip_threshold: u32,
    pub simple_clip_threshold: u32,
    pub leading_quality: u32,
    pub trailing_quality: u32,
    pub window_size: u32,
    pub window_quality: u32,
    pub min_length: u32,
    pub naming: TrimNaming,
}

impl Default for TrimSettings {
    fn default() -> Self {
        Self {
            executable: "trimmomatic".to_string(),
            adapters: PathBuf::from(DEFAULT_ADAPTERS),
            seed_mismatches: 2,
            palindrome_clip_threshold: 30,
            simple_clip_threshold: 10,
            leading_quality: 3,
            trailing_quality: 3,
            window_size: 4,
            window_quality: 20,
            min_length: 50,
            naming: TrimNaming::default(),
        }
    }
}

/// khist invocation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileSettings {
    pub executable: String,
    pub kmer_size: usize,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            executable: "khist.sh".to_string(),
            kmer_size: 31,
        }
    }
}

/// Plot canvas and axis ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotSettings {
    pub bounds: AxisBounds,
    pub dpi: u32,
    pub width_inches: f64,
    pub height_inches: f64,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            bounds: AxisBounds::DEFAULT,
            dpi: 300,
            width_inches: 6.4,
            height_inches: 4.8,
        }
    }
}

impl PlotSettings {
    /// Canvas size in pixels at the configured resolution.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        (
            (self.width_inches * dpi).round() as u32,
            (self.height_inches * dpi).round() as u32,
        )
    }
}

impl PipelineConfig {
    /// Reads a JSON configuration file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Io`] if the file cannot be read and
    /// [`PipelineError::Configuration`] if it is not a valid configuration.
    pub fn from_json_file(path: &Path) -> Result<Self, PipelineError> {
        let text = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| {
            PipelineError::configuration(format!("invalid config file '{}': {e}", path.display()))
        })
    }

    /// Checks the values that the tools or the renderer would reject.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] naming the first bad field.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.threads == 0 {
            return Err(PipelineError::configuration("threads must be at least 1"));
        }
        if self.profile.kmer_size == 0 {
            return Err(PipelineError::configuration(
                "k-mer size must be at least 1",
            ));
        }
        if self.trim.executable.is_empty() || self.profile.executable.is_empty() {
            return Err(PipelineError::configuration(
                "tool executables must not be empty",
            ));
        }
        self.plot.bounds.validate()?;

        let plot = &self.plot;
        if plot.dpi == 0 {
            return Err(PipelineError::configuration("dpi must be at least 1"));
        }
        let edges = [plot.width_inches, plot.height_inches];
        if edges.iter().any(|inches| !(inches.is_finite() && *inches > 0.0)) {
            return Err(PipelineError::configuration(
                "plot width and height must be positive",
            ));
        }
        if edges
            .iter()
            .any(|inches| inches * f64::from(plot.dpi) > MAX_IMAGE_EDGE)
        {
            return Err(PipelineError::configuration(format!(
                "plot would exceed {MAX_IMAGE_EDGE} pixels per edge"
            )));
        }
        let (width, height) = plot.pixel_size();
        if width == 0 || height == 0 {
            return Err(PipelineError::configuration("plot is smaller than one pixel"));
        }
        Ok(())
    }
}
