//! Error types for kmerpeak.
//!
//! Every stage of the pipeline returns [`PipelineError`]; nothing is retried
//! and the first error aborts the run.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while trimming, profiling or plotting.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A fixed input (adapter file, stem, config value) is unusable.
    #[error("configuration error: {details}")]
    Configuration { details: String },

    /// An external executable could not be found.
    #[error("could not find `{tool}` on the path: {hint}")]
    ToolNotFound { tool: String, hint: String },

    /// An external executable ran but exited unsuccessfully.
    #[error("`{tool}` exited with {status}:\n{stderr}")]
    ExternalTool {
        tool: String,
        status: ExitStatusCode,
        stderr: String,
    },

    /// A file produced or consumed by the pipeline is malformed.
    #[error("malformed file '{path}': {details}")]
    FileFormat { path: PathBuf, details: String },

    /// Failed to read or write a file.
    #[error("I/O error on '{path}': {source}")]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// The plot could not be drawn or encoded.
    #[error("failed to render plot '{path}': {details}")]
    Plot { path: PathBuf, details: String },
}

impl PipelineError {
    pub(crate) fn configuration(details: impl Into<String>) -> Self {
        Self::Configuration {
            details: details.into(),
        }
    }

    pub(crate) fn file_format(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        Self::FileFormat {
            path: path.into(),
            details: details.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}

/// Exit status of an external tool.
///
/// A process killed by a signal has no exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatusCode {
    Code(i32),
    Signal,
}

impl std::fmt::Display for ExitStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Code(code) => write!(f, "exit code {code}"),
            Self::Signal => write!(f, "no exit code (terminated by signal)"),
        }
    }
}

/// Error for an unusable sample stem.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StemError {
    #[error("stem is empty")]
    Empty,

    #[error("stem '{0}' is not a valid file name component")]
    NotFilesystemSafe(String),

    #[error("cannot derive a stem from '{0}'")]
    Underivable(PathBuf),
}

impl From<StemError> for PipelineError {
    fn from(err: StemError) -> Self {
        PipelineError::configuration(err.to_string())
    }
}
