//! Sample stems and the output file names derived from them.
//!
//! # Example
//!
//! ```rust
//! use kmerpeak::stem::{OutputLayout, Stem};
//! use std::path::{Path, PathBuf};
//!
//! let stem = Stem::from_forward_reads(Path::new("sample_405_R1.fastq.gz"))?;
//! assert_eq!(stem.as_str(), "sample_405");
//!
//! let layout = OutputLayout::new(stem, None);
//! assert_eq!(layout.khist_table(), PathBuf::from("sample_405.khist.txt"));
//! assert_eq!(layout.khist_plot(), PathBuf::from("sample_405.khist.png"));
//! # Ok::<(), kmerpeak::error::StemError>(())
//! ```

use crate::error::StemError;
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// FASTQ extensions recognised when deriving names, longest first.
const FASTQ_EXTENSIONS: [&str; 4] = [".fastq.gz", ".fq.gz", ".fastq", ".fq"];

/// Read identifiers that terminate a sample name, with and without the
/// Illumina `_001` chunk number.
const READ_IDENTIFIERS: [&str; 8] = [
    "_R1_001", "_R2_001", "_1_001", "_2_001", "_R1", "_R2", "_1", "_2",
];

/// A validated sample identifier shared by all output files of a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Stem(String);

impl Stem {
    /// Validates a user-supplied stem.
    ///
    /// # Errors
    ///
    /// Returns [`StemError`] if the stem is empty or could not be used as a
    /// single file name component.
    pub fn new(stem: impl Into<String>) -> Result<Self, StemError> {
        let stem = stem.into();
        if stem.is_empty() {
            return Err(StemError::Empty);
        }
        if stem == "."
            || stem == ".."
            || stem.contains(['/', '\\', '\0'])
            || stem.chars().any(char::is_control)
        {
            return Err(StemError::NotFilesystemSafe(stem));
        }
        Ok(Self(stem))
    }

    /// Derives a stem from the forward read file name.
    ///
    /// The FASTQ extension is dropped, then a trailing read identifier
    /// (`_R1`, `_1`, `_R1_001`, ...). When no read identifier is present the
    /// name is split on its first underscore instead.
    ///
    /// # Errors
    ///
    /// Returns [`StemError::Underivable`] if the path has no usable file name.
    pub fn from_forward_reads(path: &Path) -> Result<Self, StemError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StemError::Underivable(path.to_path_buf()))?;

        let base = strip_fastq_extension(name);
        let stem = match strip_read_identifier(base) {
            Some(sample) => sample,
            None => base.split('_').next().unwrap_or(base),
        };

        Self::new(stem).map_err(|_| StemError::Underivable(path.to_path_buf()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Drops a recognised FASTQ extension, if any.
#[must_use]
pub fn strip_fastq_extension(name: &str) -> &str {
    FASTQ_EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .unwrap_or(name)
}

/// Drops a trailing read identifier, returning `None` if there is none or if
/// nothing would remain.
#[must_use]
pub fn strip_read_identifier(base: &str) -> Option<&str> {
    READ_IDENTIFIERS
        .iter()
        .find_map(|id| base.strip_suffix(id))
        .filter(|sample| !sample.is_empty())
}

/// Where the files of one run are written.
///
/// Without an output directory the names are bare relative file names, so
/// the tools write into the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    stem: Stem,
    out_dir: Option<PathBuf>,
}

impl OutputLayout {
    #[must_use]
    pub fn new(stem: Stem, out_dir: Option<PathBuf>) -> Self {
        Self { stem, out_dir }
    }

    #[must_use]
    pub fn stem(&self) -> &Stem {
        &self.stem
    }

    #[must_use]
    pub fn out_dir(&self) -> Option<&Path> {
        self.out_dir.as_deref()
    }

    /// Places `name` in the output directory.
    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        match &self.out_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    /// `<stem>.khist.txt`
    #[must_use]
    pub fn khist_table(&self) -> PathBuf {
        self.path(&format!("{}.khist.txt", self.stem))
    }

    /// `<stem>.khist.png`
    #[must_use]
    pub fn khist_plot(&self) -> PathBuf {
        self.path(&format!("{}.khist.png", self.stem))
    }
}
