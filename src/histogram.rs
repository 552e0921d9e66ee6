//! K-mer depth histograms written by `khist.sh`.
//!
//! The file is tab-separated with a header row. Only the `#Depth` and
//! `Unique_Kmers` columns are used; others (such as `Raw_Count`) are ignored.
//!
//! # Example
//!
//! ```rust
//! use kmerpeak::histogram::{histogram_stats, HistogramTable};
//! use std::path::Path;
//!
//! let text = "#Depth\tRaw_Count\tUnique_Kmers\n1\t900\t900\n2\t60\t30\n3\t30\t10\n4\t80\t20\n5\t25\t5\n";
//! let table = HistogramTable::from_reader(text.as_bytes(), Path::new("s.khist.txt"))?;
//!
//! let stats = histogram_stats(&table);
//! // Depth 1 is the error peak; the coverage peak lies past the trough at depth 3.
//! assert_eq!(stats.peak_depth, Some(4));
//! # Ok::<(), kmerpeak::error::PipelineError>(())
//! ```

use crate::error::PipelineError;
use serde::Serialize;
use std::{fs::File, io::Read, path::Path};

/// Header of the read depth column.
pub const DEPTH_COLUMN: &str = "#Depth";
/// Header of the distinct k-mer count column.
pub const UNIQUE_KMERS_COLUMN: &str = "Unique_Kmers";

/// One histogram row: how many distinct k-mers occur `depth` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramRow {
    pub depth: u64,
    pub unique_kmers: u64,
}

/// Depth and unique k-mer columns of a khist file, sorted by depth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistogramTable {
    rows: Vec<HistogramRow>,
}

impl HistogramTable {
    #[must_use]
    pub fn new(mut rows: Vec<HistogramRow>) -> Self {
        rows.sort_by_key(|row| row.depth);
        Self { rows }
    }

    /// Loads a khist file.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::FileFormat`] if the file is missing, has no
    /// `#Depth` or `Unique_Kmers` column, or holds non-integer values there.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let file = File::open(path).map_err(|e| {
            PipelineError::file_format(path, format!("cannot open histogram: {e}"))
        })?;
        Self::from_reader(file, path)
    }

    /// Parses khist text from any reader. `path` is only used in errors.
    ///
    /// # Errors
    ///
    /// See [`HistogramTable::load`].
    pub fn from_reader<R: Read>(reader: R, path: &Path) -> Result<Self, PipelineError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| PipelineError::file_format(path, e.to_string()))?;
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| {
                    PipelineError::file_format(path, format!("missing column '{name}'"))
                })
        };
        let depth_idx = column(DEPTH_COLUMN)?;
        let unique_idx = column(UNIQUE_KMERS_COLUMN)?;

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| PipelineError::file_format(path, e.to_string()))?;
            // Header is line 1.
            let line = line + 2;
            let field = |idx: usize, name: &str| -> Result<u64, PipelineError> {
                let raw = record.get(idx).ok_or_else(|| {
                    PipelineError::file_format(path, format!("line {line}: no '{name}' value"))
                })?;
                raw.trim().parse().map_err(|_| {
                    PipelineError::file_format(
                        path,
                        format!("line {line}: '{raw}' is not a valid {name} value"),
                    )
                })
            };
            rows.push(HistogramRow {
                depth: field(depth_idx, DEPTH_COLUMN)?,
                unique_kmers: field(unique_idx, UNIQUE_KMERS_COLUMN)?,
            });
        }

        Ok(Self::new(rows))
    }

    #[must_use]
    pub fn rows(&self) -> &[HistogramRow] {
        &self.rows
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(depth, unique_kmers)` pairs for plotting.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.rows
            .iter()
            .map(|row| (row.depth as f64, row.unique_kmers as f64))
            .collect()
    }
}

/// Summary of a k-mer depth histogram.
///
/// - `total_kmers`: k-mer occurrences (Σ depth × unique)
/// - `distinct_kmers`: distinct k-mers (Σ unique)
/// - `peak_depth`: depth of the coverage peak past the error trough
/// - `genome_size_estimate`: k-mer occurrences past the error trough
///   divided by `peak_depth`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramStats {
    pub total_kmers: u64,
    pub distinct_kmers: u64,
    pub peak_depth: Option<u64>,
    pub peak_unique_kmers: u64,
    pub mean_depth: f64,
    pub genome_size_estimate: Option<u64>,
}

/// Computes summary statistics for a histogram.
///
/// Depth 0 is ignored. Rows up to the first local minimum belong to the
/// error peak and are skipped when looking for the coverage peak; without a
/// trough the highest row overall is taken.
#[must_use]
pub fn histogram_stats(table: &HistogramTable) -> HistogramStats {
    let rows: Vec<HistogramRow> = table
        .rows()
        .iter()
        .copied()
        .filter(|row| row.depth > 0)
        .collect();

    let distinct: u64 = rows
        .iter()
        .map(|r| r.unique_kmers)
        .fold(0, u64::saturating_add);
    let total: u64 = rows
        .iter()
        .map(|r| r.depth.saturating_mul(r.unique_kmers))
        .fold(0, u64::saturating_add);

    let trough = rows
        .windows(2)
        .position(|pair| pair[1].unique_kmers > pair[0].unique_kmers);
    let candidates = match trough {
        Some(idx) => &rows[idx + 1..],
        None => &rows[..],
    };
    // Error k-mers stay in `total_kmers` but not in the genome size.
    let genomic: u64 = candidates
        .iter()
        .map(|r| r.depth.saturating_mul(r.unique_kmers))
        .fold(0, u64::saturating_add);
    // Ties go to the lowest depth.
    let peak = candidates
        .iter()
        .rev()
        .max_by_key(|row| row.unique_kmers)
        .filter(|row| row.unique_kmers > 0);

    HistogramStats {
        total_kmers: total,
        distinct_kmers: distinct,
        peak_depth: peak.map(|row| row.depth),
        peak_unique_kmers: peak.map_or(0, |row| row.unique_kmers),
        #[allow(clippy::cast_precision_loss)]
        mean_depth: if distinct > 0 {
            total as f64 / distinct as f64
        } else {
            0.0
        },
        genome_size_estimate: peak.map(|row| {
            let depth = row.depth;
            genomic.saturating_add(depth / 2) / depth
        }),
    }
}
