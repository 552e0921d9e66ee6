//! Paired-end read files.

use crate::error::PipelineError;
use flate2::read::MultiGzDecoder;
use serde::Serialize;
use std::{
    fs::File,
    io::{BufRead, BufReader, ErrorKind, Read},
    path::{Path, PathBuf},
};

/// Forward and reverse FASTQ files of one sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadPair {
    pub forward: PathBuf,
    pub reverse: PathBuf,
}

impl ReadPair {
    #[must_use]
    pub fn new(forward: impl Into<PathBuf>, reverse: impl Into<PathBuf>) -> Self {
        Self {
            forward: forward.into(),
            reverse: reverse.into(),
        }
    }

    /// Checks that both files exist and start like FASTQ.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Io`] if a file cannot be opened and
    /// [`PipelineError::FileFormat`] if it does not begin with a `@` record
    /// or a `.gz` file is not gzip data.
    pub fn validate(&self) -> Result<(), PipelineError> {
        check_fastq(&self.forward)?;
        check_fastq(&self.reverse)
    }
}

/// Peeks at the first non-whitespace byte, decompressing `.gz` files.
fn check_fastq(path: &Path) -> Result<(), PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };
    let mut reader = BufReader::new(reader);

    loop {
        let buf = reader.fill_buf().map_err(|e| match e.kind() {
            ErrorKind::InvalidInput | ErrorKind::InvalidData => {
                PipelineError::file_format(path, format!("not a valid gzip file: {e}"))
            }
            _ => PipelineError::io(path, e),
        })?;
        if buf.is_empty() {
            return Err(PipelineError::file_format(path, "file is empty"));
        }
        let skip = buf.iter().take_while(|b| b.is_ascii_whitespace()).count();
        if skip < buf.len() {
            return match buf[skip] {
                b'@' => Ok(()),
                other => Err(PipelineError::file_format(
                    path,
                    format!(
                        "expected a FASTQ record starting with '@', found {:?}",
                        other as char
                    ),
                )),
            };
        }
        reader.consume(skip);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;
    use tempfile::TempDir;

    const RECORD: &[u8] = b"@r1\nACGT\n+\nIIII\n";

    fn write(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn write_gz(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::fast());
        encoder.write_all(content).unwrap();
        encoder.finish().unwrap();
        path
    }

    #[test]
    fn accepts_plain_and_gzipped_fastq() {
        let dir = TempDir::new().unwrap();
        let pair = ReadPair::new(
            write(&dir, "s_R1.fastq", RECORD),
            write_gz(&dir, "s_R2.fastq.gz", RECORD),
        );
        pair.validate().unwrap();
    }

    #[test]
    fn skips_leading_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "s.fq", b"\n\n@r1\nA\n+\nI\n");
        check_fastq(&path).unwrap();
    }

    #[test]
    fn plain_text_with_gz_name_is_file_format_error() {
        let dir = TempDir::new().unwrap();
        let pair = ReadPair::new(
            write(&dir, "a_R1.fastq.gz", RECORD),
            write_gz(&dir, "a_R2.fastq.gz", RECORD),
        );
        let err = pair.validate().unwrap_err();
        assert!(matches!(err, PipelineError::FileFormat { .. }));
        assert!(err.to_string().contains("not a valid gzip file"));
    }

    #[test]
    fn rejects_fasta() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "s.fq", b">seq\nACGT\n");
        let err = check_fastq(&path).unwrap_err();
        assert!(matches!(err, PipelineError::FileFormat { .. }));
    }

    #[test]
    fn rejects_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = write_gz(&dir, "s.fq.gz", b"");
        let err = check_fastq(&path).unwrap_err();
        assert!(err.to_string().contains("file is empty"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let pair = ReadPair::new("/nonexistent/a.fq", "/nonexistent/b.fq");
        assert!(matches!(pair.validate(), Err(PipelineError::Io { .. })));
    }
}
