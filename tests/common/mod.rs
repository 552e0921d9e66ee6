//! Shared helpers: a scripted stand-in for trimmomatic and khist.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use kmerpeak::{
    error::ExitStatusCode,
    runner::{ToolOutput, ToolRunner},
};
use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

pub const KHIST: &str = "khist.sh";
pub const TRIMMOMATIC: &str = "trimmomatic";

pub const FASTQ_RECORD: &str = "@read1\nACGTACGTAC\n+\nIIIIIIIIII\n";

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Writes a one-record FASTQ file and returns its path.
pub fn write_fastq(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, FASTQ_RECORD).expect("Failed to write FASTQ");
    path
}

/// Records every call and imitates the tools' file outputs.
#[derive(Default)]
pub struct FakeRunner {
    pub calls: RefCell<Vec<(String, Vec<String>)>>,
    missing: HashSet<String>,
    exit_codes: HashMap<String, i32>,
    histogram: Option<String>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            histogram: Some(std::fs::read_to_string(fixture_path("sample.khist.txt")).unwrap()),
            ..Self::default()
        }
    }

    /// Pretends `tool` is not installed.
    pub fn without(mut self, tool: &str) -> Self {
        self.missing.insert(tool.to_string());
        self
    }

    /// Makes real (non-probe) runs of `tool` exit with `code`.
    pub fn failing(mut self, tool: &str, code: i32) -> Self {
        self.exit_codes.insert(tool.to_string(), code);
        self
    }

    /// khist writes `text` instead of the fixture histogram.
    pub fn with_histogram(mut self, text: &str) -> Self {
        self.histogram = Some(text.to_string());
        self
    }

    pub fn calls_to(&self, tool: &str) -> Vec<Vec<String>> {
        self.calls
            .borrow()
            .iter()
            .filter(|(program, _)| program == tool)
            .map(|(_, args)| args.clone())
            .collect()
    }

    /// Calls other than `-version` probes.
    pub fn runs_of(&self, tool: &str) -> Vec<Vec<String>> {
        self.calls_to(tool)
            .into_iter()
            .filter(|args| args.as_slice() != ["-version"])
            .collect()
    }

    fn imitate(&self, program: &str, args: &[String]) {
        if program == KHIST {
            let table = args
                .iter()
                .find_map(|a| a.strip_prefix("khist="))
                .expect("khist called without khist=");
            std::fs::write(table, self.histogram.as_deref().unwrap_or_default()).unwrap();
        } else if program == TRIMMOMATIC {
            // PE -threads N fwd rev fP fU rP rU ...
            for out in &args[5..9] {
                std::fs::write(out, FASTQ_RECORD).unwrap();
            }
        }
    }
}

impl ToolRunner for FakeRunner {
    fn execute(&self, program: &str, args: &[String]) -> io::Result<ToolOutput> {
        self.calls
            .borrow_mut()
            .push((program.to_string(), args.to_vec()));

        if self.missing.contains(program) {
            return Err(io::Error::from(ErrorKind::NotFound));
        }
        let probe = args == ["-version"];
        let code = match self.exit_codes.get(program) {
            Some(&code) if !probe => code,
            _ => 0,
        };
        if code == 0 && !probe {
            self.imitate(program, args);
        }
        Ok(ToolOutput {
            status: ExitStatusCode::Code(code),
            stdout: Vec::new(),
            stderr: if code == 0 {
                Vec::new()
            } else {
                format!("{program} failed on purpose").into_bytes()
            },
        })
    }
}
