//! Scan artifacts: the annotated page plus a JSON report, written atomically.
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;

const MAX_STEM_CHARS: usize = 80;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialise scan report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), OutputError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| OutputError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(OutputError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| OutputError::OutputDir(e.to_string()))?;
    }
    NamedTempFile::new_in(dir).map_err(|e| OutputError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Writes `{dir}/{filename}` through a temp file and a rename.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, OutputError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| OutputError::Io(e.error))?;
        Ok(target)
    }
}

/// Summary of one page annotation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanRecord {
    pub source: String,
    pub page_kind: String,
    pub page_url: Option<String>,
    pub encoding: Option<String>,
    pub scanned_utc: String,
    pub scans: u64,
    pub annotated: usize,
    pub skipped: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutput {
    pub html_path: PathBuf,
    pub report_path: PathBuf,
}

pub fn write_scan_output(
    dir: &Path,
    stem: &str,
    annotated_html: &str,
    record: &ScanRecord,
) -> Result<ScanOutput, OutputError> {
    let stem = sanitize_stem(stem);
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let report = serde_json::to_string_pretty(record)?;
    let html_path = writer.write(&format!("{stem}.annotated.html"), annotated_html)?;
    let report_path = writer.write(&format!("{stem}.scan.json"), &report)?;
    Ok(ScanOutput {
        html_path,
        report_path,
    })
}

/// Filesystem-safe file stem derived from an input path or title.
pub fn sanitize_stem(input: &str) -> String {
    let mut compacted = String::with_capacity(input.len());
    let mut prev_underscore = false;
    for c in input.chars().take(MAX_STEM_CHARS) {
        let c = if is_forbidden(c) { '_' } else { c };
        if c == '_' && prev_underscore {
            continue;
        }
        prev_underscore = c == '_';
        compacted.push(c);
    }
    let cleaned = compacted.trim_matches(&['_', ' ', '.'][..]);
    if cleaned.is_empty() {
        "page".to_string()
    } else {
        cleaned.to_string()
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}
