//! Check command implementation

use std::path::{Path, PathBuf};

use bbsift_parser::ParseResult;
use miette::Result;
use serde::Serialize;
use tracing::debug;

use super::{Context, read_input};
use crate::cli::OutputFormat;
use crate::output::output_reports;

/// Outcome of checking one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    pub valid: bool,
    pub errors: Vec<String>,
}

impl FileReport {
    pub fn new(path: &Path, result: &ParseResult) -> Self {
        Self {
            path: path.display().to_string(),
            valid: result.is_valid(),
            errors: result.document.errors().map(str::to_string).collect(),
        }
    }
}

/// Returns true if any file is invalid.
pub fn run_check(ctx: &Context, files: &[PathBuf], format: OutputFormat) -> Result<bool> {
    let parser = ctx.parser();
    let mut reports = Vec::with_capacity(files.len());

    for path in files {
        let content = read_input(path)?;
        let result = parser.parse(&content);
        debug!(
            "Checked {}: {} errors",
            path.display(),
            result.document.error_log().len()
        );
        reports.push(FileReport::new(path, &result));
    }

    output_reports(&reports, format)
}
