//! Output formatting module

mod json;
mod text;

use miette::Result;

use crate::cli::OutputFormat;
use crate::commands::check::FileReport;

/// Prints the reports and returns true if any file is invalid.
pub fn output_reports(reports: &[FileReport], format: OutputFormat) -> Result<bool> {
    let has_invalid = reports.iter().any(|r| !r.valid);

    match format {
        OutputFormat::Json => json::output_json(reports)?,
        OutputFormat::Text => text::output_text(reports),
    }

    Ok(has_invalid)
}
