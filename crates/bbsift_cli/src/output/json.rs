//! JSON output formatter

use miette::{IntoDiagnostic, Result};

use crate::commands::check::FileReport;

pub fn output_json(reports: &[FileReport]) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(reports).into_diagnostic()?
    );
    Ok(())
}
