//! Text output formatter

use crate::commands::check::FileReport;

pub fn output_text(reports: &[FileReport]) {
    for report in reports {
        for error in &report.errors {
            println!("{}: {}", report.path, error);
        }
    }

    let invalid = reports.iter().filter(|r| !r.valid).count();
    let total_errors: usize = reports.iter().map(|r| r.errors.len()).sum();

    println!();
    println!(
        "Checked {} files ({} invalid), found {} errors",
        reports.len(),
        invalid,
        total_errors
    );
}
