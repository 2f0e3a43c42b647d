//! Tree command implementation

use std::path::Path;

use miette::{IntoDiagnostic, Result};

use super::{Context, read_input};

/// Prints the document of `path` as JSON. Returns true if it is invalid.
pub fn run_tree(ctx: &Context, path: &Path) -> Result<bool> {
    let content = read_input(path)?;
    let result = ctx.parser().parse(&content);

    println!(
        "{}",
        serde_json::to_string_pretty(&result.document).into_diagnostic()?
    );
    Ok(!result.is_valid())
}
