//! Implementation of the `nugetcfg validate` command.
//!
//! Parses a config file and reports every validation issue. Warnings are
//! printed but do not change the exit code; any error-level issue exits 2.

use super::load_document;
use crate::cli::FileArgs;
use crate::config::Settings;
use crate::error::{NugetError, Result};
use crate::model::ValidationIssue;
use crate::validate::{format_issues, has_errors, validate};
use std::path::Path;

/// Execute the `nugetcfg validate` command.
pub fn cmd_validate(args: FileArgs, _settings: &Settings) -> Result<()> {
    let issues = check(&args.file)?;

    if issues.is_empty() {
        println!("{}: no issues found", args.file.display());
        return Ok(());
    }

    print!("{}", format_issues(&issues));

    if has_errors(&issues) {
        let count = issues.iter().filter(|i| i.is_error()).count();
        return Err(NugetError::ValidationError(format!(
            "{} error(s) in '{}'",
            count,
            args.file.display()
        )));
    }
    Ok(())
}

fn check(path: &Path) -> Result<Vec<ValidationIssue>> {
    let loaded = load_document(path, false)?;
    Ok(validate(&loaded.model))
}
