//! Implementation of the `nugetcfg fmt` command.
//!
//! Rewrites a config file from its model alone. Comments and anything
//! outside the package source sections are dropped, so this is opt-in.

use super::load_document;
use crate::cli::FmtArgs;
use crate::config::Settings;
use crate::error::{NugetError, Result};
use crate::fs::atomic_write_file;
use crate::serialize::serialize_config;
use std::path::Path;

/// Execute the `nugetcfg fmt` command.
pub fn cmd_fmt(args: FmtArgs, settings: &Settings) -> Result<()> {
    let (original, canonical) = canonical_text(&args.file, settings)?;

    if original == canonical {
        println!("{} is already formatted", args.file.display());
        return Ok(());
    }

    if args.check {
        return Err(NugetError::UserError(format!(
            "'{}' is not in canonical form.\n\nRun `nugetcfg fmt {}` to rewrite it.",
            args.file.display(),
            args.file.display()
        )));
    }

    atomic_write_file(&args.file, &canonical)?;
    tracing::info!(path = %args.file.display(), "nuget.config formatted");
    println!("Formatted {}", args.file.display());
    Ok(())
}

fn canonical_text(path: &Path, settings: &Settings) -> Result<(String, String)> {
    let loaded = load_document(path, false)?;
    let line_ending = settings.line_ending.resolve(&loaded.text);
    let canonical = serialize_config(&loaded.model, false, line_ending);
    Ok((loaded.text, canonical))
}
