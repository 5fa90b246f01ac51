//! Implementation of the `nugetcfg show` command.
//!
//! Displays the sources and package source mappings of a config file.

use super::load_document;
use crate::cli::ShowArgs;
use crate::config::Settings;
use crate::error::{NugetError, Result};
use crate::model::ConfigModel;

/// Execute the `nugetcfg show` command.
pub fn cmd_show(args: ShowArgs, _settings: &Settings) -> Result<()> {
    // The preservation payload is a copy of the file; leave it out of the output.
    let loaded = load_document(&args.file, false)?;

    if args.json {
        let json = serde_json::to_string_pretty(&loaded.model)
            .map_err(|e| NugetError::IoError(format!("failed to serialize model: {}", e)))?;
        println!("{}", json);
    } else {
        print!("{}", render(&loaded.model));
    }
    Ok(())
}

fn render(model: &ConfigModel) -> String {
    let mut out = String::new();

    out.push_str(&format!("Sources ({}):\n", model.sources.len()));
    if model.sources.is_empty() {
        out.push_str("  (none)\n");
    }
    let width = model.sources.iter().map(|s| s.key.len()).max().unwrap_or(0);
    for source in &model.sources {
        let marker = if source.enabled { "x" } else { " " };
        out.push_str(&format!(
            "  [{}] {:<width$}  {}\n",
            marker,
            source.key,
            source.url,
            width = width
        ));
    }

    if !model.mappings.is_empty() {
        out.push('\n');
        out.push_str("Mappings:\n");
        for mapping in &model.mappings {
            out.push_str(&format!(
                "  {}: {}\n",
                mapping.source_key,
                mapping.patterns.join(", ")
            ));
        }
    }

    out
}
