//! Implementation of the `nugetcfg list` command.
//!
//! Lists the nuget.config files under a workspace root with a one-line
//! summary each, followed by the user-level config when enabled.

use super::current_dir;
use crate::cli::ListArgs;
use crate::config::Settings;
use crate::discovery::{find_global_config, find_workspace_configs, summarize};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// One listed config file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Listing {
    path: PathBuf,
    summary: String,
    global: bool,
}

/// Execute the `nugetcfg list` command.
pub fn cmd_list(args: ListArgs, settings: &Settings) -> Result<()> {
    let root = match args.root {
        Some(root) => root,
        None => current_dir()?,
    };

    let global = if settings.show_global_config {
        find_global_config()
    } else {
        None
    };

    let listings = collect(&root, args.limit, global.as_deref())?;
    if listings.is_empty() {
        println!("No nuget.config files found under {}", root.display());
        return Ok(());
    }

    let width = listings
        .iter()
        .map(|l| l.path.display().to_string().len())
        .max()
        .unwrap_or(0);
    for listing in &listings {
        let label = if listing.global { "  (global)" } else { "" };
        println!(
            "{:<width$}  {}{}",
            listing.path.display().to_string(),
            listing.summary,
            label,
            width = width
        );
    }
    Ok(())
}

fn collect(root: &Path, limit: usize, global: Option<&Path>) -> Result<Vec<Listing>> {
    let mut listings: Vec<Listing> = find_workspace_configs(root, limit)?
        .into_iter()
        .map(|path| Listing {
            summary: summarize(&path),
            path,
            global: false,
        })
        .collect();

    if let Some(global) = global
        && !listings.iter().any(|l| l.path == global)
    {
        listings.push(Listing {
            path: global.to_path_buf(),
            summary: summarize(global),
            global: true,
        });
    }
    Ok(listings)
}
