//! Command implementations for nugetcfg.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the document loading shared by all of them.

mod apply;
mod edit;
mod fmt;
mod global;
mod list;
mod serve;
mod show;
mod validate_cmd;

use crate::cli::Command;
use crate::config::Settings;
use crate::error::{NugetError, Result};
use crate::model::ConfigModel;
use crate::parser::parse_config;
use std::path::Path;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command, settings: &Settings) -> Result<()> {
    match command {
        Command::Show(args) => show::cmd_show(args, settings),
        Command::Validate(args) => validate_cmd::cmd_validate(args, settings),
        Command::Add(args) => edit::cmd_add(args, settings),
        Command::Remove(args) => edit::cmd_remove(args, settings),
        Command::Enable(args) => edit::cmd_toggle(args, true, settings),
        Command::Disable(args) => edit::cmd_toggle(args, false, settings),
        Command::Update(args) => edit::cmd_update(args, settings),
        Command::Map(args) => edit::cmd_map(args, settings),
        Command::Reorder(args) => edit::cmd_reorder(args, settings),
        Command::Apply(args) => apply::cmd_apply(args, settings),
        Command::Fmt(args) => fmt::cmd_fmt(args, settings),
        Command::List(args) => list::cmd_list(args, settings),
        Command::Global => global::cmd_global(),
        Command::Serve(args) => serve::cmd_serve(args, settings),
    }
}

/// A config file read from disk together with its parsed model.
pub(crate) struct LoadedDocument {
    pub text: String,
    pub model: ConfigModel,
}

/// Read and parse a config file.
pub(crate) fn load_document(path: &Path, preserve_unknown: bool) -> Result<LoadedDocument> {
    let text = read_text(path)?;
    let model = parse_config(&text, preserve_unknown)?;
    tracing::debug!(
        path = %path.display(),
        sources = model.sources.len(),
        mappings = model.mappings.len(),
        "parsed nuget.config"
    );
    Ok(LoadedDocument { text, model })
}

pub(crate) fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        NugetError::UserError(format!(
            "cannot read '{}': {}\n\nCheck the path and try again.",
            path.display(),
            e
        ))
    })
}

pub(crate) fn current_dir() -> Result<std::path::PathBuf> {
    std::env::current_dir()
        .map_err(|e| NugetError::IoError(format!("cannot determine current directory: {}", e)))
}
