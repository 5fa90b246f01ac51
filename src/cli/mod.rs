//! CLI argument parsing for nugetcfg.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// nugetcfg: inspect and edit nuget.config files without losing formatting.
///
/// Edits touch only the package source sections. Comments, `<clear/>`,
/// unknown attributes and unrelated sections are preserved.
#[derive(Parser, Debug)]
#[command(name = "nugetcfg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file (defaults to nugetcfg.yaml in the current directory).
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for nugetcfg.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show sources and mappings of a config file.
    Show(ShowArgs),

    /// Validate a config file.
    ///
    /// Exits with code 2 when any error-level issue is found.
    Validate(FileArgs),

    /// Add a package source.
    Add(AddArgs),

    /// Remove a package source and its mappings.
    #[command(alias = "rm")]
    Remove(KeyArgs),

    /// Enable a package source.
    Enable(KeyArgs),

    /// Disable a package source.
    Disable(KeyArgs),

    /// Rename a source or change its URL.
    Update(UpdateArgs),

    /// Set the package patterns routed to a source.
    ///
    /// Giving no patterns clears the list.
    Map(MapArgs),

    /// Reorder sources. Keys not listed keep their relative order at the end.
    Reorder(ReorderArgs),

    /// Apply a JSON array of edit ops from a file or stdin (`-`).
    Apply(ApplyArgs),

    /// Rewrite a config file in canonical form.
    Fmt(FmtArgs),

    /// List nuget.config files under a workspace root.
    List(ListArgs),

    /// Print the path of the user-level config.
    Global,

    /// Run the editor protocol over stdin/stdout.
    ///
    /// Each input line is a JSON message with a `document` path; each reply
    /// line carries the same `document`.
    Serve(ServeArgs),
}

/// Flags shared by commands that write the config file.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct WriteArgs {
    /// Write even when validation reports errors.
    #[arg(long)]
    pub force: bool,

    /// Print the resulting XML instead of writing it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for commands that only need a config file.
#[derive(Args, Debug)]
pub struct FileArgs {
    /// Path to the nuget.config file.
    pub file: PathBuf,
}

/// Arguments for the `show` command.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Path to the nuget.config file.
    pub file: PathBuf,

    /// Print the model as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `add` command.
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Path to the nuget.config file.
    pub file: PathBuf,

    /// Key of the new source.
    pub key: String,

    /// Feed URL or local path.
    pub url: String,

    #[command(flatten)]
    pub write: WriteArgs,
}

/// Arguments for commands addressing a single source.
#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Path to the nuget.config file.
    pub file: PathBuf,

    /// Source key.
    pub key: String,

    #[command(flatten)]
    pub write: WriteArgs,
}

/// Arguments for the `update` command.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Path to the nuget.config file.
    pub file: PathBuf,

    /// Current source key.
    pub key: String,

    /// New key; mappings follow the rename.
    #[arg(long)]
    pub new_key: Option<String>,

    /// New URL.
    #[arg(long)]
    pub url: Option<String>,

    #[command(flatten)]
    pub write: WriteArgs,
}

/// Arguments for the `map` command.
#[derive(Args, Debug)]
pub struct MapArgs {
    /// Path to the nuget.config file.
    pub file: PathBuf,

    /// Source key.
    pub key: String,

    /// Package id patterns such as `Contoso.*`.
    pub patterns: Vec<String>,

    #[command(flatten)]
    pub write: WriteArgs,
}

/// Arguments for the `reorder` command.
#[derive(Args, Debug)]
pub struct ReorderArgs {
    /// Path to the nuget.config file.
    pub file: PathBuf,

    /// Source keys in the desired order.
    #[arg(required = true)]
    pub keys: Vec<String>,

    #[command(flatten)]
    pub write: WriteArgs,
}

/// Arguments for the `apply` command.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Path to the nuget.config file.
    pub file: PathBuf,

    /// JSON file holding the ops, or `-` for stdin.
    pub ops: String,

    #[command(flatten)]
    pub write: WriteArgs,
}

/// Arguments for the `fmt` command.
#[derive(Args, Debug)]
pub struct FmtArgs {
    /// Path to the nuget.config file.
    pub file: PathBuf,

    /// Exit with code 1 if the file is not already canonical.
    #[arg(long)]
    pub check: bool,
}

/// Arguments for the `list` command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Workspace root to search (defaults to the current directory).
    pub root: Option<PathBuf>,

    /// Maximum number of files to list.
    #[arg(long, default_value_t = crate::discovery::DEFAULT_LIMIT)]
    pub limit: usize,
}

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Confirm every delete request without asking.
    #[arg(short, long)]
    pub yes: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
