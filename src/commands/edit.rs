//! Implementation of the source editing commands.
//!
//! `add`, `remove`, `enable`, `disable`, `update`, `map` and `reorder` each
//! build edit ops and hand them to [`run_edit`], which applies, validates and
//! writes them.

use super::load_document;
use crate::cli::{AddArgs, KeyArgs, MapArgs, ReorderArgs, UpdateArgs, WriteArgs};
use crate::config::Settings;
use crate::edit::{EditOp, apply_edit_ops};
use crate::error::{NugetError, Result};
use crate::fs::atomic_write_file;
use crate::journal::{self, JournalAction};
use crate::serialize::serialize_config;
use crate::validate::{format_issues, has_errors, validate};
use serde_json::json;
use std::path::Path;

pub fn cmd_add(args: AddArgs, settings: &Settings) -> Result<()> {
    let op = EditOp::AddSource {
        key: args.key.trim().to_string(),
        url: args.url.trim().to_string(),
    };
    run_edit(&args.file, &[op], args.write, settings)
}

pub fn cmd_remove(args: KeyArgs, settings: &Settings) -> Result<()> {
    let op = EditOp::DeleteSource { key: args.key };
    run_edit(&args.file, &[op], args.write, settings)
}

pub fn cmd_toggle(args: KeyArgs, enabled: bool, settings: &Settings) -> Result<()> {
    let op = EditOp::ToggleSource {
        key: args.key,
        enabled,
    };
    run_edit(&args.file, &[op], args.write, settings)
}

pub fn cmd_update(args: UpdateArgs, settings: &Settings) -> Result<()> {
    if args.new_key.is_none() && args.url.is_none() {
        return Err(NugetError::UserError(
            "nothing to update.\n\nPass --new-key and/or --url.".to_string(),
        ));
    }
    let op = EditOp::UpdateSource {
        key: args.key,
        new_key: args.new_key,
        url: args.url,
    };
    run_edit(&args.file, &[op], args.write, settings)
}

pub fn cmd_map(args: MapArgs, settings: &Settings) -> Result<()> {
    let op = EditOp::SetMappings {
        key: args.key,
        patterns: args.patterns,
    };
    run_edit(&args.file, &[op], args.write, settings)
}

pub fn cmd_reorder(args: ReorderArgs, settings: &Settings) -> Result<()> {
    let op = EditOp::ReorderSources { keys: args.keys };
    run_edit(&args.file, &[op], args.write, settings)
}

/// Apply `ops` to the config at `path` and write the result.
///
/// Issues are printed to stderr. Error-level issues refuse the write with
/// exit code 2 unless `--force` is set. With `--dry-run` the resulting XML
/// goes to stdout and the file is left alone.
pub(crate) fn run_edit(path: &Path, ops: &[EditOp], write: WriteArgs, settings: &Settings) -> Result<()> {
    let Some(output) = render_edit(path, ops, write.force, settings)? else {
        println!("No changes to {}", path.display());
        return Ok(());
    };

    if write.dry_run {
        print!("{}", output);
        return Ok(());
    }

    atomic_write_file(path, &output)?;
    tracing::info!(path = %path.display(), ops = ops.len(), "nuget.config updated");

    if settings.journal {
        journal::record(path, JournalAction::Edit, json!({ "ops": ops }));
    }

    println!("Updated {}", path.display());
    Ok(())
}

/// Compute the text to write, or `None` when the edit changes nothing.
fn render_edit(path: &Path, ops: &[EditOp], force: bool, settings: &Settings) -> Result<Option<String>> {
    let loaded = load_document(path, settings.preserve_unknown_xml)?;
    let updated = apply_edit_ops(&loaded.model, ops);

    let issues = validate(&updated);
    if !issues.is_empty() {
        eprint!("{}", format_issues(&issues));
    }
    if has_errors(&issues) && !force {
        let count = issues.iter().filter(|i| i.is_error()).count();
        return Err(NugetError::ValidationError(format!(
            "{} error(s) in the edited config; nothing was written.\n\n\
             Fix the input or pass --force to write anyway.",
            count
        )));
    }

    let line_ending = settings.line_ending.resolve(&loaded.text);
    let output = serialize_config(&updated, settings.preserve_unknown_xml, line_ending);
    if output == loaded.text {
        return Ok(None);
    }
    Ok(Some(output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes;
    use std::fs;
    use tempfile::TempDir;

    const DOCUMENT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<configuration>
  <packageSources>
    <!-- public feed -->
    <add key="nuget.org" value="https://api.nuget.org/v3/index.json" protocolVersion="3" />
    <add key="Contoso" value="https://pkgs.contoso.local/v3/index.json" />
  </packageSources>
</configuration>
"#;

    fn fixture() -> (TempDir, std::path::PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nuget.config");
        fs::write(&path, DOCUMENT).unwrap();
        (temp_dir, path)
    }

    fn key_args(path: &Path, key: &str) -> KeyArgs {
        KeyArgs {
            file: path.to_path_buf(),
            key: key.to_string(),
            write: WriteArgs::default(),
        }
    }

    #[test]
    fn test_add_appends_and_keeps_comments() {
        let (_temp_dir, path) = fixture();
        let args = AddArgs {
            file: path.clone(),
            key: " local ".to_string(),
            url: "/srv/packages".to_string(),
            write: WriteArgs::default(),
        };
        cmd_add(args, &Settings::default()).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("<!-- public feed -->"));
        assert!(written.contains("protocolVersion=\"3\""));
        assert!(written.contains(
            "    <add key=\"Contoso\" value=\"https://pkgs.contoso.local/v3/index.json\" />\n    <add key=\"local\" value=\"/srv/packages\" />\n  </packageSources>"
        ));
    }

    #[test]
    fn test_invalid_edit_is_refused_without_force() {
        let (_temp_dir, path) = fixture();
        let ops = [EditOp::AddSource {
            key: "bad".to_string(),
            url: "notaurl".to_string(),
        }];

        let err = run_edit(&path, &ops, WriteArgs::default(), &Settings::default()).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::VALIDATION_FAILURE);
        assert_eq!(fs::read_to_string(&path).unwrap(), DOCUMENT);

        let force = WriteArgs {
            force: true,
            dry_run: false,
        };
        run_edit(&path, &ops, force, &Settings::default()).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("key=\"bad\""));
    }

    #[test]
    fn test_dry_run_leaves_file_untouched() {
        let (_temp_dir, path) = fixture();
        let mut args = key_args(&path, "Contoso");
        args.write.dry_run = true;

        cmd_remove(args, &Settings::default()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DOCUMENT);
    }

    #[test]
    fn test_disable_then_enable_restores_document() {
        let (_temp_dir, path) = fixture();

        cmd_toggle(key_args(&path, "Contoso"), false, &Settings::default()).unwrap();
        let disabled = fs::read_to_string(&path).unwrap();
        assert!(disabled.contains("<disabledPackageSources>"));
        assert!(disabled.contains("<add key=\"Contoso\" value=\"true\" />"));

        cmd_toggle(key_args(&path, "Contoso"), true, &Settings::default()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DOCUMENT);
    }

    #[test]
    fn test_noop_edit_does_not_write() {
        let (_temp_dir, path) = fixture();
        let before = fs::metadata(&path).unwrap().modified().unwrap();

        cmd_toggle(key_args(&path, "nuget.org"), true, &Settings::default()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), DOCUMENT);
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), before);
    }

    #[test]
    fn test_update_requires_a_change() {
        let (_temp_dir, path) = fixture();
        let args = UpdateArgs {
            file: path,
            key: "Contoso".to_string(),
            new_key: None,
            url: None,
            write: WriteArgs::default(),
        };
        let err = cmd_update(args, &Settings::default()).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn test_rename_cascades_to_mappings() {
        let (_temp_dir, path) = fixture();
        let map = MapArgs {
            file: path.clone(),
            key: "Contoso".to_string(),
            patterns: vec!["Contoso.*".to_string()],
            write: WriteArgs::default(),
        };
        cmd_map(map, &Settings::default()).unwrap();

        let update = UpdateArgs {
            file: path.clone(),
            key: "Contoso".to_string(),
            new_key: Some("Fabrikam".to_string()),
            url: None,
            write: WriteArgs::default(),
        };
        cmd_update(update, &Settings::default()).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("<packageSource key=\"Fabrikam\">"));
        assert!(written.contains("<package pattern=\"Contoso.*\" />"));
        assert!(!written.contains("key=\"Contoso\""));
    }

    #[test]
    fn test_reorder_moves_elements() {
        let (_temp_dir, path) = fixture();
        let args = ReorderArgs {
            file: path.clone(),
            keys: vec!["Contoso".to_string()],
            write: WriteArgs::default(),
        };
        cmd_reorder(args, &Settings::default()).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let contoso = written.find("key=\"Contoso\"").unwrap();
        let nuget = written.find("key=\"nuget.org\"").unwrap();
        assert!(contoso < nuget);
        assert!(written.contains("protocolVersion=\"3\""));
    }

    #[test]
    fn test_journal_written_when_enabled() {
        let (_temp_dir, path) = fixture();
        let settings = Settings {
            journal: true,
            ..Settings::default()
        };
        cmd_remove(key_args(&path, "Contoso"), &settings).unwrap();

        let journal = fs::read_to_string(journal::journal_path(&path)).unwrap();
        assert_eq!(journal.lines().count(), 1);
        assert!(journal.contains("\"deleteSource\""));
    }
}
