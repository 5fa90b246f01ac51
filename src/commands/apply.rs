//! Implementation of the `nugetcfg apply` command.
//!
//! Reads a JSON array of edit ops (the same shape editors send) from a file
//! or stdin and applies it as one batch.

use super::edit::run_edit;
use crate::cli::ApplyArgs;
use crate::config::Settings;
use crate::edit::EditOp;
use crate::error::{NugetError, Result};
use std::io::Read;

/// Execute the `nugetcfg apply` command.
pub fn cmd_apply(args: ApplyArgs, settings: &Settings) -> Result<()> {
    let json = read_ops_source(&args.ops)?;
    let ops = parse_ops(&json)?;
    if ops.is_empty() {
        println!("No ops to apply");
        return Ok(());
    }
    run_edit(&args.file, &ops, args.write, settings)
}

fn read_ops_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut json = String::new();
        std::io::stdin()
            .read_to_string(&mut json)
            .map_err(|e| NugetError::IoError(format!("failed to read ops from stdin: {}", e)))?;
        return Ok(json);
    }

    std::fs::read_to_string(source)
        .map_err(|e| NugetError::UserError(format!("cannot read ops file '{}': {}", source, e)))
}

/// Ops given on the command line are all-or-nothing: one bad op rejects the batch.
fn parse_ops(json: &str) -> Result<Vec<EditOp>> {
    serde_json::from_str(json).map_err(|e| {
        NugetError::UserError(format!(
            "invalid edit ops: {}\n\n\
             Expected a JSON array such as \
             [{{\"kind\": \"addSource\", \"key\": \"local\", \"url\": \"/srv/packages\"}}].",
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::WriteArgs;
    use crate::exit_codes;
    use tempfile::TempDir;

    #[test]
    fn test_parse_ops_accepts_every_kind() {
        let ops = parse_ops(
            r#"[
                {"kind": "addSource", "key": "a", "url": "https://a"},
                {"kind": "updateSource", "key": "a", "newKey": "b"},
                {"kind": "toggleSource", "key": "b", "enabled": false},
                {"kind": "setMappings", "key": "b", "patterns": ["B.*"]},
                {"kind": "reorderSources", "keys": ["b"]},
                {"kind": "deleteSource", "key": "b"}
            ]"#,
        )
        .unwrap();
        assert_eq!(ops.len(), 6);
        assert_eq!(
            ops[1],
            EditOp::UpdateSource {
                key: "a".into(),
                new_key: Some("b".into()),
                url: None
            }
        );
    }

    #[test]
    fn test_parse_ops_rejects_unknown_kind() {
        let err = parse_ops(r#"[{"kind": "explode"}]"#).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn test_apply_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().join("nuget.config");
        let ops = temp_dir.path().join("ops.json");
        std::fs::write(&config, "<configuration>\n</configuration>\n").unwrap();
        std::fs::write(
            &ops,
            r#"[{"kind": "addSource", "key": "local", "url": "/srv/packages"}]"#,
        )
        .unwrap();

        let args = ApplyArgs {
            file: config.clone(),
            ops: ops.display().to_string(),
            write: WriteArgs::default(),
        };
        cmd_apply(args, &Settings::default()).unwrap();

        assert_eq!(
            std::fs::read_to_string(&config).unwrap(),
            "<configuration>\n  <packageSources>\n    <add key=\"local\" value=\"/srv/packages\" />\n  </packageSources>\n</configuration>\n"
        );
    }
}
