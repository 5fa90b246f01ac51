//! Implementation of the `nugetcfg serve` command.
//!
//! Speaks the editor protocol as line-delimited JSON. Every input line is an
//! inbound message plus the `document` it addresses; every reply line is an
//! outbound message tagged with the same `document`. A session is opened the
//! first time a document is addressed and lives until stdin closes.

use crate::cli::ServeArgs;
use crate::config::Settings;
use crate::discovery::find_global_config;
use crate::error::{NugetError, Result};
use crate::redact::redact;
use crate::session::{Envelope, FileDocument, Inbound, Outbound, Session, SessionRegistry};
use serde_json::Value;
use std::io::{BufRead, Write};
use std::path::Path;

/// Execute the `nugetcfg serve` command.
pub fn cmd_serve(args: ServeArgs, settings: &Settings) -> Result<()> {
    let global = find_global_config();
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    serve(stdin.lock(), stdout.lock(), settings, args.yes, global.as_deref())
}

/// Run the protocol until `input` is exhausted.
pub(crate) fn serve<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    settings: &Settings,
    assume_yes: bool,
    global: Option<&Path>,
) -> Result<()> {
    let mut registry = SessionRegistry::new();

    for line in input.lines() {
        let line = line.map_err(|e| NugetError::IoError(format!("failed to read input: {}", e)))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let replies = match serde_json::from_str::<Envelope<Inbound>>(line) {
            Ok(envelope) => route(&mut registry, envelope, settings, assume_yes, global),
            Err(e) => {
                tracing::warn!(line = %redact(line), error = %e, "ignoring malformed message");
                vec![Envelope {
                    document: document_of(line),
                    message: Outbound::error(format!("invalid message: {}", e)),
                }]
            }
        };

        for reply in &replies {
            write_reply(&mut output, reply)?;
        }
        output
            .flush()
            .map_err(|e| NugetError::IoError(format!("failed to flush output: {}", e)))?;
    }

    tracing::info!(sessions = registry.len(), "input closed, stopping");
    Ok(())
}

fn route(
    registry: &mut SessionRegistry<FileDocument>,
    envelope: Envelope<Inbound>,
    settings: &Settings,
    assume_yes: bool,
    global: Option<&Path>,
) -> Vec<Envelope<Outbound>> {
    let Envelope { document, message } = envelope;

    if !registry.contains(&document) {
        let mut host = FileDocument::new(&document).assume_yes(assume_yes);
        if global.is_some_and(|g| g == Path::new(&document)) {
            host = host.outside_workspace();
        }
        registry.open(Session::open(host, settings.clone()));
    }

    registry
        .send_to(&document, message)
        .unwrap_or_default()
        .into_iter()
        .map(|message| Envelope {
            document: document.clone(),
            message,
        })
        .collect()
}

/// Best-effort `document` of a line that failed to decode.
fn document_of(line: &str) -> String {
    serde_json::from_str::<Value>(line)
        .ok()
        .and_then(|value| value.get("document")?.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn write_reply<W: Write>(output: &mut W, reply: &Envelope<Outbound>) -> Result<()> {
    let json = serde_json::to_string(reply)
        .map_err(|e| NugetError::IoError(format!("failed to encode reply: {}", e)))?;
    writeln!(output, "{}", json)
        .map_err(|e| NugetError::IoError(format!("failed to write reply: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    const DOCUMENT: &str = r#"<configuration>
  <packageSources>
    <add key="nuget.org" value="https://api.nuget.org/v3/index.json" />
  </packageSources>
</configuration>
"#;

    fn run(lines: &[Value], assume_yes: bool, global: Option<&Path>) -> Vec<Value> {
        let input: String = lines.iter().map(|l| format!("{}\n", l)).collect();
        let mut output = Vec::new();
        serve(
            input.as_bytes(),
            &mut output,
            &Settings::default(),
            assume_yes,
            global,
        )
        .unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn fixture() -> (TempDir, String) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nuget.config");
        fs::write(&path, DOCUMENT).unwrap();
        let document = path.display().to_string();
        (temp_dir, document)
    }

    #[test]
    fn test_ready_and_edit_round_trip() {
        let (_temp_dir, document) = fixture();
        let replies = run(
            &[
                json!({"document": document, "type": "ready"}),
                json!({"document": document, "type": "edit", "ops": [
                    {"kind": "addSource", "key": "local", "url": "/srv/packages"}
                ]}),
            ],
            false,
            None,
        );

        let types: Vec<&str> = replies.iter().map(|r| r["type"].as_str().unwrap()).collect();
        assert_eq!(types, vec!["init", "validation", "saveResult", "init"]);
        assert!(replies.iter().all(|r| r["document"] == document.as_str()));
        assert_eq!(replies[0]["model"]["sources"][0]["key"], "nuget.org");
        assert_eq!(replies[2]["ok"], true);
        assert!(fs::read_to_string(&document).unwrap().contains("key=\"local\""));
    }

    #[test]
    fn test_malformed_line_reports_error_and_continues() {
        let (_temp_dir, document) = fixture();
        let input = format!(
            "not json\n{}\n{}\n",
            json!({"document": document, "type": "bogus"}),
            json!({"document": document, "type": "ready"})
        );
        let mut output = Vec::new();
        serve(input.as_bytes(), &mut output, &Settings::default(), false, None).unwrap();

        let replies: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0]["type"], "error");
        assert_eq!(replies[0]["document"], "");
        assert_eq!(replies[1]["type"], "error");
        assert_eq!(replies[1]["document"], document.as_str());
        assert_eq!(replies[2]["type"], "init");
    }

    #[test]
    fn test_delete_needs_assume_yes() {
        let (_temp_dir, document) = fixture();
        let delete = json!({"document": document, "type": "requestDelete", "key": "nuget.org"});

        assert!(run(std::slice::from_ref(&delete), false, None).is_empty());
        assert_eq!(fs::read_to_string(&document).unwrap(), DOCUMENT);

        let replies = run(&[delete], true, None);
        assert_eq!(replies[1]["message"], crate::session::DELETE_APPLIED);
        assert!(!fs::read_to_string(&document).unwrap().contains("nuget.org"));
    }

    #[test]
    fn test_global_config_is_written_despite_errors() {
        let (_temp_dir, document) = fixture();
        let edit = json!({"document": document, "type": "edit", "ops": [
            {"kind": "addSource", "key": "bad", "url": "notaurl"}
        ]});

        let replies = run(std::slice::from_ref(&edit), false, None);
        assert_eq!(replies.len(), 2);
        assert!(!fs::read_to_string(&document).unwrap().contains("bad"));

        let replies = run(&[edit], false, Some(Path::new(&document)));
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[1]["ok"], true);
        assert!(fs::read_to_string(&document).unwrap().contains("key=\"bad\""));
    }

    #[test]
    fn test_unreadable_document_reports_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nuget.config").display().to_string();
        let replies = run(&[json!({"document": missing, "type": "ready"})], false, None);

        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0]["type"], "error");
    }
}
