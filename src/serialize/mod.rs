//! Writes a `ConfigModel` back to nuget.config text.
//!
//! When the model carries the original document text, the three managed
//! sections are reconciled into that document in place: everything outside
//! them is left byte-for-byte intact, and inside them existing elements are
//! reused by key. Otherwise (or if the original text cannot take a merge) a
//! fresh canonical document is generated.

mod layout;
mod merge;
mod reconcile;


use crate::model::ConfigModel;
use crate::xml::XmlDocument;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Line terminator of serialized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineEnding::Lf => write!(f, "lf"),
            LineEnding::CrLf => write!(f, "crlf"),
        }
    }
}

/// The line ending a document already uses: CRLF if any line ends in CRLF.
pub fn detect_line_ending(text: &str) -> LineEnding {
    if text.contains("\r\n") {
        LineEnding::CrLf
    } else {
        LineEnding::Lf
    }
}

/// Serialize a model to nuget.config text.
///
/// # Arguments
///
/// * `model` - The model to write
/// * `preserve_unknown` - Merge into `model.raw_unknown` instead of regenerating
/// * `line_ending` - Line terminator for the whole output
///
/// # Returns
///
/// The document text. Serialization never fails: a document that cannot be
/// merged into is replaced by a regenerated one.
pub fn serialize_config(
    model: &ConfigModel,
    preserve_unknown: bool,
    line_ending: LineEnding,
) -> String {
    let text = match model.raw_unknown.as_deref() {
        Some(raw) if preserve_unknown && !raw.trim().is_empty() => {
            merge_into(raw, model).unwrap_or_else(|reason| {
                tracing::debug!(%reason, "structural merge unavailable, regenerating document");
                regenerate(model)
            })
        }
        _ => regenerate(model),
    };
    normalize_line_endings(&text, line_ending)
}

fn merge_into(raw: &str, model: &ConfigModel) -> Result<String, String> {
    let mut document = XmlDocument::parse(raw).map_err(|e| e.to_string())?;
    merge::merge_document(&mut document, model).map_err(|e| e.to_string())?;
    Ok(document.to_xml_string())
}

/// A canonical document holding only the managed sections.
fn regenerate(model: &ConfigModel) -> String {
    let mut document = merge::skeleton();
    match merge::merge_document(&mut document, model) {
        Ok(()) => document.to_xml_string(),
        Err(reason) => {
            tracing::warn!(%reason, "skeleton merge failed");
            merge::skeleton().to_xml_string()
        }
    }
}

/// Rewrite every `\n` or `\r\n` as the requested terminator. Lone `\r` is kept.
pub fn normalize_line_endings(text: &str, line_ending: LineEnding) -> String {
    let unix = text.replace("\r\n", "\n");
    match line_ending {
        LineEnding::Lf => unix,
        LineEnding::CrLf => unix.replace('\n', "\r\n"),
    }
}
