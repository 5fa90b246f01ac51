//! Edit operation wire format.

use serde::{Deserialize, Serialize};

/// A single structured mutation of a [`crate::model::ConfigModel`].
///
/// On the wire this is a JSON object discriminated by `kind`:
///
/// ```json
/// {"kind": "updateSource", "key": "a", "newKey": "b", "url": "https://b"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EditOp {
    /// Append an enabled source unless the key already exists.
    AddSource { key: String, url: String },

    /// Change a source's URL and/or key; a key change is cascaded to mappings.
    UpdateSource {
        key: String,
        #[serde(
            rename = "newKey",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        new_key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },

    /// Remove a source and every mapping that references it.
    DeleteSource { key: String },

    /// Enable or disable a source.
    ToggleSource { key: String, enabled: bool },

    /// Replace (or create) the pattern list for a source key.
    SetMappings { key: String, patterns: Vec<String> },

    /// Reorder sources (and mappings) to follow the given key order.
    ReorderSources { keys: Vec<String> },
}

impl EditOp {
    /// The `kind` discriminator, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            EditOp::AddSource { .. } => "addSource",
            EditOp::UpdateSource { .. } => "updateSource",
            EditOp::DeleteSource { .. } => "deleteSource",
            EditOp::ToggleSource { .. } => "toggleSource",
            EditOp::SetMappings { .. } => "setMappings",
            EditOp::ReorderSources { .. } => "reorderSources",
        }
    }
}
