//! Wire messages between an editor front end and a session.

use crate::model::{ConfigModel, ValidationIssue};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Messages a session accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inbound {
    Ready,
    RequestReparse,
    RequestSave,
    /// Ops stay undecoded until the session applies them, so one malformed
    /// op does not reject the whole batch.
    Edit {
        #[serde(default)]
        ops: Vec<Value>,
    },
    RequestDelete {
        #[serde(default)]
        key: Option<String>,
    },
    /// Add a source on behalf of a host command rather than the editor.
    ExternalAddSource { key: String, url: String },
}

impl Inbound {
    pub fn kind(&self) -> &'static str {
        match self {
            Inbound::Ready => "ready",
            Inbound::RequestReparse => "requestReparse",
            Inbound::RequestSave => "requestSave",
            Inbound::Edit { .. } => "edit",
            Inbound::RequestDelete { .. } => "requestDelete",
            Inbound::ExternalAddSource { .. } => "externalAddSource",
        }
    }
}

/// Settings echoed to the front end with every `init`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitSettings {
    pub preserve_unknown: bool,
    pub prefer_visual_editor: bool,
}

/// Messages a session emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Outbound {
    Init {
        model: ConfigModel,
        settings: InitSettings,
    },
    Validation {
        issues: Vec<ValidationIssue>,
    },
    SaveResult {
        ok: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Error {
        error: String,
    },
}

impl Outbound {
    pub fn saved(message: Option<&str>) -> Self {
        Outbound::SaveResult {
            ok: true,
            error: None,
            message: message.map(str::to_string),
        }
    }

    pub fn save_failed(error: impl Into<String>) -> Self {
        Outbound::SaveResult {
            ok: false,
            error: Some(error.into()),
            message: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Outbound::Error {
            error: error.into(),
        }
    }
}

/// A message addressed to one document, as exchanged by `serve`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<M> {
    pub document: String,
    #[serde(flatten)]
    pub message: M,
}
