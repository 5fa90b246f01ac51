//! Editing sessions.
//!
//! A session owns the current model of one document and turns inbound editor
//! messages into model changes, writes and outbound replies. Messages are
//! handled strictly one at a time and in order; [`SessionRegistry`] maps
//! document identities to their sessions.
//!
//! # Edit Flow
//!
//! ```text
//! edit ──> decode ops ──> apply ──> validate ──┬─ errors (workspace) ──> validation, init
//!                                              └─ otherwise ──> serialize, write
//!                                                               ──> validation, saveResult, init
//! ```

mod document;
mod messages;
mod registry;


pub use document::{DocumentHost, FileDocument};
pub use messages::{Envelope, InitSettings, Inbound, Outbound};
pub use registry::SessionRegistry;

use crate::config::Settings;
use crate::edit::{EditOp, apply_edit_ops};
use crate::error::Result;
use crate::journal::{self, JournalAction};
use crate::model::{ConfigModel, ValidationIssue};
use crate::parser::parse_config;
use crate::redact::redact;
use crate::serialize::serialize_config;
use crate::validate::{has_errors, validate};
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

pub const EDIT_APPLIED: &str = "Applied edit to document (unsaved)";
pub const DELETE_APPLIED: &str = "Applied delete to document (unsaved)";
pub const SAVE_BLOCKED: &str = "Cannot save nuget.config due to validation errors.";

/// One open document.
pub struct Session<H: DocumentHost> {
    host: H,
    settings: Settings,
    /// Document text as last read or written.
    text: String,
    model: Option<ConfigModel>,
    last_error: Option<String>,
}

impl<H: DocumentHost> Session<H> {
    /// Open a session and load the document. A parse failure is kept and
    /// reported to the front end rather than returned.
    pub fn open(host: H, settings: Settings) -> Self {
        info!(document = %host.identity(), "opening nuget.config");
        let mut session = Self {
            host,
            settings,
            text: String::new(),
            model: None,
            last_error: None,
        };
        session.load();
        session
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn identity(&self) -> String {
        self.host.identity()
    }

    /// The current model, or `None` while the document fails to parse.
    pub fn model(&self) -> Option<&ConfigModel> {
        self.model.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Handle one inbound message and return the replies in order.
    pub fn handle(&mut self, message: Inbound) -> Vec<Outbound> {
        debug!(document = %self.host.identity(), message = message.kind(), "handling message");

        match message {
            Inbound::Ready => vec![self.current_state()],
            Inbound::RequestReparse => self.document_changed(),
            _ if self.model.is_none() => vec![self.not_loaded()],
            Inbound::RequestSave => self.save(),
            Inbound::Edit { ops } => {
                let ops = decode_ops(ops);
                self.apply(ops, JournalAction::Edit, EDIT_APPLIED)
            }
            Inbound::RequestDelete { key } => self.delete(key),
            Inbound::ExternalAddSource { key, url } => {
                let op = EditOp::AddSource {
                    key: key.trim().to_string(),
                    url: url.trim().to_string(),
                };
                self.apply(vec![op], JournalAction::Edit, EDIT_APPLIED)
            }
        }
    }

    /// Reload after the document changed outside the session.
    pub fn document_changed(&mut self) -> Vec<Outbound> {
        self.load();
        vec![self.current_state()]
    }

    fn load(&mut self) {
        let parsed = self.host.read_text().and_then(|text| {
            let model = parse_config(&text, self.settings.preserve_unknown_xml)?;
            Ok((text, model))
        });

        match parsed {
            Ok((text, model)) => {
                debug!(
                    document = %self.host.identity(),
                    sources = model.sources.len(),
                    mappings = model.mappings.len(),
                    "parsed nuget.config"
                );
                self.text = text;
                self.model = Some(model);
                self.last_error = None;
            }
            Err(e) => {
                warn!(document = %self.host.identity(), error = %e, "failed to load nuget.config");
                self.model = None;
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn current_state(&self) -> Outbound {
        match &self.model {
            Some(model) => self.init_message(model),
            None => self.not_loaded(),
        }
    }

    fn init_message(&self, model: &ConfigModel) -> Outbound {
        Outbound::Init {
            model: model.clone(),
            settings: InitSettings {
                preserve_unknown: self.settings.preserve_unknown_xml,
                prefer_visual_editor: self.settings.prefer_visual_editor,
            },
        }
    }

    fn not_loaded(&self) -> Outbound {
        Outbound::error(
            self.last_error
                .clone()
                .unwrap_or_else(|| "nuget.config is not loaded".to_string()),
        )
    }

    fn delete(&mut self, key: Option<String>) -> Vec<Outbound> {
        let Some(key) = key.filter(|k| !k.is_empty()) else {
            return Vec::new();
        };

        let prompt = format!("Delete source '{}'? This cannot be undone.", key);
        if !self.host.confirm(&prompt) {
            return Vec::new();
        }

        self.apply(
            vec![EditOp::DeleteSource { key }],
            JournalAction::Delete,
            DELETE_APPLIED,
        )
    }

    fn apply(&mut self, ops: Vec<EditOp>, action: JournalAction, success: &str) -> Vec<Outbound> {
        let Some(current) = &self.model else {
            return vec![self.not_loaded()];
        };

        let updated = apply_edit_ops(current, &ops);
        let issues = validate(&updated);
        let mut replies = vec![Outbound::Validation {
            issues: issues.clone(),
        }];

        if self.blocks_write(&issues) {
            self.model = Some(updated);
            if let Some(model) = &self.model {
                replies.push(self.init_message(model));
            }
            return replies;
        }

        match self.persist(updated) {
            Ok(()) => {
                replies.push(Outbound::saved(Some(success)));
                self.journal(action, json!({ "ops": ops }));
            }
            Err(e) => {
                error!(document = %self.host.identity(), error = %redact(&e.to_string()), "failed to write nuget.config");
                replies.push(Outbound::save_failed(e.to_string()));
            }
        }

        if let Some(model) = &self.model {
            replies.push(self.init_message(model));
        }
        replies
    }

    fn save(&mut self) -> Vec<Outbound> {
        let Some(model) = self.model.clone() else {
            return vec![self.not_loaded()];
        };

        let issues = validate(&model);
        if self.blocks_write(&issues) {
            return vec![
                Outbound::Validation { issues },
                Outbound::save_failed(SAVE_BLOCKED),
            ];
        }

        let mut replies = Vec::new();
        if !issues.is_empty() {
            replies.push(Outbound::Validation {
                issues: issues.clone(),
            });
        }

        match self.persist(model) {
            Ok(()) => {
                info!(document = %self.host.identity(), "nuget.config saved");
                self.journal(JournalAction::Save, json!({ "issues": issues.len() }));
                replies.push(Outbound::saved(None));
            }
            Err(e) => {
                error!(document = %self.host.identity(), error = %e, "save failed");
                replies.push(Outbound::save_failed(e.to_string()));
            }
        }
        replies
    }

    fn blocks_write(&self, issues: &[ValidationIssue]) -> bool {
        has_errors(issues) && self.host.is_in_workspace()
    }

    /// Serialize and write `model`, then make it current. On failure the
    /// model still becomes current so a retry can save it.
    fn persist(&mut self, mut model: ConfigModel) -> Result<()> {
        let line_ending = self.settings.line_ending.resolve(&self.text);
        let text = serialize_config(&model, self.settings.preserve_unknown_xml, line_ending);

        let written = self.host.write_text(&text);
        if written.is_ok() {
            if self.settings.preserve_unknown_xml {
                model.raw_unknown = Some(text.clone());
            }
            self.text = text;
        }
        self.model = Some(model);
        written
    }

    fn journal(&self, action: JournalAction, details: Value) {
        if !self.settings.journal {
            return;
        }
        if let Some(path) = self.host.path() {
            journal::record(path, action, details);
        }
    }
}

/// Decode edit ops one by one, skipping the ones that do not decode.
fn decode_ops(raw: Vec<Value>) -> Vec<EditOp> {
    raw.into_iter()
        .filter_map(|value| match serde_json::from_value::<EditOp>(value.clone()) {
            Ok(op) => Some(op),
            Err(e) => {
                warn!(op = %redact(&value.to_string()), error = %e, "skipping malformed edit op");
                None
            }
        })
        .collect()
}
