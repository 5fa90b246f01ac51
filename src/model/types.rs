//! Model types and their JSON wire shape.

use serde::{Deserialize, Serialize};

/// One `<add>` entry under `packageSources`.
///
/// `enabled` is derived from the absence of the key in `disabledPackageSources`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSource {
    pub key: String,
    pub url: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl PackageSource {
    /// Create an enabled source.
    pub fn new(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: url.into(),
            enabled: true,
        }
    }
}

/// Package-id glob patterns routed to one source key.
///
/// Pattern order is significant and duplicates are allowed here; the
/// validator reports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSourceMapping {
    pub source_key: String,
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl PackageSourceMapping {
    pub fn new(source_key: impl Into<String>, patterns: Vec<String>) -> Self {
        Self {
            source_key: source_key.into(),
            patterns,
        }
    }
}

/// Aggregate root for one nuget.config document.
///
/// Source keys are expected to be unique and mapping keys are expected to
/// name existing sources; neither is enforced here. The validator reports
/// duplicates and `deleteSource` drops mappings of the deleted key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigModel {
    #[serde(default)]
    pub sources: Vec<PackageSource>,
    #[serde(default)]
    pub mappings: Vec<PackageSourceMapping>,
    /// Full original XML text, kept for structural merge on save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_unknown: Option<String>,
}

impl ConfigModel {
    /// Find a source by key.
    pub fn source(&self, key: &str) -> Option<&PackageSource> {
        self.sources.iter().find(|s| s.key == key)
    }

    /// Find the mapping for a source key.
    pub fn mapping(&self, source_key: &str) -> Option<&PackageSourceMapping> {
        self.mappings.iter().find(|m| m.source_key == source_key)
    }

    /// Sources that are listed in `disabledPackageSources`.
    pub fn disabled_sources(&self) -> impl Iterator<Item = &PackageSource> {
        self.sources.iter().filter(|s| !s.enabled)
    }
}

/// Severity of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    Error,
    Warn,
}

impl std::fmt::Display for IssueLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueLevel::Error => write!(f, "error"),
            IssueLevel::Warn => write!(f, "warn"),
        }
    }
}

/// A problem found by the validator. Computed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub level: IssueLevel,
    /// Stable machine-readable code such as `DUP_KEY`.
    pub code: String,
    pub message: String,
    /// Dotted locator: `sources.<key>`, `sources.<key>.url`, `mappings.<sourceKey>`.
    pub path: String,
}

impl ValidationIssue {
    /// Create an error-level issue.
    pub fn error(
        code: impl Into<String>,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            level: IssueLevel::Error,
            code: code.into(),
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == IssueLevel::Error
    }
}

fn default_true() -> bool {
    true
}
