//! Setting enums and serde default functions.

use crate::serialize::{LineEnding, detect_line_ending};
use serde::{Deserialize, Serialize};

/// Line terminator policy for written documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LineEndingSetting {
    /// Keep whatever the document already uses (default).
    #[default]
    Auto,
    Lf,
    Crlf,
}

impl LineEndingSetting {
    /// Parse a line-ending setting from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(Self::Auto),
            "lf" => Some(Self::Lf),
            "crlf" => Some(Self::Crlf),
            _ => None,
        }
    }

    /// The concrete line ending for a document currently holding `text`.
    pub fn resolve(self, text: &str) -> LineEnding {
        match self {
            Self::Auto => detect_line_ending(text),
            Self::Lf => LineEnding::Lf,
            Self::Crlf => LineEnding::CrLf,
        }
    }
}

/// Log levels accepted by `log_level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// Default value functions for serde
pub(crate) fn default_true() -> bool {
    true
}
pub(crate) fn default_log_level() -> String {
    "info".to_string()
}
