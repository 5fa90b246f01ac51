//! Settings struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// User settings.
///
/// This struct represents the contents of `nugetcfg.yaml`. Unknown fields in
/// the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Merge edits into the existing document instead of regenerating it.
    #[serde(default = "default_true")]
    pub preserve_unknown_xml: bool,

    /// Include the user-level NuGet.Config in `list` output.
    #[serde(default = "default_true")]
    pub show_global_config: bool,

    /// Passed through to hosts in `init.settings`.
    #[serde(default = "default_true")]
    pub prefer_visual_editor: bool,

    /// Line terminator of written documents.
    #[serde(default)]
    pub line_ending: LineEndingSetting,

    /// Default log filter when `NUGETCFG_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Append applied edits to `.nugetcfg/journal.ndjson`.
    #[serde(default)]
    pub journal: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preserve_unknown_xml: default_true(),
            show_global_config: default_true(),
            prefer_visual_editor: default_true(),
            line_ending: LineEndingSetting::default(),
            log_level: default_log_level(),
            journal: false,
        }
    }
}
