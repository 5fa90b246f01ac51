//! Settings loading and validation.

use super::model::Settings;
use super::types::LOG_LEVELS;
use crate::error::{NugetError, Result};
use std::path::{Path, PathBuf};

/// Settings file picked up from the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "nugetcfg.yaml";

impl Settings {
    /// Load settings from a YAML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the settings file
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - Successfully loaded and validated settings
    /// * `Err(NugetError::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            NugetError::UserError(format!(
                "failed to read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Resolve the settings for this run.
    ///
    /// An explicit path must exist. Without one, `nugetcfg.yaml` in `cwd` is
    /// used when present; otherwise defaults apply.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate: PathBuf = cwd.join(DEFAULT_SETTINGS_FILE);
        if candidate.is_file() {
            Self::load(candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse settings from a YAML string. An empty document yields defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let settings: Settings = serde_yaml::from_str(yaml)
            .map_err(|e| NugetError::UserError(format!("failed to parse settings YAML: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            NugetError::UserError(format!("failed to serialize settings to YAML: {}", e))
        })
    }

    /// Validate setting values.
    ///
    /// Validation rules:
    /// - `log_level` must be one of `trace`, `debug`, `info`, `warn`, `error`
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(NugetError::UserError(format!(
                "settings validation failed: log_level must be one of {} (found '{}')",
                LOG_LEVELS.join(", "),
                self.log_level
            )));
        }
        Ok(())
    }
}
