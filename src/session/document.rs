//! The document a session edits.

use crate::error::{NugetError, Result};
use crate::fs::atomic_write_file;
use std::path::{Path, PathBuf};

/// Text storage plus the few host interactions a session needs.
pub trait DocumentHost {
    /// Stable identity used to address the session (a path for files).
    fn identity(&self) -> String;

    fn read_text(&self) -> Result<String>;

    fn write_text(&mut self, text: &str) -> Result<()>;

    /// Ask the user to confirm a destructive action.
    fn confirm(&mut self, prompt: &str) -> bool;

    /// Documents inside the workspace refuse writes that fail validation.
    fn is_in_workspace(&self) -> bool;

    /// Filesystem location, when there is one.
    fn path(&self) -> Option<&Path> {
        None
    }
}

/// A nuget.config on disk. Writes replace the file atomically.
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
    in_workspace: bool,
    assume_yes: bool,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            in_workspace: true,
            assume_yes: false,
        }
    }

    /// Mark the document as living outside the workspace (the global config).
    pub fn outside_workspace(mut self) -> Self {
        self.in_workspace = false;
        self
    }

    /// Answer every confirmation with yes.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }
}

impl DocumentHost for FileDocument {
    fn identity(&self) -> String {
        self.path.display().to_string()
    }

    fn read_text(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).map_err(|e| {
            NugetError::IoError(format!("failed to read '{}': {}", self.path.display(), e))
        })
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        atomic_write_file(&self.path, text)
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        if !self.assume_yes {
            tracing::info!(document = %self.path.display(), prompt, "confirmation declined");
        }
        self.assume_yes
    }

    fn is_in_workspace(&self) -> bool {
        self.in_workspace
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}
