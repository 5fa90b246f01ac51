//! Atomic replacement of nuget.config files.
//!
//! A document is never written in place. The new text goes to a temporary
//! file next to the target, is synced to disk, and then renamed over the
//! target, so a crash leaves either the old or the new document and never a
//! truncated one.
//!
//! `std::fs::rename` replaces an existing destination on every supported
//! platform (it maps to `MoveFileExW` with `MOVEFILE_REPLACE_EXISTING` on
//! Windows). Source and destination must share a volume, which holds because
//! the temporary file lives in the target's directory.

use crate::error::{NugetError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically replace `path` with `content`.
///
/// # Arguments
///
/// * `path` - The document to write; missing parent directories are created
/// * `content` - The full new text
///
/// # Returns
///
/// * `Ok(())` - The target now holds exactly `content`
/// * `Err(NugetError::IoError)` - Creating, writing, syncing or renaming failed;
///   the temporary file is removed and the target is untouched
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            NugetError::IoError(format!(
                "failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path)?;
    write_and_sync(&temp_path, content.as_bytes())?;
    replace(&temp_path, path)
}

/// `.{filename}.{pid}.tmp` in the target's directory.
fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            NugetError::IoError(format!("invalid document path '{}'", target.display()))
        })?;

    Ok(parent.join(format!(".{}.{}.tmp", filename, std::process::id())))
}

fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        NugetError::IoError(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let written = file.write_all(content).and_then(|()| file.sync_all());
    if let Err(e) = written {
        let _ = fs::remove_file(path);
        return Err(NugetError::IoError(format!(
            "failed to write temporary file '{}': {}",
            path.display(),
            e
        )));
    }
    Ok(())
}

fn replace(source: &Path, target: &Path) -> Result<()> {
    if let Err(e) = fs::rename(source, target) {
        let _ = fs::remove_file(source);
        return Err(NugetError::IoError(format!(
            "failed to replace '{}': {}",
            target.display(),
            e
        )));
    }

    // Persist the directory entry as well.
    #[cfg(unix)]
    if let Some(parent) = target.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }

    Ok(())
}
