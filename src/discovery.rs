//! Locating nuget.config files.
//!
//! Two lookups: the user-level `NuGet.Config` outside any workspace, and every
//! `nuget.config` below a workspace root.

use crate::error::{NugetError, Result};
use crate::parser::count_sources;
use globset::{GlobBuilder, GlobMatcher};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Default cap on workspace results.
pub const DEFAULT_LIMIT: usize = 50;

/// Directory names never descended into.
const EXCLUDED_DIRS: [&str; 3] = ["node_modules", "bin", "obj"];

/// Find the user-level config using the process environment.
pub fn find_global_config() -> Option<PathBuf> {
    find_global_config_with(|name| std::env::var(name).ok(), cfg!(windows))
}

/// Find the user-level config.
///
/// On Windows the only candidate is `%APPDATA%\NuGet\NuGet.Config`. Elsewhere
/// `$HOME/.config/NuGet/NuGet.Config` is preferred over the older
/// `$HOME/.nuget/NuGet/NuGet.Config`. The first candidate that exists wins.
///
/// # Arguments
///
/// * `env` - Environment lookup
/// * `windows` - Whether to use the Windows layout
pub fn find_global_config_with(
    env: impl Fn(&str) -> Option<String>,
    windows: bool,
) -> Option<PathBuf> {
    let candidates: Vec<PathBuf> = if windows {
        env("APPDATA")
            .filter(|v| !v.is_empty())
            .map(|app_data| Path::new(&app_data).join("NuGet").join("NuGet.Config"))
            .into_iter()
            .collect()
    } else {
        env("HOME")
            .filter(|v| !v.is_empty())
            .map(|home| {
                let home = PathBuf::from(home);
                vec![
                    home.join(".config").join("NuGet").join("NuGet.Config"),
                    home.join(".nuget").join("NuGet").join("NuGet.Config"),
                ]
            })
            .unwrap_or_default()
    };

    candidates.into_iter().find(|c| c.is_file())
}

fn config_matcher() -> Result<GlobMatcher> {
    GlobBuilder::new("**/nuget.config")
        .case_insensitive(true)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| NugetError::UserError(format!("invalid discovery glob: {}", e)))
}

/// Find workspace configs below `root`, sorted by path, at most `limit`.
///
/// File names match `nuget.config` case-insensitively. `node_modules`, `bin`
/// and `obj` directories are skipped, as are unreadable entries.
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Matching files
/// * `Err(NugetError::IoError)` - `root` itself cannot be read
pub fn find_workspace_configs(root: &Path, limit: usize) -> Result<Vec<PathBuf>> {
    let matcher = config_matcher()?;

    if !root.is_dir() {
        return Err(NugetError::IoError(format!(
            "workspace root '{}' is not a directory",
            root.display()
        )));
    }

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_excluded(e));

    let mut found = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        if entry.file_type().is_file() && matcher.is_match(relative) {
            found.push(entry.into_path());
        }
    }

    found.sort();
    found.truncate(limit);
    Ok(found)
}

fn is_excluded(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| EXCLUDED_DIRS.contains(&name))
}

/// One-line description of a config file: `"<n> sources"` or `"parse error"`.
pub fn summarize(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(text) => summarize_text(&text),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read config");
            "parse error".to_string()
        }
    }
}

pub fn summarize_text(text: &str) -> String {
    match count_sources(text) {
        Ok(n) => format!("{} sources", n),
        Err(_) => "parse error".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use tempfile::TempDir;

    const CONFIG: &str = r#"<configuration><packageSources><add key="a" value="https://a"/><add key="b" value="https://b"/></packageSources></configuration>"#;

    fn touch(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn env_of(vars: &[(&str, &Path)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.display().to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_global_config_prefers_dot_config() {
        let home = TempDir::new().unwrap();
        let newer = home.path().join(".config/NuGet/NuGet.Config");
        let older = home.path().join(".nuget/NuGet/NuGet.Config");
        touch(&newer, CONFIG);
        touch(&older, CONFIG);

        let found = find_global_config_with(env_of(&[("HOME", home.path())]), false);
        assert_eq!(found, Some(newer));
    }

    #[test]
    fn test_global_config_falls_back_to_dot_nuget() {
        let home = TempDir::new().unwrap();
        let older = home.path().join(".nuget/NuGet/NuGet.Config");
        touch(&older, CONFIG);

        let found = find_global_config_with(env_of(&[("HOME", home.path())]), false);
        assert_eq!(found, Some(older));
    }

    #[test]
    fn test_global_config_windows_uses_appdata() {
        let app_data = TempDir::new().unwrap();
        let config = app_data.path().join("NuGet").join("NuGet.Config");

        let lookup = env_of(&[("APPDATA", app_data.path())]);
        assert_eq!(find_global_config_with(&lookup, true), None);

        touch(&config, CONFIG);
        assert_eq!(find_global_config_with(&lookup, true), Some(config));
        assert_eq!(find_global_config_with(|_| None, true), None);
    }

    #[test]
    #[serial]
    fn test_global_config_reads_process_environment() {
        let home = TempDir::new().unwrap();
        let previous = std::env::var_os("HOME");
        let config = home.path().join(".config/NuGet/NuGet.Config");
        touch(&config, CONFIG);

        // SAFETY: serialized with other environment-mutating tests.
        unsafe { std::env::set_var("HOME", home.path()) };
        let found = find_global_config();
        match previous {
            Some(value) => unsafe { std::env::set_var("HOME", value) },
            None => unsafe { std::env::remove_var("HOME") },
        }

        if cfg!(windows) {
            assert_ne!(found, Some(config));
        } else {
            assert_eq!(found, Some(config));
        }
    }

    #[test]
    fn test_workspace_search_matches_case_insensitively_and_skips_excluded() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("nuget.config"), CONFIG);
        touch(&root.path().join("src/app/NuGet.Config"), CONFIG);
        touch(&root.path().join("node_modules/pkg/nuget.config"), CONFIG);
        touch(&root.path().join("src/app/bin/Debug/nuget.config"), CONFIG);
        touch(&root.path().join("src/app/obj/nuget.config"), CONFIG);
        touch(&root.path().join("src/nuget.config.bak"), CONFIG);

        let found = find_workspace_configs(root.path(), DEFAULT_LIMIT).unwrap();
        assert_eq!(
            found,
            vec![
                root.path().join("nuget.config"),
                root.path().join("src/app/NuGet.Config"),
            ]
        );
    }

    #[test]
    fn test_workspace_root_named_like_excluded_dir_is_still_searched() {
        let workspace = TempDir::new().unwrap();
        let root = workspace.path().join("bin");
        touch(&root.join("nuget.config"), CONFIG);
        touch(&root.join("obj/nuget.config"), CONFIG);

        let found = find_workspace_configs(&root, DEFAULT_LIMIT).unwrap();
        assert_eq!(found, vec![root.join("nuget.config")]);
    }

    #[test]
    fn test_workspace_search_respects_limit() {
        let root = TempDir::new().unwrap();
        for i in 0..5 {
            touch(&root.path().join(format!("p{}/nuget.config", i)), CONFIG);
        }
        let found = find_workspace_configs(root.path(), 3).unwrap();
        assert_eq!(found.len(), 3);
        assert!(found[0].ends_with("p0/nuget.config"));
    }

    #[test]
    fn test_workspace_root_must_exist() {
        let root = TempDir::new().unwrap();
        assert!(find_workspace_configs(&root.path().join("missing"), 10).is_err());
    }

    #[test]
    fn test_summaries() {
        let root = TempDir::new().unwrap();
        let good = root.path().join("good/nuget.config");
        let bad = root.path().join("bad/nuget.config");
        touch(&good, CONFIG);
        touch(&bad, "<configuration><packageSources>");

        assert_eq!(summarize(&good), "2 sources");
        assert_eq!(summarize(&bad), "parse error");
        assert_eq!(summarize(&root.path().join("missing")), "parse error");
        assert_eq!(summarize_text("<configuration/>"), "0 sources");
    }
}
