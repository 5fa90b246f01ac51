//! Acceptance policy for package source locations.

use regex::Regex;
use std::sync::LazyLock;

/// `http://` or `https://` followed by any non-whitespace.
static HTTP_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://\S+$").expect("valid regex"));

/// `C:\feed` or `C:/feed`.
static WINDOWS_ABSOLUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]:[\\/]").expect("valid regex"));

/// `\\server\share` with optional trailing path.
static UNC_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\\\\[^\\\s]+\\[^\\\s]+").expect("valid regex"));

/// Whether a source value is an http(s) URL or an absolute filesystem path
/// (Windows drive, POSIX, or UNC). Relative paths and other schemes fail.
pub fn is_valid_source_location(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    HTTP_URL.is_match(value)
        || WINDOWS_ABSOLUTE.is_match(value)
        || UNC_PATH.is_match(value)
        || (value.starts_with('/') && !value.starts_with("//"))
}
