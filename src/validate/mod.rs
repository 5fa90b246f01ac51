//! Validation rules for a [`ConfigModel`].
//!
//! Validation is a pure function from model to issues. It never fails and
//! never mutates; callers decide whether error-level issues block a save.
//!
//! Rules:
//! - `EMPTY_KEY`: a source key is empty or whitespace
//! - `DUP_KEY`: a source key repeats an earlier one (first occurrence is fine)
//! - `BAD_URL`: a source value is neither an http(s) URL nor an absolute path
//! - `DUP_PATTERN`: a pattern repeats within one mapping

mod location;


pub use location::is_valid_source_location;

use crate::model::{ConfigModel, ValidationIssue};
use std::collections::HashSet;

pub const EMPTY_KEY: &str = "EMPTY_KEY";
pub const DUP_KEY: &str = "DUP_KEY";
pub const BAD_URL: &str = "BAD_URL";
pub const DUP_PATTERN: &str = "DUP_PATTERN";

/// Key segment used in issue paths when the key is blank.
const EMPTY_SEGMENT: &str = "<empty>";

/// Compute all issues for a model, in source order then mapping order.
pub fn validate(model: &ConfigModel) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen_keys = HashSet::new();

    for source in &model.sources {
        let segment = path_segment(&source.key);

        if source.key.trim().is_empty() {
            issues.push(ValidationIssue::error(
                EMPTY_KEY,
                "Source key is empty",
                format!("sources.{}", segment),
            ));
        } else if !seen_keys.insert(source.key.as_str()) {
            issues.push(ValidationIssue::error(
                DUP_KEY,
                format!("Duplicate source key '{}'", source.key),
                format!("sources.{}", segment),
            ));
        }

        if !is_valid_source_location(&source.url) {
            issues.push(ValidationIssue::error(
                BAD_URL,
                format!("Invalid URL for source '{}'", source.key),
                format!("sources.{}.url", segment),
            ));
        }
    }

    for mapping in &model.mappings {
        let mut seen_patterns = HashSet::new();
        for pattern in &mapping.patterns {
            if !seen_patterns.insert(pattern.as_str()) {
                issues.push(ValidationIssue::error(
                    DUP_PATTERN,
                    format!(
                        "Duplicate pattern '{}' for source '{}'",
                        pattern, mapping.source_key
                    ),
                    format!("mappings.{}", path_segment(&mapping.source_key)),
                ));
            }
        }
    }

    issues
}

/// Whether any issue is at error level.
pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(ValidationIssue::is_error)
}

/// Format issues as a user-facing report, one per line.
///
/// ```text
/// error DUP_KEY sources.nuget.org: Duplicate source key 'nuget.org'
/// error BAD_URL sources.local.url: Invalid URL for source 'local'
/// ```
pub fn format_issues(issues: &[ValidationIssue]) -> String {
    let mut out = String::new();
    for issue in issues {
        out.push_str(&format!(
            "{} {} {}: {}\n",
            issue.level, issue.code, issue.path, issue.message
        ));
    }
    out
}

fn path_segment(key: &str) -> &str {
    if key.trim().is_empty() {
        EMPTY_SEGMENT
    } else {
        key
    }
}
