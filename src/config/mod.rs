//! Settings for nugetcfg.
//!
//! This module defines the `Settings` struct read from `nugetcfg.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! defaults for every field, and validation of values.

mod model;
mod operations;
pub mod types;


pub use model::Settings;
pub use operations::DEFAULT_SETTINGS_FILE;
pub use types::LineEndingSetting;
