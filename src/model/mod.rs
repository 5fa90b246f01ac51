//! In-memory model of a nuget.config file.
//!
//! The model holds package sources, their enabled state, and package source
//! mappings. It optionally carries the full original XML text so the
//! serializer can merge changes back into it instead of regenerating.

mod types;


pub use types::{ConfigModel, IssueLevel, PackageSource, PackageSourceMapping, ValidationIssue};
