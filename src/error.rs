//! Error types for the nugetcfg CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use crate::xml::XmlError;
use thiserror::Error;

/// Main error type for nugetcfg operations.
///
/// Each variant maps to a specific exit code. Validation issues are data, not
/// errors; `ValidationError` is only raised when a command refuses to persist
/// a model that has error-level issues.
#[derive(Error, Debug)]
pub enum NugetError {
    /// User provided invalid arguments or the environment is in an invalid state.
    #[error("{0}")]
    UserError(String),

    /// The config has error-level validation issues.
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// The document is not well-formed XML.
    #[error("Failed to parse nuget.config: {0}")]
    Parse(#[from] XmlError),

    /// Reading or writing a document failed.
    #[error("I/O failure: {0}")]
    IoError(String),
}

impl NugetError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            NugetError::UserError(_) => exit_codes::USER_ERROR,
            NugetError::ValidationError(_) => exit_codes::VALIDATION_FAILURE,
            NugetError::Parse(_) => exit_codes::PARSE_FAILURE,
            NugetError::IoError(_) => exit_codes::IO_FAILURE,
        }
    }
}

/// Result type alias for nugetcfg operations.
pub type Result<T> = std::result::Result<T, NugetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = NugetError::UserError("bad argument".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn validation_error_has_correct_exit_code() {
        let err = NugetError::ValidationError("2 error(s)".to_string());
        assert_eq!(err.exit_code(), exit_codes::VALIDATION_FAILURE);
    }

    #[test]
    fn parse_error_converts_and_has_correct_exit_code() {
        let err: NugetError = XmlError::EmptyDocument.into();
        assert_eq!(err.exit_code(), exit_codes::PARSE_FAILURE);
        assert!(err.to_string().starts_with("Failed to parse nuget.config"));
    }

    #[test]
    fn io_error_has_correct_exit_code() {
        let err = NugetError::IoError("disk full".to_string());
        assert_eq!(err.exit_code(), exit_codes::IO_FAILURE);
        assert_eq!(err.to_string(), "I/O failure: disk full");
    }
}
