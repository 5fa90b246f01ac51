//! Exit code constants for the nugetcfg CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, missing file, invalid settings)
//! - 2: Validation failure (error-level issues in the config)
//! - 3: Parse failure (malformed XML)
//! - 4: I/O failure (read or write of a document)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, missing files, or invalid settings.
pub const USER_ERROR: i32 = 1;

/// Validation failure: the config has error-level issues.
pub const VALIDATION_FAILURE: i32 = 2;

/// Parse failure: the document is not well-formed XML.
pub const PARSE_FAILURE: i32 = 3;

/// I/O failure: reading or writing a document failed.
pub const IO_FAILURE: i32 = 4;
