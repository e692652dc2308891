//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: field error (bad dimensions, invalid parameter, empty text)
//! - 11: I/O error (scene file read, snapshot write)
//! - 12: input error (bad JSON params, malformed size or pointer)
//! - 13: serialization error

use std::fmt;

use textswarm_core::SwarmError;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
pub enum CliError {
    /// A field-level error (bad dimensions, invalid parameter).
    Field(SwarmError),
    /// An I/O error (scene file, PNG snapshot).
    Io(String),
    /// A user input error (bad JSON params, malformed argument).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Field(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Field(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl From<SwarmError> for CliError {
    fn from(e: SwarmError) -> Self {
        match e {
            SwarmError::Io(msg) => CliError::Io(msg),
            other => CliError::Field(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
