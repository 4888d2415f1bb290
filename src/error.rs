//! Error types and error code constants for the flowmodel CLI.
//!
//! `FlowError` is the single error type rendered as JSON by the binary. Domain
//! errors from the adapter crates and from configuration loading are bridged
//! into it with `From` impls.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller, malformed rows or config)
//! - `3`: Resolution errors (unknown signature, file not found)
//! - `10`: Internal errors (bugs, unexpected state)

use std::fmt;

use thiserror::Error;

pub use flowmodel_core::error::ModelError;

use crate::config::ConfigError;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output.
///
/// These codes map to CLI exit codes and appear in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad input, malformed request).
    InvalidArguments = 2,
    /// Resolution errors (signature not found, file not found).
    ResolutionError = 3,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// No method with this signature in the input.
    #[error("unknown method signature '{signature}'")]
    UnknownSignature { signature: String },

    /// Adapter or row boundary error.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

impl FlowError {
    /// Create an invalid arguments error without details.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        FlowError::InvalidArguments {
            message: message.into(),
            details: None,
        }
    }

    /// Create an invalid arguments error with structured details.
    pub fn invalid_args_with_details(message: impl Into<String>, details: serde_json::Value) -> Self {
        FlowError::InvalidArguments {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        FlowError::FileNotFound { path: path.into() }
    }

    /// Create an unknown signature error.
    pub fn unknown_signature(signature: impl Into<String>) -> Self {
        FlowError::UnknownSignature {
            signature: signature.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        FlowError::InternalError {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&FlowError> for OutputErrorCode {
    fn from(err: &FlowError) -> Self {
        match err {
            FlowError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            FlowError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            FlowError::UnknownSignature { .. } => OutputErrorCode::ResolutionError,
            FlowError::Model(ModelError::UnknownEcosystem { .. }) => {
                OutputErrorCode::ResolutionError
            }
            FlowError::Model(_) => OutputErrorCode::InvalidArguments,
            FlowError::Config(_) => OutputErrorCode::InvalidArguments,
            FlowError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<FlowError> for OutputErrorCode {
    fn from(err: FlowError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Bridge: serde_json::Error -> FlowError
// ============================================================================

impl From<serde_json::Error> for FlowError {
    fn from(err: serde_json::Error) -> Self {
        FlowError::invalid_args_with_details(
            format!("malformed JSON input: {}", err),
            serde_json::json!({ "line": err.line(), "column": err.column() }),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
