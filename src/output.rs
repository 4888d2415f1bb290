//! JSON output types for CLI responses.
//!
//! Every response is a JSON object with `status` first and a
//! `schema_version`, followed by the command's payload. Errors use
//! [`ErrorResponse`] with a numeric code that matches the process exit code.
//!
//! Payload field names follow the model types they carry (camelCase), so a
//! response can be fed back as input to another command.

use std::collections::BTreeMap;
use std::io::{self, Write};

use flowmodel_core::access_path::{AccessPathDiagnostic, AccessPathToken};
use flowmodel_core::adapter::{ArgumentOptions, Ecosystem};
use flowmodel_core::consistency::ConsistencyNotice;
use flowmodel_core::method::EndpointType;
use flowmodel_core::model::ModeledMethod;
use flowmodel_core::suggestions::SuggestionOption;
use flowmodel_core::validation::ModelValidationError;
use serde::{Deserialize, Serialize};

use crate::error::{FlowError, OutputErrorCode};
use crate::rows::EncodedRows;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Errors
// ============================================================================

/// Error details in a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code, also the exit code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    /// Create from a FlowError.
    pub fn from_error(err: &FlowError) -> Self {
        let code = OutputErrorCode::from(err).code();
        let details = match err {
            FlowError::InvalidArguments { details, .. } => details.clone(),
            FlowError::UnknownSignature { signature } => {
                Some(serde_json::json!({ "signature": signature }))
            }
            FlowError::FileNotFound { path } => Some(serde_json::json!({ "path": path })),
            _ => None,
        };
        ErrorInfo {
            code,
            message: err.to_string(),
            details,
        }
    }
}

/// Response for any failed command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn from_error(err: &FlowError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Access Paths
// ============================================================================

/// Response for `tokens`.
#[derive(Debug, Clone, Serialize)]
pub struct TokensResponse {
    pub status: String,
    pub schema_version: String,
    pub path: String,
    pub tokens: Vec<AccessPathToken>,
}

impl TokensResponse {
    pub fn new(path: impl Into<String>, tokens: Vec<AccessPathToken>) -> Self {
        TokensResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            path: path.into(),
            tokens,
        }
    }
}

/// Response for `validate-path`.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsResponse {
    pub status: String,
    pub schema_version: String,
    pub path: String,
    pub valid: bool,
    pub diagnostics: Vec<AccessPathDiagnostic>,
}

impl DiagnosticsResponse {
    pub fn new(path: impl Into<String>, diagnostics: Vec<AccessPathDiagnostic>) -> Self {
        DiagnosticsResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            path: path.into(),
            valid: diagnostics.is_empty(),
            diagnostics,
        }
    }
}

// ============================================================================
// Rows
// ============================================================================

/// Response for `decode`.
#[derive(Debug, Clone, Serialize)]
pub struct DecodeResponse {
    pub status: String,
    pub schema_version: String,
    pub language: Ecosystem,
    pub models: Vec<ModeledMethod>,
    /// Rows dropped because they did not fit the column table.
    pub skipped: usize,
}

impl DecodeResponse {
    pub fn new(language: Ecosystem, models: Vec<ModeledMethod>, skipped: usize) -> Self {
        DecodeResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            language,
            models,
            skipped,
        }
    }
}

/// Response for `encode`.
#[derive(Debug, Clone, Serialize)]
pub struct EncodeResponse {
    pub status: String,
    pub schema_version: String,
    pub language: Ecosystem,
    /// Rows keyed by extensible predicate.
    pub rows: EncodedRows,
}

impl EncodeResponse {
    pub fn new(language: Ecosystem, rows: EncodedRows) -> Self {
        EncodeResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            language,
            rows,
        }
    }
}

// ============================================================================
// Editing Support
// ============================================================================

/// Response for `arguments`.
#[derive(Debug, Clone, Serialize)]
pub struct ArgumentsResponse {
    pub status: String,
    pub schema_version: String,
    pub signature: String,
    pub endpoint_type: EndpointType,
    #[serde(flatten)]
    pub arguments: ArgumentOptions,
}

impl ArgumentsResponse {
    pub fn new(signature: impl Into<String>, endpoint_type: EndpointType, arguments: ArgumentOptions) -> Self {
        ArgumentsResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            signature: signature.into(),
            endpoint_type,
            arguments,
        }
    }
}

/// Response for `suggest`.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestResponse {
    pub status: String,
    pub schema_version: String,
    pub signature: String,
    pub value: String,
    pub options: Vec<SuggestionOption>,
}

impl SuggestResponse {
    pub fn new(signature: impl Into<String>, value: impl Into<String>, options: Vec<SuggestionOption>) -> Self {
        SuggestResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            signature: signature.into(),
            value: value.into(),
            options,
        }
    }
}

// ============================================================================
// Ordering and Validation
// ============================================================================

/// One group in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortedGroup {
    pub name: String,
    /// Method signatures in display order.
    pub methods: Vec<String>,
}

/// Response for `sort`.
#[derive(Debug, Clone, Serialize)]
pub struct SortResponse {
    pub status: String,
    pub schema_version: String,
    pub groups: Vec<SortedGroup>,
}

impl SortResponse {
    pub fn new(groups: Vec<SortedGroup>) -> Self {
        SortResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            groups,
        }
    }
}

/// Response for `validate-models`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateModelsResponse {
    pub status: String,
    pub schema_version: String,
    pub valid: bool,
    /// Errors keyed by method signature; signatures without errors are omitted.
    pub errors: BTreeMap<String, Vec<ModelValidationError>>,
}

impl ValidateModelsResponse {
    pub fn new(errors: BTreeMap<String, Vec<ModelValidationError>>) -> Self {
        ValidateModelsResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Response for `check-consistency`.
#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyResponse {
    pub status: String,
    pub schema_version: String,
    pub notices: Vec<ConsistencyNotice>,
}

impl ConsistencyResponse {
    pub fn new(notices: Vec<ConsistencyNotice>) -> Self {
        ConsistencyResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            notices,
        }
    }
}

// ============================================================================
// Serialization
// ============================================================================

/// Write a response as pretty JSON followed by a newline.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================
