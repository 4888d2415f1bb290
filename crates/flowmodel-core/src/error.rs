//! Error types for flowmodel core operations.
//!
//! Malformed access paths and conflicting models are never errors here: they
//! are reported as diagnostics and validation results. `ModelError` only covers
//! the wire boundary (rows that do not fit an ecosystem's column table) and
//! adapter lookup.

use thiserror::Error;

use crate::adapter::Ecosystem;
use crate::model::ModelVariant;

/// Errors raised at the adapter and row boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// No adapter is registered for the ecosystem.
    #[error("no adapter registered for ecosystem '{ecosystem}'")]
    UnknownEcosystem { ecosystem: String },

    /// The ecosystem has no extensible predicate for this variant.
    #[error("ecosystem '{ecosystem}' does not support {variant} models")]
    UnsupportedVariant {
        ecosystem: Ecosystem,
        variant: ModelVariant,
    },

    /// Row has the wrong number of columns.
    #[error("{variant} row has {actual} columns, expected {expected}")]
    RowArity {
        variant: ModelVariant,
        expected: usize,
        actual: usize,
    },

    /// Column holds a scalar of the wrong kind.
    #[error("{variant} row column {index} should be a {expected}")]
    ColumnKind {
        variant: ModelVariant,
        index: usize,
        expected: &'static str,
    },

    /// A chained path was expected to name only a method but carried a suffix.
    #[error("path '{path}' must refer to a method only, found trailing '{suffix}'")]
    MethodPathExpected { path: String, suffix: String },
}

impl ModelError {
    /// Create an unknown ecosystem error.
    pub fn unknown_ecosystem(ecosystem: impl Into<String>) -> Self {
        ModelError::UnknownEcosystem {
            ecosystem: ecosystem.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
