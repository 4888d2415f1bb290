//! Row-tuple wire format.
//!
//! Rows are the fixed-width tuples exchanged with the analysis engine and the
//! persistence layer: JSON arrays of booleans, numbers and strings. Each
//! (ecosystem, variant) pair has a static column table; [`check_row_shape`]
//! verifies a row against it before an adapter decodes it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::ModelVariant;

/// A single scalar in a row tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowValue {
    Boolean(bool),
    Number(serde_json::Number),
    String(String),
}

/// One row of the wire format.
pub type RowTuple = Vec<RowValue>;

impl RowValue {
    /// String content, if this is a string column.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RowValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RowValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for RowValue {
    fn from(value: &str) -> Self {
        RowValue::String(value.to_string())
    }
}

impl From<String> for RowValue {
    fn from(value: String) -> Self {
        RowValue::String(value)
    }
}

impl From<bool> for RowValue {
    fn from(value: bool) -> Self {
        RowValue::Boolean(value)
    }
}

impl fmt::Display for RowValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowValue::Boolean(b) => write!(f, "{}", b),
            RowValue::Number(n) => write!(f, "{}", n),
            RowValue::String(s) => f.write_str(s),
        }
    }
}

/// Expected scalar kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    String,
    Boolean,
}

impl ColumnKind {
    fn name(&self) -> &'static str {
        match self {
            ColumnKind::String => "string",
            ColumnKind::Boolean => "boolean",
        }
    }

    fn accepts(&self, value: &RowValue) -> bool {
        matches!(
            (self, value),
            (ColumnKind::String, RowValue::String(_)) | (ColumnKind::Boolean, RowValue::Boolean(_))
        )
    }
}

/// Check that a row has the arity and column kinds of a column table.
pub fn check_row_shape(
    variant: ModelVariant,
    columns: &[ColumnKind],
    row: &[RowValue],
) -> Result<(), ModelError> {
    if row.len() != columns.len() {
        return Err(ModelError::RowArity {
            variant,
            expected: columns.len(),
            actual: row.len(),
        });
    }

    for (index, (column, value)) in columns.iter().zip(row).enumerate() {
        if !column.accepts(value) {
            return Err(ModelError::ColumnKind {
                variant,
                index,
                expected: column.name(),
            });
        }
    }

    Ok(())
}

/// String at `index`, or the empty string when the column is missing or not a string.
///
/// Adapters only call this on rows that passed [`check_row_shape`].
pub fn string_at(row: &[RowValue], index: usize) -> &str {
    row.get(index).and_then(RowValue::as_str).unwrap_or("")
}

// ============================================================================
// Tests
// ============================================================================
