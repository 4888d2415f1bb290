//! Validation of the models attached to one method.
//!
//! Two rules are checked:
//!
//! - **Duplicates**: two models with the same variant, kind, input and output
//!   (and, for type models, the same related type and path). Provenance is not
//!   part of the comparison, so a generated and a manual copy of the same model
//!   are still duplicates.
//! - **Conflicts**: a neutral model of kind `K` next to any model of variant
//!   `K`, e.g. a neutral `sink` and a real sink.
//!
//! Errors carry the index of the offending model so callers can highlight it.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::{EndpointModel, ModelVariant, ModeledMethod};

/// Which rule a validation error comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    Duplicate,
    Conflict,
}

/// One problem with a method's models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelValidationError {
    /// Index into the validated slice.
    pub index: usize,
    pub kind: ValidationErrorKind,
    pub title: String,
    pub message: String,
    pub action_text: String,
}

impl ModelValidationError {
    fn duplicate(index: usize) -> Self {
        ModelValidationError {
            index,
            kind: ValidationErrorKind::Duplicate,
            title: "Duplicated classification".to_string(),
            message: "This method has two identical or conflicting classifications.".to_string(),
            action_text: "Modify or remove the duplicated classification.".to_string(),
        }
    }

    fn conflict(index: usize, kind: &str) -> Self {
        ModelValidationError {
            index,
            kind: ValidationErrorKind::Conflict,
            title: "Conflicting classification".to_string(),
            message: format!(
                "This method has a neutral {} classification, which conflicts with other {} classifications.",
                kind, kind
            ),
            action_text: "Modify or remove the neutral classification.".to_string(),
        }
    }
}

/// Fields that decide whether two models are the same.
#[derive(Debug, PartialEq, Eq, Hash)]
struct ModelKey<'a> {
    variant: ModelVariant,
    kind: Option<&'a str>,
    input: Option<&'a str>,
    output: Option<&'a str>,
    related_type_name: Option<&'a str>,
    type_path: Option<&'a str>,
}

impl<'a> ModelKey<'a> {
    fn of(model: &'a EndpointModel) -> Self {
        let (related_type_name, type_path) = match model {
            EndpointModel::Type(ty) => (Some(ty.related_type_name.as_str()), Some(ty.path.as_str())),
            _ => (None, None),
        };
        ModelKey {
            variant: model.variant(),
            kind: model.kind(),
            input: model.input(),
            output: model.output(),
            related_type_name,
            type_path,
        }
    }
}

/// Validate the models of one method.
///
/// `none` models are ignored. Errors are sorted by index.
pub fn validate_modeled_methods(models: &[ModeledMethod]) -> Vec<ModelValidationError> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for (index, method) in models.iter().enumerate() {
        if !method.model.is_modeled() {
            continue;
        }
        if !seen.insert(ModelKey::of(&method.model)) {
            errors.push(ModelValidationError::duplicate(index));
        }
    }

    let variants: BTreeSet<ModelVariant> = models.iter().map(ModeledMethod::variant).collect();
    let mut reported_kinds = HashSet::new();
    for (index, method) in models.iter().enumerate() {
        let EndpointModel::Neutral(neutral) = &method.model else {
            continue;
        };
        let conflicts = neutral
            .kind
            .parse::<ModelVariant>()
            .is_ok_and(|variant| {
                !matches!(variant, ModelVariant::None | ModelVariant::Neutral)
                    && variants.contains(&variant)
            });
        if conflicts && reported_kinds.insert(neutral.kind.as_str()) {
            errors.push(ModelValidationError::conflict(index, &neutral.kind));
        }
    }

    errors.sort_by_key(|error| error.index);
    errors
}

// ============================================================================
// Tests
// ============================================================================
