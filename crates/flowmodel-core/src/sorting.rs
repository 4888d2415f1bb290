//! Grouping and display order of candidate methods.
//!
//! Every ordering here is a total order over the content of its input, so the
//! result does not depend on the order methods arrive in.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::method::Method;
use crate::model::ModeledMethod;

/// Models keyed by method signature.
pub type ModelsBySignature = BTreeMap<String, Vec<ModeledMethod>>;

/// Methods keyed by group name.
pub type MethodGroups = BTreeMap<String, Vec<Method>>;

/// What is being modeled, which decides how methods are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Modeling the dependencies an application calls: group by library.
    #[default]
    Application,
    /// Modeling a framework's own API: group by package.
    Framework,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Application => "application",
            Mode::Framework => "framework",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "application" => Ok(Mode::Application),
            "framework" => Ok(Mode::Framework),
            other => Err(format!("unknown mode '{}'", other)),
        }
    }
}

// ============================================================================
// Grouping
// ============================================================================

/// Group methods by package (framework mode) or library (application mode).
///
/// Methods keep their input order within a group.
pub fn group_methods(methods: &[Method], mode: Mode) -> MethodGroups {
    let mut groups = MethodGroups::new();
    for method in methods {
        let key = match mode {
            Mode::Framework => &method.identity.package_name,
            Mode::Application => &method.library,
        };
        groups.entry(key.clone()).or_default().push(method.clone());
    }
    groups
}

/// Supported methods over all methods, as a fraction that compares exactly.
fn supported_ratio(methods: &[Method]) -> (u64, u64) {
    if methods.is_empty() {
        return (0, 1);
    }
    let supported = methods.iter().filter(|method| method.supported).count();
    (supported as u64, methods.len() as u64)
}

fn total_usages(methods: &[Method]) -> usize {
    methods.iter().map(Method::usage_count).sum()
}

/// Group names in display order.
///
/// Least supported first, then most used, then largest, then by name.
pub fn sort_group_names(groups: &MethodGroups) -> Vec<String> {
    let mut names: Vec<&String> = groups.keys().collect();
    names.sort_by(|a, b| {
        let (group_a, group_b) = (&groups[*a], &groups[*b]);
        let (supported_a, total_a) = supported_ratio(group_a);
        let (supported_b, total_b) = supported_ratio(group_b);

        (supported_a * total_b)
            .cmp(&(supported_b * total_a))
            .then_with(|| total_usages(group_b).cmp(&total_usages(group_a)))
            .then_with(|| group_b.len().cmp(&group_a.len()))
            .then_with(|| a.cmp(b))
    });
    names.into_iter().cloned().collect()
}

// ============================================================================
// Method Order
// ============================================================================

fn has_model(models: &ModelsBySignature, signature: &str) -> bool {
    models
        .get(signature)
        .is_some_and(|models| models.iter().any(|m| m.model.is_modeled()))
}

/// Whether a method is still open for modeling.
///
/// Unsupported methods always are. Supported ones only when they already carry
/// a model or have unsaved edits.
pub fn can_method_be_modeled(method: &Method, models: &ModelsBySignature, is_unsaved: bool) -> bool {
    !method.supported || has_model(models, method.signature()) || is_unsaved
}

/// Primary sort bucket of a method, 0 first.
fn method_rank(
    method: &Method,
    models: &ModelsBySignature,
    modified: &BTreeSet<String>,
    auto_processed: &BTreeSet<String>,
) -> u8 {
    let signature = method.signature();
    let is_unsaved = modified.contains(signature);

    if !can_method_be_modeled(method, models, is_unsaved) {
        return 4;
    }

    let is_modeled = has_model(models, signature);
    let is_auto_processed = auto_processed.contains(signature);

    if is_modeled && is_unsaved && is_auto_processed {
        0
    } else if !is_modeled && is_auto_processed {
        1
    } else if (is_modeled && is_unsaved) || !is_modeled {
        2
    } else {
        3
    }
}

/// Methods in display order.
///
/// `modified` holds the signatures with unsaved edits, `auto_processed` the
/// signatures that automated modeling has already looked at.
pub fn sort_methods(
    methods: &[Method],
    models: &ModelsBySignature,
    modified: &BTreeSet<String>,
    auto_processed: &BTreeSet<String>,
) -> Vec<Method> {
    let mut ranked: Vec<(u8, &Method)> = methods
        .iter()
        .map(|method| (method_rank(method, models, modified, auto_processed), method))
        .collect();

    ranked.sort_by(|(rank_a, a), (rank_b, b)| compare_ranked(*rank_a, a, *rank_b, b));
    ranked.into_iter().map(|(_, method)| method.clone()).collect()
}

fn compare_ranked(rank_a: u8, a: &Method, rank_b: u8, b: &Method) -> Ordering {
    rank_a
        .cmp(&rank_b)
        .then_with(|| b.usage_count().cmp(&a.usage_count()))
        .then_with(|| a.signature().cmp(b.signature()))
}

// ============================================================================
// Tests
// ============================================================================
