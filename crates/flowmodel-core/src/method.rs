//! Endpoint identities and candidate methods.
//!
//! An [`EndpointIdentity`] names one API endpoint (function, method,
//! constructor, class or module) in an ecosystem. A [`Method`] is an identity as
//! listed by the analysis engine, with its library, support status and usages.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::ModelVariant;

// ============================================================================
// Endpoint Type
// ============================================================================

/// Kind of endpoint an identity refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EndpointType {
    /// Free function (Python module-level function).
    Function,
    /// Instance method.
    #[default]
    Method,
    /// Constructor (`__init__`, Ruby `new` on a singleton class).
    Constructor,
    /// Class itself.
    Class,
    /// Module or namespace.
    Module,
    /// Python `@classmethod`.
    ClassMethod,
    /// Python `@staticmethod`.
    StaticMethod,
}

impl EndpointType {
    /// Name as shown to users and written to JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointType::Function => "Function",
            EndpointType::Method => "Method",
            EndpointType::Constructor => "Constructor",
            EndpointType::Class => "Class",
            EndpointType::Module => "Module",
            EndpointType::ClassMethod => "ClassMethod",
            EndpointType::StaticMethod => "StaticMethod",
        }
    }
}

impl fmt::Display for EndpointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Endpoint Identity
// ============================================================================

/// Identity of an endpoint within one ecosystem.
///
/// `signature` is derived by the ecosystem adapter and uniquely identifies the
/// identity within that ecosystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointIdentity {
    pub package_name: String,
    pub type_name: String,
    pub method_name: String,
    /// Raw parameter list as reported by the engine, e.g. `(String,int)`.
    pub method_parameters: String,
    pub endpoint_type: EndpointType,
    pub signature: String,
}

/// Split a raw parameter list into individual parameters.
///
/// `"(a,b:)"` gives `["a", "b:"]`; `"()"` and `""` give no parameters.
pub fn arguments_list(method_parameters: &str) -> Vec<String> {
    let inner = method_parameters
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(method_parameters);

    if inner.is_empty() {
        return Vec::new();
    }

    inner.split(',').map(str::to_string).collect()
}

// ============================================================================
// Methods and Usages
// ============================================================================

/// How a usage site was classified by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageClassification {
    Source,
    Test,
    Generated,
    #[default]
    Unknown,
}

/// Location of a usage in the analyzed code base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageLocation {
    pub uri: String,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

/// A single call site of a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Source text of the call.
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<UsageLocation>,
    #[serde(default)]
    pub classification: UsageClassification,
}

/// A candidate endpoint as listed by the analysis engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    #[serde(flatten)]
    pub identity: EndpointIdentity,
    /// Library (jar, gem, package) that contains the method.
    #[serde(default)]
    pub library: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_version: Option<String>,
    /// Whether the engine already has models for the method.
    #[serde(default)]
    pub supported: bool,
    /// Variant of the existing support, `none` when unsupported.
    #[serde(default)]
    pub supported_type: ModelVariant,
    #[serde(default)]
    pub usages: Vec<Usage>,
    /// Engine-specific endpoint kind (`InstanceMethod`, `InitMethod`, ...), when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_kind: Option<String>,
}

impl Method {
    /// Signature of the underlying identity.
    pub fn signature(&self) -> &str {
        &self.identity.signature
    }

    /// Number of call sites.
    pub fn usage_count(&self) -> usize {
        self.usages.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
