//! Ecosystem adapter trait and adapter registry.
//!
//! This module defines the [`EcosystemAdapter`] trait for pluggable ecosystem
//! support. Each adapter translates between the canonical [`ModeledMethod`], the
//! ecosystem's concrete access-path syntax, and the fixed-width row tuples the
//! analysis engine reads and writes.
//!
//! # Grammar Families
//!
//! - **Flat** adapters (Java, C#) spread the method identity over separate
//!   columns (`package, type, subtypes, name, signature, ext, ...`). Only the
//!   argument addressing is written as an access path.
//! - **Chained** adapters (Python, Ruby) encode the method itself as a leading
//!   run of path tokens (`Member[get]`, `Method[exec]`) followed by the
//!   addressing suffix. Decoding splits the path back into prefix and suffix.
//!
//! # Row Shapes
//!
//! Adapters publish their column tables through [`EcosystemAdapter::columns`].
//! Decoding assumes a well-shaped row; callers check shapes with
//! [`check_row_shape`](crate::row::check_row_shape) (or use
//! [`EcosystemAdapter::decode_checked`]) and skip rows that do not fit.
//!
//! # Registry
//!
//! Adapters are looked up through an [`AdapterRegistry`] value built once at
//! startup and passed by reference; there is no global adapter table.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::method::{EndpointIdentity, EndpointType};
use crate::model::{
    EndpointModel, ModelVariant, ModeledMethod, NeutralModel, SinkModel, SourceModel,
    SummaryModel, TypeModel,
};
use crate::row::{check_row_shape, ColumnKind, RowTuple, RowValue};

// ============================================================================
// Ecosystem
// ============================================================================

/// Target ecosystem of an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ecosystem {
    Java,
    #[serde(rename = "csharp")]
    CSharp,
    Python,
    Ruby,
}

impl Ecosystem {
    pub const ALL: [Ecosystem; 4] = [
        Ecosystem::Java,
        Ecosystem::CSharp,
        Ecosystem::Python,
        Ecosystem::Ruby,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Java => "java",
            Ecosystem::CSharp => "csharp",
            Ecosystem::Python => "python",
            Ecosystem::Ruby => "ruby",
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ecosystem {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ecosystem::ALL
            .into_iter()
            .find(|ecosystem| ecosystem.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ModelError::unknown_ecosystem(s))
    }
}

// ============================================================================
// Shared Predicate Metadata
// ============================================================================

/// Extensible predicate name for a variant, shared by all ecosystems.
pub fn shared_extensible_predicate(variant: ModelVariant) -> Option<&'static str> {
    match variant {
        ModelVariant::Source => Some("sourceModel"),
        ModelVariant::Sink => Some("sinkModel"),
        ModelVariant::Summary => Some("summaryModel"),
        ModelVariant::Neutral => Some("neutralModel"),
        ModelVariant::Type => Some("typeModel"),
        ModelVariant::None => None,
    }
}

/// Kinds accepted for a variant, shared by all ecosystems.
pub fn shared_kinds(variant: ModelVariant) -> &'static [&'static str] {
    match variant {
        ModelVariant::Source => &["local", "remote"],
        ModelVariant::Sink => &[
            "code-injection",
            "command-injection",
            "environment-injection",
            "file-content-store",
            "html-injection",
            "js-injection",
            "ldap-injection",
            "log-injection",
            "path-injection",
            "request-forgery",
            "sql-injection",
            "url-redirection",
        ],
        ModelVariant::Summary => &["taint", "value"],
        ModelVariant::Neutral => &["summary", "source", "sink"],
        ModelVariant::Type | ModelVariant::None => &[],
    }
}

/// Join a method-identifying prefix and an addressing suffix.
///
/// The `.` is omitted when either side is empty.
pub fn join_path(prefix: &str, suffix: &str) -> String {
    match (prefix.is_empty(), suffix.is_empty()) {
        (true, _) => suffix.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{}.{}", prefix, suffix),
    }
}

// ============================================================================
// Argument Options
// ============================================================================

/// An addressable argument position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodArgument {
    /// Access path of the position, e.g. `Argument[0]`.
    pub path: String,
    /// Label shown to the user, e.g. `Argument[0]: String`.
    pub label: String,
}

impl MethodArgument {
    pub fn new(path: impl Into<String>, label: impl Into<String>) -> Self {
        MethodArgument {
            path: path.into(),
            label: label.into(),
        }
    }

    /// Argument whose label is its path.
    pub fn bare(path: impl Into<String>) -> Self {
        let path = path.into();
        MethodArgument {
            label: path.clone(),
            path,
        }
    }
}

/// Argument positions of a method and the one to preselect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentOptions {
    pub options: Vec<MethodArgument>,
    pub default_argument_path: String,
}

// ============================================================================
// Ecosystem Adapter Trait
// ============================================================================

/// Translation between canonical models, ecosystem paths, and row tuples.
///
/// Implementations provide one encode/decode pair per modeled variant. The type
/// pair has a default implementation that reports the variant as unsupported,
/// for ecosystems without type models.
///
/// Decoders receive rows that already match [`columns`](Self::columns) and
/// must not fail on them, except where the ecosystem grammar itself forbids a
/// value (reported as [`ModelError::MethodPathExpected`]).
pub trait EcosystemAdapter: Send + Sync {
    /// The ecosystem this adapter serves.
    fn ecosystem(&self) -> Ecosystem;

    /// Canonical signature for an identity. `identity.signature` is ignored.
    fn create_method_signature(&self, identity: &EndpointIdentity) -> String;

    /// Column table for a variant, `None` when the variant is unsupported.
    fn columns(&self, variant: ModelVariant) -> Option<&'static [ColumnKind]>;

    /// Endpoint types a variant may be attached to.
    fn supported_endpoint_types(&self, variant: ModelVariant) -> &'static [EndpointType];

    fn encode_source(&self, identity: &EndpointIdentity, model: &SourceModel) -> RowTuple;
    fn decode_source(&self, row: &[RowValue]) -> Result<ModeledMethod, ModelError>;

    fn encode_sink(&self, identity: &EndpointIdentity, model: &SinkModel) -> RowTuple;
    fn decode_sink(&self, row: &[RowValue]) -> Result<ModeledMethod, ModelError>;

    fn encode_summary(&self, identity: &EndpointIdentity, model: &SummaryModel) -> RowTuple;
    fn decode_summary(&self, row: &[RowValue]) -> Result<ModeledMethod, ModelError>;

    fn encode_neutral(&self, identity: &EndpointIdentity, model: &NeutralModel) -> RowTuple;
    fn decode_neutral(&self, row: &[RowValue]) -> Result<ModeledMethod, ModelError>;

    fn encode_type(
        &self,
        _identity: &EndpointIdentity,
        _model: &TypeModel,
    ) -> Result<RowTuple, ModelError> {
        Err(self.unsupported(ModelVariant::Type))
    }

    fn decode_type(&self, _row: &[RowValue]) -> Result<ModeledMethod, ModelError> {
        Err(self.unsupported(ModelVariant::Type))
    }

    /// Addressable argument positions for an identity's parameter list.
    fn argument_options(&self, identity: &EndpointIdentity) -> ArgumentOptions;

    /// Endpoint type for an identity listed by the engine.
    ///
    /// Only ecosystems that do not distinguish functions from methods at the
    /// identity layer need this. `endpoint_kind` is the engine's kind column,
    /// when present. `None` means "use the type the engine reported".
    fn endpoint_type_for_endpoint(
        &self,
        _identity: &EndpointIdentity,
        _endpoint_kind: Option<&str>,
    ) -> Option<EndpointType> {
        None
    }

    /// Identity named by a `(type, path)` column pair, for chained ecosystems.
    ///
    /// Used to key suggestion rows by method signature.
    fn identity_from_type_and_path(&self, _type_column: &str, _path: &str) -> Option<EndpointIdentity> {
        None
    }

    /// Extensible predicate written for a variant.
    fn extensible_predicate(&self, variant: ModelVariant) -> Option<&'static str> {
        self.columns(variant)
            .and_then(|_| shared_extensible_predicate(variant))
    }

    /// Kinds accepted for a variant.
    fn supported_kinds(&self, variant: ModelVariant) -> &'static [&'static str] {
        shared_kinds(variant)
    }

    /// Encode any modeled variant.
    fn encode(&self, method: &ModeledMethod) -> Result<RowTuple, ModelError> {
        let identity = &method.identity;
        match &method.model {
            EndpointModel::None => Err(self.unsupported(ModelVariant::None)),
            EndpointModel::Source(model) => Ok(self.encode_source(identity, model)),
            EndpointModel::Sink(model) => Ok(self.encode_sink(identity, model)),
            EndpointModel::Summary(model) => Ok(self.encode_summary(identity, model)),
            EndpointModel::Neutral(model) => Ok(self.encode_neutral(identity, model)),
            EndpointModel::Type(model) => self.encode_type(identity, model),
        }
    }

    /// Decode a well-shaped row of the given variant.
    fn decode(&self, variant: ModelVariant, row: &[RowValue]) -> Result<ModeledMethod, ModelError> {
        match variant {
            ModelVariant::None => Err(self.unsupported(ModelVariant::None)),
            ModelVariant::Source => self.decode_source(row),
            ModelVariant::Sink => self.decode_sink(row),
            ModelVariant::Summary => self.decode_summary(row),
            ModelVariant::Neutral => self.decode_neutral(row),
            ModelVariant::Type => self.decode_type(row),
        }
    }

    /// Check a row against the column table, then decode it.
    fn decode_checked(
        &self,
        variant: ModelVariant,
        row: &[RowValue],
    ) -> Result<ModeledMethod, ModelError> {
        let columns = self
            .columns(variant)
            .ok_or_else(|| self.unsupported(variant))?;
        check_row_shape(variant, columns, row)?;
        self.decode(variant, row)
    }

    /// Error for a variant this adapter cannot handle.
    fn unsupported(&self, variant: ModelVariant) -> ModelError {
        ModelError::UnsupportedVariant {
            ecosystem: self.ecosystem(),
            variant,
        }
    }
}

// ============================================================================
// Adapter Registry
// ============================================================================

/// Lookup table from ecosystem to adapter.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: BTreeMap<Ecosystem, Box<dyn EcosystemAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        AdapterRegistry::default()
    }

    /// Register an adapter, replacing any adapter for the same ecosystem.
    pub fn register(&mut self, adapter: Box<dyn EcosystemAdapter>) {
        self.adapters.insert(adapter.ecosystem(), adapter);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, adapter: impl EcosystemAdapter + 'static) -> Self {
        self.register(Box::new(adapter));
        self
    }

    /// Adapter for an ecosystem.
    pub fn get(&self, ecosystem: Ecosystem) -> Result<&dyn EcosystemAdapter, ModelError> {
        self.adapters
            .get(&ecosystem)
            .map(|adapter| adapter.as_ref())
            .ok_or_else(|| ModelError::unknown_ecosystem(ecosystem.as_str()))
    }

    /// Registered ecosystems, in a stable order.
    pub fn ecosystems(&self) -> impl Iterator<Item = Ecosystem> + '_ {
        self.adapters.keys().copied()
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("ecosystems", &self.adapters.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
