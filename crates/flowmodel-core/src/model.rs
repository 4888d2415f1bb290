//! Canonical endpoint model.
//!
//! One [`ModeledMethod`] is one row of modeling for one endpoint identity. The
//! model itself is a sum type so that "does this variant carry an input path" is
//! answered by a match, not by probing optional fields.
//!
//! ## JSON shape
//!
//! ```json
//! {
//!   "packageName": "org.sql2o", "typeName": "Connection",
//!   "methodName": "createQuery", "methodParameters": "(String)",
//!   "endpointType": "Method", "signature": "org.sql2o.Connection#createQuery(String)",
//!   "type": "sink", "input": "Argument[0]", "kind": "sql-injection", "provenance": "manual"
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::method::EndpointIdentity;

// ============================================================================
// Variant
// ============================================================================

/// Variant tag of an [`EndpointModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    #[default]
    None,
    Source,
    Sink,
    Summary,
    Neutral,
    Type,
}

impl ModelVariant {
    /// Every variant that can be written to the wire.
    pub const MODELED: [ModelVariant; 5] = [
        ModelVariant::Source,
        ModelVariant::Sink,
        ModelVariant::Summary,
        ModelVariant::Neutral,
        ModelVariant::Type,
    ];

    /// Lowercase variant name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelVariant::None => "none",
            ModelVariant::Source => "source",
            ModelVariant::Sink => "sink",
            ModelVariant::Summary => "summary",
            ModelVariant::Neutral => "neutral",
            ModelVariant::Type => "type",
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(ModelVariant::None),
            "source" => Ok(ModelVariant::Source),
            "sink" => Ok(ModelVariant::Sink),
            "summary" => Ok(ModelVariant::Summary),
            "neutral" => Ok(ModelVariant::Neutral),
            "type" => Ok(ModelVariant::Type),
            other => Err(format!("unknown model variant '{}'", other)),
        }
    }
}

// ============================================================================
// Provenance
// ============================================================================

/// Where a model came from.
///
/// Only the manual/generated distinction matters to consistency checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Provenance {
    /// Written by hand.
    #[default]
    #[serde(rename = "manual")]
    Manual,
    /// Produced by the data-flow model generator.
    #[serde(rename = "df-generated")]
    DfGenerated,
    /// Generated, then reviewed by hand.
    #[serde(rename = "df-manual")]
    DfManual,
    /// Predicted by automated modeling.
    #[serde(rename = "ai-generated")]
    AiGenerated,
    /// Predicted by automated modeling, then reviewed by hand.
    #[serde(rename = "ai-manual")]
    AiManual,
}

impl Provenance {
    /// Wire string used in row tuples.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Manual => "manual",
            Provenance::DfGenerated => "df-generated",
            Provenance::DfManual => "df-manual",
            Provenance::AiGenerated => "ai-generated",
            Provenance::AiManual => "ai-manual",
        }
    }

    /// Parse a wire string. Unknown values are treated as manual.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "manual" => Provenance::Manual,
            "df-generated" => Provenance::DfGenerated,
            "df-manual" => Provenance::DfManual,
            "ai-generated" => Provenance::AiGenerated,
            "ai-manual" => Provenance::AiManual,
            other => {
                warn!(provenance = other, "unknown provenance, treating as manual");
                Provenance::Manual
            }
        }
    }

    /// True when no human reviewed the model.
    pub fn is_generated(&self) -> bool {
        matches!(self, Provenance::DfGenerated | Provenance::AiGenerated)
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Endpoint Model
// ============================================================================

/// Data flows out of the endpoint at `output`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceModel {
    pub output: String,
    pub kind: String,
    #[serde(default)]
    pub provenance: Provenance,
}

/// Data flowing into the endpoint at `input` reaches a sensitive operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SinkModel {
    pub input: String,
    pub kind: String,
    #[serde(default)]
    pub provenance: Provenance,
}

/// Data flows through the endpoint from `input` to `output`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SummaryModel {
    pub input: String,
    pub output: String,
    pub kind: String,
    #[serde(default)]
    pub provenance: Provenance,
}

/// The endpoint is known to have no flow of the given kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeutralModel {
    pub kind: String,
    #[serde(default)]
    pub provenance: Provenance,
}

/// Values of `related_type_name` can be found at `path` of the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeModel {
    pub related_type_name: String,
    pub path: String,
}

/// Modeling for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EndpointModel {
    /// Not modeled; a placeholder row.
    #[default]
    None,
    Source(SourceModel),
    Sink(SinkModel),
    Summary(SummaryModel),
    Neutral(NeutralModel),
    Type(TypeModel),
}

impl EndpointModel {
    /// Variant tag.
    pub fn variant(&self) -> ModelVariant {
        match self {
            EndpointModel::None => ModelVariant::None,
            EndpointModel::Source(_) => ModelVariant::Source,
            EndpointModel::Sink(_) => ModelVariant::Sink,
            EndpointModel::Summary(_) => ModelVariant::Summary,
            EndpointModel::Neutral(_) => ModelVariant::Neutral,
            EndpointModel::Type(_) => ModelVariant::Type,
        }
    }

    /// Kind, for variants that carry one.
    pub fn kind(&self) -> Option<&str> {
        match self {
            EndpointModel::Source(m) => Some(&m.kind),
            EndpointModel::Sink(m) => Some(&m.kind),
            EndpointModel::Summary(m) => Some(&m.kind),
            EndpointModel::Neutral(m) => Some(&m.kind),
            EndpointModel::None | EndpointModel::Type(_) => None,
        }
    }

    /// Input path, for sinks and summaries.
    pub fn input(&self) -> Option<&str> {
        match self {
            EndpointModel::Sink(m) => Some(&m.input),
            EndpointModel::Summary(m) => Some(&m.input),
            _ => None,
        }
    }

    /// Output path, for sources and summaries.
    pub fn output(&self) -> Option<&str> {
        match self {
            EndpointModel::Source(m) => Some(&m.output),
            EndpointModel::Summary(m) => Some(&m.output),
            _ => None,
        }
    }

    pub fn provenance(&self) -> Option<Provenance> {
        match self {
            EndpointModel::Source(m) => Some(m.provenance),
            EndpointModel::Sink(m) => Some(m.provenance),
            EndpointModel::Summary(m) => Some(m.provenance),
            EndpointModel::Neutral(m) => Some(m.provenance),
            EndpointModel::None | EndpointModel::Type(_) => None,
        }
    }

    /// True for every variant except `none`.
    pub fn is_modeled(&self) -> bool {
        !matches!(self, EndpointModel::None)
    }

    /// True when the model makes the engine treat the method as supported.
    ///
    /// Type models only relate types and do not count.
    pub fn supports_method(&self) -> bool {
        !matches!(self, EndpointModel::None | EndpointModel::Type(_))
    }
}

/// An endpoint identity together with one model for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModeledMethod {
    #[serde(flatten)]
    pub identity: EndpointIdentity,
    #[serde(flatten)]
    pub model: EndpointModel,
}

impl ModeledMethod {
    pub fn new(identity: EndpointIdentity, model: EndpointModel) -> Self {
        ModeledMethod { identity, model }
    }

    /// Unmodeled placeholder for an identity.
    pub fn none(identity: EndpointIdentity) -> Self {
        ModeledMethod {
            identity,
            model: EndpointModel::None,
        }
    }

    pub fn signature(&self) -> &str {
        &self.identity.signature
    }

    pub fn variant(&self) -> ModelVariant {
        self.model.variant()
    }
}

// ============================================================================
// Tests
// ============================================================================
