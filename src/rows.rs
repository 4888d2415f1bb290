//! Row boundary between the analysis engine and the canonical model.
//!
//! Rows arriving from the engine are untrusted: a row whose shape does not
//! match the ecosystem's column table, or that does not decode, is skipped and
//! logged instead of failing the whole batch. Encoding groups rows by the
//! extensible predicate they are written to.

use std::collections::BTreeMap;

use flowmodel_core::adapter::EcosystemAdapter;
use flowmodel_core::error::ModelError;
use flowmodel_core::method::Method;
use flowmodel_core::model::{ModelVariant, ModeledMethod};
use flowmodel_core::row::{check_row_shape, RowTuple};
use flowmodel_core::sorting::ModelsBySignature;
use serde::Serialize;
use tracing::{debug, warn};

/// Rows keyed by extensible predicate name.
pub type EncodedRows = BTreeMap<String, Vec<RowTuple>>;

/// Result of decoding a batch of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodedRows {
    pub models: Vec<ModeledMethod>,
    /// Number of rows dropped at the boundary.
    pub skipped: usize,
}

/// Decode engine rows of one variant.
///
/// Fails only when the ecosystem has no predicate for the variant.
pub fn decode_rows(
    adapter: &dyn EcosystemAdapter,
    variant: ModelVariant,
    rows: &[RowTuple],
) -> Result<DecodedRows, ModelError> {
    let columns = adapter
        .columns(variant)
        .ok_or_else(|| adapter.unsupported(variant))?;

    let mut decoded = DecodedRows::default();
    for (index, row) in rows.iter().enumerate() {
        let result = check_row_shape(variant, columns, row).and_then(|()| adapter.decode(variant, row));
        match result {
            Ok(model) => decoded.models.push(model),
            Err(err) => {
                warn!(ecosystem = %adapter.ecosystem(), index, error = %err, "skipping row");
                decoded.skipped += 1;
            }
        }
    }

    debug!(
        ecosystem = %adapter.ecosystem(),
        %variant,
        decoded = decoded.models.len(),
        skipped = decoded.skipped,
        "decoded rows"
    );
    Ok(decoded)
}

/// Encode models into rows grouped by extensible predicate.
///
/// `none` models are never written. `type` models are written only when
/// `include_type_models` is set. Variants the ecosystem has no predicate for
/// are skipped with a warning.
pub fn encode_models(
    adapter: &dyn EcosystemAdapter,
    models: &[ModeledMethod],
    include_type_models: bool,
) -> EncodedRows {
    let mut rows = EncodedRows::new();
    for method in models {
        let variant = method.variant();
        if variant == ModelVariant::None || (variant == ModelVariant::Type && !include_type_models) {
            continue;
        }

        let Some(predicate) = adapter.extensible_predicate(variant) else {
            warn!(
                ecosystem = %adapter.ecosystem(),
                signature = method.signature(),
                %variant,
                "no predicate for model, skipping"
            );
            continue;
        };

        match adapter.encode(method) {
            Ok(row) => rows.entry(predicate.to_string()).or_default().push(row),
            Err(err) => {
                warn!(signature = method.signature(), error = %err, "skipping model");
            }
        }
    }

    debug!(
        ecosystem = %adapter.ecosystem(),
        predicates = rows.len(),
        "encoded models"
    );
    rows
}

/// Group models by method signature, keeping input order within a signature.
pub fn models_by_signature(models: Vec<ModeledMethod>) -> ModelsBySignature {
    let mut grouped = ModelsBySignature::new();
    for model in models {
        grouped.entry(model.signature().to_string()).or_default().push(model);
    }
    grouped
}

/// Replace engine-reported endpoint types with the adapter's reading of them.
///
/// Methods the adapter has no opinion on keep their reported type.
pub fn resolve_endpoint_types(adapter: &dyn EcosystemAdapter, methods: &mut [Method]) {
    for method in methods {
        let endpoint_type =
            adapter.endpoint_type_for_endpoint(&method.identity, method.endpoint_kind.as_deref());
        if let Some(endpoint_type) = endpoint_type {
            method.identity.endpoint_type = endpoint_type;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::default_registry;
    use flowmodel_core::adapter::Ecosystem;
    use flowmodel_core::method::{EndpointIdentity, EndpointType};
    use flowmodel_core::model::{EndpointModel, Provenance, SinkModel, TypeModel};
    use flowmodel_core::row::RowValue;

    fn strings(values: &[&str]) -> RowTuple {
        values.iter().map(|value| RowValue::from(*value)).collect()
    }

    fn java_sink_row(method: &str) -> RowTuple {
        let mut row = strings(&["org.example", "Db", "", method, "(String)", "", "Argument[0]", "sql-injection", "manual"]);
        row[2] = RowValue::from(true);
        row
    }

    fn python_identity(method: &str) -> EndpointIdentity {
        EndpointIdentity {
            package_name: "requests".to_string(),
            type_name: "Session".to_string(),
            method_name: method.to_string(),
            method_parameters: "(self,url)".to_string(),
            endpoint_type: EndpointType::Method,
            signature: format!("requests.Session#{}", method),
        }
    }

    // =========================================================================
    // Decoding
    // =========================================================================

    #[test]
    fn malformed_rows_are_skipped_and_counted() {
        let registry = default_registry();
        let adapter = registry.get(Ecosystem::Java).unwrap();

        let rows = vec![
            java_sink_row("query"),
            strings(&["org.example", "Db"]),
            java_sink_row("update"),
            strings(&["a", "b", "c", "d", "e", "f", "g", "h", "i"]),
        ];

        let decoded = decode_rows(adapter, ModelVariant::Sink, &rows).unwrap();
        assert_eq!(decoded.skipped, 2);
        let names: Vec<&str> = decoded
            .models
            .iter()
            .map(|m| m.identity.method_name.as_str())
            .collect();
        assert_eq!(names, vec!["query", "update"]);
    }

    #[test]
    fn unsupported_variant_fails_the_batch() {
        let registry = default_registry();
        let adapter = registry.get(Ecosystem::CSharp).unwrap();
        let err = decode_rows(adapter, ModelVariant::Type, &[]).unwrap_err();
        assert!(matches!(err, ModelError::UnsupportedVariant { .. }));
    }

    // =========================================================================
    // Encoding
    // =========================================================================

    #[test]
    fn encoding_groups_by_predicate_and_filters_variants() {
        let registry = default_registry();
        let adapter = registry.get(Ecosystem::Python).unwrap();

        let models = vec![
            ModeledMethod::new(
                python_identity("get"),
                EndpointModel::Sink(SinkModel {
                    input: "Argument[1]".to_string(),
                    kind: "request-forgery".to_string(),
                    provenance: Provenance::Manual,
                }),
            ),
            ModeledMethod::none(python_identity("post")),
            ModeledMethod::new(
                python_identity("send"),
                EndpointModel::Type(TypeModel {
                    related_type_name: "requests.Response".to_string(),
                    path: "ReturnValue".to_string(),
                }),
            ),
        ];

        let without_types = encode_models(adapter, &models, false);
        assert_eq!(without_types.keys().collect::<Vec<_>>(), vec!["sinkModel"]);
        assert_eq!(without_types["sinkModel"].len(), 1);

        let with_types = encode_models(adapter, &models, true);
        assert_eq!(
            with_types.keys().collect::<Vec<_>>(),
            vec!["sinkModel", "typeModel"]
        );
    }

    #[test]
    fn type_models_are_skipped_where_unsupported() {
        let registry = default_registry();
        let adapter = registry.get(Ecosystem::Java).unwrap();
        let models = vec![ModeledMethod::new(
            EndpointIdentity::default(),
            EndpointModel::Type(TypeModel {
                related_type_name: "Foo".to_string(),
                path: "".to_string(),
            }),
        )];
        assert!(encode_models(adapter, &models, true).is_empty());
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn models_group_by_signature_in_order() {
        let models = vec![
            ModeledMethod::none(python_identity("get")),
            ModeledMethod::none(python_identity("post")),
            ModeledMethod::new(
                python_identity("get"),
                EndpointModel::Sink(SinkModel {
                    input: "Argument[1]".to_string(),
                    kind: "request-forgery".to_string(),
                    provenance: Provenance::Manual,
                }),
            ),
        ];
        let grouped = models_by_signature(models);
        assert_eq!(grouped.len(), 2);
        let get = &grouped["requests.Session#get"];
        assert_eq!(get[0].variant(), ModelVariant::None);
        assert_eq!(get[1].variant(), ModelVariant::Sink);
    }

    #[test]
    fn endpoint_types_follow_the_adapter() {
        let registry = default_registry();
        let method = |kind: Option<&str>, endpoint_type| Method {
            identity: EndpointIdentity {
                endpoint_type,
                ..python_identity("get")
            },
            library: "requests".to_string(),
            library_version: None,
            supported: false,
            supported_type: ModelVariant::None,
            usages: Vec::new(),
            endpoint_kind: kind.map(str::to_string),
        };

        let mut methods = vec![
            method(Some("InitMethod"), EndpointType::Method),
            method(Some("ClassMethod"), EndpointType::Method),
        ];
        resolve_endpoint_types(registry.get(Ecosystem::Python).unwrap(), &mut methods);
        assert_eq!(methods[0].identity.endpoint_type, EndpointType::Constructor);
        assert_eq!(methods[1].identity.endpoint_type, EndpointType::ClassMethod);

        let mut java = vec![method(None, EndpointType::Constructor)];
        resolve_endpoint_types(registry.get(Ecosystem::Java).unwrap(), &mut java);
        assert_eq!(java[0].identity.endpoint_type, EndpointType::Constructor);
    }
}
