//! Flat-column adapter.
//!
//! Column tables:
//!
//! | Variant | Columns |
//! |---------|---------|
//! | source  | `package, type, subtypes, name, signature, ext, output, kind, provenance` |
//! | sink    | `package, type, subtypes, name, signature, ext, input, kind, provenance` |
//! | summary | `package, type, subtypes, name, signature, ext, input, output, kind, provenance` |
//! | neutral | `package, type, name, signature, kind, provenance` |
//!
//! `subtypes` is always written as `true` and `ext` as `""`; both are dropped
//! on decode. Type models are not supported.

use flowmodel_core::adapter::{ArgumentOptions, Ecosystem, EcosystemAdapter, MethodArgument};
use flowmodel_core::error::ModelError;
use flowmodel_core::method::{arguments_list, EndpointIdentity, EndpointType};
use flowmodel_core::model::{
    EndpointModel, ModelVariant, ModeledMethod, NeutralModel, Provenance, SinkModel, SourceModel,
    SummaryModel,
};
use flowmodel_core::row::{string_at, ColumnKind, RowTuple, RowValue};

use flowmodel_core::row::ColumnKind::{Boolean as B, String as S};

const SOURCE_COLUMNS: &[ColumnKind] = &[S, S, B, S, S, S, S, S, S];
const SINK_COLUMNS: &[ColumnKind] = &[S, S, B, S, S, S, S, S, S];
const SUMMARY_COLUMNS: &[ColumnKind] = &[S, S, B, S, S, S, S, S, S, S];
const NEUTRAL_COLUMNS: &[ColumnKind] = &[S, S, S, S, S, S];

/// Position of the identity columns in a row.
struct IdentityColumns {
    package: usize,
    type_name: usize,
    name: usize,
    parameters: usize,
}

/// Rows with a `subtypes` column.
const WITH_SUBTYPES: IdentityColumns = IdentityColumns {
    package: 0,
    type_name: 1,
    name: 3,
    parameters: 4,
};

/// Neutral rows.
const WITHOUT_SUBTYPES: IdentityColumns = IdentityColumns {
    package: 0,
    type_name: 1,
    name: 2,
    parameters: 3,
};

/// Adapter for ecosystems with flat identity columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticAdapter {
    ecosystem: Ecosystem,
}

impl StaticAdapter {
    pub fn new(ecosystem: Ecosystem) -> Self {
        StaticAdapter { ecosystem }
    }

    pub fn java() -> Self {
        StaticAdapter::new(Ecosystem::Java)
    }

    pub fn csharp() -> Self {
        StaticAdapter::new(Ecosystem::CSharp)
    }

    /// Leading columns shared by source, sink and summary rows.
    fn identity_prefix(identity: &EndpointIdentity) -> RowTuple {
        vec![
            identity.package_name.as_str().into(),
            identity.type_name.as_str().into(),
            true.into(),
            identity.method_name.as_str().into(),
            identity.method_parameters.as_str().into(),
            "".into(),
        ]
    }

    fn read_identity(&self, row: &[RowValue], columns: &IdentityColumns) -> EndpointIdentity {
        let mut identity = EndpointIdentity {
            package_name: string_at(row, columns.package).to_string(),
            type_name: string_at(row, columns.type_name).to_string(),
            method_name: string_at(row, columns.name).to_string(),
            method_parameters: string_at(row, columns.parameters).to_string(),
            endpoint_type: EndpointType::Method,
            signature: String::new(),
        };
        identity.signature = self.create_method_signature(&identity);
        identity
    }
}

impl EcosystemAdapter for StaticAdapter {
    fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }

    fn create_method_signature(&self, identity: &EndpointIdentity) -> String {
        format!(
            "{}.{}#{}{}",
            identity.package_name, identity.type_name, identity.method_name, identity.method_parameters
        )
    }

    fn columns(&self, variant: ModelVariant) -> Option<&'static [ColumnKind]> {
        match variant {
            ModelVariant::Source => Some(SOURCE_COLUMNS),
            ModelVariant::Sink => Some(SINK_COLUMNS),
            ModelVariant::Summary => Some(SUMMARY_COLUMNS),
            ModelVariant::Neutral => Some(NEUTRAL_COLUMNS),
            ModelVariant::Type | ModelVariant::None => None,
        }
    }

    fn supported_endpoint_types(&self, variant: ModelVariant) -> &'static [EndpointType] {
        match variant {
            ModelVariant::Type | ModelVariant::None => &[],
            _ => &[EndpointType::Method, EndpointType::Constructor],
        }
    }

    fn encode_source(&self, identity: &EndpointIdentity, model: &SourceModel) -> RowTuple {
        let mut row = Self::identity_prefix(identity);
        row.extend([
            model.output.as_str().into(),
            model.kind.as_str().into(),
            model.provenance.as_str().into(),
        ]);
        row
    }

    fn decode_source(&self, row: &[RowValue]) -> Result<ModeledMethod, ModelError> {
        Ok(ModeledMethod::new(
            self.read_identity(row, &WITH_SUBTYPES),
            EndpointModel::Source(SourceModel {
                output: string_at(row, 6).to_string(),
                kind: string_at(row, 7).to_string(),
                provenance: Provenance::from_wire(string_at(row, 8)),
            }),
        ))
    }

    fn encode_sink(&self, identity: &EndpointIdentity, model: &SinkModel) -> RowTuple {
        let mut row = Self::identity_prefix(identity);
        row.extend([
            model.input.as_str().into(),
            model.kind.as_str().into(),
            model.provenance.as_str().into(),
        ]);
        row
    }

    fn decode_sink(&self, row: &[RowValue]) -> Result<ModeledMethod, ModelError> {
        Ok(ModeledMethod::new(
            self.read_identity(row, &WITH_SUBTYPES),
            EndpointModel::Sink(SinkModel {
                input: string_at(row, 6).to_string(),
                kind: string_at(row, 7).to_string(),
                provenance: Provenance::from_wire(string_at(row, 8)),
            }),
        ))
    }

    fn encode_summary(&self, identity: &EndpointIdentity, model: &SummaryModel) -> RowTuple {
        let mut row = Self::identity_prefix(identity);
        row.extend([
            model.input.as_str().into(),
            model.output.as_str().into(),
            model.kind.as_str().into(),
            model.provenance.as_str().into(),
        ]);
        row
    }

    fn decode_summary(&self, row: &[RowValue]) -> Result<ModeledMethod, ModelError> {
        Ok(ModeledMethod::new(
            self.read_identity(row, &WITH_SUBTYPES),
            EndpointModel::Summary(SummaryModel {
                input: string_at(row, 6).to_string(),
                output: string_at(row, 7).to_string(),
                kind: string_at(row, 8).to_string(),
                provenance: Provenance::from_wire(string_at(row, 9)),
            }),
        ))
    }

    fn encode_neutral(&self, identity: &EndpointIdentity, model: &NeutralModel) -> RowTuple {
        vec![
            identity.package_name.as_str().into(),
            identity.type_name.as_str().into(),
            identity.method_name.as_str().into(),
            identity.method_parameters.as_str().into(),
            model.kind.as_str().into(),
            model.provenance.as_str().into(),
        ]
    }

    fn decode_neutral(&self, row: &[RowValue]) -> Result<ModeledMethod, ModelError> {
        Ok(ModeledMethod::new(
            self.read_identity(row, &WITHOUT_SUBTYPES),
            EndpointModel::Neutral(NeutralModel {
                kind: string_at(row, 4).to_string(),
                provenance: Provenance::from_wire(string_at(row, 5)),
            }),
        ))
    }

    fn argument_options(&self, identity: &EndpointIdentity) -> ArgumentOptions {
        let arguments: Vec<MethodArgument> = arguments_list(&identity.method_parameters)
            .into_iter()
            .enumerate()
            .map(|(index, argument)| {
                MethodArgument::new(
                    format!("Argument[{}]", index),
                    format!("Argument[{}]: {}", index, argument),
                )
            })
            .collect();

        // Receiver when there are no parameters.
        let default_argument_path = arguments
            .first()
            .map(|argument| argument.path.clone())
            .unwrap_or_else(|| "Argument[this]".to_string());

        let mut options = vec![MethodArgument::bare("Argument[this]")];
        options.extend(arguments);

        ArgumentOptions {
            options,
            default_argument_path,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use flowmodel_core::model::TypeModel;

    fn identity() -> EndpointIdentity {
        let mut identity = EndpointIdentity {
            package_name: "org.sql2o".to_string(),
            type_name: "Connection".to_string(),
            method_name: "createQuery".to_string(),
            method_parameters: "(String,boolean)".to_string(),
            endpoint_type: EndpointType::Method,
            signature: String::new(),
        };
        identity.signature = StaticAdapter::java().create_method_signature(&identity);
        identity
    }

    fn round_trip(model: EndpointModel) {
        let adapter = StaticAdapter::java();
        let method = ModeledMethod::new(identity(), model);
        let row = adapter.encode(&method).unwrap();
        let decoded = adapter.decode_checked(method.variant(), &row).unwrap();
        assert_eq!(decoded, method);
    }

    // =========================================================================
    // Encoding
    // =========================================================================

    #[test]
    fn signature_joins_identity_columns() {
        assert_eq!(
            identity().signature,
            "org.sql2o.Connection#createQuery(String,boolean)"
        );
    }

    #[test]
    fn sink_row_layout() {
        let method = ModeledMethod::new(
            identity(),
            EndpointModel::Sink(SinkModel {
                input: "Argument[0]".to_string(),
                kind: "sql-injection".to_string(),
                provenance: Provenance::Manual,
            }),
        );
        let row = StaticAdapter::java().encode(&method).unwrap();
        assert_eq!(
            row,
            vec![
                RowValue::from("org.sql2o"),
                "Connection".into(),
                true.into(),
                "createQuery".into(),
                "(String,boolean)".into(),
                "".into(),
                "Argument[0]".into(),
                "sql-injection".into(),
                "manual".into(),
            ]
        );
    }

    #[test]
    fn neutral_row_has_no_subtypes_column() {
        let method = ModeledMethod::new(
            identity(),
            EndpointModel::Neutral(NeutralModel {
                kind: "summary".to_string(),
                provenance: Provenance::DfManual,
            }),
        );
        let row = StaticAdapter::csharp().encode(&method).unwrap();
        assert_eq!(row.len(), 6);
        assert_eq!(row[2], RowValue::from("createQuery"));
        assert_eq!(row[5], RowValue::from("df-manual"));
    }

    #[test]
    fn type_models_are_unsupported() {
        let method = ModeledMethod::new(
            identity(),
            EndpointModel::Type(TypeModel {
                related_type_name: "Foo".to_string(),
                path: String::new(),
            }),
        );
        assert!(matches!(
            StaticAdapter::java().encode(&method),
            Err(ModelError::UnsupportedVariant { .. })
        ));
        assert_eq!(StaticAdapter::java().extensible_predicate(ModelVariant::Type), None);
    }

    // =========================================================================
    // Round Trips
    // =========================================================================

    #[test]
    fn source_round_trip() {
        round_trip(EndpointModel::Source(SourceModel {
            output: "ReturnValue".to_string(),
            kind: "remote".to_string(),
            provenance: Provenance::DfGenerated,
        }));
    }

    #[test]
    fn sink_round_trip() {
        round_trip(EndpointModel::Sink(SinkModel {
            input: "Argument[0]".to_string(),
            kind: "sql-injection".to_string(),
            provenance: Provenance::Manual,
        }));
    }

    #[test]
    fn summary_round_trip() {
        round_trip(EndpointModel::Summary(SummaryModel {
            input: "Argument[this]".to_string(),
            output: "ReturnValue".to_string(),
            kind: "taint".to_string(),
            provenance: Provenance::AiManual,
        }));
    }

    #[test]
    fn neutral_round_trip() {
        round_trip(EndpointModel::Neutral(NeutralModel {
            kind: "sink".to_string(),
            provenance: Provenance::Manual,
        }));
    }

    #[test]
    fn decode_rejects_row_without_subtypes_flag() {
        let row: RowTuple = vec![
            "org.sql2o".into(),
            "Connection".into(),
            "true".into(),
            "createQuery".into(),
            "(String)".into(),
            "".into(),
            "Argument[0]".into(),
            "sql-injection".into(),
            "manual".into(),
        ];
        assert!(matches!(
            StaticAdapter::java().decode_checked(ModelVariant::Sink, &row),
            Err(ModelError::ColumnKind { index: 2, .. })
        ));
    }

    // =========================================================================
    // Argument Options
    // =========================================================================

    #[test]
    fn argument_options_list_receiver_then_parameters() {
        let options = StaticAdapter::java().argument_options(&identity());
        let labels: Vec<&str> = options.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Argument[this]", "Argument[0]: String", "Argument[1]: boolean"]
        );
        assert_eq!(options.default_argument_path, "Argument[0]");
    }

    #[test]
    fn argument_options_default_to_receiver() {
        let mut identity = identity();
        identity.method_parameters = "()".to_string();
        let options = StaticAdapter::java().argument_options(&identity);
        assert_eq!(options.options.len(), 1);
        assert_eq!(options.default_argument_path, "Argument[this]");
    }
}
