//! Ruby ecosystem adapter.
//!
//! Column tables:
//!
//! | Variant | Columns |
//! |---------|---------|
//! | source  | `type, path, kind` (path = method prefix + output) |
//! | sink    | `type, path, kind` (path = method prefix + input) |
//! | summary | `type, path, input, output, kind` (path = method prefix only) |
//! | neutral | `type, path, kind` (path = method prefix only) |
//! | type    | `related type, type, path` |
//!
//! Ruby rows carry no package, parameters or provenance. Decoded models have
//! an empty package and parameter list and manual provenance.

use flowmodel_core::adapter::{ArgumentOptions, Ecosystem, EcosystemAdapter, MethodArgument};
use flowmodel_core::error::ModelError;
use flowmodel_core::method::{arguments_list, EndpointIdentity, EndpointType};
use flowmodel_core::model::{
    EndpointModel, ModelVariant, ModeledMethod, NeutralModel, Provenance, SinkModel, SourceModel,
    SummaryModel, TypeModel,
};
use flowmodel_core::row::{string_at, ColumnKind, RowTuple, RowValue};

use crate::access_path::{
    parse_ruby_access_path, parse_ruby_method_from_path, ruby_endpoint_type, ruby_method_path,
    ruby_path,
};

const THREE_STRINGS: &[ColumnKind] = &[ColumnKind::String, ColumnKind::String, ColumnKind::String];
const FIVE_STRINGS: &[ColumnKind] = &[
    ColumnKind::String,
    ColumnKind::String,
    ColumnKind::String,
    ColumnKind::String,
    ColumnKind::String,
];

/// Adapter for Ruby method-bracket paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RubyAdapter;

impl RubyAdapter {
    pub fn new() -> Self {
        RubyAdapter
    }

    fn identity(&self, type_name: &str, method_name: &str) -> EndpointIdentity {
        let mut identity = EndpointIdentity {
            package_name: String::new(),
            type_name: type_name.to_string(),
            method_name: method_name.to_string(),
            method_parameters: String::new(),
            endpoint_type: ruby_endpoint_type(type_name, method_name),
            signature: String::new(),
        };
        identity.signature = self.create_method_signature(&identity);
        identity
    }
}

impl EcosystemAdapter for RubyAdapter {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Ruby
    }

    fn create_method_signature(&self, identity: &EndpointIdentity) -> String {
        format!("{}#{}", identity.type_name, identity.method_name)
    }

    fn columns(&self, variant: ModelVariant) -> Option<&'static [ColumnKind]> {
        match variant {
            ModelVariant::Summary => Some(FIVE_STRINGS),
            ModelVariant::None => None,
            _ => Some(THREE_STRINGS),
        }
    }

    fn supported_endpoint_types(&self, variant: ModelVariant) -> &'static [EndpointType] {
        match variant {
            ModelVariant::Source => &[EndpointType::Method, EndpointType::Class],
            ModelVariant::Sink | ModelVariant::Summary => {
                &[EndpointType::Method, EndpointType::Constructor]
            }
            ModelVariant::Neutral | ModelVariant::Type => &[
                EndpointType::Method,
                EndpointType::Constructor,
                EndpointType::Class,
            ],
            ModelVariant::None => &[],
        }
    }

    fn encode_source(&self, identity: &EndpointIdentity, model: &SourceModel) -> RowTuple {
        vec![
            identity.type_name.as_str().into(),
            ruby_path(&identity.method_name, &model.output).into(),
            model.kind.as_str().into(),
        ]
    }

    fn decode_source(&self, row: &[RowValue]) -> Result<ModeledMethod, ModelError> {
        let parsed = parse_ruby_access_path(string_at(row, 1));
        Ok(ModeledMethod::new(
            self.identity(string_at(row, 0), &parsed.method_name),
            EndpointModel::Source(SourceModel {
                output: parsed.suffix,
                kind: string_at(row, 2).to_string(),
                provenance: Provenance::Manual,
            }),
        ))
    }

    fn encode_sink(&self, identity: &EndpointIdentity, model: &SinkModel) -> RowTuple {
        vec![
            identity.type_name.as_str().into(),
            ruby_path(&identity.method_name, &model.input).into(),
            model.kind.as_str().into(),
        ]
    }

    fn decode_sink(&self, row: &[RowValue]) -> Result<ModeledMethod, ModelError> {
        let parsed = parse_ruby_access_path(string_at(row, 1));
        Ok(ModeledMethod::new(
            self.identity(string_at(row, 0), &parsed.method_name),
            EndpointModel::Sink(SinkModel {
                input: parsed.suffix,
                kind: string_at(row, 2).to_string(),
                provenance: Provenance::Manual,
            }),
        ))
    }

    fn encode_summary(&self, identity: &EndpointIdentity, model: &SummaryModel) -> RowTuple {
        vec![
            identity.type_name.as_str().into(),
            ruby_method_path(&identity.method_name).into(),
            model.input.as_str().into(),
            model.output.as_str().into(),
            model.kind.as_str().into(),
        ]
    }

    fn decode_summary(&self, row: &[RowValue]) -> Result<ModeledMethod, ModelError> {
        let method_name = parse_ruby_method_from_path(string_at(row, 1));
        Ok(ModeledMethod::new(
            self.identity(string_at(row, 0), &method_name),
            EndpointModel::Summary(SummaryModel {
                input: string_at(row, 2).to_string(),
                output: string_at(row, 3).to_string(),
                kind: string_at(row, 4).to_string(),
                provenance: Provenance::Manual,
            }),
        ))
    }

    fn encode_neutral(&self, identity: &EndpointIdentity, model: &NeutralModel) -> RowTuple {
        vec![
            identity.type_name.as_str().into(),
            ruby_method_path(&identity.method_name).into(),
            model.kind.as_str().into(),
        ]
    }

    fn decode_neutral(&self, row: &[RowValue]) -> Result<ModeledMethod, ModelError> {
        let method_name = parse_ruby_method_from_path(string_at(row, 1));
        Ok(ModeledMethod::new(
            self.identity(string_at(row, 0), &method_name),
            EndpointModel::Neutral(NeutralModel {
                kind: string_at(row, 2).to_string(),
                provenance: Provenance::Manual,
            }),
        ))
    }

    fn encode_type(&self, identity: &EndpointIdentity, model: &TypeModel) -> Result<RowTuple, ModelError> {
        Ok(vec![
            model.related_type_name.as_str().into(),
            identity.type_name.as_str().into(),
            ruby_path(&identity.method_name, &model.path).into(),
        ])
    }

    fn decode_type(&self, row: &[RowValue]) -> Result<ModeledMethod, ModelError> {
        let parsed = parse_ruby_access_path(string_at(row, 2));
        Ok(ModeledMethod::new(
            self.identity(string_at(row, 1), &parsed.method_name),
            EndpointModel::Type(TypeModel {
                related_type_name: string_at(row, 0).to_string(),
                path: parsed.suffix,
            }),
        ))
    }

    fn argument_options(&self, identity: &EndpointIdentity) -> ArgumentOptions {
        let arguments: Vec<MethodArgument> = arguments_list(&identity.method_parameters)
            .into_iter()
            .enumerate()
            .map(|(index, argument)| {
                if argument.ends_with(':') {
                    MethodArgument::bare(format!("Argument[{}]", argument))
                } else {
                    MethodArgument::new(
                        format!("Argument[{}]", index),
                        format!("Argument[{}]: {}", index, argument),
                    )
                }
            })
            .collect();

        let default_argument_path = arguments
            .first()
            .map(|argument| argument.path.clone())
            .unwrap_or_else(|| "Argument[self]".to_string());

        let mut options = vec![MethodArgument::bare("Argument[self]")];
        options.extend(arguments);

        ArgumentOptions {
            options,
            default_argument_path,
        }
    }

    fn endpoint_type_for_endpoint(
        &self,
        identity: &EndpointIdentity,
        _endpoint_kind: Option<&str>,
    ) -> Option<EndpointType> {
        Some(ruby_endpoint_type(&identity.type_name, &identity.method_name))
    }

    fn identity_from_type_and_path(&self, type_column: &str, path: &str) -> Option<EndpointIdentity> {
        Some(self.identity(type_column, &parse_ruby_method_from_path(path)))
    }
}

// ============================================================================
// Tests
// ============================================================================
