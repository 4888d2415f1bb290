//! Python ecosystem adapter.
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
//! Provenance and parameter lists are not written; decoded models are manual
//! and have empty parameters.

use flowmodel_core::adapter::{ArgumentOptions, Ecosystem, EcosystemAdapter, MethodArgument};
use flowmodel_core::error::ModelError;
use flowmodel_core::method::{arguments_list, EndpointIdentity, EndpointType};
use flowmodel_core::model::{
    EndpointModel, ModelVariant, ModeledMethod, NeutralModel, Provenance, SinkModel, SourceModel,
    SummaryModel, TypeModel,
};
use flowmodel_core::row::{string_at, ColumnKind, RowTuple, RowValue};

use crate::access_path::{
    has_self_argument, parse_python_type_and_path, python_method_path, python_path, python_type,
    ParsedPath,
};

const THREE_STRINGS: &[ColumnKind] = &[ColumnKind::String, ColumnKind::String, ColumnKind::String];
const SUMMARY_COLUMNS: &[ColumnKind] = &[
    ColumnKind::String,
    ColumnKind::String,
    ColumnKind::String,
    ColumnKind::String,
    ColumnKind::String,
];

const MODELED_ENDPOINT_TYPES: &[EndpointType] = &[
    EndpointType::Method,
    EndpointType::Function,
    EndpointType::Constructor,
    EndpointType::ClassMethod,
    EndpointType::StaticMethod,
];

const ALL_ENDPOINT_TYPES: &[EndpointType] = &[
    EndpointType::Function,
    EndpointType::Method,
    EndpointType::Constructor,
    EndpointType::Class,
    EndpointType::Module,
    EndpointType::ClassMethod,
    EndpointType::StaticMethod,
];

/// Adapter for Python member-chain paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PythonAdapter;

impl PythonAdapter {
    pub fn new() -> Self {
        PythonAdapter
    }

    fn type_column(identity: &EndpointIdentity) -> RowValue {
        python_type(&identity.package_name, &identity.type_name, identity.endpoint_type).into()
    }

    fn identity(&self, parsed: &ParsedPath) -> EndpointIdentity {
        let mut identity = EndpointIdentity {
            package_name: parsed.package_name.clone(),
            type_name: parsed.type_name.clone(),
            method_name: parsed.method_name.clone(),
            method_parameters: String::new(),
            endpoint_type: parsed.endpoint_type,
            signature: String::new(),
        };
        identity.signature = self.create_method_signature(&identity);
        identity
    }

    /// Parse a `(type, path)` pair whose path must name only a method.
    fn parse_method_only(type_column: &str, path: &str) -> Result<ParsedPath, ModelError> {
        let parsed = parse_python_type_and_path(type_column, path);
        if !parsed.suffix.is_empty() {
            return Err(ModelError::MethodPathExpected {
                path: path.to_string(),
                suffix: parsed.suffix,
            });
        }
        Ok(parsed)
    }
}

impl EcosystemAdapter for PythonAdapter {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Python
    }

    fn create_method_signature(&self, identity: &EndpointIdentity) -> String {
        format!("{}#{}", identity.type_name, identity.method_name)
    }

    fn columns(&self, variant: ModelVariant) -> Option<&'static [ColumnKind]> {
        match variant {
            ModelVariant::Source | ModelVariant::Sink | ModelVariant::Neutral => Some(THREE_STRINGS),
            ModelVariant::Summary => Some(SUMMARY_COLUMNS),
            ModelVariant::Type => Some(THREE_STRINGS),
            ModelVariant::None => None,
        }
    }

    fn supported_endpoint_types(&self, variant: ModelVariant) -> &'static [EndpointType] {
        match variant {
            ModelVariant::Source | ModelVariant::Sink | ModelVariant::Summary => MODELED_ENDPOINT_TYPES,
            ModelVariant::Neutral | ModelVariant::Type => ALL_ENDPOINT_TYPES,
            ModelVariant::None => &[],
        }
    }

    fn encode_source(&self, identity: &EndpointIdentity, model: &SourceModel) -> RowTuple {
        vec![
            Self::type_column(identity),
            python_path(&identity.method_name, &model.output).into(),
            model.kind.as_str().into(),
        ]
    }

    fn decode_source(&self, row: &[RowValue]) -> Result<ModeledMethod, ModelError> {
        let parsed = parse_python_type_and_path(string_at(row, 0), string_at(row, 1));
        Ok(ModeledMethod::new(
            self.identity(&parsed),
            EndpointModel::Source(SourceModel {
                output: parsed.suffix,
                kind: string_at(row, 2).to_string(),
                provenance: Provenance::Manual,
            }),
        ))
    }

    fn encode_sink(&self, identity: &EndpointIdentity, model: &SinkModel) -> RowTuple {
        vec![
            Self::type_column(identity),
            python_path(&identity.method_name, &model.input).into(),
            model.kind.as_str().into(),
        ]
    }

    fn decode_sink(&self, row: &[RowValue]) -> Result<ModeledMethod, ModelError> {
        let parsed = parse_python_type_and_path(string_at(row, 0), string_at(row, 1));
        Ok(ModeledMethod::new(
            self.identity(&parsed),
            EndpointModel::Sink(SinkModel {
                input: parsed.suffix,
                kind: string_at(row, 2).to_string(),
                provenance: Provenance::Manual,
            }),
        ))
    }

    fn encode_summary(&self, identity: &EndpointIdentity, model: &SummaryModel) -> RowTuple {
        vec![
            Self::type_column(identity),
            python_method_path(&identity.method_name).into(),
            model.input.as_str().into(),
            model.output.as_str().into(),
            model.kind.as_str().into(),
        ]
    }

    fn decode_summary(&self, row: &[RowValue]) -> Result<ModeledMethod, ModelError> {
        let parsed = Self::parse_method_only(string_at(row, 0), string_at(row, 1))?;
        Ok(ModeledMethod::new(
            self.identity(&parsed),
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
            Self::type_column(identity),
            python_method_path(&identity.method_name).into(),
            model.kind.as_str().into(),
        ]
    }

    fn decode_neutral(&self, row: &[RowValue]) -> Result<ModeledMethod, ModelError> {
        let parsed = Self::parse_method_only(string_at(row, 0), string_at(row, 1))?;
        Ok(ModeledMethod::new(
            self.identity(&parsed),
            EndpointModel::Neutral(NeutralModel {
                kind: string_at(row, 2).to_string(),
                provenance: Provenance::Manual,
            }),
        ))
    }

    fn encode_type(&self, identity: &EndpointIdentity, model: &TypeModel) -> Result<RowTuple, ModelError> {
        Ok(vec![
            model.related_type_name.as_str().into(),
            Self::type_column(identity),
            python_path(&identity.method_name, &model.path).into(),
        ])
    }

    fn decode_type(&self, row: &[RowValue]) -> Result<ModeledMethod, ModelError> {
        let parsed = parse_python_type_and_path(string_at(row, 1), string_at(row, 2));
        Ok(ModeledMethod::new(
            self.identity(&parsed),
            EndpointModel::Type(TypeModel {
                related_type_name: string_at(row, 0).to_string(),
                path: parsed.suffix,
            }),
        ))
    }

    fn argument_options(&self, identity: &EndpointIdentity) -> ArgumentOptions {
        let has_self = has_self_argument(identity.endpoint_type);

        let options: Vec<MethodArgument> = arguments_list(&identity.method_parameters)
            .into_iter()
            .enumerate()
            .map(|(position, argument)| {
                if has_self && position == 0 {
                    return MethodArgument::new("Argument[self]", format!("Argument[self]: {}", argument));
                }

                // `self` does not take up an index.
                let index = if has_self { position - 1 } else { position };

                if let Some(name) = argument.strip_suffix(':') {
                    // keyword-only
                    MethodArgument::new(
                        format!("Argument[{}]", argument),
                        format!("Argument[{}]: {}", argument, name),
                    )
                } else if let Some(name) = argument.strip_suffix('/') {
                    // positional-only
                    MethodArgument::new(
                        format!("Argument[{}]", index),
                        format!("Argument[{}]: {}", index, name),
                    )
                } else {
                    MethodArgument::new(
                        format!("Argument[{},{}:]", index, argument),
                        format!("Argument[{},{}:]: {}", index, argument, argument),
                    )
                }
            })
            .collect();

        let default_argument_path = options
            .first()
            .map(|option| option.path.clone())
            .unwrap_or_else(|| "Argument[self]".to_string());

        ArgumentOptions {
            options,
            default_argument_path,
        }
    }

    fn endpoint_type_for_endpoint(
        &self,
        identity: &EndpointIdentity,
        endpoint_kind: Option<&str>,
    ) -> Option<EndpointType> {
        let from_kind = match endpoint_kind {
            Some("Function") => Some(EndpointType::Function),
            Some("InstanceMethod") => Some(EndpointType::Method),
            Some("ClassMethod") => Some(EndpointType::ClassMethod),
            Some("StaticMethod") => Some(EndpointType::StaticMethod),
            Some("InitMethod") => Some(EndpointType::Constructor),
            Some("Class") => Some(EndpointType::Class),
            _ => None,
        };
        if from_kind.is_some() {
            return from_kind;
        }

        // Engines without a kind column only expose the parameter list.
        let parameters = identity.method_parameters.as_str();
        if parameters.starts_with("(self,") || parameters == "(self)" {
            Some(EndpointType::Method)
        } else {
            Some(EndpointType::Function)
        }
    }

    fn identity_from_type_and_path(&self, type_column: &str, path: &str) -> Option<EndpointIdentity> {
        Some(self.identity(&parse_python_type_and_path(type_column, path)))
    }
}

// ============================================================================
// Tests
// ============================================================================
