//! Compile-only test to verify public API surface.
//!
//! This file serves as a compile-time contract for the public API.
//! If this file fails to compile, the public API has regressed.
//!
//! Run with: cargo test -- api_surface

// Allow unused imports - this test is about compile-time verification, not runtime usage
#![allow(unused_imports)]

// ============================================================================
// Core Infrastructure Types
// ============================================================================

// access_path module - lexer and validator
use flowmodel::access_path::{
    join_tokens, parse_access_path_tokens, validate_access_path, AccessPathDiagnostic,
    AccessPathToken, DiagnosticMessage, TokenRange,
};

// adapter module - ecosystem adapter trait and registry
use flowmodel::adapter::{
    join_path, AdapterRegistry, ArgumentOptions, Ecosystem, EcosystemAdapter, MethodArgument,
};

// model and method modules - canonical model
use flowmodel::method::{arguments_list, EndpointIdentity, EndpointType, Method, Usage};
use flowmodel::model::{
    EndpointModel, ModelVariant, ModeledMethod, NeutralModel, Provenance, SinkModel, SourceModel,
    SummaryModel, TypeModel,
};

// row module - wire values
use flowmodel::row::{check_row_shape, ColumnKind, RowTuple, RowValue};

// suggestions, sorting, validation, consistency
use flowmodel::consistency::{check_consistency, ConsistencyNotice, ConsistencyNotifier};
use flowmodel::sorting::{group_methods, sort_group_names, sort_methods, Mode, ModelsBySignature};
use flowmodel::suggestions::{
    build_suggestion_trees, find_matching_options, DefinitionKind, SuggestionOption, SuggestionRow,
};
use flowmodel::validation::{validate_modeled_methods, ModelValidationError, ValidationErrorKind};

// ============================================================================
// Ecosystem Adapters
// ============================================================================

use flowmodel::generic::StaticAdapter;
use flowmodel::python::PythonAdapter;
use flowmodel::ruby::RubyAdapter;

// ============================================================================
// Front Door
// ============================================================================

use flowmodel::config::{Config, ConfigError, FlowmodelConfig};
use flowmodel::error::{FlowError, ModelError, OutputErrorCode};
use flowmodel::output::{emit_response, ErrorInfo, ErrorResponse, SCHEMA_VERSION};
use flowmodel::registry::default_registry;
use flowmodel::rows::{decode_rows, encode_models, DecodedRows, EncodedRows};

// ============================================================================
// Test
// ============================================================================

#[test]
fn api_surface_compiles() {
    // The imports above form the public API contract.
    let _ = std::any::type_name::<AccessPathToken>();
    let _ = std::any::type_name::<ModeledMethod>();
    let _ = std::any::type_name::<AdapterRegistry>();
    let _ = std::any::type_name::<FlowError>();
    let _ = std::any::type_name::<Config>();
    let _ = std::any::type_name::<StaticAdapter>();
    let _ = std::any::type_name::<PythonAdapter>();
    let _ = std::any::type_name::<RubyAdapter>();
}

#[test]
fn schema_version_is_stable() {
    // The schema version is part of the public API contract
    assert_eq!(SCHEMA_VERSION, "1");
}
