//! Binary entry point for the flowmodel CLI.
//!
//! Every command prints a single JSON response on stdout. Errors are printed
//! as a JSON error response and reflected in the exit code.
//!
//! ## Usage
//!
//! ```bash
//! # Tokenize and validate an access path
//! flowmodel tokens 'Argument[0].Field[value]'
//! flowmodel validate-path 'Argument[0].'
//!
//! # Decode engine rows, encode models back to rows
//! flowmodel decode --language java --variant sink --input rows.json
//! flowmodel encode --language python --input models.json
//!
//! # Display order of methods
//! flowmodel sort --methods methods.json --models models.json --mode framework
//! ```

use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use flowmodel::access_path::{parse_access_path_tokens, validate_access_path};
use flowmodel::adapter::Ecosystem;
use flowmodel::config::Config;
use flowmodel::consistency::{check_consistency, ConsistencyNotice, ConsistencyNotifier, TracingNotifier};
use flowmodel::error::{FlowError, OutputErrorCode};
use flowmodel::input::read_json;
use flowmodel::method::Method;
use flowmodel::model::{ModelVariant, ModeledMethod};
use flowmodel::output::{
    emit_response, ArgumentsResponse, ConsistencyResponse, DecodeResponse, DiagnosticsResponse,
    EncodeResponse, ErrorResponse, SortResponse, SortedGroup, SuggestResponse, TokensResponse,
    ValidateModelsResponse,
};
use flowmodel::registry::default_registry;
use flowmodel::row::{RowTuple, RowValue};
use flowmodel::rows::{decode_rows, encode_models, models_by_signature, resolve_endpoint_types};
use flowmodel::sorting::{group_methods, sort_group_names, sort_methods, Mode, ModelsBySignature};
use flowmodel::suggestions::{build_suggestion_trees, find_matching_options, parse_suggestion_tuples};
use flowmodel::validation::validate_modeled_methods;

// ============================================================================
// CLI Structure
// ============================================================================

/// Data-flow endpoint model tooling.
#[derive(Parser, Debug)]
#[command(name = "flowmodel", version, about = "Data-flow endpoint model tooling")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Arguments shared by every command.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Configuration file (default: .flowmodel/config.toml above the working directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for stderr output (overridden by RUST_LOG).
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split an access path into tokens.
    Tokens {
        /// Access path, e.g. `Argument[0].Field[value]`.
        path: String,
    },

    /// Report diagnostics for an access path.
    ValidatePath {
        path: String,
    },

    /// Decode engine rows of one variant into models.
    Decode {
        /// Ecosystem (java, csharp, python, ruby).
        #[arg(long)]
        language: Option<Ecosystem>,
        /// Variant of the rows (source, sink, summary, neutral, type).
        #[arg(long)]
        variant: ModelVariant,
        /// JSON array of rows, `-` for stdin.
        #[arg(long, default_value = "-")]
        input: PathBuf,
    },

    /// Encode models into rows grouped by extensible predicate.
    Encode {
        #[arg(long)]
        language: Option<Ecosystem>,
        /// JSON array of modeled methods, `-` for stdin.
        #[arg(long, default_value = "-")]
        input: PathBuf,
        /// Also write `type` models.
        #[arg(long)]
        include_type_models: bool,
    },

    /// List the argument positions of a method.
    Arguments {
        #[arg(long)]
        language: Option<Ecosystem>,
        #[arg(long)]
        signature: String,
        /// JSON array of methods.
        #[arg(long)]
        input: PathBuf,
    },

    /// Complete an access path from suggestion tuples.
    Suggest {
        #[arg(long)]
        language: Option<Ecosystem>,
        /// JSON array of `type, path, value, details, defType` tuples.
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        signature: String,
        /// Partially typed access path.
        #[arg(long, default_value = "")]
        value: String,
    },

    /// Groups and methods in display order.
    Sort {
        /// JSON array of methods.
        #[arg(long)]
        methods: PathBuf,
        /// JSON array of modeled methods.
        #[arg(long)]
        models: Option<PathBuf>,
        /// Signature with unsaved edits (repeatable).
        #[arg(long)]
        modified: Vec<String>,
        /// Signature already seen by automated modeling (repeatable).
        #[arg(long)]
        auto_processed: Vec<String>,
        /// Grouping mode (application, framework).
        #[arg(long)]
        mode: Option<Mode>,
    },

    /// Report duplicate and conflicting models per method.
    ValidateModels {
        #[arg(long)]
        models: PathBuf,
    },

    /// Compare engine support flags against models.
    CheckConsistency {
        #[arg(long)]
        methods: PathBuf,
        #[arg(long)]
        models: PathBuf,
    },
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON like every other response.
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), FlowError> {
    match cli.command {
        Command::Tokens { path } => execute_tokens(&path),
        Command::ValidatePath { path } => execute_validate_path(&path),
        Command::Decode {
            language,
            variant,
            input,
        } => execute_decode(&cli.global, language, variant, input),
        Command::Encode {
            language,
            input,
            include_type_models,
        } => execute_encode(&cli.global, language, input, include_type_models),
        Command::Arguments {
            language,
            signature,
            input,
        } => execute_arguments(&cli.global, language, &signature, input),
        Command::Suggest {
            language,
            input,
            signature,
            value,
        } => execute_suggest(&cli.global, language, input, &signature, &value),
        Command::Sort {
            methods,
            models,
            modified,
            auto_processed,
            mode,
        } => execute_sort(&cli.global, methods, models, modified, auto_processed, mode),
        Command::ValidateModels { models } => execute_validate_models(models),
        Command::CheckConsistency { methods, models } => execute_check_consistency(methods, models),
    }
}

// ============================================================================
// Shared Helpers
// ============================================================================

fn load_config(global: &GlobalArgs) -> Result<Config, FlowError> {
    let config = match &global.config {
        Some(path) => Config::load(path)?,
        None => Config::discover()?,
    };
    Ok(config)
}

/// Language from the flag, falling back to configuration.
fn resolve_language(flag: Option<Ecosystem>, config: &Config) -> Result<Ecosystem, FlowError> {
    flag.or(config.flowmodel.language).ok_or_else(|| {
        FlowError::invalid_args("no language given: pass --language or set flowmodel.language in the config file")
    })
}

fn emit<T: serde::Serialize>(response: &T) -> Result<(), FlowError> {
    let mut stdout = io::stdout();
    emit_response(response, &mut stdout)
        .and_then(|()| stdout.flush())
        .map_err(|e| FlowError::internal(format!("failed to write output: {}", e)))
}

fn read_models(path: Option<PathBuf>) -> Result<ModelsBySignature, FlowError> {
    match path {
        Some(path) => Ok(models_by_signature(read_json::<Vec<ModeledMethod>>(&path)?)),
        None => Ok(ModelsBySignature::new()),
    }
}

// ============================================================================
// Commands
// ============================================================================

fn execute_tokens(path: &str) -> Result<(), FlowError> {
    emit(&TokensResponse::new(path, parse_access_path_tokens(path)))
}

fn execute_validate_path(path: &str) -> Result<(), FlowError> {
    emit(&DiagnosticsResponse::new(path, validate_access_path(path)))
}

fn execute_decode(
    global: &GlobalArgs,
    language: Option<Ecosystem>,
    variant: ModelVariant,
    input: PathBuf,
) -> Result<(), FlowError> {
    let config = load_config(global)?;
    let language = resolve_language(language, &config)?;
    let registry = default_registry();
    let adapter = registry.get(language)?;

    let rows: Vec<RowTuple> = read_json(&input)?;
    let decoded = decode_rows(adapter, variant, &rows)?;
    emit(&DecodeResponse::new(language, decoded.models, decoded.skipped))
}

fn execute_encode(
    global: &GlobalArgs,
    language: Option<Ecosystem>,
    input: PathBuf,
    include_type_models: bool,
) -> Result<(), FlowError> {
    let config = load_config(global)?;
    let language = resolve_language(language, &config)?;
    let registry = default_registry();
    let adapter = registry.get(language)?;

    let models: Vec<ModeledMethod> = read_json(&input)?;
    let include_type_models = include_type_models || config.flowmodel.show_type_models;
    let rows = encode_models(adapter, &models, include_type_models);
    emit(&EncodeResponse::new(language, rows))
}

fn execute_arguments(
    global: &GlobalArgs,
    language: Option<Ecosystem>,
    signature: &str,
    input: PathBuf,
) -> Result<(), FlowError> {
    let config = load_config(global)?;
    let language = resolve_language(language, &config)?;
    let registry = default_registry();
    let adapter = registry.get(language)?;

    let methods: Vec<Method> = read_json(&input)?;
    let mut method = methods
        .into_iter()
        .find(|method| method.signature() == signature)
        .ok_or_else(|| FlowError::unknown_signature(signature))?;
    resolve_endpoint_types(adapter, std::slice::from_mut(&mut method));

    let arguments = adapter.argument_options(&method.identity);
    emit(&ArgumentsResponse::new(
        signature,
        method.identity.endpoint_type,
        arguments,
    ))
}

fn execute_suggest(
    global: &GlobalArgs,
    language: Option<Ecosystem>,
    input: PathBuf,
    signature: &str,
    value: &str,
) -> Result<(), FlowError> {
    let config = load_config(global)?;
    let language = resolve_language(language, &config)?;
    let registry = default_registry();
    let adapter = registry.get(language)?;

    let tuples: Vec<Vec<RowValue>> = read_json(&input)?;
    let rows = parse_suggestion_tuples(adapter, &tuples);
    let trees = build_suggestion_trees(&rows);
    debug!(methods = trees.len(), "built suggestion trees");

    let tree = trees
        .get(signature)
        .ok_or_else(|| FlowError::unknown_signature(signature))?;
    let options = find_matching_options(tree, value)
        .into_iter()
        .cloned()
        .collect();
    emit(&SuggestResponse::new(signature, value, options))
}

fn execute_sort(
    global: &GlobalArgs,
    methods: PathBuf,
    models: Option<PathBuf>,
    modified: Vec<String>,
    auto_processed: Vec<String>,
    mode: Option<Mode>,
) -> Result<(), FlowError> {
    let config = load_config(global)?;
    let mode = mode.unwrap_or(config.flowmodel.mode);

    let methods: Vec<Method> = read_json(&methods)?;
    let models = read_models(models)?;
    let modified: BTreeSet<String> = modified.into_iter().collect();
    let auto_processed: BTreeSet<String> = auto_processed.into_iter().collect();

    let groups = group_methods(&methods, mode);
    let sorted = sort_group_names(&groups)
        .into_iter()
        .map(|name| {
            let methods = sort_methods(&groups[&name], &models, &modified, &auto_processed)
                .iter()
                .map(|method| method.signature().to_string())
                .collect();
            SortedGroup { name, methods }
        })
        .collect();
    emit(&SortResponse::new(sorted))
}

fn execute_validate_models(models: PathBuf) -> Result<(), FlowError> {
    let models = read_models(Some(models))?;
    let errors = models
        .iter()
        .filter_map(|(signature, models)| {
            let errors = validate_modeled_methods(models);
            if errors.is_empty() {
                None
            } else {
                Some((signature.clone(), errors))
            }
        })
        .collect();
    emit(&ValidateModelsResponse::new(errors))
}

fn execute_check_consistency(methods: PathBuf, models: PathBuf) -> Result<(), FlowError> {
    let methods: Vec<Method> = read_json(&methods)?;
    let models = read_models(Some(models))?;

    let mut notices: Vec<ConsistencyNotice> = Vec::new();
    check_consistency(&methods, &models, &mut notices);

    let mut logger = TracingNotifier;
    for notice in &notices {
        logger.notify(notice);
    }
    emit(&ConsistencyResponse::new(notices))
}
