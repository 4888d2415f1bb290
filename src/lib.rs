//! flowmodel: data-flow endpoint models for static analysis
//!
//! Maintains models of sources, sinks, summaries, neutrals and type relations
//! for library APIs, and translates them to and from the row tuples an
//! analysis engine consumes, for several language ecosystems.

// Core infrastructure - re-exported from flowmodel-core
pub use flowmodel_core::access_path;
pub use flowmodel_core::adapter;
pub use flowmodel_core::consistency;
pub use flowmodel_core::method;
pub use flowmodel_core::model;
pub use flowmodel_core::row;
pub use flowmodel_core::sorting;
pub use flowmodel_core::suggestions;
pub use flowmodel_core::validation;

// Ecosystem adapters
pub use flowmodel_python as python;
pub use flowmodel_ruby as ruby;
pub use flowmodel_static as generic;

// Front door plumbing
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod registry;
pub mod rows;
