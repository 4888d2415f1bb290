//! Python ecosystem support for flowmodel.
//!
//! Python rows name a method with a `type` column (`package.Type`, with a
//! trailing `!` for functions reached through a named type) and a leading run
//! of `Member[...]` tokens in the `path` column. This crate provides:
//! - Parsing and building of the type column and member-chain paths
//! - The [`PythonAdapter`] implementation of the ecosystem adapter trait

pub mod access_path;
pub mod adapter;

pub use adapter::PythonAdapter;
