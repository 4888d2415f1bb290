//! Ruby ecosystem support for flowmodel.
//!
//! Ruby rows name a method with the `type` column (`Foo::Bar`, or `Foo::Bar!`
//! for the singleton class) and a leading `Method[name]` token in the `path`
//! column. This crate provides:
//! - Parsing and building of method-bracket paths
//! - The [`RubyAdapter`] implementation of the ecosystem adapter trait
//! - Decoding of access-path suggestion tuples

pub mod access_path;
pub mod adapter;
pub mod suggestions;

pub use adapter::RubyAdapter;
