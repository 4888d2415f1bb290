//! Flat-column ecosystem support for flowmodel.
//!
//! Java and C# name a method with separate package, type, name and parameter
//! columns. Only the addressing inside a method (`Argument[0]`,
//! `ReturnValue`, ...) is written as an access path.

pub mod adapter;

pub use adapter::StaticAdapter;
