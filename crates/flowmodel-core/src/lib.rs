//! Core infrastructure for flowmodel.
//!
//! This crate provides ecosystem-agnostic infrastructure:
//! - Access-path lexer and validator
//! - Canonical endpoint model and candidate methods
//! - Row-tuple wire values and column tables
//! - Ecosystem adapter trait and adapter registry
//! - Suggestion trees for access-path completion
//! - Grouping and display order of methods
//! - Duplicate/conflict validation and consistency checks
//! - Error types

pub mod access_path;
pub mod adapter;
pub mod consistency;
pub mod error;
pub mod method;
pub mod model;
pub mod row;
pub mod sorting;
pub mod suggestions;
pub mod validation;
