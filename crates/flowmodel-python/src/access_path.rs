//! Type columns and member-chain paths.
//!
//! A Python endpoint is written as a `(type, path)` pair:
//!
//! ```text
//! type: "requests.Session"      path: "Member[get].Argument[1]"
//! type: "os"                    path: "Member[system].Argument[0]"
//! type: "pkg.Helper!"           path: "Member[build].ReturnValue"
//! ```
//!
//! The first dotted part of `type` is the package and the rest a short type
//! name. A trailing `!` marks the class object itself, so members reached
//! through it are functions rather than instance methods. Leading
//! `Member[...]` tokens extend the type name, the last one being the method.
//! An `Instance` token also marks the endpoint as a method.

use std::sync::LazyLock;

use flowmodel_core::access_path::{join_tokens, parse_access_path_tokens};
use flowmodel_core::adapter::join_path;
use flowmodel_core::method::EndpointType;
use regex::Regex;

static MEMBER_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Member\[(.+)]$").unwrap());

/// Endpoint named by a `(type, path)` pair, plus the rest of the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    pub package_name: String,
    pub type_name: String,
    pub method_name: String,
    pub endpoint_type: EndpointType,
    /// Tokens after the method-identifying prefix.
    pub suffix: String,
}

/// Split a type column into package and short type name.
pub fn parse_python_type(type_column: &str) -> (&str, &str) {
    type_column.split_once('.').unwrap_or((type_column, ""))
}

/// Parse a `(type, path)` pair.
pub fn parse_python_type_and_path(type_column: &str, path: &str) -> ParsedPath {
    let (package_name, short_type_name) = parse_python_type(type_column);
    let is_class_object = short_type_name.ends_with('!');
    let bare_type_name = short_type_name.strip_suffix('!').unwrap_or(short_type_name);

    let tokens = parse_access_path_tokens(path);
    if tokens.is_empty() {
        return ParsedPath {
            package_name: package_name.to_string(),
            type_name: bare_type_name.to_string(),
            method_name: String::new(),
            endpoint_type: EndpointType::Method,
            suffix: String::new(),
        };
    }

    let mut endpoint_type = if !short_type_name.is_empty() && !is_class_object {
        EndpointType::Method
    } else {
        EndpointType::Function
    };

    let mut type_parts = Vec::new();
    let mut rest = &tokens[tokens.len()..];
    for (index, token) in tokens.iter().enumerate() {
        if let Some(captures) = MEMBER_TOKEN.captures(&token.text) {
            type_parts.push(captures[1].to_string());
        } else if token.text == "Instance" {
            endpoint_type = EndpointType::Method;
        } else {
            rest = &tokens[index..];
            break;
        }
    }

    let method_name = type_parts.pop().unwrap_or_default();
    let member_type = type_parts.join(".");
    let type_name = match (bare_type_name.is_empty(), member_type.is_empty()) {
        (true, _) => member_type,
        (false, true) => bare_type_name.to_string(),
        (false, false) => format!("{}.{}", bare_type_name, member_type),
    };

    ParsedPath {
        package_name: package_name.to_string(),
        type_name,
        method_name,
        endpoint_type,
        suffix: join_tokens(rest),
    }
}

/// Type column for an endpoint.
pub fn python_type(package_name: &str, type_name: &str, endpoint_type: EndpointType) -> String {
    if !package_name.is_empty() && !type_name.is_empty() {
        let marker = if endpoint_type == EndpointType::Function {
            "!"
        } else {
            ""
        };
        return format!("{}.{}{}", package_name, type_name, marker);
    }
    format!("{}{}", package_name, type_name)
}

/// Path prefix naming a method, empty for an empty method name.
pub fn python_method_path(method_name: &str) -> String {
    if method_name.is_empty() {
        return String::new();
    }
    format!("Member[{}]", method_name)
}

/// Full path: method prefix followed by `path`.
pub fn python_path(method_name: &str, path: &str) -> String {
    join_path(&python_method_path(method_name), path)
}

/// Whether the first parameter of an endpoint is `self` (or `cls`).
pub fn has_self_argument(endpoint_type: EndpointType) -> bool {
    matches!(endpoint_type, EndpointType::Method | EndpointType::ClassMethod)
}

// ============================================================================
// Tests
// ============================================================================
