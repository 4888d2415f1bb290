//! Method-bracket paths.
//!
//! ```text
//! type: "SQLite3::Database"   path: "Method[execute].Argument[0]"
//! type: "Foo!"                path: "Method[new].ReturnValue"
//! ```
//!
//! The first token names the method when it has the form `Method[name]`;
//! everything after it addresses a value inside that method. A path without a
//! leading method token refers to the type itself.

use std::sync::LazyLock;

use flowmodel_core::access_path::{join_tokens, parse_access_path_tokens};
use flowmodel_core::adapter::join_path;
use flowmodel_core::method::EndpointType;
use regex::Regex;

static METHOD_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Method\[([^\]]+)]$").unwrap());

/// Method named by a path, plus the rest of the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    pub method_name: String,
    pub suffix: String,
}

/// Split a path into its method name and suffix.
pub fn parse_ruby_access_path(path: &str) -> ParsedPath {
    let tokens = parse_access_path_tokens(path);
    let Some((first, rest)) = tokens.split_first() else {
        return ParsedPath {
            method_name: String::new(),
            suffix: String::new(),
        };
    };

    match METHOD_TOKEN.captures(&first.text) {
        Some(captures) => ParsedPath {
            method_name: captures[1].to_string(),
            suffix: join_tokens(rest),
        },
        None => ParsedPath {
            method_name: String::new(),
            suffix: path.to_string(),
        },
    }
}

/// Method name of a path, empty when the path does not start with one.
pub fn parse_ruby_method_from_path(path: &str) -> String {
    parse_ruby_access_path(path).method_name
}

/// Path prefix naming a method, empty for an empty method name.
pub fn ruby_method_path(method_name: &str) -> String {
    if method_name.is_empty() {
        return String::new();
    }
    format!("Method[{}]", method_name)
}

/// Full path: method prefix followed by `path`.
pub fn ruby_path(method_name: &str, path: &str) -> String {
    join_path(&ruby_method_path(method_name), path)
}

/// Endpoint type implied by a type and method name.
///
/// `new` on a singleton class (`Foo!`) constructs instances; no method at all
/// refers to the class.
pub fn ruby_endpoint_type(type_name: &str, method_name: &str) -> EndpointType {
    if type_name.ends_with('!') && method_name == "new" {
        EndpointType::Constructor
    } else if method_name.is_empty() {
        EndpointType::Class
    } else {
        EndpointType::Method
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(method_name: &str, suffix: &str) -> ParsedPath {
        ParsedPath {
            method_name: method_name.to_string(),
            suffix: suffix.to_string(),
        }
    }

    #[test]
    fn leading_method_token_is_split_off() {
        assert_eq!(
            parse_ruby_access_path("Method[execute].Argument[0]"),
            parsed("execute", "Argument[0]")
        );
        assert_eq!(parse_ruby_access_path("Method[execute]"), parsed("execute", ""));
    }

    #[test]
    fn path_without_method_is_all_suffix() {
        assert_eq!(parse_ruby_access_path("ReturnValue"), parsed("", "ReturnValue"));
        assert_eq!(parse_ruby_access_path(""), parsed("", ""));
    }

    #[test]
    fn nested_brackets_stay_in_suffix() {
        assert_eq!(
            parse_ruby_access_path("Method[run].Argument[block].Parameter[0].Element[a.b]"),
            parsed("run", "Argument[block].Parameter[0].Element[a.b]")
        );
    }

    #[test]
    fn method_name_from_path() {
        assert_eq!(parse_ruby_method_from_path("Method[new]"), "new");
        assert_eq!(parse_ruby_method_from_path("Argument[0]"), "");
    }

    #[test]
    fn path_joins_method_prefix() {
        assert_eq!(ruby_path("execute", "Argument[0]"), "Method[execute].Argument[0]");
        assert_eq!(ruby_path("execute", ""), "Method[execute]");
        assert_eq!(ruby_path("", "ReturnValue"), "ReturnValue");
    }

    #[test]
    fn endpoint_types() {
        assert_eq!(ruby_endpoint_type("Foo!", "new"), EndpointType::Constructor);
        assert_eq!(ruby_endpoint_type("Foo", "new"), EndpointType::Method);
        assert_eq!(ruby_endpoint_type("Foo", ""), EndpointType::Class);
        assert_eq!(ruby_endpoint_type("Foo!", "create"), EndpointType::Method);
    }
}
