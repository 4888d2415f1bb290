//! Access-path suggestion tuples.
//!
//! The suggestion query emits `type, path, value, details, defType` tuples,
//! where `(type, path)` names the method in the usual Ruby syntax and `value`
//! is a suggested access path inside that method.

use flowmodel_core::row::RowValue;
use flowmodel_core::suggestions::{parse_suggestion_tuples, SuggestionRow};
use tracing::debug;

use crate::adapter::RubyAdapter;

/// Decode suggestion tuples into rows keyed by Ruby method signature.
///
/// Malformed tuples and unknown definition kinds are dropped with a warning.
pub fn parse_access_path_suggestions(tuples: &[Vec<RowValue>]) -> Vec<SuggestionRow> {
    let rows = parse_suggestion_tuples(&RubyAdapter, tuples);
    debug!(count = rows.len(), "parsed ruby access path suggestions");
    rows
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use flowmodel_core::suggestions::{build_suggestion_trees, find_matching_options, DefinitionKind};

    fn tuple(values: &[&str]) -> Vec<RowValue> {
        values.iter().map(|value| RowValue::from(*value)).collect()
    }

    fn tuples() -> Vec<Vec<RowValue>> {
        vec![
            tuple(&["SQLite3::Database", "Method[create_function]", "Argument[0]", "name", "parameter"]),
            tuple(&["SQLite3::Database", "Method[create_function]", "Argument[1]", "arity", "parameter"]),
            tuple(&["SQLite3::Database", "Method[create_function]", "Argument[self]", "SQLite3::Database", "class"]),
            tuple(&["SQLite3::Database", "Method[create_function]", "Argument[block]", "&block", "parameter"]),
            tuple(&[
                "SQLite3::Database",
                "Method[create_function]",
                "Argument[block].Parameter[0]",
                "",
                "parameter",
            ]),
            tuple(&["SQLite3::Database", "Method[execute]", "ReturnValue", "", "return"]),
        ]
    }

    #[test]
    fn tuples_decode_to_signature_keyed_rows() {
        let rows = parse_access_path_suggestions(&tuples());
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].method_signature, "SQLite3::Database#create_function");
        assert_eq!(rows[0].details, "name");
        assert_eq!(rows[0].definition_kind, DefinitionKind::Parameter);
        assert_eq!(rows[5].method_signature, "SQLite3::Database#execute");
    }

    #[test]
    fn unknown_definition_kind_is_dropped() {
        let mut input = tuples();
        input.push(tuple(&["Foo", "Method[bar]", "Argument[0]", "", "gadget"]));
        input.push(vec![RowValue::from("Foo"), RowValue::from(true)]);
        assert_eq!(parse_access_path_suggestions(&input).len(), 6);
    }

    #[test]
    fn tuples_build_searchable_trees() {
        let rows = parse_access_path_suggestions(&tuples());
        let trees = build_suggestion_trees(&rows);
        let tree = &trees["SQLite3::Database#create_function"];

        let labels: Vec<&str> = tree.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Argument[self]", "Argument[0]", "Argument[1]", "Argument[block]"]
        );
        assert_eq!(tree[0].icon, "symbol-class");

        let children = find_matching_options(tree, "Argument[block].");
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].value, "Argument[block].Parameter[0]");
    }
}
