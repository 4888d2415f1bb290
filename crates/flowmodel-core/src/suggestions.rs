//! Access-path suggestion trees.
//!
//! Suggestion rows are flat `(signature, value, details, kind)` records
//! produced by the analysis engine. [`build_suggestion_trees`] turns them into
//! one option tree per method signature, where the children ("followups") of an
//! option are the rows whose value extends the option's value by one token.
//! [`find_matching_options`] walks a tree for interactive completion.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::access_path::{join_tokens, parse_access_path_tokens};
use crate::adapter::EcosystemAdapter;
use crate::model::ModelVariant;
use crate::row::{check_row_shape, string_at, ColumnKind, RowValue};

// ============================================================================
// Definition Kinds
// ============================================================================

/// What a suggested access path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefinitionKind {
    Array,
    Class,
    Enum,
    EnumMember,
    Field,
    Interface,
    Key,
    Method,
    Misc,
    Namespace,
    Parameter,
    Property,
    Structure,
    Return,
    Variable,
}

impl DefinitionKind {
    pub const ALL: [DefinitionKind; 15] = [
        DefinitionKind::Array,
        DefinitionKind::Class,
        DefinitionKind::Enum,
        DefinitionKind::EnumMember,
        DefinitionKind::Field,
        DefinitionKind::Interface,
        DefinitionKind::Key,
        DefinitionKind::Method,
        DefinitionKind::Misc,
        DefinitionKind::Namespace,
        DefinitionKind::Parameter,
        DefinitionKind::Property,
        DefinitionKind::Structure,
        DefinitionKind::Return,
        DefinitionKind::Variable,
    ];

    /// Wire name, as emitted by the suggestion query.
    pub fn as_str(&self) -> &'static str {
        match self {
            DefinitionKind::Array => "array",
            DefinitionKind::Class => "class",
            DefinitionKind::Enum => "enum",
            DefinitionKind::EnumMember => "enum-member",
            DefinitionKind::Field => "field",
            DefinitionKind::Interface => "interface",
            DefinitionKind::Key => "key",
            DefinitionKind::Method => "method",
            DefinitionKind::Misc => "misc",
            DefinitionKind::Namespace => "namespace",
            DefinitionKind::Parameter => "parameter",
            DefinitionKind::Property => "property",
            DefinitionKind::Structure => "structure",
            DefinitionKind::Return => "return",
            DefinitionKind::Variable => "variable",
        }
    }

    /// Codicon name shown next to the option.
    pub fn icon(&self) -> &'static str {
        match self {
            DefinitionKind::Array => "symbol-array",
            DefinitionKind::Class => "symbol-class",
            DefinitionKind::Enum => "symbol-enum",
            DefinitionKind::EnumMember => "symbol-enum-member",
            DefinitionKind::Field => "symbol-field",
            DefinitionKind::Interface => "symbol-interface",
            DefinitionKind::Key => "symbol-key",
            DefinitionKind::Method | DefinitionKind::Return => "symbol-method",
            DefinitionKind::Misc => "symbol-misc",
            DefinitionKind::Namespace => "symbol-namespace",
            DefinitionKind::Parameter => "symbol-parameter",
            DefinitionKind::Property => "symbol-property",
            DefinitionKind::Structure => "symbol-structure",
            DefinitionKind::Variable => "symbol-variable",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DefinitionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DefinitionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown definition kind '{}'", s))
    }
}

// ============================================================================
// Rows and Options
// ============================================================================

/// One suggested access path for one method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRow {
    pub method_signature: String,
    pub value: String,
    #[serde(default)]
    pub details: String,
    pub definition_kind: DefinitionKind,
}

/// A node in a suggestion tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionOption {
    /// Last token of `value`.
    pub label: String,
    /// Full access path.
    pub value: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub followup: Vec<SuggestionOption>,
}

/// Column table of raw suggestion tuples: `type, path, value, details, defType`.
pub const SUGGESTION_COLUMNS: &[ColumnKind] = &[
    ColumnKind::String,
    ColumnKind::String,
    ColumnKind::String,
    ColumnKind::String,
    ColumnKind::String,
];

/// Decode raw suggestion tuples into rows keyed by method signature.
///
/// The method is named by the `(type, path)` pair, in the adapter's chained
/// syntax. Tuples with the wrong shape, an unresolvable method, or an unknown
/// definition kind are dropped with a warning.
pub fn parse_suggestion_tuples(
    adapter: &dyn EcosystemAdapter,
    tuples: &[Vec<RowValue>],
) -> Vec<SuggestionRow> {
    let mut rows = Vec::with_capacity(tuples.len());

    for (index, tuple) in tuples.iter().enumerate() {
        if let Err(err) = check_row_shape(ModelVariant::None, SUGGESTION_COLUMNS, tuple) {
            warn!(index, error = %err, "skipping malformed suggestion tuple");
            continue;
        }

        let Some(identity) = adapter.identity_from_type_and_path(string_at(tuple, 0), string_at(tuple, 1))
        else {
            warn!(
                index,
                ecosystem = %adapter.ecosystem(),
                "skipping suggestion tuple without a method identity"
            );
            continue;
        };

        let kind_name = string_at(tuple, 4);
        let definition_kind = match kind_name.parse::<DefinitionKind>() {
            Ok(kind) => kind,
            Err(_) => {
                warn!(index, kind = kind_name, "skipping suggestion with unknown definition kind");
                continue;
            }
        };

        rows.push(SuggestionRow {
            method_signature: adapter.create_method_signature(&identity),
            value: string_at(tuple, 2).to_string(),
            details: string_at(tuple, 3).to_string(),
            definition_kind,
        });
    }

    debug!(tuples = tuples.len(), rows = rows.len(), "decoded suggestion tuples");
    rows
}

// ============================================================================
// Tree Building
// ============================================================================

/// Build one option tree per method signature.
pub fn build_suggestion_trees(rows: &[SuggestionRow]) -> BTreeMap<String, Vec<SuggestionOption>> {
    let mut by_signature: BTreeMap<&str, Vec<&SuggestionRow>> = BTreeMap::new();
    for row in rows {
        by_signature
            .entry(row.method_signature.as_str())
            .or_default()
            .push(row);
    }

    by_signature
        .into_iter()
        .map(|(signature, rows)| (signature.to_string(), build_option_tree(&rows)))
        .collect()
}

/// Build the root option list for the rows of a single method.
///
/// Returns an empty list when no row sits at the root.
pub fn build_option_tree(rows: &[&SuggestionRow]) -> Vec<SuggestionOption> {
    let mut buckets: HashMap<String, Vec<SuggestionOption>> = HashMap::new();

    for row in rows {
        let tokens = parse_access_path_tokens(&row.value);
        let Some((last, parents)) = tokens.split_last() else {
            warn!(signature = %row.method_signature, "skipping suggestion with empty value");
            continue;
        };

        let parent_path = join_tokens(parents);
        let details = (!row.details.is_empty()).then(|| row.details.clone());

        buckets.entry(parent_path).or_default().push(SuggestionOption {
            label: last.text.clone(),
            value: row.value.clone(),
            icon: row.definition_kind.icon().to_string(),
            details,
            followup: Vec::new(),
        });
    }

    for options in buckets.values_mut() {
        options.sort_by(compare_options);
    }

    attach_followups("", &mut buckets)
}

/// Take the bucket keyed by `parent` and fill in its followups recursively.
///
/// Every child value is strictly longer than its parent key, so the recursion
/// terminates.
fn attach_followups(
    parent: &str,
    buckets: &mut HashMap<String, Vec<SuggestionOption>>,
) -> Vec<SuggestionOption> {
    let Some(mut options) = buckets.remove(parent) else {
        return Vec::new();
    };

    for option in &mut options {
        option.followup = attach_followups(&option.value, buckets);
    }

    options
}

static POSITIONAL_ARGUMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Argument\[(\d+)]$").unwrap());
static KEYWORD_ARGUMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Argument\[[^\d:]+:]$").unwrap());
static PARAMETER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Parameter\[(\d+)]$").unwrap());

/// Precedence bucket of a label, lowest first.
fn label_rank(label: &str) -> u8 {
    if label == "Argument[self]" {
        0
    } else if POSITIONAL_ARGUMENT.is_match(label) {
        1
    } else if KEYWORD_ARGUMENT.is_match(label) {
        2
    } else if label == "Argument[block]" {
        3
    } else if label == "Argument[hash-splat]" {
        4
    } else if PARAMETER.is_match(label) {
        5
    } else {
        6
    }
}

/// Order options by label precedence, then numerically or lexically.
pub fn compare_options(a: &SuggestionOption, b: &SuggestionOption) -> Ordering {
    let (rank_a, rank_b) = (label_rank(&a.label), label_rank(&b.label));
    if rank_a != rank_b {
        return rank_a.cmp(&rank_b);
    }

    let index_pattern = match rank_a {
        1 => Some(&*POSITIONAL_ARGUMENT),
        5 => Some(&*PARAMETER),
        _ => None,
    };

    if let Some(pattern) = index_pattern {
        let index = |label: &str| {
            pattern
                .captures(label)
                .and_then(|captures| captures.get(1))
                .map(|m| m.as_str().trim_start_matches('0').to_string())
                .unwrap_or_default()
        };
        let (index_a, index_b) = (index(&a.label), index(&b.label));
        return index_a
            .len()
            .cmp(&index_b.len())
            .then_with(|| index_a.cmp(&index_b))
            .then_with(|| a.label.cmp(&b.label));
    }

    compare_lexically(&a.label, &b.label)
}

/// Case-insensitive comparison, falling back to code points.
fn compare_lexically(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

// ============================================================================
// Matching
// ============================================================================

/// Options completing a partially typed access path.
///
/// All tokens but the last must name options exactly, walking down the tree;
/// the children reached are filtered by case-insensitive substring match of
/// the last token. An unresolvable prefix gives no options.
pub fn find_matching_options<'a>(
    options: &'a [SuggestionOption],
    value: &str,
) -> Vec<&'a SuggestionOption> {
    let tokens = parse_access_path_tokens(value);
    let Some((fragment, prefix)) = tokens.split_last() else {
        return options.iter().collect();
    };

    let mut frontier = options;
    for token in prefix {
        match frontier.iter().find(|option| option.label == token.text) {
            Some(option) => frontier = &option.followup,
            None => return Vec::new(),
        }
    }

    let needle = fragment.text.to_lowercase();
    frontier
        .iter()
        .filter(|option| option.label.to_lowercase().contains(&needle))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(value: &str, icon: &str) -> SuggestionOption {
        let label = value.rsplit('.').next().unwrap_or(value).to_string();
        SuggestionOption {
            label,
            value: value.to_string(),
            icon: icon.to_string(),
            details: None,
            followup: Vec::new(),
        }
    }

    fn with_followup(mut option: SuggestionOption, followup: Vec<SuggestionOption>) -> SuggestionOption {
        option.followup = followup;
        option
    }

    fn fixture_tree() -> Vec<SuggestionOption> {
        vec![
            leaf("Argument[self]", "symbol-class"),
            with_followup(
                leaf("Argument[0]", "symbol-parameter"),
                vec![
                    leaf("Argument[0].Element[0]", "symbol-field"),
                    leaf("Argument[0].Element[1]", "symbol-field"),
                ],
            ),
            leaf("Argument[1]", "symbol-parameter"),
            leaf("Argument[text_rep:]", "symbol-parameter"),
            with_followup(
                leaf("Argument[block]", "symbol-parameter"),
                vec![
                    with_followup(
                        leaf("Argument[block].Parameter[0]", "symbol-parameter"),
                        vec![
                            leaf("Argument[block].Parameter[0].Element[:query]", "symbol-key"),
                            leaf("Argument[block].Parameter[0].Element[:parameters]", "symbol-key"),
                        ],
                    ),
                    with_followup(
                        leaf("Argument[block].Parameter[1]", "symbol-parameter"),
                        vec![leaf("Argument[block].Parameter[1].Field[@query]", "symbol-field")],
                    ),
                ],
            ),
            leaf("ReturnValue", "symbol-variable"),
        ]
    }

    fn values(options: &[&SuggestionOption]) -> Vec<String> {
        options.iter().map(|option| option.value.clone()).collect()
    }

    fn row(value: &str, kind: DefinitionKind) -> SuggestionRow {
        SuggestionRow {
            method_signature: "SQLite3::Database#create_function".to_string(),
            value: value.to_string(),
            details: String::new(),
            definition_kind: kind,
        }
    }

    // =========================================================================
    // Matching
    // =========================================================================

    #[test]
    fn empty_value_returns_root_options() {
        let tree = fixture_tree();
        assert_eq!(
            values(&find_matching_options(&tree, "")),
            vec![
                "Argument[self]",
                "Argument[0]",
                "Argument[1]",
                "Argument[text_rep:]",
                "Argument[block]",
                "ReturnValue",
            ]
        );
    }

    #[test]
    fn trailing_dot_lists_children() {
        let tree = fixture_tree();
        assert_eq!(
            values(&find_matching_options(&tree, "Argument[block].")),
            vec!["Argument[block].Parameter[0]", "Argument[block].Parameter[1]"]
        );
        assert_eq!(
            values(&find_matching_options(&tree, "Argument[block].Parameter[0].")),
            vec![
                "Argument[block].Parameter[0].Element[:query]",
                "Argument[block].Parameter[0].Element[:parameters]",
            ]
        );
    }

    #[test]
    fn complete_token_matches_itself() {
        let tree = fixture_tree();
        assert_eq!(
            values(&find_matching_options(&tree, "Argument[block].Parameter[0]")),
            vec!["Argument[block].Parameter[0]"]
        );
    }

    #[test]
    fn fragment_filter_is_case_insensitive() {
        let tree = fixture_tree();
        let expected = vec!["Argument[self]", "Argument[block]", "ReturnValue"];
        assert_eq!(values(&find_matching_options(&tree, "l")), expected);
        assert_eq!(values(&find_matching_options(&tree, "L")), expected);
        assert_eq!(
            values(&find_matching_options(&tree, "block")),
            vec!["Argument[block]"]
        );
    }

    #[test]
    fn unresolved_prefix_gives_nothing() {
        let tree = fixture_tree();
        assert!(find_matching_options(&tree, "Argument[2].").is_empty());
        assert!(find_matching_options(&tree, "argument[block].").is_empty());
    }

    // =========================================================================
    // Building
    // =========================================================================

    #[test]
    fn builds_nested_followups() {
        let rows = vec![
            row("Argument[block].Parameter[0]", DefinitionKind::Parameter),
            row("Argument[block]", DefinitionKind::Parameter),
            row("ReturnValue", DefinitionKind::Return),
            row("Argument[block].Parameter[0].Element[:query]", DefinitionKind::Key),
        ];
        let trees = build_suggestion_trees(&rows);
        let tree = &trees["SQLite3::Database#create_function"];

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].label, "Argument[block]");
        assert_eq!(tree[0].followup[0].label, "Parameter[0]");
        assert_eq!(tree[0].followup[0].followup[0].label, "Element[:query]");
        assert_eq!(tree[0].followup[0].followup[0].icon, "symbol-key");
        assert_eq!(tree[1].icon, "symbol-method");
    }

    #[test]
    fn options_follow_label_precedence() {
        let rows: Vec<SuggestionRow> = [
            "Foo",
            "Parameter[10]",
            "Argument[hash-splat]",
            "Argument[10]",
            "Argument[block]",
            "Argument[key:]",
            "Parameter[2]",
            "Argument[2]",
            "Argument[self]",
            "Argument[bar:]",
            "bar",
        ]
        .into_iter()
        .map(|value| row(value, DefinitionKind::Misc))
        .collect();

        let tree = build_option_tree(&rows.iter().collect::<Vec<_>>());
        let labels: Vec<&str> = tree.iter().map(|option| option.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Argument[self]",
                "Argument[2]",
                "Argument[10]",
                "Argument[bar:]",
                "Argument[key:]",
                "Argument[block]",
                "Argument[hash-splat]",
                "Parameter[2]",
                "Parameter[10]",
                "bar",
                "Foo",
            ]
        );
    }

    #[test]
    fn missing_root_gives_empty_tree() {
        let rows = [row("Argument[0].Element[0]", DefinitionKind::Field)];
        assert!(build_option_tree(&rows.iter().collect::<Vec<_>>()).is_empty());
    }

    #[test]
    fn details_are_optional() {
        let mut with_details = row("Argument[0]", DefinitionKind::Parameter);
        with_details.details = "name".to_string();
        let rows = [with_details, row("Argument[1]", DefinitionKind::Parameter)];
        let tree = build_option_tree(&rows.iter().collect::<Vec<_>>());
        assert_eq!(tree[0].details.as_deref(), Some("name"));
        assert_eq!(tree[1].details, None);
    }

    #[test]
    fn definition_kind_parses_wire_names() {
        assert_eq!("enum-member".parse::<DefinitionKind>(), Ok(DefinitionKind::EnumMember));
        assert!("widget".parse::<DefinitionKind>().is_err());
        assert_eq!(DefinitionKind::Return.icon(), "symbol-method");
    }
}
