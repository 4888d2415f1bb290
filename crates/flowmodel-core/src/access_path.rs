//! Access-path tokenizer and validator.
//!
//! Access paths address a position relative to an endpoint, e.g.
//! `Argument[0].Field[foo.Bar.x]` or `ReturnValue.Element`. Tokens are separated
//! by `.` at bracket depth zero; dots inside brackets belong to the token.
//!
//! The tokenizer is deliberately lenient: it tracks bracket depth with a plain
//! counter and never fails, so partially typed input (`Argument[se`) still
//! yields tokens with usable ranges. Strictness lives in [`validate_access_path`].
//!
//! ## Grammar (per token)
//!
//! ```text
//! <token>      := <identifier> ( "[" <content> "]" )?
//! <identifier> := [A-Za-z0-9_]+
//! <content>    := any characters except "[" and "]"
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use winnow::combinator::{delimited, opt};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};
use winnow::ModalResult;

// ============================================================================
// Tokens
// ============================================================================

/// Character range into the original path string.
///
/// Ranges are half-open: `[start, end)`, counted in characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenRange {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
}

impl TokenRange {
    /// Create a new range.
    pub fn new(start: usize, end: usize) -> Self {
        TokenRange { start, end }
    }

    /// Check if the range covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A single access-path token with its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPathToken {
    /// Token text, without the separating dot.
    pub text: String,
    /// Position of the text in the original string.
    pub range: TokenRange,
}

/// Split an access path into tokens.
///
/// A `.` at bracket depth zero ends the current token. The text after the last
/// separator is always emitted, even when empty, so `"Argument[foo]."` produces
/// a trailing empty token that the validator can report. The empty string
/// produces no tokens.
///
/// # Examples
///
/// ```
/// use flowmodel_core::access_path::parse_access_path_tokens;
///
/// let tokens = parse_access_path_tokens("Argument[0].Field[foo.Bar.x]");
/// let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
/// assert_eq!(texts, ["Argument[0]", "Field[foo.Bar.x]"]);
/// ```
pub fn parse_access_path_tokens(path: &str) -> Vec<AccessPathToken> {
    if path.is_empty() {
        return Vec::new();
    }

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut start = 0;
    let mut depth: i64 = 0;
    let mut len = 0;

    for (index, c) in path.chars().enumerate() {
        len = index + 1;
        match c {
            '[' => depth += 1,
            ']' => depth -= 1,
            '.' if depth == 0 => {
                tokens.push(AccessPathToken {
                    text: std::mem::take(&mut current),
                    range: TokenRange::new(start, index),
                });
                start = index + 1;
                continue;
            }
            _ => {}
        }
        current.push(c);
    }

    tokens.push(AccessPathToken {
        text: current,
        range: TokenRange::new(start, len),
    });

    tokens
}

/// Join token texts back into a path with `.` separators.
pub fn join_tokens<'a>(tokens: impl IntoIterator<Item = &'a AccessPathToken>) -> String {
    tokens
        .into_iter()
        .map(|token| token.text.as_str())
        .collect::<Vec<_>>()
        .join(".")
}

// ============================================================================
// Validation
// ============================================================================

/// Diagnostic message for an access-path token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticMessage {
    /// Token does not match `identifier` or `identifier[content]`.
    #[serde(rename = "Invalid access path")]
    InvalidAccessPath,
    /// Token has zero width (trailing or doubled dot).
    #[serde(rename = "Unexpected empty token")]
    UnexpectedEmptyToken,
}

impl DiagnosticMessage {
    /// Message text shown to the user.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticMessage::InvalidAccessPath => "Invalid access path",
            DiagnosticMessage::UnexpectedEmptyToken => "Unexpected empty token",
        }
    }
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A positioned problem found in an access path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPathDiagnostic {
    /// Range of the offending token.
    pub range: TokenRange,
    /// What is wrong with it.
    pub message: DiagnosticMessage,
}

/// Validate an access path, returning diagnostics in token order.
///
/// The empty string is valid and means "no path set". Bracket contents are not
/// validated recursively.
pub fn validate_access_path(path: &str) -> Vec<AccessPathDiagnostic> {
    parse_access_path_tokens(path)
        .into_iter()
        .filter_map(|token| {
            if token.range.is_empty() {
                Some(AccessPathDiagnostic {
                    range: token.range,
                    message: DiagnosticMessage::UnexpectedEmptyToken,
                })
            } else if !is_well_formed_token(&token.text) {
                Some(AccessPathDiagnostic {
                    range: token.range,
                    message: DiagnosticMessage::InvalidAccessPath,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Check a single token against the token grammar.
pub fn is_well_formed_token(text: &str) -> bool {
    parse_token.parse(text).is_ok()
}

fn parse_token(input: &mut &str) -> ModalResult<()> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_')
        .void()
        .parse_next(input)?;
    opt(delimited(
        '[',
        take_till(0.., |c: char| c == '[' || c == ']'),
        ']',
    ))
    .void()
    .parse_next(input)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, start: usize, end: usize) -> AccessPathToken {
        AccessPathToken {
            text: text.to_string(),
            range: TokenRange::new(start, end),
        }
    }

    fn diagnostic(message: DiagnosticMessage, start: usize, end: usize) -> AccessPathDiagnostic {
        AccessPathDiagnostic {
            range: TokenRange::new(start, end),
            message,
        }
    }

    // =========================================================================
    // Tokenizer
    // =========================================================================

    #[test]
    fn tokenizes_simple_path() {
        assert_eq!(
            parse_access_path_tokens("Argument[foo].Element.Field[@test]"),
            vec![
                token("Argument[foo]", 0, 13),
                token("Element", 14, 21),
                token("Field[@test]", 22, 34),
            ]
        );
    }

    #[test]
    fn keeps_dots_inside_brackets() {
        assert_eq!(
            parse_access_path_tokens("Argument[foo].Element.Field[foo.Bar.x]"),
            vec![
                token("Argument[foo]", 0, 13),
                token("Element", 14, 21),
                token("Field[foo.Bar.x]", 22, 38),
            ]
        );
    }

    #[test]
    fn tolerates_unclosed_brackets() {
        assert_eq!(
            parse_access_path_tokens("Argument["),
            vec![token("Argument[", 0, 9)]
        );
        assert_eq!(
            parse_access_path_tokens("Argument[se"),
            vec![token("Argument[se", 0, 11)]
        );
        assert_eq!(
            parse_access_path_tokens("Argument[foo].Field["),
            vec![token("Argument[foo]", 0, 13), token("Field[", 14, 20)]
        );
    }

    #[test]
    fn emits_trailing_empty_tokens() {
        assert_eq!(
            parse_access_path_tokens("Argument[foo]."),
            vec![token("Argument[foo]", 0, 13), token("", 14, 14)]
        );
        assert_eq!(
            parse_access_path_tokens("Argument[foo].."),
            vec![
                token("Argument[foo]", 0, 13),
                token("", 14, 14),
                token("", 15, 15)
            ]
        );
    }

    #[test]
    fn handles_nested_brackets() {
        assert_eq!(
            parse_access_path_tokens("Argument[foo[bar].test].Element."),
            vec![
                token("Argument[foo[bar].test]", 0, 23),
                token("Element", 24, 31),
                token("", 32, 32),
            ]
        );
    }

    #[test]
    fn empty_path_has_no_tokens() {
        assert!(parse_access_path_tokens("").is_empty());
    }

    #[test]
    fn ranges_count_characters_not_bytes() {
        let tokens = parse_access_path_tokens("Field[é].x");
        assert_eq!(tokens, vec![token("Field[é]", 0, 8), token("x", 9, 10)]);
    }

    #[test]
    fn joining_tokens_reproduces_input() {
        for path in [
            "Argument[",
            "Argument[foo].",
            "Argument[foo]..",
            "Argument[foo[bar].test].Element.",
            "Argument[foo].Element.Field[foo.Bar.x]",
            ".",
            "..ReturnValue",
            "]].a.[",
            "",
        ] {
            let tokens = parse_access_path_tokens(path);
            assert_eq!(join_tokens(&tokens), path, "round trip failed for {path:?}");
        }
    }

    #[test]
    fn token_ranges_index_into_input() {
        let path = "Argument[a.b].Element..Field[x]";
        let chars: Vec<char> = path.chars().collect();
        for token in parse_access_path_tokens(path) {
            let slice: String = chars[token.range.start..token.range.end].iter().collect();
            assert_eq!(slice, token.text);
        }
    }

    // =========================================================================
    // Validator
    // =========================================================================

    #[test]
    fn empty_path_is_valid() {
        assert!(validate_access_path("").is_empty());
    }

    #[test]
    fn well_formed_paths_have_no_diagnostics() {
        assert!(validate_access_path("Argument[foo].Element.Field[@test]").is_empty());
        assert!(validate_access_path("Argument[foo].Element.Field[foo.Bar.x]").is_empty());
        assert!(validate_access_path("ReturnValue").is_empty());
        assert!(validate_access_path("Argument[0,name:]").is_empty());
    }

    #[test]
    fn unclosed_bracket_is_invalid() {
        assert_eq!(
            validate_access_path("Argument["),
            vec![diagnostic(DiagnosticMessage::InvalidAccessPath, 0, 9)]
        );
        assert_eq!(
            validate_access_path("Argument[se"),
            vec![diagnostic(DiagnosticMessage::InvalidAccessPath, 0, 11)]
        );
        assert_eq!(
            validate_access_path("Argument[foo].Field["),
            vec![diagnostic(DiagnosticMessage::InvalidAccessPath, 14, 20)]
        );
    }

    #[test]
    fn trailing_dots_report_empty_tokens() {
        assert_eq!(
            validate_access_path("Argument[foo]."),
            vec![diagnostic(DiagnosticMessage::UnexpectedEmptyToken, 14, 14)]
        );
        assert_eq!(
            validate_access_path("Argument[foo].."),
            vec![
                diagnostic(DiagnosticMessage::UnexpectedEmptyToken, 14, 14),
                diagnostic(DiagnosticMessage::UnexpectedEmptyToken, 15, 15),
            ]
        );
    }

    #[test]
    fn nested_brackets_are_invalid_in_token_order() {
        assert_eq!(
            validate_access_path("Argument[foo[bar].test].Element."),
            vec![
                diagnostic(DiagnosticMessage::InvalidAccessPath, 0, 23),
                diagnostic(DiagnosticMessage::UnexpectedEmptyToken, 32, 32),
            ]
        );
    }

    #[test]
    fn token_grammar() {
        assert!(is_well_formed_token("Element"));
        assert!(is_well_formed_token("Argument[]"));
        assert!(is_well_formed_token("Field[foo.Bar.x]"));
        assert!(!is_well_formed_token("Argument[0]x"));
        assert!(!is_well_formed_token("[0]"));
        assert!(!is_well_formed_token("Argument[0][1]"));
        assert!(!is_well_formed_token("Arg ument"));
    }

    #[test]
    fn diagnostics_serialize_with_message_text() {
        let json = serde_json::to_value(diagnostic(DiagnosticMessage::InvalidAccessPath, 0, 9))
            .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"range": {"start": 0, "end": 9}, "message": "Invalid access path"})
        );
    }
}
