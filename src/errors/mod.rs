//! Error types, diagnostics, and result aliases for Corn.
//!
//! Every failure in the pipeline is a variant of [`CornError`], rendered via `miette`
//! diagnostics. Callers that only care about where things went wrong can use
//! [`CornError::stage`].

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    // One rolling row: each cell reads left, up and up-left
    let mut row: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, a_ch) in a_chars.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, b_ch) in b_chars.iter().enumerate() {
            let cost = usize::from(a_ch != b_ch);
            let next = (row[j + 1] + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = row[j + 1];
            row[j + 1] = next;
        }
    }

    row[b_chars.len()]
}

/// Find the closest input name within `max_distance` edits
pub fn find_similar<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    max_distance: usize,
) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;

    for candidate in candidates {
        let distance = levenshtein_distance(name, candidate);
        if distance <= max_distance && best.map_or(true, |(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }

    best.map(|(candidate, _)| candidate.to_string())
}

/// Help text for an input that is not bound in the assign block
pub fn undefined_input_help<'a>(name: &str, available: impl IntoIterator<Item = &'a str>) -> String {
    let available: Vec<&str> = available.into_iter().collect();
    let max_distance = (name.len() / 3).clamp(2, 3);

    if let Some(suggestion) = find_similar(name, available.iter().copied(), max_distance) {
        format!("did you mean '{}'?", suggestion)
    } else if available.is_empty() {
        "no inputs are bound; declare one with `let { $name = ... } in { ... }`".to_string()
    } else if available.len() <= 5 {
        format!("bound inputs: {}", available.join(", "))
    } else {
        "check the input name for typos".to_string()
    }
}

/// Pipeline stage an error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Parse,
    Eval,
    Io,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Lex => write!(f, "lex"),
            Stage::Parse => write!(f, "parse"),
            Stage::Eval => write!(f, "eval"),
            Stage::Io => write!(f, "io"),
        }
    }
}

/// Main error type for Corn
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum CornError {
    #[error("unexpected input in {state} context: `{snippet}`")]
    #[diagnostic(code(E0001), help("{help}"))]
    UnexpectedInput {
        state: String,
        snippet: String,
        help: String,
    },

    #[error("invalid literal `{literal}`: {reason}")]
    #[diagnostic(code(E0002))]
    InvalidLiteral { literal: String, reason: String },

    #[error("invalid escape sequence `{sequence}`")]
    #[diagnostic(
        code(E0003),
        help("valid escapes are \\\\ \\\" \\n \\r \\t \\$ and \\uXXXX")
    )]
    InvalidEscape { sequence: String },

    #[error("lexer made no progress in {state} context")]
    #[diagnostic(code(E0004), help("this is a bug in corn, please report it"))]
    LexerStalled { state: String },

    #[error("expected {expected}, got {found}")]
    #[diagnostic(code(E0101))]
    UnexpectedToken { expected: String, found: String },

    #[error("maximum nesting depth of {limit} exceeded")]
    #[diagnostic(code(E0102))]
    NestingTooDeep { limit: usize },

    #[error("input not found: {name}")]
    #[diagnostic(code(E0201), help("{help}"))]
    UndefinedInput { name: String, help: String },

    #[error("attempted key-chaining on non-object type: '{key}' is {found}")]
    #[diagnostic(code(E0202), help("a key cannot hold both a value and nested keys"))]
    KeyChainingNonObject { key: String, found: String },

    #[error("attempted to spread non-object input into object: {name} is {found}")]
    #[diagnostic(code(E0203))]
    SpreadNonObject { name: String, found: String },

    #[error("attempted to spread non-array input into array: {name} is {found}")]
    #[diagnostic(code(E0204))]
    SpreadNonArray { name: String, found: String },

    #[error("attempted to interpolate non-string input into string: {name} is {found}")]
    #[diagnostic(code(E0205), help("only string inputs can be interpolated"))]
    InterpolateNonString { name: String, found: String },

    #[error("I/O error: {message}")]
    #[diagnostic(code(E0301))]
    Io { message: String },
}

impl CornError {
    /// Create an UnexpectedToken error from the alternatives the parser would have accepted
    pub fn unexpected_token(expected: &[&str], found: impl Into<String>) -> Self {
        let quoted: Vec<String> = expected.iter().map(|e| format!("'{}'", e)).collect();
        let expected = match quoted.as_slice() {
            [] => "<nothing>".to_string(),
            [single] => single.clone(),
            [init @ .., last] => format!("one of {} or {}", init.join(", "), last),
        };
        CornError::UnexpectedToken {
            expected,
            found: found.into(),
        }
    }

    /// Create an IoError
    pub fn io_error(message: impl Into<String>) -> Self {
        CornError::Io {
            message: message.into(),
        }
    }

    /// The pipeline stage that produced this error
    pub fn stage(&self) -> Stage {
        match self {
            CornError::UnexpectedInput { .. }
            | CornError::InvalidLiteral { .. }
            | CornError::InvalidEscape { .. }
            | CornError::LexerStalled { .. } => Stage::Lex,
            CornError::UnexpectedToken { .. } | CornError::NestingTooDeep { .. } => Stage::Parse,
            CornError::UndefinedInput { .. }
            | CornError::KeyChainingNonObject { .. }
            | CornError::SpreadNonObject { .. }
            | CornError::SpreadNonArray { .. }
            | CornError::InterpolateNonString { .. } => Stage::Eval,
            CornError::Io { .. } => Stage::Io,
        }
    }
}

/// Result type for Corn operations
pub type CornResult<T> = Result<T, CornError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("$port", "$prot"), 2);
        assert_eq!(levenshtein_distance("$host", "$hosts"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_find_similar() {
        let names = ["$host", "$port", "$user"];
        assert_eq!(
            find_similar("$hots", names.iter().copied(), 2),
            Some("$host".to_string())
        );
        assert_eq!(find_similar("$database", names.iter().copied(), 2), None);
    }

    #[test]
    fn test_undefined_input_help() {
        assert_eq!(
            undefined_input_help("$fooo", ["$foo", "$bar"]),
            "did you mean '$foo'?"
        );
        assert!(undefined_input_help("$x", []).contains("no inputs are bound"));
        assert_eq!(
            undefined_input_help("$zzzzzzzz", ["$foo", "$bar"]),
            "bound inputs: $foo, $bar"
        );
    }

    #[test]
    fn test_unexpected_token_message() {
        let single = CornError::unexpected_token(&["="], "<path_seg>");
        assert_eq!(single.to_string(), "expected '=', got <path_seg>");

        let pair = CornError::unexpected_token(&["..", "<path_seg>"], "]");
        assert_eq!(pair.to_string(), "expected one of '..' or '<path_seg>', got ]");

        let triple = CornError::unexpected_token(&["<char_seq>", "<char_esc>", "<input>"], "{");
        assert_eq!(
            triple.to_string(),
            "expected one of '<char_seq>', '<char_esc>' or '<input>', got {"
        );
    }

    #[test]
    fn test_stage() {
        assert_eq!(
            CornError::InvalidEscape {
                sequence: "\\q".into()
            }
            .stage(),
            Stage::Lex
        );
        assert_eq!(
            CornError::NestingTooDeep { limit: 1 }.stage(),
            Stage::Parse
        );
        assert_eq!(
            CornError::SpreadNonArray {
                name: "$x".into(),
                found: "int".into()
            }
            .stage(),
            Stage::Eval
        );
        assert_eq!(CornError::io_error("boom").stage(), Stage::Io);
    }
}
