//! Lexer states and the ordered matcher tables that drive them.
//!
//! Each [`LexState`] owns a fixed list of [`Matcher`]s. The lexer tries them in order and
//! takes the first hit, so ordering encodes precedence: `..` before `.`, floats before
//! integers, `$name` before bare path segments.

use std::fmt;

use super::token::Token;
use crate::errors::{CornError, CornResult};

/// Lexical context the tokenizer is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexState {
    TopLevel,
    AssignBlock,
    Value,
    Object,
    Array,
    String,
}

impl LexState {
    /// Matchers registered for this state, in precedence order
    pub fn matchers(self) -> &'static [Matcher] {
        match self {
            LexState::TopLevel => TOP_LEVEL,
            LexState::AssignBlock => ASSIGN_BLOCK,
            LexState::Value => VALUE,
            LexState::Object => OBJECT,
            LexState::Array => ARRAY,
            LexState::String => STRING,
        }
    }
}

impl LexState {
    /// What this context accepts, for unexpected-input diagnostics
    pub fn hint(self) -> &'static str {
        match self {
            LexState::TopLevel => "a document is an object, optionally preceded by `let { ... } in`",
            LexState::AssignBlock => "inputs are declared as `$name = value`",
            LexState::Value => {
                "expected a value: object, array, string, number, boolean, null or `$input`"
            }
            LexState::Object => "object entries are `key = value` pairs or `..$input` spreads",
            LexState::Array => "array items are values or `..$input` spreads",
            LexState::String => "special characters in strings must be escaped, e.g. `\\$` or `\\\"`",
        }
    }
}

impl fmt::Display for LexState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexState::TopLevel => write!(f, "top-level"),
            LexState::AssignBlock => write!(f, "assign block"),
            LexState::Value => write!(f, "value"),
            LexState::Object => write!(f, "object"),
            LexState::Array => write!(f, "array"),
            LexState::String => write!(f, "string"),
        }
    }
}

/// What a successful match does to the state stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    Push(LexState),
    Replace(LexState),
    Pop,
}

impl Transition {
    pub fn apply(self, stack: &mut Vec<LexState>) {
        match self {
            Transition::None => {}
            Transition::Push(state) => stack.push(state),
            Transition::Replace(state) => {
                stack.pop();
                stack.push(state);
            }
            Transition::Pop => {
                stack.pop();
            }
        }
    }
}

/// The lexical patterns a matcher can recognise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    BraceOpen,
    BraceClose,
    BracketOpen,
    BracketClose,
    Equals,
    DoubleQuote,
    Spread,
    PathSeparator,
    Let,
    In,
    True,
    False,
    Null,
    Input,
    QuotedPathSegment,
    PathSegment,
    Float,
    HexInteger,
    Integer,
    CharEscape,
    CharSequence,
}

/// Token plus the number of bytes it consumed
pub type Match = (Token, usize);

impl Pattern {
    /// Try to match at the start of `input`.
    ///
    /// `Ok(None)` means "not this pattern, try the next one". `Err` is reserved for text
    /// that is unambiguously this pattern but malformed, such as `\q` inside a string.
    pub fn try_match(self, input: &str) -> CornResult<Option<Match>> {
        let matched = match self {
            Pattern::BraceOpen => literal(input, "{", Token::BraceOpen),
            Pattern::BraceClose => literal(input, "}", Token::BraceClose),
            Pattern::BracketOpen => literal(input, "[", Token::BracketOpen),
            Pattern::BracketClose => literal(input, "]", Token::BracketClose),
            Pattern::Equals => literal(input, "=", Token::Equals),
            Pattern::DoubleQuote => literal(input, "\"", Token::DoubleQuote),
            Pattern::Spread => literal(input, "..", Token::Spread),
            Pattern::PathSeparator => literal(input, ".", Token::PathSeparator),
            Pattern::Let => literal(input, "let", Token::Let),
            Pattern::In => literal(input, "in", Token::In),
            Pattern::True => literal(input, "true", Token::True),
            Pattern::False => literal(input, "false", Token::False),
            Pattern::Null => literal(input, "null", Token::Null),
            Pattern::Input => match_input(input),
            Pattern::QuotedPathSegment => return match_quoted_path_segment(input),
            Pattern::PathSegment => match_path_segment(input),
            Pattern::Float => return match_float(input),
            Pattern::HexInteger => return match_hex_integer(input),
            Pattern::Integer => return match_integer(input),
            Pattern::CharEscape => return match_char_escape(input),
            Pattern::CharSequence => match_char_sequence(input),
        };
        Ok(matched)
    }
}

/// A pattern paired with the state transition it triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matcher {
    pub pattern: Pattern,
    pub transition: Transition,
}

impl Matcher {
    const fn new(pattern: Pattern, transition: Transition) -> Self {
        Self {
            pattern,
            transition,
        }
    }

    const fn stay(pattern: Pattern) -> Self {
        Self::new(pattern, Transition::None)
    }
}

const TOP_LEVEL: &[Matcher] = &[
    Matcher::new(Pattern::BraceOpen, Transition::Push(LexState::Object)),
    Matcher::new(Pattern::Let, Transition::Push(LexState::AssignBlock)),
];

const ASSIGN_BLOCK: &[Matcher] = &[
    Matcher::new(Pattern::In, Transition::Pop),
    Matcher::stay(Pattern::BraceOpen),
    Matcher::stay(Pattern::BraceClose),
    Matcher::stay(Pattern::Input),
    Matcher::new(Pattern::Equals, Transition::Push(LexState::Value)),
];

const OBJECT: &[Matcher] = &[
    Matcher::new(Pattern::BraceClose, Transition::Pop),
    Matcher::new(Pattern::Equals, Transition::Push(LexState::Value)),
    Matcher::stay(Pattern::Spread),
    Matcher::stay(Pattern::PathSeparator),
    Matcher::stay(Pattern::Input),
    Matcher::stay(Pattern::QuotedPathSegment),
    Matcher::stay(Pattern::PathSegment),
];

const ARRAY: &[Matcher] = &[
    Matcher::new(Pattern::BracketClose, Transition::Pop),
    Matcher::new(Pattern::BraceOpen, Transition::Push(LexState::Object)),
    Matcher::new(Pattern::BracketOpen, Transition::Push(LexState::Array)),
    Matcher::stay(Pattern::Spread),
    Matcher::stay(Pattern::True),
    Matcher::stay(Pattern::False),
    Matcher::stay(Pattern::Null),
    Matcher::new(Pattern::DoubleQuote, Transition::Push(LexState::String)),
    Matcher::stay(Pattern::Input),
    Matcher::stay(Pattern::Float),
    Matcher::stay(Pattern::HexInteger),
    Matcher::stay(Pattern::Integer),
];

const VALUE: &[Matcher] = &[
    Matcher::new(Pattern::BraceOpen, Transition::Replace(LexState::Object)),
    Matcher::new(Pattern::BracketOpen, Transition::Replace(LexState::Array)),
    Matcher::new(Pattern::True, Transition::Pop),
    Matcher::new(Pattern::False, Transition::Pop),
    Matcher::new(Pattern::Null, Transition::Pop),
    Matcher::new(Pattern::DoubleQuote, Transition::Replace(LexState::String)),
    Matcher::new(Pattern::Input, Transition::Pop),
    Matcher::new(Pattern::Float, Transition::Pop),
    Matcher::new(Pattern::HexInteger, Transition::Pop),
    Matcher::new(Pattern::Integer, Transition::Pop),
    // `= ]` only shows up in malformed input; popping lets the parser report it
    Matcher::new(Pattern::BracketClose, Transition::Pop),
];

const STRING: &[Matcher] = &[
    Matcher::new(Pattern::DoubleQuote, Transition::Pop),
    Matcher::stay(Pattern::Input),
    Matcher::stay(Pattern::CharEscape),
    Matcher::stay(Pattern::CharSequence),
];

/// Byte length of the longest prefix of `input` whose chars all satisfy `pred`
fn leading(input: &str, pred: impl Fn(char) -> bool) -> usize {
    input.find(|c: char| !pred(c)).unwrap_or(input.len())
}

fn literal(input: &str, text: &str, token: Token) -> Option<Match> {
    input.starts_with(text).then(|| (token, text.len()))
}

/// `$` followed by a letter or `_`, then letters, digits and `_`
fn match_input(input: &str) -> Option<Match> {
    let rest = input.strip_prefix('$')?;
    let first = rest.chars().next()?;
    if !(first.is_alphabetic() || first == '_') {
        return None;
    }

    let len = 1 + leading(rest, |c| c.is_alphanumeric() || c == '_');
    Some((Token::Input(input[..len].to_string()), len))
}

fn match_quoted_path_segment(input: &str) -> CornResult<Option<Match>> {
    let Some(rest) = input.strip_prefix('\'') else {
        return Ok(None);
    };

    match rest.find('\'') {
        Some(end) => Ok(Some((Token::PathSegment(rest[..end].to_string()), end + 2))),
        None => Err(CornError::InvalidLiteral {
            literal: snippet(input),
            reason: "unterminated quoted path segment".to_string(),
        }),
    }
}

fn match_path_segment(input: &str) -> Option<Match> {
    let len = leading(input, |c| !c.is_whitespace() && c != '=' && c != '.');
    (len > 0).then(|| (Token::PathSegment(input[..len].to_string()), len))
}

fn match_float(input: &str) -> CornResult<Option<Match>> {
    let sign = usize::from(input.starts_with('-'));
    let int_len = leading(&input[sign..], |c| c.is_ascii_digit());
    if int_len == 0 {
        return Ok(None);
    }

    let mut len = sign + int_len;
    let Some(after_dot) = input[len..].strip_prefix('.') else {
        return Ok(None);
    };

    let frac_len = leading(after_dot, |c| c.is_ascii_digit());
    if frac_len == 0 {
        // `1..$rest` is an integer followed by a spread, not a broken float
        if after_dot.starts_with('.') {
            return Ok(None);
        }
        return Err(CornError::InvalidLiteral {
            literal: input[..=len].to_string(),
            reason: "expected digits after the decimal point".to_string(),
        });
    }
    len += 1 + frac_len;

    if let Some(exponent) = input[len..].strip_prefix(['e', 'E']) {
        let exp_sign = usize::from(exponent.starts_with(['+', '-']));
        let exp_digits = leading(&exponent[exp_sign..], |c| c.is_ascii_digit());
        if exp_digits > 0 {
            len += 1 + exp_sign + exp_digits;
        }
    }

    match input[..len].parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some((Token::Float(value), len))),
        _ => Err(CornError::InvalidLiteral {
            literal: input[..len].to_string(),
            reason: "float is out of range".to_string(),
        }),
    }
}

/// Once `0x` is seen the literal is ours; up to eight digits are read as a 32-bit pattern
fn match_hex_integer(input: &str) -> CornResult<Option<Match>> {
    let Some(rest) = input.strip_prefix("0x") else {
        return Ok(None);
    };

    let digits = leading(rest, |c| c.is_ascii_hexdigit());
    let literal = &input[..2 + digits];
    if digits == 0 {
        return Err(CornError::InvalidLiteral {
            literal: literal.to_string(),
            reason: "expected hex digits after `0x`".to_string(),
        });
    }

    match u32::from_str_radix(&rest[..digits], 16) {
        Ok(bits) => Ok(Some((Token::Integer(bits as i32), literal.len()))),
        Err(_) => Err(CornError::InvalidLiteral {
            literal: literal.to_string(),
            reason: "hex integer does not fit in 32 bits".to_string(),
        }),
    }
}

fn match_integer(input: &str) -> CornResult<Option<Match>> {
    let sign = usize::from(input.starts_with('-'));
    let digits = leading(&input[sign..], |c| c.is_ascii_digit());
    if digits == 0 {
        return Ok(None);
    }

    let len = sign + digits;
    match input[..len].parse::<i32>() {
        Ok(value) => Ok(Some((Token::Integer(value), len))),
        Err(_) => Err(CornError::InvalidLiteral {
            literal: input[..len].to_string(),
            reason: "integer is out of range for a 32-bit signed value".to_string(),
        }),
    }
}

fn match_char_escape(input: &str) -> CornResult<Option<Match>> {
    let Some(rest) = input.strip_prefix('\\') else {
        return Ok(None);
    };

    let escaped = match rest.chars().next() {
        Some('\\') => '\\',
        Some('"') => '"',
        Some('n') => '\n',
        Some('r') => '\r',
        Some('t') => '\t',
        Some('$') => '$',
        Some('u') => return match_unicode_escape(&rest[1..]).map(Some),
        Some(other) => {
            return Err(CornError::InvalidEscape {
                sequence: format!("\\{}", other),
            })
        }
        None => {
            return Err(CornError::InvalidEscape {
                sequence: "\\".to_string(),
            })
        }
    };

    Ok(Some((Token::CharEscape(escaped), 2)))
}

/// `\u` has already been stripped; `hex` must start with exactly four hex digits
fn match_unicode_escape(hex: &str) -> CornResult<Match> {
    let invalid = || CornError::InvalidEscape {
        sequence: format!("\\u{}", hex.chars().take(4).collect::<String>()),
    };

    let digits = hex
        .get(..4)
        .filter(|d| d.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(invalid)?;

    let code = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
    let ch = char::from_u32(code).ok_or_else(invalid)?;

    Ok((Token::CharEscape(ch), 6))
}

fn match_char_sequence(input: &str) -> Option<Match> {
    let len = leading(input, |c| !matches!(c, '\\' | '"' | '$'));
    (len > 0).then(|| (Token::CharSequence(input[..len].to_string()), len))
}

/// First line of `input`, shortened for error messages
pub(crate) fn snippet(input: &str) -> String {
    const MAX_CHARS: usize = 24;

    let line = input.lines().next().unwrap_or("");
    if line.chars().count() > MAX_CHARS {
        let short: String = line.chars().take(MAX_CHARS).collect();
        format!("{}...", short)
    } else {
        line.to_string()
    }
}
