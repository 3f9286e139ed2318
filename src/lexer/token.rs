use std::fmt;

/// Token type enumeration - all possible tokens in Corn
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Structural
    BraceOpen,     // {
    BraceClose,    // }
    BracketOpen,   // [
    BracketClose,  // ]
    Equals,        // =
    DoubleQuote,   // "
    Spread,        // ..
    PathSeparator, // .

    // Keywords
    Let,
    In,
    True,
    False,
    Null,

    // Data-carrying
    PathSegment(String),
    Float(f64),
    Integer(i32),
    CharEscape(char),
    CharSequence(String),
    /// Variable reference, including the leading `$`
    Input(String),
}

impl Token {
    /// Fixed display name used in parser error messages.
    ///
    /// Structural tokens and keywords render as their literal text, data tokens as a
    /// placeholder such as `<input>`.
    pub fn name(&self) -> &'static str {
        match self {
            Token::BraceOpen => "{",
            Token::BraceClose => "}",
            Token::BracketOpen => "[",
            Token::BracketClose => "]",
            Token::Equals => "=",
            Token::DoubleQuote => "\"",
            Token::Spread => "..",
            Token::PathSeparator => ".",
            Token::Let => "let",
            Token::In => "in",
            Token::True => "true",
            Token::False => "false",
            Token::Null => "null",
            Token::PathSegment(_) => "<path_seg>",
            Token::Float(_) => "<float>",
            Token::Integer(_) => "<integer>",
            Token::CharEscape(_) => "<char_esc>",
            Token::CharSequence(_) => "<char_seq>",
            Token::Input(_) => "<input>",
        }
    }

    /// Display name for an optional token, `<eof>` once the stream is exhausted
    pub fn name_or_eof(token: Option<&Token>) -> &'static str {
        token.map_or(EOF_NAME, Token::name)
    }
}

/// Display name for the end of the token stream
pub const EOF_NAME: &str = "<eof>";

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::PathSegment(s) => write!(f, "{} {:?}", self.name(), s),
            Token::Float(n) => write!(f, "{} {}", self.name(), n),
            Token::Integer(n) => write!(f, "{} {}", self.name(), n),
            Token::CharEscape(c) => write!(f, "{} {:?}", self.name(), c),
            Token::CharSequence(s) => write!(f, "{} {:?}", self.name(), s),
            Token::Input(name) => write!(f, "{} {}", self.name(), name),
            _ => write!(f, "{}", self.name()),
        }
    }
}
