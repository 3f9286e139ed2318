//! Parser for the Corn configuration language
//!
//! A recursive descent parser with one token of lookahead that turns the lexer's token
//! stream into a [`ast::Config`]. The first error aborts the parse; there is no recovery
//! and no partial AST.

pub mod ast;

use tracing::debug;

use crate::errors::{CornError, CornResult};
use crate::lexer::token::{Token, EOF_NAME};
use ast::*;

/// Maximum nesting depth of objects and arrays before the parser bails out
const MAX_PARSE_DEPTH: usize = 128;

/// Parser for Corn token streams
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Current object/array nesting depth
    depth: usize,
}

impl Parser {
    /// Create a new parser from a token stream
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Parse the entire document
    pub fn parse(&mut self) -> CornResult<Config> {
        let assign_block = if self.check(&Token::Let) {
            Some(self.parse_assign_block()?)
        } else {
            None
        };

        let value = self.parse_object()?;

        if !self.is_at_end() {
            return Err(self.error_unexpected(&[EOF_NAME]));
        }

        debug!(
            inputs = assign_block.as_ref().map_or(0, |b| b.assignments.len()),
            entries = value.rules.len(),
            "parsed config"
        );
        Ok(Config {
            assign_block,
            value,
        })
    }

    /// `let { ($input = value)* } in`
    fn parse_assign_block(&mut self) -> CornResult<AssignBlock> {
        self.expect(&Token::Let)?;
        self.expect(&Token::BraceOpen)?;

        let mut block = AssignBlock::default();
        while !self.check(&Token::BraceClose) {
            block.assignments.push(self.parse_assignment()?);
        }

        self.expect(&Token::BraceClose)?;
        self.expect(&Token::In)?;
        Ok(block)
    }

    fn parse_assignment(&mut self) -> CornResult<Assignment> {
        let name = self.expect_input()?;
        self.expect(&Token::Equals)?;
        let value = self.parse_value()?;
        Ok(Assignment { name, value })
    }

    fn parse_value(&mut self) -> CornResult<ValueRule> {
        let rule = match self.current() {
            Some(Token::Float(n)) => ValueRule::Float(*n),
            Some(Token::Integer(n)) => ValueRule::Integer(*n),
            Some(Token::Input(name)) => ValueRule::Input(name.clone()),
            Some(Token::True) => ValueRule::Boolean(true),
            Some(Token::False) => ValueRule::Boolean(false),
            Some(Token::Null) => ValueRule::Null,
            Some(Token::DoubleQuote) => return self.parse_string().map(ValueRule::String),
            Some(Token::BraceOpen) => return self.parse_object().map(ValueRule::Object),
            Some(Token::BracketOpen) => return self.parse_array().map(ValueRule::Array),
            _ => return Err(self.error_unexpected(&["<value>"])),
        };

        self.advance();
        Ok(rule)
    }

    /// `{ (..$input | path = value)* }`
    fn parse_object(&mut self) -> CornResult<ObjectRule> {
        self.expect(&Token::BraceOpen)?;
        self.enter()?;

        let mut object = ObjectRule::default();
        loop {
            match self.current() {
                Some(Token::BraceClose) => break,
                Some(Token::Spread) => object.rules.push(ObjectEntry::Spread(self.parse_spread()?)),
                Some(Token::PathSegment(_)) => {
                    object.rules.push(ObjectEntry::Pair(self.parse_pair()?))
                }
                _ => return Err(self.error_unexpected(&["..", "<path_seg>"])),
            }
        }

        self.expect(&Token::BraceClose)?;
        self.leave();
        Ok(object)
    }

    fn parse_spread(&mut self) -> CornResult<Spread> {
        self.expect(&Token::Spread)?;
        let name = self.expect_input()?;
        Ok(Spread { name })
    }

    fn parse_pair(&mut self) -> CornResult<Pair> {
        let path = self.parse_path()?;
        self.expect(&Token::Equals)?;
        let value = self.parse_value()?;
        Ok(Pair { path, value })
    }

    /// `segment ("." segment)*`; every extra segment needs its separator
    fn parse_path(&mut self) -> CornResult<Path> {
        let mut path = Path::new(self.expect_path_segment()?);

        while self.check(&Token::PathSeparator) {
            self.advance();
            path.push(self.expect_path_segment()?);
        }

        Ok(path)
    }

    /// `[ (..$input | value)* ]`
    fn parse_array(&mut self) -> CornResult<ArrayRule> {
        self.expect(&Token::BracketOpen)?;
        self.enter()?;

        let mut array = ArrayRule::default();
        while !self.check(&Token::BracketClose) {
            let entry = if self.check(&Token::Spread) {
                ArrayEntry::Spread(self.parse_spread()?)
            } else {
                ArrayEntry::Value(self.parse_value()?)
            };
            array.rules.push(entry);
        }

        self.expect(&Token::BracketClose)?;
        self.leave();
        Ok(array)
    }

    /// `" (chars | escape | $input)* "`
    fn parse_string(&mut self) -> CornResult<StringRule> {
        self.expect(&Token::DoubleQuote)?;

        let mut string = StringRule::default();
        loop {
            let part = match self.current() {
                Some(Token::DoubleQuote) => break,
                Some(Token::CharSequence(s)) => StringPart::CharSequence(s.clone()),
                Some(Token::CharEscape(c)) => StringPart::CharEscape(*c),
                Some(Token::Input(name)) => StringPart::Input(name.clone()),
                _ => {
                    return Err(self.error_unexpected(&["<char_seq>", "<char_esc>", "<input>"]))
                }
            };
            string.parts.push(part);
            self.advance();
        }

        self.expect(&Token::DoubleQuote)?;
        Ok(string)
    }

    // Helper methods

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    fn check(&self, expected: &Token) -> bool {
        self.current() == Some(expected)
    }

    fn expect(&mut self, expected: &Token) -> CornResult<()> {
        if self.check(expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.error_unexpected(&[expected.name()]))
        }
    }

    fn expect_input(&mut self) -> CornResult<String> {
        match self.current() {
            Some(Token::Input(name)) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.error_unexpected(&["<input>"])),
        }
    }

    fn expect_path_segment(&mut self) -> CornResult<String> {
        match self.current() {
            Some(Token::PathSegment(segment)) => {
                let segment = segment.clone();
                self.advance();
                Ok(segment)
            }
            _ => Err(self.error_unexpected(&["<path_seg>"])),
        }
    }

    fn enter(&mut self) -> CornResult<()> {
        self.depth += 1;
        if self.depth > MAX_PARSE_DEPTH {
            return Err(CornError::NestingTooDeep {
                limit: MAX_PARSE_DEPTH,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn error_unexpected(&self, expected: &[&str]) -> CornError {
        CornError::unexpected_token(expected, Token::name_or_eof(self.current()))
    }
}

/// Parse a token stream in one call
pub fn parse(tokens: Vec<Token>) -> CornResult<Config> {
    Parser::new(tokens).parse()
}
