//! Lexer (tokenizer) for the Corn configuration language.
//!
//! Corn's tokens depend on context: `true` is a keyword inside a value but an ordinary key
//! inside an object, and whitespace is significant inside strings. The lexer therefore
//! keeps an explicit stack of [`LexState`]s and, at every position, tries the ordered
//! matchers registered for the state on top of the stack.

pub mod matcher;
pub mod token;

use tracing::{debug, trace};

use crate::errors::{CornError, CornResult};
use matcher::{snippet, LexState};
use token::Token;

/// Lexer for Corn source text
pub struct Lexer<'a> {
    /// Source code being lexed
    source: &'a str,
    /// Current position in bytes
    position: usize,
    /// Lexical context stack; the top decides which matchers apply
    states: Vec<LexState>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            states: vec![LexState::TopLevel],
        }
    }

    /// Tokenize the entire source and return all tokens
    pub fn tokenize(&mut self) -> CornResult<Vec<Token>> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }

        debug!(count = tokens.len(), "tokenized source");
        Ok(tokens)
    }

    /// Get the next token, or `None` once the input is exhausted
    pub fn next_token(&mut self) -> CornResult<Option<Token>> {
        let in_string = self.states.last() == Some(&LexState::String);
        if !in_string {
            self.skip_whitespace_and_comments();
        }

        let rest = self.remaining();
        if rest.is_empty() {
            return Ok(None);
        }

        let Some(&state) = self.states.last() else {
            // Only reachable if a matcher pops the top-level state
            return Err(CornError::UnexpectedInput {
                state: "closed document".to_string(),
                snippet: snippet(rest),
                help: "nothing may follow the end of the document".to_string(),
            });
        };

        for matcher in state.matchers() {
            let Some((token, consumed)) = matcher.pattern.try_match(rest)? else {
                continue;
            };

            if consumed == 0 {
                return Err(CornError::LexerStalled {
                    state: state.to_string(),
                });
            }

            self.position += consumed;
            matcher.transition.apply(&mut self.states);
            trace!(%state, %token, transition = ?matcher.transition, "matched token");
            return Ok(Some(token));
        }

        Err(CornError::UnexpectedInput {
            state: state.to_string(),
            snippet: snippet(rest),
            help: state.hint().to_string(),
        })
    }

    /// Current lexical state, `None` if the top-level state was closed
    pub fn state(&self) -> Option<LexState> {
        self.states.last().copied()
    }

    fn remaining(&self) -> &'a str {
        &self.source[self.position..]
    }

    /// Skip whitespace and `//` line comments
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            let rest = self.remaining();
            let trimmed = rest.trim_start();
            self.position += rest.len() - trimmed.len();

            if !trimmed.starts_with("//") {
                break;
            }

            let line_len = trimmed.find('\n').unwrap_or(trimmed.len());
            self.position += line_len;
        }
    }
}

/// Tokenize `source` in one call
pub fn tokenize(source: &str) -> CornResult<Vec<Token>> {
    Lexer::new(source).tokenize()
}
