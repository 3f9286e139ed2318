// Rust 1.93+ triggers false positives on thiserror/miette derive macro fields
#![allow(unused_assignments)]

//! Corn Configuration Language
//!
//! A small declarative configuration language that evaluates to JSON or YAML.
//! Documents are an optional block of inputs followed by a single object.
//!
//! # Example
//!
//! ```corn
//! let {
//!     $host = "localhost"
//!     $base = { retries = 3 }
//! } in {
//!     server.host = $host
//!     server.url = "http://$host:8080"
//!     client = { ..$base timeout = 2.5 }
//! }
//! ```
//!
//! ```
//! let value = corn::parse_with_env(r#"{ name = "corn" }"#, corn::NoEnv).unwrap();
//! assert_eq!(value.get_path(&["name"]).and_then(|v| v.as_str()), Some("corn"));
//! ```

pub mod emitter;
pub mod errors;
pub mod evaluator;
pub mod lexer;
pub mod parser;

pub use emitter::{emit, Emitter, JsonEmitter, OutputFormat, YamlEmitter};
pub use errors::{CornError, CornResult, Stage};
pub use evaluator::{EnvLookup, Evaluator, NoEnv, Object, OsEnv, Value};
pub use lexer::token::Token;
pub use lexer::Lexer;
pub use parser::ast;
pub use parser::Parser;

/// Parse and evaluate a Corn document, reading `$_env` inputs from the process environment
pub fn parse(source: &str) -> CornResult<Value> {
    parse_with_env(source, OsEnv)
}

/// Parse and evaluate a Corn document with a custom environment lookup
pub fn parse_with_env(source: &str, env: impl EnvLookup + 'static) -> CornResult<Value> {
    let tokens = lexer::tokenize(source)?;
    let config = parser::parse(tokens)?;
    Evaluator::with_env(env).evaluate(&config).map(Value::Object)
}
