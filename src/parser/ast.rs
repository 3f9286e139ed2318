//! Rule AST for Corn
//!
//! Rules are the parsed-but-not-yet-evaluated form of a document. They mirror the grammar
//! one-to-one; resolving inputs and building values is the evaluator's job.

/// A complete Corn document: an optional assign block and the top-level object
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub assign_block: Option<AssignBlock>,
    pub value: ObjectRule,
}

/// `let { $a = ... $b = ... } in`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssignBlock {
    /// Assignments in source order
    pub assignments: Vec<Assignment>,
}

/// `$name = value`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Input name as written, including the `$`
    pub name: String,
    pub value: ValueRule,
}

/// `{ ... }`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectRule {
    pub rules: Vec<ObjectEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectEntry {
    /// `path = value`
    Pair(Pair),
    /// `..$input`
    Spread(Spread),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub path: Path,
    pub value: ValueRule,
}

/// Dotted key path such as `a.b.'c d'`. Always has at least one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    pub fn new(first: impl Into<String>) -> Self {
        Self {
            segments: vec![first.into()],
        }
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Intermediate segments and the final key
    pub fn split_last(&self) -> (&[String], &str) {
        match self.segments.split_last() {
            Some((last, parents)) => (parents, last.as_str()),
            None => (&[], ""),
        }
    }
}

/// `..$name`, valid in both objects and arrays
#[derive(Debug, Clone, PartialEq)]
pub struct Spread {
    pub name: String,
}

/// `[ ... ]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrayRule {
    pub rules: Vec<ArrayEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayEntry {
    Value(ValueRule),
    Spread(Spread),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueRule {
    Array(ArrayRule),
    Object(ObjectRule),
    String(StringRule),
    Boolean(bool),
    Float(f64),
    Integer(i32),
    /// Input reference, including the `$`
    Input(String),
    Null,
}

/// `"..."`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StringRule {
    pub parts: Vec<StringPart>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StringPart {
    CharSequence(String),
    CharEscape(char),
    Input(String),
}
