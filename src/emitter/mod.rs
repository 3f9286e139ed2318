//! Emitters for Corn values
//!
//! Converts evaluated value trees to JSON or YAML text.

mod json;
mod yaml;

pub use json::JsonEmitter;
pub use yaml::YamlEmitter;

use crate::errors::{CornError, CornResult};
use crate::evaluator::Value;

/// Output format for emission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    JsonPretty,
    Yaml,
}

impl OutputFormat {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "yaml" | "yml" => Some(OutputFormat::Yaml),
            _ => None,
        }
    }

    /// Guess a format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(OutputFormat::JsonPretty),
            "yaml" | "yml" => Some(OutputFormat::Yaml),
            _ => None,
        }
    }
}

/// Trait for output emitters
pub trait Emitter {
    /// Emit a value to string
    fn emit(&self, value: &Value) -> CornResult<String>;

    /// Emit a value to a writer
    fn emit_to_writer<W: std::io::Write>(&self, value: &Value, writer: &mut W) -> CornResult<()> {
        let output = self.emit(value)?;
        writer
            .write_all(output.as_bytes())
            .map_err(|e| CornError::io_error(e.to_string()))
    }
}

/// Emit a value to a string in the specified format
pub fn emit(value: &Value, format: OutputFormat) -> CornResult<String> {
    match format {
        OutputFormat::Json => JsonEmitter::new(false).emit(value),
        OutputFormat::JsonPretty => JsonEmitter::new(true).emit(value),
        OutputFormat::Yaml => YamlEmitter.emit(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Object;
    use pretty_assertions::assert_eq;

    fn obj(pairs: &[(&str, Value)]) -> Value {
        let mut map = Object::new();
        for (k, v) in pairs {
            map.insert(k.to_string(), v.clone());
        }
        Value::Object(map)
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("yaml"), Some(OutputFormat::Yaml));
        assert_eq!(OutputFormat::parse("yml"), Some(OutputFormat::Yaml));
        assert_eq!(
            OutputFormat::parse("json-pretty"),
            Some(OutputFormat::JsonPretty)
        );
        assert_eq!(OutputFormat::parse("toml"), None);
    }

    #[test]
    fn test_output_format_from_extension() {
        assert_eq!(
            OutputFormat::from_extension("json"),
            Some(OutputFormat::JsonPretty)
        );
        assert_eq!(OutputFormat::from_extension("YML"), Some(OutputFormat::Yaml));
        assert_eq!(OutputFormat::from_extension("txt"), None);
    }

    #[test]
    fn test_emit_json() {
        let value = obj(&[("name", Value::String("test".into()))]);
        let json = emit(&value, OutputFormat::Json).unwrap();
        assert_eq!(json, r#"{"name":"test"}"#);
    }

    #[test]
    fn test_emit_yaml() {
        let value = obj(&[("name", Value::String("test".into()))]);
        let yaml = emit(&value, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("name: test"));
    }

    #[test]
    fn test_emit_to_writer() {
        let value = obj(&[("n", Value::Int(1))]);
        let mut buf = Vec::new();
        JsonEmitter::new(false)
            .emit_to_writer(&value, &mut buf)
            .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), r#"{"n":1}"#);
    }
}
