//! Runtime values for the Corn evaluator
//!
//! Values are the result of evaluating a document. They serialize directly to JSON or
//! YAML through `serde`.

use indexmap::IndexMap;
use serde::Serialize;

/// Ordered map of keys to values; insertion order is preserved
pub type Object = IndexMap<String, Value>;

/// A runtime value in Corn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Explicit absence, written `null`
    Null,
    /// Boolean
    Bool(bool),
    /// Integer (32-bit signed)
    Int(i32),
    /// Floating point (64-bit)
    Float(f64),
    /// String
    String(String),
    /// Array of values
    Array(Vec<Value>),
    /// Object (ordered map of string keys to values)
    Object(Object),
}

impl Value {
    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get a value by key path (e.g. `["server", "port"]`); numeric keys index arrays
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let mut current = self;
        for key in path {
            current = match current {
                Value::Object(obj) => obj.get(*key)?,
                Value::Array(arr) => arr.get(key.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<Vec<Value>> for Value {
    fn from(array: Vec<Value>) -> Self {
        Value::Array(array)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Value {
        let mut server = Object::new();
        server.insert("host".into(), "localhost".into());
        server.insert("ports".into(), vec![Value::Int(80), Value::Int(443)].into());

        let mut root = Object::new();
        root.insert("server".into(), server.into());
        root.insert("debug".into(), Value::Null);
        root.into()
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Int(1).type_name(), "int");
        assert_eq!(Value::Float(1.0).type_name(), "float");
        assert_eq!(Value::from("x").type_name(), "string");
        assert_eq!(sample().type_name(), "object");
    }

    #[test]
    fn test_get_path() {
        let value = sample();
        assert_eq!(
            value.get_path(&["server", "host"]).and_then(Value::as_str),
            Some("localhost")
        );
        assert_eq!(
            value.get_path(&["server", "ports", "1"]).and_then(Value::as_int),
            Some(443)
        );
        assert_eq!(value.get_path(&["server", "missing"]), None);
        assert_eq!(value.get_path(&["debug", "x"]), None);
        assert!(value.get_path(&["debug"]).is_some_and(Value::is_null));
    }

    #[test]
    fn test_serialize_preserves_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"server":{"host":"localhost","ports":[80,443]},"debug":null}"#
        );
    }

    #[test]
    fn test_serialize_scalars() {
        assert_eq!(serde_json::to_string(&Value::Float(1.0)).unwrap(), "1.0");
        assert_eq!(serde_json::to_string(&Value::Bool(true)).unwrap(), "true");
        assert_eq!(
            serde_json::to_string(&Value::from("a\"b")).unwrap(),
            r#""a\"b""#
        );
    }
}
