//! JSON emitter for Corn values

use super::Emitter;
use crate::errors::{CornError, CornResult};
use crate::evaluator::Value;

/// JSON output emitter
pub struct JsonEmitter {
    /// Whether to pretty-print with indentation
    pretty: bool,
}

impl JsonEmitter {
    /// Create a new JSON emitter
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Emitter for JsonEmitter {
    fn emit(&self, value: &Value) -> CornResult<String> {
        let result = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        result.map_err(|e| CornError::io_error(format!("failed to serialize JSON: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Object;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pretty() {
        let mut map = Object::new();
        map.insert("a".into(), Value::Array(vec![Value::Int(1), Value::Null]));
        let output = JsonEmitter::new(true).emit(&Value::Object(map)).unwrap();
        assert_eq!(output, "{\n  \"a\": [\n    1,\n    null\n  ]\n}");
    }

    #[test]
    fn test_floats_keep_fraction() {
        let output = JsonEmitter::new(false).emit(&Value::Float(2.0)).unwrap();
        assert_eq!(output, "2.0");
    }

    #[test]
    fn test_empty_containers() {
        let emitter = JsonEmitter::new(true);
        assert_eq!(emitter.emit(&Value::Object(Object::new())).unwrap(), "{}");
        assert_eq!(emitter.emit(&Value::Array(vec![])).unwrap(), "[]");
    }
}
