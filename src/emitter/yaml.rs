//! YAML emitter for Corn values

use super::Emitter;
use crate::errors::{CornError, CornResult};
use crate::evaluator::Value;

/// YAML output emitter
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlEmitter;

impl Emitter for YamlEmitter {
    fn emit(&self, value: &Value) -> CornResult<String> {
        serde_yaml::to_string(value)
            .map_err(|e| CornError::io_error(format!("failed to serialize YAML: {}", e)))
    }
}
