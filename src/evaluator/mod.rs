//! Evaluator for the Corn configuration language
//!
//! The evaluator walks a parsed [`Config`] and produces a value tree. It handles:
//! - Input bindings from the assign block, in source order
//! - Input resolution, with `$_env` inputs falling back to the environment
//! - Path keys that create nested objects
//! - Spreads into objects and arrays
//! - String interpolation
//!
//! Every run gets a fresh [`Scope`], so one `Evaluator` can be reused freely.

pub mod scope;
pub mod value;

use tracing::debug;

use crate::errors::{undefined_input_help, CornError, CornResult};
use crate::parser::ast::*;

pub use scope::{EnvLookup, NoEnv, OsEnv, Scope, ENV_PREFIX};
pub use value::{Object, Value};

/// Evaluator for Corn rule trees
pub struct Evaluator {
    /// Where `$_env` inputs are looked up
    env: Box<dyn EnvLookup>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Create an evaluator that reads `$_env` inputs from the process environment
    pub fn new() -> Self {
        Self::with_env(OsEnv)
    }

    /// Create an evaluator with a custom environment lookup
    pub fn with_env(env: impl EnvLookup + 'static) -> Self {
        Self { env: Box::new(env) }
    }

    /// Evaluate a config into its top-level object
    pub fn evaluate(&self, config: &Config) -> CornResult<Object> {
        let mut scope = Scope::new();

        if let Some(block) = &config.assign_block {
            self.eval_assign_block(block, &mut scope)?;
        }

        let object = self.eval_object(&config.value, &scope)?;
        debug!(keys = object.len(), "evaluated config");
        Ok(object)
    }

    /// Bind each assignment as soon as it is evaluated, so later ones can refer to it
    fn eval_assign_block(&self, block: &AssignBlock, scope: &mut Scope) -> CornResult<()> {
        for assignment in &block.assignments {
            let value = self.eval_value(&assignment.value, scope)?;
            scope.define(assignment.name.clone(), value);
        }
        Ok(())
    }

    fn eval_value(&self, rule: &ValueRule, scope: &Scope) -> CornResult<Value> {
        match rule {
            ValueRule::Array(array) => self.eval_array(array, scope).map(Value::Array),
            ValueRule::Object(object) => self.eval_object(object, scope).map(Value::Object),
            ValueRule::String(string) => self.eval_string(string, scope).map(Value::String),
            ValueRule::Boolean(b) => Ok(Value::Bool(*b)),
            ValueRule::Float(n) => Ok(Value::Float(*n)),
            ValueRule::Integer(n) => Ok(Value::Int(*n)),
            ValueRule::Input(name) => self.resolve(name, scope),
            ValueRule::Null => Ok(Value::Null),
        }
    }

    fn resolve(&self, name: &str, scope: &Scope) -> CornResult<Value> {
        scope
            .resolve(name, self.env.as_ref())
            .ok_or_else(|| CornError::UndefinedInput {
                name: name.to_string(),
                help: match name.strip_prefix(ENV_PREFIX) {
                    Some(var) if !var.is_empty() => {
                        format!("environment variable '{}' is not set", var)
                    }
                    _ => undefined_input_help(name, scope.names()),
                },
            })
    }

    fn eval_object(&self, rule: &ObjectRule, scope: &Scope) -> CornResult<Object> {
        let mut object = Object::new();

        for entry in &rule.rules {
            match entry {
                ObjectEntry::Pair(pair) => {
                    let value = self.eval_value(&pair.value, scope)?;
                    insert_at_path(&mut object, &pair.path, value)?;
                }
                ObjectEntry::Spread(spread) => match self.resolve(&spread.name, scope)? {
                    Value::Object(source) => object.extend(source),
                    other => {
                        return Err(CornError::SpreadNonObject {
                            name: spread.name.clone(),
                            found: other.type_name().to_string(),
                        })
                    }
                },
            }
        }

        Ok(object)
    }

    fn eval_array(&self, rule: &ArrayRule, scope: &Scope) -> CornResult<Vec<Value>> {
        let mut array = Vec::with_capacity(rule.rules.len());

        for entry in &rule.rules {
            match entry {
                ArrayEntry::Value(value) => array.push(self.eval_value(value, scope)?),
                ArrayEntry::Spread(spread) => match self.resolve(&spread.name, scope)? {
                    Value::Array(items) => array.extend(items),
                    other => {
                        return Err(CornError::SpreadNonArray {
                            name: spread.name.clone(),
                            found: other.type_name().to_string(),
                        })
                    }
                },
            }
        }

        Ok(array)
    }

    fn eval_string(&self, rule: &StringRule, scope: &Scope) -> CornResult<String> {
        let mut result = String::new();

        for part in &rule.parts {
            match part {
                StringPart::CharSequence(s) => result.push_str(s),
                StringPart::CharEscape(c) => result.push(*c),
                StringPart::Input(name) => match self.resolve(name, scope)? {
                    Value::String(s) => result.push_str(&s),
                    other => {
                        return Err(CornError::InterpolateNonString {
                            name: name.clone(),
                            found: other.type_name().to_string(),
                        })
                    }
                },
            }
        }

        Ok(result)
    }
}

/// Assign `value` at `path`, creating intermediate objects as needed.
///
/// Existing intermediate objects are reused; an intermediate that holds anything else is
/// an error. The final key is overwritten.
fn insert_at_path(object: &mut Object, path: &Path, value: Value) -> CornResult<()> {
    let (parents, last) = path.split_last();

    let mut current = object;
    for segment in parents {
        let slot = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Object::new()));

        current = match slot {
            Value::Object(child) => child,
            other => {
                return Err(CornError::KeyChainingNonObject {
                    key: segment.clone(),
                    found: other.type_name().to_string(),
                })
            }
        };
    }

    current.insert(last.to_string(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn eval_with(source: &str, evaluator: &Evaluator) -> CornResult<Value> {
        let config = parse(tokenize(source)?)?;
        evaluator.evaluate(&config).map(Value::Object)
    }

    fn eval(source: &str) -> CornResult<Value> {
        eval_with(source, &Evaluator::with_env(NoEnv))
    }

    fn eval_json(source: &str) -> serde_json::Value {
        let value = eval(source).unwrap_or_else(|e| panic!("eval failed for {:?}: {}", source, e));
        serde_json::to_value(value).unwrap()
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            eval_json("{ i = 42 f = 2.5 t = true n = null s = \"str\" h = 0x1F }"),
            serde_json::json!({"i": 42, "f": 2.5, "t": true, "n": null, "s": "str", "h": 31})
        );
    }

    #[test]
    fn test_inputs_resolve_in_order() {
        assert_eq!(
            eval_json("let { $a = 1 $b = [ $a $a ] } in { b = $b }"),
            serde_json::json!({"b": [1, 1]})
        );
    }

    #[test]
    fn test_forward_reference_fails() {
        let err = eval("let { $a = $b $b = 1 } in { a = $a }").unwrap_err();
        assert!(matches!(err, CornError::UndefinedInput { ref name, .. } if name == "$b"));
    }

    #[test]
    fn test_self_reference_fails() {
        let err = eval("let { $a = $a } in { }").unwrap_err();
        assert!(matches!(err, CornError::UndefinedInput { .. }));
    }

    #[test]
    fn test_undefined_input_suggests() {
        let err = eval("let { $port = 1 } in { p = $prot }").unwrap_err();
        match err {
            CornError::UndefinedInput { name, help } => {
                assert_eq!(name, "$prot");
                assert_eq!(help, "did you mean '$port'?");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_nested_paths_merge() {
        assert_eq!(
            eval_json("{ a.b.c = 1 a.b.d = 2 }"),
            serde_json::json!({"a": {"b": {"c": 1, "d": 2}}})
        );
    }

    #[test]
    fn test_path_reuses_literal_object() {
        assert_eq!(
            eval_json("{ a = { x = 1 } a.y = 2 }"),
            serde_json::json!({"a": {"x": 1, "y": 2}})
        );
    }

    #[test]
    fn test_path_conflict() {
        let err = eval("{ a = 1 a.b = 2 }").unwrap_err();
        assert_eq!(
            err,
            CornError::KeyChainingNonObject {
                key: "a".into(),
                found: "int".into(),
            }
        );
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let value = eval("{ a = 1 b = 2 a = 3 }").unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(value.get_path(&["a"]), Some(&Value::Int(3)));
    }

    #[test]
    fn test_object_spread_later_wins() {
        assert_eq!(
            eval_json("let { $x = { a = 1 b = 2 } } in { a = 3 ..$x }"),
            serde_json::json!({"a": 1, "b": 2})
        );
        assert_eq!(
            eval_json("let { $x = { a = 1 b = 2 } } in { ..$x a = 3 }"),
            serde_json::json!({"a": 3, "b": 2})
        );
    }

    #[test]
    fn test_array_spread() {
        assert_eq!(
            eval_json("let { $xs = [ 2 3 ] } in { xs = [ 1 ..$xs 4 ..$xs ] }"),
            serde_json::json!({"xs": [1, 2, 3, 4, 2, 3]})
        );
    }

    #[test]
    fn test_spread_type_errors() {
        let err = eval("let { $x = [ 1 ] } in { ..$x }").unwrap_err();
        assert_eq!(
            err,
            CornError::SpreadNonObject {
                name: "$x".into(),
                found: "array".into(),
            }
        );

        let err = eval("let { $x = { a = 1 } } in { a = [ ..$x ] }").unwrap_err();
        assert_eq!(
            err,
            CornError::SpreadNonArray {
                name: "$x".into(),
                found: "object".into(),
            }
        );
    }

    #[test]
    fn test_interpolation() {
        assert_eq!(
            eval_json(r#"let { $name = "world" } in { greeting = "hello $name!" }"#),
            serde_json::json!({"greeting": "hello world!"})
        );
    }

    #[test]
    fn test_interpolate_non_string() {
        let err = eval(r#"let { $n = 1 } in { s = "n=$n" }"#).unwrap_err();
        assert_eq!(
            err,
            CornError::InterpolateNonString {
                name: "$n".into(),
                found: "int".into(),
            }
        );
    }

    #[test]
    fn test_env_inputs() {
        let env = HashMap::from([("GREETING".to_string(), "hi".to_string())]);
        let evaluator = Evaluator::with_env(env);

        let value = eval_with(r#"{ a = $_envGREETING b = "$_envGREETING!" }"#, &evaluator)
            .unwrap();
        assert_eq!(
            serde_json::to_value(value).unwrap(),
            serde_json::json!({"a": "hi", "b": "hi!"})
        );

        let err = eval_with("{ a = $_envMISSING }", &evaluator).unwrap_err();
        assert_eq!(
            err,
            CornError::UndefinedInput {
                name: "$_envMISSING".into(),
                help: "environment variable 'MISSING' is not set".into(),
            }
        );
    }

    #[test]
    fn test_local_binding_beats_env() {
        let env = HashMap::from([("HOME".to_string(), "/from/env".to_string())]);
        let evaluator = Evaluator::with_env(env);
        let value = eval_with("let { $_envHOME = \"/local\" } in { home = $_envHOME }", &evaluator)
            .unwrap();
        assert_eq!(value.get_path(&["home"]), Some(&Value::from("/local")));
    }

    #[test]
    fn test_evaluator_is_reusable() {
        let evaluator = Evaluator::with_env(NoEnv);
        let first = eval_with("let { $a = 1 } in { a = $a }", &evaluator).unwrap();
        let second = eval_with("let { $a = 1 } in { a = $a }", &evaluator).unwrap();
        assert_eq!(first, second);

        // Bindings from the previous run must not leak
        let err = eval_with("{ a = $a }", &evaluator).unwrap_err();
        assert!(matches!(err, CornError::UndefinedInput { .. }));
    }
}
