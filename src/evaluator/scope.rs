//! Input bindings for the Corn evaluator
//!
//! A [`Scope`] holds the inputs bound by the assign block of a single evaluation run.
//! Names are stored as written, including the `$` sigil. Inputs that start with
//! [`ENV_PREFIX`] and are not bound locally fall back to an [`EnvLookup`].

use std::collections::HashMap;

use indexmap::IndexMap;

use super::value::Value;

/// Inputs with this prefix may be resolved from the environment
pub const ENV_PREFIX: &str = "$_env";

/// Source of environment variables for `$_env` inputs
pub trait EnvLookup: Send + Sync {
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Reads the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEnv;

impl EnvLookup for OsEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Never finds anything; makes evaluation independent of the host
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnv;

impl EnvLookup for NoEnv {
    fn lookup(&self, _name: &str) -> Option<String> {
        None
    }
}

impl EnvLookup for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<F> EnvLookup for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn lookup(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Inputs bound during one evaluation run
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// Bindings in assignment order
    bindings: IndexMap<String, Value>,
}

impl Scope {
    /// Create a new empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an input; re-binding a name replaces its value
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Look up a locally bound input
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Resolve an input: local binding first, then the environment for `$_env` names
    pub fn resolve(&self, name: &str, env: &dyn EnvLookup) -> Option<Value> {
        if let Some(value) = self.get(name) {
            return Some(value.clone());
        }

        let var = name.strip_prefix(ENV_PREFIX)?;
        if var.is_empty() {
            return None;
        }
        env.lookup(var).map(Value::String)
    }

    /// Names of all bound inputs, in binding order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn env() -> HashMap<String, String> {
        HashMap::from([("HOME".to_string(), "/home/corn".to_string())])
    }

    #[test]
    fn test_local_binding() {
        let mut scope = Scope::new();
        scope.define("$a", Value::Int(1));
        assert_eq!(scope.resolve("$a", &NoEnv), Some(Value::Int(1)));
        assert_eq!(scope.resolve("$b", &NoEnv), None);
    }

    #[test]
    fn test_rebinding_replaces() {
        let mut scope = Scope::new();
        scope.define("$a", Value::Int(1));
        scope.define("$a", Value::Int(2));
        assert_eq!(scope.get("$a"), Some(&Value::Int(2)));
        assert_eq!(scope.names().collect::<Vec<_>>(), vec!["$a"]);
    }

    #[test]
    fn test_env_fallback() {
        let scope = Scope::new();
        assert_eq!(
            scope.resolve("$_envHOME", &env()),
            Some(Value::String("/home/corn".into()))
        );
        assert_eq!(scope.resolve("$_envMISSING", &env()), None);
        assert_eq!(scope.resolve("$_env", &env()), None);
        assert_eq!(scope.resolve("$HOME", &env()), None);
    }

    #[test]
    fn test_local_binding_shadows_env() {
        let mut scope = Scope::new();
        scope.define("$_envHOME", Value::from("local"));
        assert_eq!(
            scope.resolve("$_envHOME", &env()),
            Some(Value::String("local".into()))
        );
    }

    #[test]
    fn test_closure_lookup() {
        let lookup = |name: &str| (name == "USER").then(|| "corn".to_string());
        let scope = Scope::new();
        assert_eq!(
            scope.resolve("$_envUSER", &lookup),
            Some(Value::String("corn".into()))
        );
    }
}
