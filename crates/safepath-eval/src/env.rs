//! Scoped lambda-parameter bindings.

use safepath_types::Value;
use std::collections::BTreeMap;

/// A single scope level.
#[derive(Debug, Clone)]
struct Scope {
    bindings: BTreeMap<String, Value>,
}

impl Scope {
    fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }
}

/// Lambda parameters in scope during evaluation.
///
/// Names are looked up from the innermost lambda outward. A name bound by no
/// lambda refers to the root object, so an empty environment is the normal
/// state outside lambda bodies.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new scope (one per lambda invocation).
    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Bind a name in the innermost scope, opening one if needed.
    pub fn define(&mut self, name: &str, value: Value) {
        if self.scopes.is_empty() {
            self.push_scope();
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.bindings.insert(name.to_string(), value);
        }
    }

    /// Look up a lambda parameter, searching from innermost to outermost scope.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.bindings.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_binding_shadows_outer() {
        let mut env = Environment::new();
        env.define("x", Value::Int(1));
        env.push_scope();
        env.define("x", Value::Int(2));
        env.define("y", Value::Int(3));
        assert_eq!(env.get("x"), Some(&Value::Int(2)));
        assert_eq!(env.get("y"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_unbound_name() {
        let env = Environment::new();
        assert_eq!(env.get("o"), None);
    }
}
