//! Environments: symbol name -> value bindings.

use crate::engine::value::Value;
use std::collections::HashMap;
use tracing::{debug, trace};

/// A single flat scope with snapshot semantics.
///
/// Deriving a scope (for `let` bodies, closure capture, and lambda
/// application) clones the bindings wholesale; mutating either copy
/// afterwards never shows through the other. `define` is the only in-place
/// mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    bindings: HashMap<String, Value>,
}

impl Environment {
    /// Creates a top-level environment holding the `true`/`false` prelude.
    pub fn new() -> Self {
        debug!("Creating new root environment");
        let mut env = Environment {
            bindings: HashMap::new(),
        };
        env.define("true".to_string(), Value::Bool(true));
        env.define("false".to_string(), Value::Bool(false));
        env
    }

    /// Defines a new binding or overwrites an existing one.
    pub fn define(&mut self, name: String, value: Value) {
        trace!(name = %name, value = ?value, "Defining binding");
        self.bindings.insert(name, value);
    }

    /// Retrieves a binding, cloning the value out.
    pub fn get(&self, name: &str) -> Option<Value> {
        trace!(name = %name, "Looking up binding");
        self.bindings.get(name).cloned()
    }

    /// Copies every binding from `other` into this environment. Bindings
    /// from `other` win on collision.
    pub fn extend(&mut self, other: &Environment) {
        trace!(count = other.bindings.len(), "Extending environment");
        for (name, value) in &other.bindings {
            self.bindings.insert(name.clone(), value.clone());
        }
    }
}
