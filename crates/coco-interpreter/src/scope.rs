//! Variable storage for the interpreter
//!
//! The program's globals live in one `Scope`; every function call pushes a
//! fresh one that holds the parameters and locals of that call.

use coco_ast::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Scope {
    variables: HashMap<String, Value>,
}

impl Scope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, replacing any previous value
    pub fn set(&mut self, name: String, value: Value) {
        self.variables.insert(name, value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// All variable names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.variables.keys().cloned().collect();
        names.sort();
        names
    }
}
