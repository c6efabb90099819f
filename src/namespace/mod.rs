//! The host variable namespace.
//!
//! Every command handler receives the host's namespace as an injected
//! `&mut dyn Namespace` instead of reaching for global state. The handler
//! reads from it to build the render variable set, and writes to it when a
//! template assigns variables or a YAML block is ingested.
//!
//! Values are `serde_yaml::Value`: null, bool, number, string, sequence,
//! mapping, or a tagged value for custom YAML tags.

mod bindings;
mod policy;


pub use bindings::Bindings;
pub use policy::VariablePolicy;

pub use serde_yaml::{Mapping, Value};

use std::collections::{BTreeMap, BTreeSet};

/// Read/write access to a host's variable table.
pub trait Namespace {
    /// Look up a variable by name.
    fn get(&self, name: &str) -> Option<&Value>;

    /// Mutable access to a variable, used to update an options mapping in place.
    fn get_mut(&mut self, name: &str) -> Option<&mut Value>;

    /// Bind `name` to `value`, replacing any previous binding.
    fn set(&mut self, name: &str, value: Value);

    /// All bound names.
    fn names(&self) -> Vec<String>;

    /// Whether the host itself hides `name` from user-facing listings.
    fn is_hidden(&self, _name: &str) -> bool {
        false
    }
}

/// In-memory namespace used by the CLI host and by tests.
#[derive(Debug, Clone, Default)]
pub struct UserNamespace {
    vars: BTreeMap<String, Value>,
    hidden: BTreeSet<String>,
}

impl UserNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `name` as host-internal.
    pub fn hide(&mut self, name: impl Into<String>) {
        self.hidden.insert(name.into());
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl Namespace for UserNamespace {
    fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.vars.get_mut(name)
    }

    fn set(&mut self, name: &str, value: Value) {
        self.vars.insert(name.to_string(), value);
    }

    fn names(&self) -> Vec<String> {
        self.vars.keys().cloned().collect()
    }

    fn is_hidden(&self, name: &str) -> bool {
        self.hidden.contains(name)
    }
}

/// Build the variables a template sees for one render.
///
/// Sources, later ones winning on collision:
/// 1. user-visible host variables,
/// 2. history variables,
/// 3. the entries of the options mapping.
pub fn render_variables(
    ns: &dyn Namespace,
    policy: &VariablePolicy,
    options: Option<&dyn Bindings>,
) -> BTreeMap<String, Value> {
    let names = ns.names();
    let mut vars = BTreeMap::new();

    for name in names.iter().filter(|n| policy.is_user_visible(n, ns)) {
        if let Some(value) = ns.get(name) {
            vars.insert(name.clone(), value.clone());
        }
    }

    for name in names.iter().filter(|n| policy.is_history(n)) {
        if let Some(value) = ns.get(name) {
            vars.insert(name.clone(), value.clone());
        }
    }

    if let Some(options) = options {
        for (key, value) in options.entries() {
            vars.insert(key, value);
        }
    }

    vars
}
