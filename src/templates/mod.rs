//! Template storage and rendering.
//!
//! - `TemplateTable` holds the templates defined during a session.
//! - `engine` builds a minijinja environment that looks templates up in the
//!   table first and in the template directory second, renders, and
//!   collects the template's top-level assignments.
//! - `options` maps the `jinja_options` host variable onto engine settings.
//! - `filters` adds data-format filters (`to_yaml`, `from_json`, ...).

pub mod convert;
pub mod engine;
pub mod filters;
pub mod options;

pub use engine::{RenderOutput, SyntaxIssue, TemplateSource, check_syntax, render_template};
pub use options::EngineOptions;

use std::collections::BTreeMap;

/// Named template sources defined during a session.
#[derive(Debug, Clone, Default)]
pub struct TemplateTable {
    templates: BTreeMap<String, String>,
}

impl TemplateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `source` under `name`, returning the previous source if any.
    pub fn define(&mut self, name: impl Into<String>, source: impl Into<String>) -> Option<String> {
        self.templates.insert(name.into(), source.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Owned copy handed to the engine's loader.
    pub(crate) fn snapshot(&self) -> BTreeMap<String, String> {
        self.templates.clone()
    }
}
