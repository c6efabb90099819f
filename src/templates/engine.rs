//! Rendering on top of minijinja.
//!
//! A fresh environment is built for every render. It resolves template
//! names against a snapshot of the session's template table first and the
//! template directory second, carries the engine options, and receives the
//! render variable set as globals.

use super::TemplateTable;
use super::convert::{from_template_value, to_template_value};
use super::filters;
use super::options::EngineOptions;
use crate::error::Result;
use crate::namespace::Value;
use minijinja::{Environment, ErrorKind, context, path_loader};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// What to render.
#[derive(Debug, Clone, Copy)]
pub enum TemplateSource<'a> {
    /// A template resolved by name through the loader.
    Named(&'a str),
    /// Template text given directly.
    Inline(&'a str),
}

/// Text produced by a render plus the template's top-level assignments.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub text: String,
    /// Top-level assignments, in the order the engine reports them.
    pub exports: Vec<(String, Value)>,
}

/// A syntax error found while compiling a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    pub line: Option<usize>,
    pub message: String,
}

impl fmt::Display for SyntaxIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "Syntax error at line {}: {}", line, self.message),
            None => write!(f, "Syntax error: {}", self.message),
        }
    }
}

fn build_environment<'source>(
    table: &TemplateTable,
    template_dir: &Path,
    options: &EngineOptions,
) -> Result<Environment<'source>> {
    let mut env = Environment::new();
    options.apply(&mut env)?;
    filters::register(&mut env);

    let defined = table.snapshot();
    let from_disk = path_loader(template_dir);
    env.set_loader(move |name| match defined.get(name) {
        Some(source) => Ok(Some(source.clone())),
        None => from_disk(name),
    });

    Ok(env)
}

/// Compile `source` without rendering it.
///
/// Returns `Ok(Some(issue))` for syntax errors; any other engine error is
/// returned as `Err`.
pub fn check_syntax(source: &str, options: &EngineOptions) -> Result<Option<SyntaxIssue>> {
    let mut env = Environment::new();
    options.apply(&mut env)?;

    match env.template_from_str(source) {
        Ok(_) => Ok(None),
        Err(e) if e.kind() == ErrorKind::SyntaxError => Ok(Some(SyntaxIssue {
            line: e.line(),
            message: e.detail().unwrap_or("invalid syntax").to_string(),
        })),
        Err(e) => Err(e.into()),
    }
}

/// Render `source` with `globals` bound and collect its top-level assignments.
///
/// Exported names starting with `_` and exports without a data
/// representation (macros) are left out.
pub fn render_template(
    table: &TemplateTable,
    template_dir: &Path,
    options: &EngineOptions,
    globals: BTreeMap<String, Value>,
    source: TemplateSource<'_>,
) -> Result<RenderOutput> {
    let mut env = build_environment(table, template_dir, options)?;
    for (name, value) in &globals {
        env.add_global(name.clone(), to_template_value(value));
    }

    let template = match source {
        TemplateSource::Named(name) => env.get_template(name)?,
        TemplateSource::Inline(text) => env.template_from_str(text)?,
    };

    let captured = template.render_captured(context! {})?;
    let state = captured.state();

    let mut exports = Vec::new();
    for name in state.exports() {
        if name.starts_with('_') {
            continue;
        }
        let Some(value) = state.lookup(name) else {
            continue;
        };
        match from_template_value(&value)? {
            Some(value) => exports.push((name.to_string(), value)),
            None => debug!(name, "skipping non-data export"),
        }
    }

    Ok(RenderOutput {
        text: captured.output().to_string(),
        exports,
    })
}
