//! The template command handler.
//!
//! `MagicHandler` owns the session's template table and implements the four
//! magics. Every handler takes the host namespace explicitly; nothing is
//! read from or written to global state.
//!
//! | Magic | Alias | Handler |
//! |---|---|---|
//! | `define-template NAME` | `jinja_template` | [`MagicHandler::define_template`] |
//! | `render [options]` | `jinja` | [`MagicHandler::render`] |
//! | `ingest-yaml [NAME[=]]` | `yaml` | [`MagicHandler::ingest_yaml`] |
//! | `inspect` | `jinja_inner` | [`MagicHandler::inner`] |

mod define;
mod render;
mod yaml;

#[cfg(test)]
mod tests;

pub use define::DefineOutcome;
pub use render::{FormatFlags, RenderArgs};

use crate::config::MagicConfig;
use crate::config::types::ENGINE_OPTIONS_VARIABLE;
use crate::display::Rendered;
use crate::error::Result;
use crate::namespace::{Mapping, Namespace, Value, VariablePolicy};
use crate::templates::TemplateTable;
use std::fmt;
use tracing::{debug, info};

/// The magics a host can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magic {
    DefineTemplate,
    Render,
    IngestYaml,
    Inspect,
}

impl Magic {
    /// Resolve a magic by its name or alias.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "define-template" | "jinja_template" => Some(Magic::DefineTemplate),
            "render" | "jinja" => Some(Magic::Render),
            "ingest-yaml" | "yaml" => Some(Magic::IngestYaml),
            "inspect" | "jinja_inner" => Some(Magic::Inspect),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Magic::DefineTemplate => "define-template",
            Magic::Render => "render",
            Magic::IngestYaml => "ingest-yaml",
            Magic::Inspect => "inspect",
        }
    }

    /// Whether the magic can be used as a cell magic (`%%name`, with a body).
    pub fn cell_form(self) -> bool {
        !matches!(self, Magic::Inspect)
    }

    /// Whether the magic can be used as a line magic (`%name`, no body).
    pub fn line_form(self) -> bool {
        matches!(self, Magic::Render | Magic::Inspect)
    }
}

impl fmt::Display for Magic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What a magic hands back to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Nothing visible.
    None,
    /// Rendered template text with its display wrapper.
    Display(Rendered),
    /// A value to show as the command result.
    Value(Value),
    /// Informational text (usage help, introspection).
    Text(String),
    /// A message for the host's error channel; the command did not fail.
    Diagnostic(String),
}

/// Template command handler for one session.
#[derive(Debug, Clone)]
pub struct MagicHandler {
    config: MagicConfig,
    policy: VariablePolicy,
    templates: TemplateTable,
}

impl MagicHandler {
    /// Create a handler without touching any namespace.
    pub fn new(config: MagicConfig) -> Result<Self> {
        config.validate()?;
        let policy = VariablePolicy::from_config(&config.variables)?;
        Ok(Self {
            config,
            policy,
            templates: TemplateTable::new(),
        })
    }

    /// Create a handler and initialize the host variables it works with.
    ///
    /// The options variable and `jinja_options` are (re)set to empty
    /// mappings.
    pub fn register(config: MagicConfig, ns: &mut dyn Namespace) -> Result<Self> {
        let handler = Self::new(config)?;
        ns.set(
            &handler.config.options_variable,
            Value::Mapping(Mapping::new()),
        );
        ns.set(ENGINE_OPTIONS_VARIABLE, Value::Mapping(Mapping::new()));
        info!(
            options_variable = %handler.config.options_variable,
            template_dir = %handler.config.template_dir,
            "registered template magics"
        );
        Ok(handler)
    }

    pub fn config(&self) -> &MagicConfig {
        &self.config
    }

    pub fn templates(&self) -> &TemplateTable {
        &self.templates
    }

    /// Returns the handler itself. For debugging only.
    pub fn inner(&self) -> &Self {
        self
    }

    /// Run `magic` with its argument line and optional body.
    pub fn invoke(
        &mut self,
        ns: &mut dyn Namespace,
        magic: Magic,
        line: &str,
        body: Option<&str>,
    ) -> Result<Output> {
        debug!(%magic, line, has_body = body.is_some(), "invoking magic");

        match magic {
            Magic::DefineTemplate => {
                match self.define_template(ns, line, body.unwrap_or(""))? {
                    DefineOutcome::Stored { .. } => Ok(Output::None),
                    DefineOutcome::Rejected(issue) => Ok(Output::Diagnostic(issue.to_string())),
                }
            }
            Magic::Render => self.render(ns, line, body),
            Magic::IngestYaml => Ok(self
                .ingest_yaml(ns, line, body.unwrap_or(""))?
                .map_or(Output::None, Output::Value)),
            Magic::Inspect => Ok(Output::Text(format!("{:#?}", self.inner()))),
        }
    }
}
