//! `define-template NAME`: store a named template.

use super::MagicHandler;
use crate::config::types::ENGINE_OPTIONS_VARIABLE;
use crate::error::{MagicError, Result};
use crate::namespace::Namespace;
use crate::templates::{EngineOptions, SyntaxIssue, check_syntax};
use tracing::{info, warn};

/// Result of a definition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefineOutcome {
    /// The template was stored.
    Stored {
        /// Whether an earlier definition under the same name was replaced.
        replaced: bool,
    },
    /// The body did not compile; the table was left unchanged.
    Rejected(SyntaxIssue),
}

impl MagicHandler {
    /// Define or replace the template named by `line`.
    ///
    /// The body is compiled first with the session's engine options. A
    /// syntax error is reported through the returned outcome instead of an
    /// `Err`, and nothing is stored.
    ///
    /// # Errors
    ///
    /// * `MagicError::Name` - `line` is blank or holds more than one token
    /// * `MagicError::Validation` - `jinja_options` is not a valid options mapping
    pub fn define_template(
        &mut self,
        ns: &dyn Namespace,
        line: &str,
        body: &str,
    ) -> Result<DefineOutcome> {
        let name = parse_template_name(line)?;
        let options = EngineOptions::from_host(ns.get(ENGINE_OPTIONS_VARIABLE))?;

        if let Some(issue) = check_syntax(body, &options)? {
            warn!(template = name, %issue, "template not defined");
            return Ok(DefineOutcome::Rejected(issue));
        }

        let replaced = self.templates.define(name, body).is_some();
        info!(template = name, replaced, "template defined");
        Ok(DefineOutcome::Stored { replaced })
    }
}

fn parse_template_name(line: &str) -> Result<&str> {
    let mut words = line.split_whitespace();
    let name = words
        .next()
        .ok_or_else(|| MagicError::Name("templates must have names".to_string()))?;
    if words.next().is_some() {
        return Err(MagicError::Name(format!(
            "too many arguments in '{}'; expected a single template name",
            line.trim()
        )));
    }
    Ok(name)
}
