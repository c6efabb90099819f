//! Visibility rules for host variables.

use super::Namespace;
use crate::config::VariablesConfig;
use crate::error::{MagicError, Result};
use regex::Regex;
use std::collections::BTreeSet;

/// Decides which host names a template can see.
///
/// A name is user-visible when it lacks the internal prefix and is hidden
/// neither by config nor by the host. History names (full match on the
/// history pattern, or one of the listed names) are visible regardless.
#[derive(Debug, Clone)]
pub struct VariablePolicy {
    internal_prefix: String,
    history: Regex,
    history_names: BTreeSet<String>,
    hidden: BTreeSet<String>,
}

impl VariablePolicy {
    pub fn from_config(config: &VariablesConfig) -> Result<Self> {
        // Anchor so the pattern has to match the whole name.
        let anchored = format!("^(?:{})$", config.history_pattern);
        let history = Regex::new(&anchored).map_err(|e| {
            MagicError::Config(format!(
                "invalid history_pattern '{}': {}",
                config.history_pattern, e
            ))
        })?;

        Ok(Self {
            internal_prefix: config.internal_prefix.clone(),
            history,
            history_names: config.history_names.iter().cloned().collect(),
            hidden: config.hidden.iter().cloned().collect(),
        })
    }

    pub fn is_user_visible(&self, name: &str, ns: &dyn Namespace) -> bool {
        let internal = !self.internal_prefix.is_empty() && name.starts_with(&self.internal_prefix);
        !internal && !self.hidden.contains(name) && !ns.is_hidden(name)
    }

    pub fn is_history(&self, name: &str) -> bool {
        self.history.is_match(name) || self.history_names.contains(name)
    }
}

impl Default for VariablePolicy {
    fn default() -> Self {
        Self::from_config(&VariablesConfig::default()).expect("default history pattern is valid")
    }
}
