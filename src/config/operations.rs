//! Config loading and validation.

use super::model::MagicConfig;
use crate::error::{MagicError, Result};
use regex::Regex;
use std::path::Path;

impl MagicConfig {
    /// Load config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            MagicError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    ///
    /// An empty document yields the defaults. Unknown fields are silently
    /// ignored. The result is validated before it is returned.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: MagicConfig = serde_yaml::from_str(yaml)
            .map_err(|e| MagicError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| MagicError::Config(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `options_variable` must be a single non-empty token
    /// - `template_dir` must be non-empty
    /// - `variables.history_pattern` must be a valid regex
    pub fn validate(&self) -> Result<()> {
        if self.options_variable.trim().is_empty() {
            return Err(MagicError::Config(
                "config validation failed: options_variable must be non-empty".to_string(),
            ));
        }
        if self.options_variable.split_whitespace().count() != 1 {
            return Err(MagicError::Config(format!(
                "config validation failed: options_variable must not contain whitespace (found '{}')",
                self.options_variable
            )));
        }

        if self.template_dir.is_empty() {
            return Err(MagicError::Config(
                "config validation failed: template_dir must be non-empty".to_string(),
            ));
        }

        Regex::new(&self.variables.history_pattern).map_err(|e| {
            MagicError::Config(format!(
                "config validation failed: invalid history_pattern '{}': {}",
                self.variables.history_pattern, e
            ))
        })?;

        Ok(())
    }
}
