//! MagicConfig struct definition and default implementation.

use super::types::*;
use crate::display::OutputFormat;
use serde::{Deserialize, Serialize};

/// Configuration for a magic session.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagicConfig {
    /// Host variable used by `render` when `--variables` is not given,
    /// and by `ingest-yaml` when no target name is given.
    #[serde(default = "default_options_variable")]
    pub options_variable: String,

    /// Directory searched for templates missing from the template table.
    #[serde(default = "default_template_dir")]
    pub template_dir: String,

    /// Display wrapper used when no format flag is passed.
    #[serde(default)]
    pub default_format: OutputFormat,

    /// Visibility rules for host variables.
    #[serde(default)]
    pub variables: VariablesConfig,
}

impl Default for MagicConfig {
    fn default() -> Self {
        Self {
            options_variable: default_options_variable(),
            template_dir: default_template_dir(),
            default_format: OutputFormat::default(),
            variables: VariablesConfig::default(),
        }
    }
}
