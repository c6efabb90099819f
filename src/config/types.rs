//! Configuration types and defaults.

use serde::{Deserialize, Serialize};

/// Default name of the host variable holding the options mapping.
pub const DEFAULT_OPTIONS_VARIABLE: &str = "jinja_env";

/// Name of the host variable holding engine settings.
pub const ENGINE_OPTIONS_VARIABLE: &str = "jinja_options";

/// Which host names are pulled into the render variable set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariablesConfig {
    /// Names starting with this prefix are treated as internal and skipped.
    #[serde(default = "default_internal_prefix")]
    pub internal_prefix: String,

    /// Regex (full match) for history names that are passed through anyway.
    #[serde(default = "default_history_pattern")]
    pub history_pattern: String,

    /// Additional names that are always passed through.
    #[serde(default = "default_history_names")]
    pub history_names: Vec<String>,

    /// Names that are never visible to templates unless they match the
    /// history rules.
    #[serde(default)]
    pub hidden: Vec<String>,
}

impl Default for VariablesConfig {
    fn default() -> Self {
        Self {
            internal_prefix: default_internal_prefix(),
            history_pattern: default_history_pattern(),
            history_names: default_history_names(),
            hidden: Vec::new(),
        }
    }
}

pub fn default_internal_prefix() -> String {
    "_".to_string()
}

/// Matches `_`, `_12`, `_i` and `_i12`.
pub fn default_history_pattern() -> String {
    "_i?[0-9]*".to_string()
}

pub fn default_history_names() -> Vec<String> {
    ["In", "Out", "__", "___", "_i", "_ii", "_iii"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn default_options_variable() -> String {
    DEFAULT_OPTIONS_VARIABLE.to_string()
}

pub fn default_template_dir() -> String {
    ".".to_string()
}
