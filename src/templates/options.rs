//! Engine settings read from the `jinja_options` host variable.

use crate::error::{MagicError, Result};
use crate::namespace::Value;
use minijinja::syntax::SyntaxConfig;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::{Deserialize, Serialize};

/// How the engine treats undefined variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedMode {
    /// Undefined renders as empty and is falsy (default).
    #[default]
    Lenient,
    /// Any use of an undefined value is an error.
    Strict,
    /// Like lenient, but attribute access on undefined is also undefined.
    Chainable,
    /// Undefined may be tested but not printed or iterated.
    SemiStrict,
}

impl From<UndefinedMode> for UndefinedBehavior {
    fn from(mode: UndefinedMode) -> Self {
        match mode {
            UndefinedMode::Lenient => UndefinedBehavior::Lenient,
            UndefinedMode::Strict => UndefinedBehavior::Strict,
            UndefinedMode::Chainable => UndefinedBehavior::Chainable,
            UndefinedMode::SemiStrict => UndefinedBehavior::SemiStrict,
        }
    }
}

/// Environment settings. Key names follow Jinja2's `Environment` keyword
/// arguments; keys the engine has no equivalent for are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub trim_blocks: bool,
    pub lstrip_blocks: bool,
    pub keep_trailing_newline: bool,
    pub autoescape: bool,
    pub undefined: UndefinedMode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_start_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_end_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_start_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_end_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_start_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_end_string: Option<String>,
}

impl EngineOptions {
    /// Read options from a host value. `None` yields the defaults.
    pub fn from_host(value: Option<&Value>) -> Result<Self> {
        match value {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(v @ Value::Mapping(_)) => serde_yaml::from_value(v.clone())
                .map_err(|e| MagicError::Validation(format!("invalid engine options: {}", e))),
            Some(_) => Err(MagicError::Validation(
                "engine options must be a mapping".to_string(),
            )),
        }
    }

    fn has_custom_syntax(&self) -> bool {
        [
            &self.block_start_string,
            &self.block_end_string,
            &self.variable_start_string,
            &self.variable_end_string,
            &self.comment_start_string,
            &self.comment_end_string,
        ]
        .iter()
        .any(|s| s.is_some())
    }

    fn syntax_config(&self) -> Result<SyntaxConfig> {
        fn pick(custom: &Option<String>, default: &str) -> String {
            custom.clone().unwrap_or_else(|| default.to_string())
        }

        let config = SyntaxConfig::builder()
            .block_delimiters(
                pick(&self.block_start_string, "{%"),
                pick(&self.block_end_string, "%}"),
            )
            .variable_delimiters(
                pick(&self.variable_start_string, "{{"),
                pick(&self.variable_end_string, "}}"),
            )
            .comment_delimiters(
                pick(&self.comment_start_string, "{#"),
                pick(&self.comment_end_string, "#}"),
            )
            .build()?;
        Ok(config)
    }

    /// Apply these settings to `env`.
    pub fn apply(&self, env: &mut Environment<'_>) -> Result<()> {
        env.set_trim_blocks(self.trim_blocks);
        env.set_lstrip_blocks(self.lstrip_blocks);
        env.set_keep_trailing_newline(self.keep_trailing_newline);
        env.set_undefined_behavior(self.undefined.into());

        let autoescape = self.autoescape;
        env.set_auto_escape_callback(move |_| {
            if autoescape {
                AutoEscape::Html
            } else {
                AutoEscape::None
            }
        });

        if self.has_custom_syntax() {
            env.set_syntax(self.syntax_config()?);
        }

        Ok(())
    }
}
