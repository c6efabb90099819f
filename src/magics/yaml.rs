//! `ingest-yaml [NAME[=]]`: bind a YAML block to a host variable.

use super::MagicHandler;
use crate::error::{MagicError, Result};
use crate::namespace::{Namespace, Value};
use tracing::info;

impl MagicHandler {
    /// Parse `body` as YAML and store it.
    ///
    /// With a target name the value is bound to it and `None` is returned.
    /// Without one the value replaces the options variable (`jinja_env` by
    /// default) and is also returned for display.
    ///
    /// Merge keys (`<<: *anchor`) are resolved. Custom tags are kept as
    /// tagged values rather than rejected.
    pub fn ingest_yaml(
        &mut self,
        ns: &mut dyn Namespace,
        line: &str,
        body: &str,
    ) -> Result<Option<Value>> {
        let target = parse_target(line)?;
        let mut value: Value = serde_yaml::from_str(body)?;
        value.apply_merge()?;

        match target {
            Some(name) => {
                info!(variable = name, "bound YAML value");
                ns.set(name, value);
                Ok(None)
            }
            None => {
                let name = &self.config.options_variable;
                info!(variable = %name, "bound YAML value to options variable");
                ns.set(name, value.clone());
                Ok(Some(value))
            }
        }
    }
}

/// Extract the optional target name, dropping a trailing `=`.
fn parse_target(line: &str) -> Result<Option<&str>> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.len() > 1 {
        return Err(MagicError::Validation(
            "at most one variable name may be given".to_string(),
        ));
    }

    Ok(words
        .first()
        .copied()
        .map(|w| w.strip_suffix('=').unwrap_or(w))
        .filter(|w| !w.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target_forms() {
        assert_eq!(parse_target("").unwrap(), None);
        assert_eq!(parse_target(" cfg ").unwrap(), Some("cfg"));
        assert_eq!(parse_target("cfg=").unwrap(), Some("cfg"));
        assert_eq!(parse_target("=").unwrap(), None);
    }

    #[test]
    fn test_parse_target_rejects_extra_tokens() {
        let err = parse_target("a b").unwrap_err();
        assert!(matches!(err, MagicError::Validation(_)));
    }
}
