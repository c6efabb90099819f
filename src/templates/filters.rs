//! Data-format filters available to every template.

use minijinja::value::Value as TemplateValue;
use minijinja::{Environment, Error, ErrorKind};

pub fn register(env: &mut Environment<'_>) {
    env.add_filter("to_yaml", to_yaml);
    env.add_filter("from_yaml", from_yaml);
    env.add_filter("to_json", to_json);
    env.add_filter("to_nice_json", to_nice_json);
    env.add_filter("from_json", from_json);
}

fn to_yaml(value: TemplateValue) -> Result<String, Error> {
    serde_yaml::to_string(&value).map_err(|e| {
        Error::new(ErrorKind::InvalidOperation, "cannot serialize value to YAML").with_source(e)
    })
}

fn from_yaml(text: &str) -> Result<TemplateValue, Error> {
    let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| {
        Error::new(ErrorKind::InvalidOperation, "cannot parse YAML").with_source(e)
    })?;
    Ok(TemplateValue::from_serialize(&value))
}

fn to_json(value: TemplateValue) -> Result<String, Error> {
    serde_json::to_string(&value).map_err(|e| {
        Error::new(ErrorKind::InvalidOperation, "cannot serialize value to JSON").with_source(e)
    })
}

fn to_nice_json(value: TemplateValue) -> Result<String, Error> {
    serde_json::to_string_pretty(&value).map_err(|e| {
        Error::new(ErrorKind::InvalidOperation, "cannot serialize value to JSON").with_source(e)
    })
}

fn from_json(text: &str) -> Result<TemplateValue, Error> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| {
        Error::new(ErrorKind::InvalidOperation, "cannot parse JSON").with_source(e)
    })?;
    Ok(TemplateValue::from_serialize(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    fn env() -> Environment<'static> {
        let mut env = Environment::new();
        register(&mut env);
        env
    }

    #[test]
    fn test_to_yaml() {
        let out = env()
            .render_str("{{ v | to_yaml }}", context! { v => vec![1, 2] })
            .unwrap();
        assert_eq!(out, "- 1\n- 2\n");
    }

    #[test]
    fn test_from_yaml() {
        let out = env()
            .render_str("{{ (s | from_yaml).b[1] }}", context! { s => "b: [2, 3]" })
            .unwrap();
        assert_eq!(out, "3");
    }

    #[test]
    fn test_to_json() {
        let out = env()
            .render_str("{{ v | to_json }}", context! { v => vec!["a"] })
            .unwrap();
        assert_eq!(out, r#"["a"]"#);
    }

    #[test]
    fn test_from_json() {
        let out = env()
            .render_str("{{ (s | from_json).k }}", context! { s => r#"{"k": "v"}"# })
            .unwrap();
        assert_eq!(out, "v");
    }

    #[test]
    fn test_from_yaml_error_is_render_error() {
        let result = env().render_str("{{ s | from_yaml }}", context! { s => "a: [1" });
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidOperation);
    }
}
