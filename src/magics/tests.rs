//! Behavioral tests for the template command handler.

use super::*;
use crate::display::OutputFormat;
use crate::error::MagicError;
use crate::namespace::{Bindings, UserNamespace};
use tempfile::TempDir;

fn s(v: &str) -> Value {
    Value::String(v.to_string())
}

fn yaml(text: &str) -> Value {
    serde_yaml::from_str(text).unwrap()
}

fn session() -> (MagicHandler, UserNamespace) {
    let mut ns = UserNamespace::new();
    let handler = MagicHandler::register(MagicConfig::default(), &mut ns).unwrap();
    (handler, ns)
}

fn rendered_text(output: Output) -> String {
    match output {
        Output::Display(r) => r.text,
        other => panic!("expected display output, got {:?}", other),
    }
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_register_initializes_option_variables() {
    let (_handler, ns) = session();
    assert_eq!(ns.get("jinja_env"), Some(&Value::Mapping(Mapping::new())));
    assert_eq!(ns.get("jinja_options"), Some(&Value::Mapping(Mapping::new())));
}

#[test]
fn test_magic_names_and_aliases() {
    assert_eq!(Magic::from_name("define-template"), Some(Magic::DefineTemplate));
    assert_eq!(Magic::from_name("jinja_template"), Some(Magic::DefineTemplate));
    assert_eq!(Magic::from_name("jinja"), Some(Magic::Render));
    assert_eq!(Magic::from_name("yaml"), Some(Magic::IngestYaml));
    assert_eq!(Magic::from_name("jinja_inner"), Some(Magic::Inspect));
    assert_eq!(Magic::from_name("python"), None);
}

// ============================================================================
// define-template
// ============================================================================

#[test]
fn test_define_then_render_by_name() {
    let (mut handler, mut ns) = session();
    ns.set("name", s("World"));

    let outcome = handler
        .define_template(&ns, "greet", "Hello {{ name }}!")
        .unwrap();
    assert_eq!(outcome, DefineOutcome::Stored { replaced: false });

    let out = handler.render(&mut ns, "--template greet", None).unwrap();
    assert_eq!(rendered_text(out), "Hello World!");
}

#[test]
fn test_named_and_inline_render_agree() {
    let (mut handler, mut ns) = session();
    ns.set("items", yaml("[1, 2, 3]"));
    let body = "{% for i in items %}<{{ i }}>{% endfor %}";

    handler.define_template(&ns, "list", body).unwrap();
    let named = rendered_text(handler.render(&mut ns, "-t list", None).unwrap());
    let inline = rendered_text(handler.render(&mut ns, "", Some(body)).unwrap());

    assert_eq!(named, inline);
    assert_eq!(named, "<1><2><3>");
}

#[test]
fn test_define_invalid_body_leaves_table_unchanged() {
    let (mut handler, ns) = session();
    handler.define_template(&ns, "t", "good {{ x }}").unwrap();

    let outcome = handler.define_template(&ns, "t", "{% if %}").unwrap();
    match outcome {
        DefineOutcome::Rejected(issue) => assert_eq!(issue.line, Some(1)),
        other => panic!("expected rejection, got {:?}", other),
    }
    assert_eq!(handler.templates().get("t"), Some("good {{ x }}"));
    assert_eq!(handler.templates().len(), 1);
}

#[test]
fn test_define_invalid_body_new_name_not_stored() {
    let (mut handler, ns) = session();
    handler.define_template(&ns, "bad", "{{ unclosed").unwrap();
    assert!(!handler.templates().contains("bad"));
}

#[test]
fn test_define_replaces_existing() {
    let (mut handler, ns) = session();
    handler.define_template(&ns, "t", "one").unwrap();
    let outcome = handler.define_template(&ns, "t", "two").unwrap();
    assert_eq!(outcome, DefineOutcome::Stored { replaced: true });
    assert_eq!(handler.templates().get("t"), Some("two"));
}

#[test]
fn test_define_requires_single_name() {
    let (mut handler, ns) = session();
    assert!(matches!(
        handler.define_template(&ns, "", "x"),
        Err(MagicError::Name(_))
    ));
    assert!(matches!(
        handler.define_template(&ns, "a b", "x"),
        Err(MagicError::Name(_))
    ));
    assert!(handler.templates().is_empty());
}

#[test]
fn test_define_uses_custom_delimiters() {
    let (mut handler, mut ns) = session();
    ns.set(
        "jinja_options",
        yaml("block_start_string: '<%'\nblock_end_string: '%>'"),
    );

    let outcome = handler
        .define_template(&ns, "t", "<% if x %>yes<% endif %>")
        .unwrap();
    assert_eq!(outcome, DefineOutcome::Stored { replaced: false });

    ns.set("x", Value::Bool(true));
    let out = handler.render(&mut ns, "--template t", None).unwrap();
    assert_eq!(rendered_text(out), "yes");
}

#[test]
fn test_invoke_reports_definition_error_as_diagnostic() {
    let (mut handler, mut ns) = session();
    let out = handler
        .invoke(&mut ns, Magic::DefineTemplate, "t", Some("{% for %}"))
        .unwrap();
    match out {
        Output::Diagnostic(msg) => assert!(msg.starts_with("Syntax error at line 1")),
        other => panic!("expected diagnostic, got {:?}", other),
    }
}

// ============================================================================
// render
// ============================================================================

#[test]
fn test_render_default_format_is_pretty() {
    let (mut handler, mut ns) = session();
    match handler.render(&mut ns, "", Some("x")).unwrap() {
        Output::Display(r) => {
            assert_eq!(r.format, OutputFormat::Pretty);
            assert_eq!(r.language, None);
        }
        other => panic!("unexpected output {:?}", other),
    }
}

#[test]
fn test_render_code_with_language() {
    let (mut handler, mut ns) = session();
    match handler
        .render(&mut ns, "--code --lang python", Some("print(1)"))
        .unwrap()
    {
        Output::Display(r) => {
            assert_eq!(r.format, OutputFormat::Code);
            assert_eq!(r.language.as_deref(), Some("python"));
        }
        other => panic!("unexpected output {:?}", other),
    }
}

#[test]
fn test_lang_without_code_is_validation_error() {
    let (mut handler, mut ns) = session();
    let err = handler
        .render(&mut ns, "--lang en", Some("{% set x = 1 %}"))
        .unwrap_err();
    assert!(matches!(err, MagicError::Validation(_)));
    // Nothing was rendered, so nothing was written back.
    assert!(ns.get("x").is_none());
}

#[test]
fn test_lang_with_other_format_is_validation_error() {
    let (mut handler, mut ns) = session();
    let err = handler
        .render(&mut ns, "--html -l en", Some("x"))
        .unwrap_err();
    assert!(matches!(err, MagicError::Validation(_)));
}

#[test]
fn test_template_with_body_is_validation_error() {
    let (mut handler, mut ns) = session();
    handler.define_template(&ns, "t", "x").unwrap();
    let err = handler
        .render(&mut ns, "--template t", Some("inline text"))
        .unwrap_err();
    assert!(matches!(err, MagicError::Validation(_)));

    // A blank body is fine.
    assert!(handler.render(&mut ns, "--template t", Some("\n  \n")).is_ok());
}

#[test]
fn test_nothing_to_render_is_validation_error() {
    let (mut handler, mut ns) = session();
    let err = handler.render(&mut ns, "--html", None).unwrap_err();
    assert!(matches!(err, MagicError::Validation(_)));
}

#[test]
fn test_options_override_host_variables() {
    let (mut handler, mut ns) = session();
    ns.set("name", s("host"));
    ns.set("jinja_env", yaml("name: options"));

    let out = handler.render(&mut ns, "", Some("{{ name }}")).unwrap();
    assert_eq!(rendered_text(out), "options");
}

#[test]
fn test_custom_variables_name() {
    let (mut handler, mut ns) = session();
    ns.set("params", yaml("who: custom"));

    let out = handler
        .render(&mut ns, "--variables params", Some("{{ who }}"))
        .unwrap();
    assert_eq!(rendered_text(out), "custom");
}

#[test]
fn test_absent_options_variable_is_empty() {
    let (mut handler, mut ns) = session();
    ns.set("who", s("host"));

    let out = handler
        .render(&mut ns, "--variables missing", Some("{{ who }}"))
        .unwrap();
    assert_eq!(rendered_text(out), "host");
}

#[test]
fn test_non_mapping_options_variable_is_validation_error() {
    let (mut handler, mut ns) = session();
    ns.set("jinja_env", yaml("[1, 2]"));
    let err = handler.render(&mut ns, "", Some("x")).unwrap_err();
    assert!(matches!(err, MagicError::Validation(_)));
}

#[test]
fn test_internal_variables_are_not_visible() {
    let (mut handler, mut ns) = session();
    ns.set("_secret", s("hidden"));
    ns.set("_5", s("history"));

    let out = handler
        .render(&mut ns, "", Some("[{{ _secret }}][{{ _5 }}]"))
        .unwrap();
    assert_eq!(rendered_text(out), "[][history]");
}

#[test]
fn test_write_back_into_options_when_key_exists() {
    let (mut handler, mut ns) = session();
    ns.set("jinja_env", yaml("x: 1\ny: keep"));
    ns.set("other", s("untouched"));

    handler
        .render(&mut ns, "", Some("{% set x = x + 41 %}"))
        .unwrap();

    assert_eq!(ns.get("jinja_env"), Some(&yaml("x: 42\ny: keep")));
    assert!(ns.get("x").is_none());
    assert_eq!(ns.get("other"), Some(&s("untouched")));
}

#[test]
fn test_write_back_into_namespace_when_key_missing() {
    let (mut handler, mut ns) = session();

    handler
        .render(&mut ns, "", Some("{% set total = 3 * 4 %}"))
        .unwrap();

    assert_eq!(ns.get("total"), Some(&Value::from(12)));
    assert_eq!(ns.get("jinja_env"), Some(&Value::Mapping(Mapping::new())));
}

#[test]
fn test_write_back_when_options_absent() {
    let (mut handler, mut ns) = session();
    handler
        .render(&mut ns, "-v nowhere", Some("{% set z = 'v' %}"))
        .unwrap();
    assert_eq!(ns.get("z"), Some(&s("v")));
    assert!(ns.get("nowhere").is_none());
}

#[test]
fn test_write_back_updates_falsy_option_values() {
    let (mut handler, mut ns) = session();
    ns.set("jinja_env", yaml("flag: false"));

    handler
        .render(&mut ns, "", Some("{% set flag = true %}"))
        .unwrap();

    assert_eq!(ns.get("jinja_env"), Some(&yaml("flag: true")));
    assert!(ns.get("flag").is_none());
}

#[test]
fn test_macro_definition_does_not_overwrite_variable() {
    let (mut handler, mut ns) = session();
    ns.set("m", s("keep"));

    let out = handler
        .render(&mut ns, "", Some("{% macro m(x) %}<{{ x }}>{% endmacro %}{{ m(1) }}"))
        .unwrap();

    assert_eq!(rendered_text(out), "<1>");
    assert_eq!(ns.get("m"), Some(&s("keep")));
}

#[test]
fn test_imported_module_is_not_written_back() {
    let (mut handler, mut ns) = session();
    handler
        .define_template(&ns, "helpers", "{% macro greet(n) %}hi {{ n }}{% endmacro %}")
        .unwrap();

    let out = handler
        .render(
            &mut ns,
            "",
            Some("{% import 'helpers' as h %}{% set who = 'Bo' %}{{ h.greet(who) }}"),
        )
        .unwrap();

    assert_eq!(rendered_text(out), "hi Bo");
    assert!(ns.get("h").is_none());
    assert_eq!(ns.get("who"), Some(&s("Bo")));
}

#[test]
fn test_template_dict_is_written_back() {
    let (mut handler, mut ns) = session();
    handler
        .render(&mut ns, "", Some("{% set d = {'a': [1, 2]} %}"))
        .unwrap();
    assert_eq!(ns.get("d"), Some(&yaml("a: [1, 2]")));
}

#[test]
fn test_render_error_writes_nothing_back() {
    let (mut handler, mut ns) = session();
    let err = handler
        .render(&mut ns, "", Some("{% set x = 1 %}{{ undefined_fn() }}"))
        .unwrap_err();
    assert!(matches!(err, MagicError::Template(_)));
    assert!(ns.get("x").is_none());
}

#[test]
fn test_render_syntax_error_propagates() {
    let (mut handler, mut ns) = session();
    let err = handler.render(&mut ns, "", Some("{% if %}")).unwrap_err();
    assert!(matches!(err, MagicError::Template(_)));
}

#[test]
fn test_render_from_template_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("report.md"), "# {{ title }}").unwrap();

    let config = MagicConfig {
        template_dir: dir.path().to_string_lossy().to_string(),
        ..MagicConfig::default()
    };
    let mut ns = UserNamespace::new();
    let mut handler = MagicHandler::register(config, &mut ns).unwrap();
    ns.set("title", s("Weekly"));

    let out = handler
        .render(&mut ns, "--markdown --template report.md", None)
        .unwrap();
    assert_eq!(rendered_text(out), "# Weekly");
}

#[test]
fn test_render_help() {
    let (mut handler, mut ns) = session();
    match handler.render(&mut ns, "-h", None).unwrap() {
        Output::Text(text) => assert!(text.contains("--variables")),
        other => panic!("expected help text, got {:?}", other),
    }
}

#[test]
fn test_engine_options_apply_to_render() {
    let (mut handler, mut ns) = session();
    ns.set("jinja_options", yaml("trim_blocks: true"));

    let out = handler
        .render(&mut ns, "", Some("{% if true %}\nyes\n{% endif %}\n"))
        .unwrap();
    assert_eq!(rendered_text(out), "yes\n");
}

#[test]
fn test_filters_available_in_render() {
    let (mut handler, mut ns) = session();
    ns.set("cfg", yaml("a: 1"));

    let out = handler
        .render(&mut ns, "", Some("{{ cfg | to_json }}"))
        .unwrap();
    assert_eq!(rendered_text(out), r#"{"a":1}"#);
}

#[test]
fn test_default_format_from_config() {
    let config = MagicConfig {
        default_format: OutputFormat::Html,
        ..MagicConfig::default()
    };
    let mut ns = UserNamespace::new();
    let mut handler = MagicHandler::register(config, &mut ns).unwrap();

    match handler.render(&mut ns, "", Some("<p/>")).unwrap() {
        Output::Display(r) => assert_eq!(r.format, OutputFormat::Html),
        other => panic!("unexpected output {:?}", other),
    }
}

// ============================================================================
// ingest-yaml
// ============================================================================

#[test]
fn test_ingest_named() {
    let (mut handler, mut ns) = session();
    let body = "a: 1\nb: [2, 3]";

    let out = handler.ingest_yaml(&mut ns, "cfg", body).unwrap();

    assert_eq!(out, None);
    assert_eq!(ns.get("cfg"), Some(&yaml(body)));
    match ns.get("cfg") {
        Some(Value::Mapping(m)) => {
            assert_eq!(m.lookup("b"), Some(&yaml("[2, 3]")));
        }
        other => panic!("expected mapping, got {:?}", other),
    }
}

#[test]
fn test_ingest_named_with_trailing_equals() {
    let (mut handler, mut ns) = session();
    handler.ingest_yaml(&mut ns, "cfg=", "x: 1").unwrap();
    assert_eq!(ns.get("cfg"), Some(&yaml("x: 1")));
}

#[test]
fn test_ingest_unnamed_sets_options_and_returns_value() {
    let (mut handler, mut ns) = session();
    let out = handler.ingest_yaml(&mut ns, "", "name: yaml").unwrap();

    assert_eq!(out, Some(yaml("name: yaml")));
    assert_eq!(ns.get("jinja_env"), Some(&yaml("name: yaml")));
}

#[test]
fn test_ingest_then_render_uses_options() {
    let (mut handler, mut ns) = session();
    handler.ingest_yaml(&mut ns, "", "name: from yaml").unwrap();

    let out = handler.render(&mut ns, "", Some("{{ name }}")).unwrap();
    assert_eq!(rendered_text(out), "from yaml");
}

#[test]
fn test_ingest_too_many_names() {
    let (mut handler, mut ns) = session();
    let err = handler.ingest_yaml(&mut ns, "a b", "x: 1").unwrap_err();
    assert!(matches!(err, MagicError::Validation(_)));
    assert!(ns.get("a").is_none());
}

#[test]
fn test_ingest_invalid_yaml() {
    let (mut handler, mut ns) = session();
    let err = handler.ingest_yaml(&mut ns, "cfg", "a: [1, 2").unwrap_err();
    assert!(matches!(err, MagicError::Yaml(_)));
    assert!(ns.get("cfg").is_none());
}

#[test]
fn test_ingest_resolves_merge_keys() {
    let (mut handler, mut ns) = session();
    let body = "base: &b {x: 1}\nderived:\n  <<: *b\n  y: 2";

    handler.ingest_yaml(&mut ns, "cfg", body).unwrap();

    match ns.get("cfg") {
        Some(Value::Mapping(m)) => {
            assert_eq!(m.lookup("derived"), Some(&yaml("{x: 1, y: 2}")));
        }
        other => panic!("expected mapping, got {:?}", other),
    }
}

#[test]
fn test_ingest_keeps_custom_tags() {
    let (mut handler, mut ns) = session();
    handler.ingest_yaml(&mut ns, "p", "!point {x: 1}").unwrap();
    assert!(matches!(ns.get("p"), Some(Value::Tagged(_))));
}

#[test]
fn test_invoke_ingest_returns_value_output() {
    let (mut handler, mut ns) = session();
    let out = handler
        .invoke(&mut ns, Magic::IngestYaml, "", Some("[1]"))
        .unwrap();
    assert_eq!(out, Output::Value(yaml("[1]")));

    let out = handler
        .invoke(&mut ns, Magic::IngestYaml, "named", Some("[1]"))
        .unwrap();
    assert_eq!(out, Output::None);
}

// ============================================================================
// inspect
// ============================================================================

#[test]
fn test_inspect_describes_handler() {
    let (mut handler, mut ns) = session();
    handler.define_template(&ns, "greet", "hi").unwrap();

    assert!(std::ptr::eq(handler.inner(), &handler));
    match handler.invoke(&mut ns, Magic::Inspect, "", None).unwrap() {
        Output::Text(text) => {
            assert!(text.contains("MagicHandler"));
            assert!(text.contains("greet"));
        }
        other => panic!("expected text, got {:?}", other),
    }
}
