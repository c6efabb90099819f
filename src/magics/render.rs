//! `render`: render a named or inline template and display the result.

use super::{MagicHandler, Output};
use crate::config::types::ENGINE_OPTIONS_VARIABLE;
use crate::display::{OutputFormat, Rendered};
use crate::error::{MagicError, Result};
use crate::namespace::{Bindings, Mapping, Namespace, Value, render_variables};
use crate::templates::{EngineOptions, TemplateSource, render_template};
use clap::error::ErrorKind;
use clap::{Args, Parser};
use std::path::Path;
use tracing::{debug, info};

/// Arguments accepted on the `render` line.
#[derive(Parser, Debug)]
#[command(name = "render", about = "Render Jinja2", after_help = "Format defaults to --pretty")]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct RenderArgs {
    /// Render a pre-defined template instead of the cell body.
    #[arg(short, long)]
    pub template: Option<String>,

    /// Name of the variable holding the options mapping (default 'jinja_env').
    #[arg(short, long, value_name = "DICT_VARIABLE")]
    pub variables: Option<String>,

    #[command(flatten)]
    pub format: FormatFlags,

    /// Language hint for --code.
    #[arg(short, long)]
    pub lang: Option<String>,
}

/// Display format flags. At most one may be given.
#[derive(Args, Debug, Default)]
#[group(multiple = false)]
pub struct FormatFlags {
    /// Format as plain
    #[arg(long)]
    pub plain: bool,
    /// Format as HTML
    #[arg(long)]
    pub html: bool,
    /// Format as LaTeX
    #[arg(long)]
    pub latex: bool,
    /// Format as pretty
    #[arg(long)]
    pub pretty: bool,
    /// Format as Markdown
    #[arg(long)]
    pub markdown: bool,
    /// Format as SVG
    #[arg(long)]
    pub svg: bool,
    /// Format as Code
    #[arg(long)]
    pub code: bool,
}

impl FormatFlags {
    /// The format chosen on the command line, if any.
    pub fn selected(&self) -> Option<OutputFormat> {
        let flags = [
            (self.plain, OutputFormat::Plain),
            (self.html, OutputFormat::Html),
            (self.latex, OutputFormat::Latex),
            (self.pretty, OutputFormat::Pretty),
            (self.markdown, OutputFormat::Markdown),
            (self.svg, OutputFormat::Svg),
            (self.code, OutputFormat::Code),
        ];
        flags.iter().find(|(set, _)| *set).map(|(_, f)| *f)
    }
}

/// Outcome of parsing a `render` line.
enum Parsed {
    Args(RenderArgs),
    Help(String),
}

fn parse_args(line: &str) -> Result<Parsed> {
    let words = shell_words::split(line)
        .map_err(|e| MagicError::Usage(format!("failed to parse arguments '{}': {}", line, e)))?;

    match RenderArgs::try_parse_from(words) {
        Ok(args) => Ok(Parsed::Args(args)),
        Err(e) if e.kind() == ErrorKind::DisplayHelp => Ok(Parsed::Help(e.to_string())),
        Err(e) => Err(MagicError::Usage(e.to_string())),
    }
}

impl MagicHandler {
    /// Render a template and wrap the text for display.
    ///
    /// Variables visible to the template are recomputed on every call. Any
    /// top-level assignment the template makes is written back into the
    /// options mapping when it already holds that key, and into the
    /// namespace otherwise. Nothing is written unless rendering succeeded.
    ///
    /// # Errors
    ///
    /// * `MagicError::Usage` - unknown or conflicting flags
    /// * `MagicError::Validation` - `--lang` without `--code`, a body together
    ///   with `--template`, no template at all, or a non-mapping options variable
    /// * `MagicError::Template` - compile or render failure
    pub fn render(
        &mut self,
        ns: &mut dyn Namespace,
        line: &str,
        body: Option<&str>,
    ) -> Result<Output> {
        let args = match parse_args(line)? {
            Parsed::Args(args) => args,
            Parsed::Help(text) => return Ok(Output::Text(text)),
        };

        let format = args
            .format
            .selected()
            .unwrap_or(self.config.default_format);
        if args.lang.is_some() && format != OutputFormat::Code {
            return Err(MagicError::Validation(
                "Can't specify --lang without --code".to_string(),
            ));
        }

        let source = match (args.template.as_deref(), body) {
            (Some(_), Some(text)) if !text.trim().is_empty() => {
                return Err(MagicError::Validation(
                    "a cell body can't be combined with --template".to_string(),
                ));
            }
            (Some(name), _) => TemplateSource::Named(name),
            (None, Some(text)) => TemplateSource::Inline(text),
            (None, None) => {
                return Err(MagicError::Validation(
                    "nothing to render: pass --template or a cell body".to_string(),
                ));
            }
        };

        let variables_name = args
            .variables
            .as_deref()
            .unwrap_or(&self.config.options_variable);
        let options = resolve_options(ns, variables_name)?;
        let engine_options = EngineOptions::from_host(ns.get(ENGINE_OPTIONS_VARIABLE))?;

        let globals = render_variables(
            &*ns,
            &self.policy,
            options.as_ref().map(|m| m as &dyn Bindings),
        );
        debug!(count = globals.len(), "resolved render variables");

        let output = render_template(
            &self.templates,
            Path::new(&self.config.template_dir),
            &engine_options,
            globals,
            source,
        )?;

        for (name, value) in output.exports {
            write_back(ns, variables_name, options.as_ref(), &name, value);
        }

        info!(%format, chars = output.text.len(), "rendered template");

        let mut rendered = Rendered::new(format, output.text);
        if let Some(lang) = args.lang {
            rendered = rendered.with_language(lang);
        }
        Ok(Output::Display(rendered))
    }
}

/// Read the options mapping. Absent or null means no options.
fn resolve_options(ns: &dyn Namespace, name: &str) -> Result<Option<Mapping>> {
    match ns.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Mapping(m)) => Ok(Some(m.clone())),
        Some(_) => Err(MagicError::Validation(format!(
            "variable '{}' must be a mapping",
            name
        ))),
    }
}

/// Store one template assignment.
///
/// `options` is the options mapping as it was before rendering; keys it
/// already had are updated in place, everything else goes to the namespace.
fn write_back(
    ns: &mut dyn Namespace,
    variables_name: &str,
    options: Option<&Mapping>,
    name: &str,
    value: Value,
) {
    if options.is_some_and(|m| m.contains(name)) {
        if let Some(Value::Mapping(target)) = ns.get_mut(variables_name) {
            debug!(variable = name, target = variables_name, "writing back into options");
            target.assign(name, value);
            return;
        }
    }

    debug!(variable = name, "writing back into namespace");
    ns.set(name, value);
}
