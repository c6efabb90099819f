//! Display wrappers for rendered template text.
//!
//! A render result is plain text plus the format the user asked for. The
//! host decides how to show it; `mime_bundle` gives a notebook-style
//! mapping of MIME type to payload, and `Display` prints the text itself.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Output wrapper selected by the `render` format flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Hand the text to the host's generic display.
    Plain,
    /// HTML markup.
    Html,
    /// LaTeX markup.
    Latex,
    /// Preformatted text (default).
    #[default]
    Pretty,
    /// Markdown markup.
    Markdown,
    /// SVG image source.
    Svg,
    /// Source code, optionally with a language hint.
    Code,
}

impl OutputFormat {
    /// All formats, in the order their flags are listed in help output.
    pub const ALL: [OutputFormat; 7] = [
        OutputFormat::Plain,
        OutputFormat::Html,
        OutputFormat::Latex,
        OutputFormat::Pretty,
        OutputFormat::Markdown,
        OutputFormat::Svg,
        OutputFormat::Code,
    ];

    /// The flag name, without leading dashes.
    pub fn flag(self) -> &'static str {
        match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Html => "html",
            OutputFormat::Latex => "latex",
            OutputFormat::Pretty => "pretty",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Svg => "svg",
            OutputFormat::Code => "code",
        }
    }

    /// Human-readable name used in help text.
    pub fn human_name(self) -> &'static str {
        match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Html => "HTML",
            OutputFormat::Latex => "LaTeX",
            OutputFormat::Pretty => "pretty",
            OutputFormat::Markdown => "Markdown",
            OutputFormat::Svg => "SVG",
            OutputFormat::Code => "Code",
        }
    }

    /// The MIME type a notebook frontend would use for this format.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Plain | OutputFormat::Pretty | OutputFormat::Code => "text/plain",
            OutputFormat::Html => "text/html",
            OutputFormat::Latex => "text/latex",
            OutputFormat::Markdown => "text/markdown",
            OutputFormat::Svg => "image/svg+xml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.flag())
    }
}

/// Rendered template text wrapped for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub format: OutputFormat,
    pub text: String,
    /// Language hint, only ever set for [`OutputFormat::Code`].
    pub language: Option<String>,
}

impl Rendered {
    pub fn new(format: OutputFormat, text: impl Into<String>) -> Self {
        Self {
            format,
            text: text.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Notebook-style MIME bundle for this output.
    ///
    /// Every bundle carries `text/plain`. Code output also carries a fenced
    /// Markdown rendition so frontends can highlight it.
    pub fn mime_bundle(&self) -> BTreeMap<&'static str, String> {
        let mut bundle = BTreeMap::new();
        bundle.insert("text/plain", self.text.clone());

        match self.format {
            OutputFormat::Code => {
                let lang = self.language.as_deref().unwrap_or("");
                let fenced = if self.text.ends_with('\n') {
                    format!("```{}\n{}```", lang, self.text)
                } else {
                    format!("```{}\n{}\n```", lang, self.text)
                };
                bundle.insert("text/markdown", fenced);
            }
            other => {
                let mime = other.mime_type();
                if mime != "text/plain" {
                    bundle.insert(mime, self.text.clone());
                }
            }
        }

        bundle
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
