//! Implementation of the `jinja-cells check` command.

use super::{load_config, read_script};
use crate::cli::CheckArgs;
use crate::error::{MagicError, Result};
use crate::magics::Magic;
use crate::namespace::Value;
use crate::notebook::{Cell, CellKind, Invocation, parse_script};
use crate::templates::{EngineOptions, check_syntax};
use tracing::info;

/// A problem found in a script body.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Finding {
    /// Script line the problem points at.
    line: usize,
    message: String,
}

/// Execute the `jinja-cells check` command.
///
/// Template bodies are compiled with default engine options and YAML bodies
/// are parsed. Every problem is printed before the command fails.
pub fn cmd_check(args: CheckArgs) -> Result<()> {
    // The config is validated even though checking does not use it.
    load_config(args.config.as_deref())?;

    let script = read_script(&args.file)?;
    let cells = parse_script(&script)?;
    let findings = check_cells(&cells)?;

    if findings.is_empty() {
        info!(file = %args.file.display(), cells = cells.len(), "script is valid");
        println!("{}: ok ({} cells)", args.file.display(), cells.len());
        return Ok(());
    }

    for finding in &findings {
        eprintln!(
            "{}:{}: {}",
            args.file.display(),
            finding.line,
            finding.message
        );
    }

    Err(MagicError::Validation(format!(
        "{} problem(s) found in '{}'",
        findings.len(),
        args.file.display()
    )))
}

fn check_cells(cells: &[Cell]) -> Result<Vec<Finding>> {
    let options = EngineOptions::default();
    let mut findings = Vec::new();

    for cell in cells {
        let CellKind::CellMagic(call) = &cell.kind else {
            continue;
        };
        if let Some(finding) = check_body(call, &options)? {
            findings.push(finding);
        }
    }

    Ok(findings)
}

fn check_body(call: &Invocation, options: &EngineOptions) -> Result<Option<Finding>> {
    let Some(body) = call.body.as_deref() else {
        return Ok(None);
    };
    if body.trim().is_empty() {
        return Ok(None);
    }
    let body_line = call.body_line.unwrap_or(call.line + 1);

    match call.magic {
        Magic::DefineTemplate | Magic::Render => {
            let Some(issue) = check_syntax(body, options)? else {
                return Ok(None);
            };
            let line = issue
                .line
                .map(|l| body_line + l.saturating_sub(1))
                .unwrap_or(call.line);
            Ok(Some(Finding {
                line,
                message: format!("%%{}: {}", call.magic, issue),
            }))
        }
        Magic::IngestYaml => match serde_yaml::from_str::<Value>(body)
            .and_then(|mut value| value.apply_merge())
        {
            Ok(()) => Ok(None),
            Err(e) => {
                let line = e
                    .location()
                    .map(|loc| body_line + loc.line().saturating_sub(1))
                    .unwrap_or(call.line);
                Ok(Some(Finding {
                    line,
                    message: format!("%%{}: YAML error: {}", call.magic, e),
                }))
            }
        },
        Magic::Inspect => Ok(None),
    }
}
