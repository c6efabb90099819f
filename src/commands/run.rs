//! Implementation of the `jinja-cells run` command.

use super::{load_config, read_script};
use crate::cli::RunArgs;
use crate::error::{MagicError, Result};
use crate::magics::Output;
use crate::namespace::{Namespace, Value};
use crate::notebook::{Kernel, parse_script};
use crate::transcript::{EntryStatus, TranscriptEntry, append_entry};
use serde_json::json;
use tracing::{info, warn};

/// Execute the `jinja-cells run` command.
///
/// Cells run in order. Visible outputs go to stdout and diagnostics to
/// stderr. The first failing cell aborts the run with its error.
pub fn cmd_run(args: RunArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let script = read_script(&args.file)?;
    let cells = parse_script(&script)?;

    let mut kernel = Kernel::new(config)?;
    for assignment in &args.vars {
        let (name, value) = parse_var(assignment)?;
        kernel.namespace_mut().set(name, value);
    }

    info!(file = %args.file.display(), cells = cells.len(), "running script");

    for cell in &cells {
        let cell_number = kernel.execution_count() + 1;
        let mut transcript_error = None;

        let result = kernel.execute_with(cell, |call, outcome| {
            let Some(path) = &args.transcript else {
                return;
            };
            let entry = match outcome {
                Ok(Output::Diagnostic(msg)) => {
                    TranscriptEntry::new(call.magic, EntryStatus::Diagnostic, cell_number, call.line)
                        .with_details(json!({ "args": call.args, "message": msg }))
                }
                Ok(_) => TranscriptEntry::new(call.magic, EntryStatus::Ok, cell_number, call.line)
                    .with_details(json!({ "args": call.args })),
                Err(err) => TranscriptEntry::new(call.magic, EntryStatus::Error, cell_number, call.line)
                    .with_details(json!({ "args": call.args, "error": err.to_string() })),
            };
            if let Err(e) = append_entry(path, &entry) {
                transcript_error.get_or_insert(e);
            }
        });

        if let Some(e) = transcript_error {
            return Err(e);
        }

        let outputs = result.map_err(|err| {
            warn!(line = cell.line, error = %err, "cell failed");
            err
        })?;

        for output in &outputs {
            emit(output, args.json)?;
        }
    }

    Ok(())
}

/// Split `NAME=YAML` into a variable name and its parsed value.
fn parse_var(assignment: &str) -> Result<(&str, Value)> {
    let (name, raw) = assignment.split_once('=').ok_or_else(|| {
        MagicError::Usage(format!(
            "invalid --var '{}': expected NAME=YAML",
            assignment
        ))
    })?;

    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(MagicError::Usage(format!(
            "invalid --var '{}': variable name must be a single word",
            assignment
        )));
    }

    let mut value: Value = serde_yaml::from_str(raw)?;
    value.apply_merge()?;
    Ok((name, value))
}

fn emit(output: &Output, as_json: bool) -> Result<()> {
    if as_json {
        if let Some(line) = json_line(output)? {
            println!("{}", line);
        }
        if let Output::Diagnostic(msg) = output {
            eprintln!("{}", msg);
        }
        return Ok(());
    }

    match output {
        Output::None => {}
        Output::Display(rendered) => println!("{}", rendered),
        Output::Value(value) => print!("{}", yaml_text(value)?),
        Output::Text(text) => println!("{}", text),
        Output::Diagnostic(msg) => eprintln!("{}", msg),
    }
    Ok(())
}

fn yaml_text(value: &Value) -> Result<String> {
    serde_yaml::to_string(value).map_err(MagicError::from)
}

/// JSON rendition of an output: a MIME bundle for displays, the value for
/// values, plain text otherwise. Silent outputs produce no line.
fn json_line(output: &Output) -> Result<Option<String>> {
    let doc = match output {
        Output::None | Output::Diagnostic(_) => return Ok(None),
        Output::Display(rendered) => json!({
            "format": rendered.format,
            "language": rendered.language,
            "data": rendered.mime_bundle(),
        }),
        Output::Value(value) => json!({
            "data": {
                "application/json": value,
                "text/plain": yaml_text(value)?,
            },
        }),
        Output::Text(text) => json!({ "data": { "text/plain": text } }),
    };
    serde_json::to_string(&doc)
        .map(Some)
        .map_err(|e| MagicError::Io(format!("failed to serialize output to JSON: {}", e)))
}
