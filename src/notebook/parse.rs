//! Script parsing.

use super::{Cell, CellKind, Invocation};
use crate::error::{MagicError, Result};
use crate::magics::Magic;
use regex::Regex;
use std::sync::LazyLock;

static CELL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s*%%(.*)$").expect("Invalid cell marker regex"));

struct RawCell<'a> {
    marker: &'a str,
    first_line: usize,
    lines: Vec<&'a str>,
}

/// Split `text` into cells and parse the magics in each.
pub fn parse_script(text: &str) -> Result<Vec<Cell>> {
    let mut raw = vec![RawCell {
        marker: "",
        first_line: 1,
        lines: Vec::new(),
    }];

    for (idx, line) in text.lines().enumerate() {
        if let Some(caps) = CELL_MARKER.captures(line) {
            let marker = caps.get(1).map_or("", |m| m.as_str());
            raw.push(RawCell {
                marker,
                first_line: idx + 2,
                lines: Vec::new(),
            });
        } else if let Some(current) = raw.last_mut() {
            current.lines.push(line);
        }
    }

    let mut cells = Vec::new();
    for cell in raw {
        if cell.lines.iter().all(|l| l.trim().is_empty()) {
            continue;
        }
        cells.push(parse_cell(cell)?);
    }
    Ok(cells)
}

fn parse_cell(raw: RawCell<'_>) -> Result<Cell> {
    let source = trim_blank_edges(&raw.lines).join("\n");

    if raw.marker.contains("[markdown]") {
        return Ok(Cell {
            line: raw.first_line,
            source,
            kind: CellKind::Markdown,
        });
    }

    let start = raw
        .lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(0);
    let first = raw.lines[start];
    let first_line_no = raw.first_line + start;

    let kind = if let Some(rest) = first.trim_start().strip_prefix("%%") {
        let (magic, args) = split_magic(rest, first_line_no, "%%")?;
        let body_lines = &raw.lines[start + 1..];
        let body = trim_trailing_blank(body_lines).join("\n");
        CellKind::CellMagic(Invocation {
            line: first_line_no,
            magic,
            args,
            body: Some(body),
            body_line: Some(first_line_no + 1),
        })
    } else {
        let mut calls = Vec::new();
        for (offset, line) in raw.lines.iter().enumerate() {
            let line_no = raw.first_line + offset;
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if trimmed.starts_with("%%") {
                return Err(MagicError::Notebook(format!(
                    "line {}: a cell magic must be the first line of its cell",
                    line_no
                )));
            }
            let Some(rest) = trimmed.strip_prefix('%') else {
                return Err(MagicError::Notebook(format!(
                    "line {}: only magics can be executed, found '{}'",
                    line_no,
                    line.trim()
                )));
            };
            let (magic, args) = split_magic(rest, line_no, "%")?;
            calls.push(Invocation {
                line: line_no,
                magic,
                args,
                body: None,
                body_line: None,
            });
        }
        CellKind::LineMagics(calls)
    };

    Ok(Cell {
        line: raw.first_line,
        source,
        kind,
    })
}

fn split_magic(text: &str, line_no: usize, sigil: &str) -> Result<(Magic, String)> {
    let text = text.trim();
    let (name, args) = match text.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (text, ""),
    };

    let magic = Magic::from_name(name).ok_or_else(|| {
        MagicError::Notebook(format!(
            "line {}: unknown magic '{}{}'",
            line_no, sigil, name
        ))
    })?;

    if sigil == "%%" && !magic.cell_form() {
        return Err(MagicError::Notebook(format!(
            "line {}: '{}' is a line magic; use '%{}'",
            line_no, name, name
        )));
    }
    if sigil == "%" && !magic.line_form() {
        return Err(MagicError::Notebook(format!(
            "line {}: '{}' needs a body; use '%%{}'",
            line_no, name, name
        )));
    }

    Ok((magic, args.to_string()))
}

fn trim_trailing_blank<'a>(lines: &'a [&'a str]) -> &'a [&'a str] {
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(0, |i| i + 1);
    &lines[..end]
}

fn trim_blank_edges<'a>(lines: &'a [&'a str]) -> &'a [&'a str] {
    let lines = trim_trailing_blank(lines);
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    &lines[start..]
}
