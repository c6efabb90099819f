//! Percent-format cell scripts.
//!
//! A script is a text file split into cells by lines starting with `# %%`
//! (the percent format used by Jupytext and several editors). A cell whose
//! marker line contains `[markdown]` is documentation and is skipped.
//!
//! Inside a code cell either:
//! - the first non-blank line is a cell magic (`%%render --html`) and the
//!   rest of the cell is its body, or
//! - every non-blank, non-comment line is a line magic (`%render -t greet`).
//!
//! Text before the first marker forms an implicit first cell.

mod kernel;
mod parse;


pub use kernel::Kernel;
pub use parse::parse_script;

use crate::magics::Magic;

/// One cell of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// 1-based line of the cell's first content line.
    pub line: usize,
    /// The cell's raw content, without the marker line.
    pub source: String,
    pub kind: CellKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellKind {
    /// A cell magic with its body.
    CellMagic(Invocation),
    /// Zero or more line magics.
    LineMagics(Vec<Invocation>),
    /// Documentation; never executed.
    Markdown,
}

/// A single magic call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// 1-based line of the magic in the script.
    pub line: usize,
    pub magic: Magic,
    /// Everything after the magic name.
    pub args: String,
    /// The cell body, for cell magics only.
    pub body: Option<String>,
    /// 1-based line where the body starts, for cell magics only.
    pub body_line: Option<usize>,
}
