//! CLI argument parsing for jinja-cells.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// jinja-cells: run Jinja2 template and YAML cell magics outside a notebook.
///
/// Scripts use the percent format: cells start at lines beginning with
/// `# %%`, and each code cell holds either one cell magic (`%%render`) with
/// a body or a list of line magics (`%render -t NAME`).
#[derive(Parser, Debug)]
#[command(name = "jinja-cells")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a cell script.
    ///
    /// Cells run in order against one namespace; execution stops at the
    /// first failing cell.
    Run(RunArgs),

    /// Check a cell script without executing it.
    ///
    /// Parses every cell and compiles template and YAML bodies, reporting
    /// every problem found.
    Check(CheckArgs),
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the cell script.
    pub file: PathBuf,

    /// Session configuration file (YAML).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Preset a variable before the first cell (value parsed as YAML).
    #[arg(long = "var", value_name = "NAME=YAML")]
    pub vars: Vec<String>,

    /// Append an NDJSON record of every executed magic to this file.
    #[arg(long)]
    pub transcript: Option<PathBuf>,

    /// Print outputs as JSON MIME bundles, one per line.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to the cell script.
    pub file: PathBuf,

    /// Session configuration file (YAML).
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
