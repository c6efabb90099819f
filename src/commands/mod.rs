//! Command implementations for jinja-cells.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the loading steps both commands share.

mod check;
mod run;

use crate::cli::Command;
use crate::config::MagicConfig;
use crate::error::{MagicError, Result};
use std::path::Path;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => run::cmd_run(args),
        Command::Check(args) => check::cmd_check(args),
    }
}

/// Load the session config, falling back to defaults when no file is given.
fn load_config(path: Option<&Path>) -> Result<MagicConfig> {
    match path {
        Some(path) => MagicConfig::load(path),
        None => Ok(MagicConfig::default()),
    }
}

fn read_script(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        MagicError::Io(format!(
            "failed to read script '{}': {}",
            path.display(),
            e
        ))
    })
}
