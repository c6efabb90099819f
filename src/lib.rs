//! Jinja2 template and YAML cell magics for notebook-style sessions.
//!
//! The crate provides four magics over a host-owned variable namespace:
//!
//! - `define-template NAME` stores a named template after a syntax check
//! - `render` renders a stored, on-disk or inline template with the user's
//!   variables and writes top-level assignments back
//! - `ingest-yaml [NAME]` parses a YAML body into a variable
//! - `inspect` exposes the handler itself
//!
//! Hosts implement [`namespace::Namespace`] and call
//! [`magics::MagicHandler::invoke`]. The bundled [`notebook::Kernel`] is
//! such a host: it executes percent-format cell scripts and keeps
//! notebook-style history variables.

pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod exit_codes;
pub mod magics;
pub mod namespace;
pub mod notebook;
pub mod templates;
pub mod transcript;

pub use error::{MagicError, Result};
pub use magics::{Magic, MagicHandler, Output};
pub use namespace::{Namespace, UserNamespace};
