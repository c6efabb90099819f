//! Session configuration for the cell magics.
//!
//! `MagicConfig` controls which host variable carries template options,
//! where named templates are looked up on disk, the default display format,
//! and which host names are visible to templates. It is usually loaded from
//! a YAML file; unknown fields are ignored and every field has a default.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::MagicConfig;
pub use types::VariablesConfig;
