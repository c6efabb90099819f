//! Exit code constants for the jinja-cells CLI.
//!
//! - 0: Success
//! - 1: User error (bad arguments, bad command line, unreadable files)
//! - 2: Validation failure (argument combinations the handlers reject)
//! - 3: Template failure (syntax or runtime error from the engine)
//! - 4: YAML failure (the cell body is not valid YAML)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, malformed cell script, or I/O failure.
pub const USER_ERROR: i32 = 1;

/// Validation failure: extra tokens, `--lang` without `--code`, non-mapping options.
pub const VALIDATION_FAILURE: i32 = 2;

/// Template failure: compile or render error raised by the engine.
pub const TEMPLATE_FAILURE: i32 = 3;

/// YAML failure: the YAML body could not be parsed.
pub const YAML_FAILURE: i32 = 4;
