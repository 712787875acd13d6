//! REST API module.
//!
//! Handlers return `Result<_, AppError>`; errors render as `{code, message}`.

mod projects;

pub use projects::*;

/// Largest accepted request body, in bytes.
pub const MAX_BODY_BYTES: usize = 1_000_000;
