//! Data models for the project showcase.
//!
//! Field names serialize in camelCase to match what the web front end reads.

mod lenient;
mod project;
mod record;
mod submission;

pub use project::*;
pub use record::*;
pub use submission::*;
