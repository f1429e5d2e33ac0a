//! Core utilities shared by the entify crates.
//!
//! This crate provides string case helpers and file system helpers used
//! across the generation pipeline.

mod file;
mod utils;

// File operations
pub use file::{ensure_dir, write_file};
// String utilities
pub use utils::{capitalize, lowercase_first, segments, to_pascal_case};
