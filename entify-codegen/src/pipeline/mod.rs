//! Generation pipeline.
//!
//! A [`Pipeline`] runs a fixed sequence of [`Stage`]s over a shared
//! [`BuildContext`]:
//!
//! - `parse-spec` reads the schema spec for the configured dialect
//! - `build-models` turns tables into entities
//! - `create-directories` prepares the output tree
//! - `emit-shared` writes the client and predicate helpers
//! - `emit-entities` writes every per-entity file
//!
//! Each stage must succeed before the next one starts. The first failure is
//! returned wrapped as [`Error::Stage`](crate::Error::Stage); files written
//! by earlier stages stay on disk.
//!
//! # Example
//!
//! ```ignore
//! use entify_codegen::{BuildConfig, pipeline::Pipeline};
//!
//! let config = BuildConfig::new("mysql").module("github.com/acme/app/entity");
//! let report = Pipeline::new().run(Path::new("schema.toml"), &config)?;
//!
//! for file in &report.files {
//!     println!("{}", file.path.display());
//! }
//! ```

mod context;
mod runner;
mod stage;
pub mod stages;

pub use context::BuildContext;
pub use runner::{BuildReport, Pipeline};
pub use stage::{Stage, StageInfo};
