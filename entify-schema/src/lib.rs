//! Schema spec parsing for the entify entity generator.
//!
//! A spec is a TOML document listing tables and their columns. Column types
//! are written in the vocabulary of a SQL dialect and resolved here into a
//! dialect-neutral [`SqlType`].
//!
//! ```ignore
//! use entify_schema::{Loader, SchemaProvider};
//!
//! let schema = Loader::new().parse_file("mysql", Path::new("schema.toml"))?;
//! for table in &schema.tables {
//!     println!("{} ({} columns)", table.name, table.columns.len());
//! }
//! ```

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod dialect;
mod error;
mod loader;
mod schema;

pub use dialect::Dialect;
pub use error::{Error, Result, SourceContext};
pub use loader::{DEFAULT_FILENAME, Loader, SchemaProvider};
pub use schema::{Column, IntegerKind, Schema, SqlType, Table};
