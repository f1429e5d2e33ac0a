//! Intermediate representation for the entify entity generator.
//!
//! These types are the build unit handed to the templates. They are built
//! once per run from the parsed schema and are read-only afterwards.
//!
//! # Architecture
//!
//! ```text
//! schema.toml → entify-schema (parsing) → entify-ir (entities) → templates
//! ```
//!
//! Everything here serializes with `serde` so templates can bind to it.

mod entity;
mod types;

pub use entity::{Data, Entity, EntityContext, Field};
pub use types::FieldTypeKind;
