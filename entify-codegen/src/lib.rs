//! Entity model building and Go code emission for the entify generator.
//!
//! Turns a parsed schema into one data-access model per table and renders
//! those models through a fixed set of Go templates.
//!
//! # Module Organization
//!
//! - [`pipeline`] - Stage runner driving a whole generation (Pipeline, Stage, BuildContext)
//! - [`paths`] - Output layout and template name constants
//! - Naming: identifier derivation for Go (NameTransformer, NamingRules)
//! - Type mapping: SQL types to Go types (TypeMapper, GoTypeMapper)
//! - Emission: templates, formatting and file output (TemplateRegistry, FileEmitter)

mod config;
mod emitter;
mod error;
mod format;
mod imports;
mod model;
mod naming;
pub mod paths;
pub mod pipeline;
mod templates;
mod type_mapper;

pub use config::{BuildConfig, FormatterKind};
pub use emitter::{EmittedFile, FileEmitter, Placeholders, resolve};
pub use error::{Error, ErrorKind, Result};
pub use format::{FormatError, GoFormatter, Gofmt, SourceFormatter};
pub use imports::ImportCollector;
pub use model::EntityModelBuilder;
pub use naming::{EnglishInflector, GO_NAMING, NameTransformer, NamingRules, Singularize};
pub use templates::{EmbeddedTemplates, TemplateRegistry, TemplateSource};
pub use type_mapper::{
    ColumnType, GO_INTEGERS, GoTypeMapper, IntegerRow, IntegerTable, TypeMapper,
};
