//! Build context passed through pipeline stages.

use std::path::PathBuf;

use entify_ir::Data;
use entify_schema::{Schema, SchemaProvider};

use crate::{BuildConfig, FileEmitter, NameTransformer};

/// Context passed through all pipeline stages.
///
/// Carries the inputs of a run and accumulates each stage's results.
pub struct BuildContext<'a> {
    /// Path of the schema spec being generated from.
    pub spec: PathBuf,
    pub config: &'a BuildConfig,
    pub provider: &'a dyn SchemaProvider,
    pub names: NameTransformer<'a>,
    /// The parsed spec (populated by `parse-spec`).
    pub schema: Option<Schema>,
    /// The entity models (populated by `build-models`).
    pub data: Option<Data>,
    pub emitter: FileEmitter<'a>,
}

impl<'a> BuildContext<'a> {
    /// The parsed schema, if `parse-spec` has run.
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    /// The entity models, if `build-models` has run.
    pub fn data(&self) -> Option<&Data> {
        self.data.as_ref()
    }
}
