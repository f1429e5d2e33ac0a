//! Pipeline orchestrator.

use std::path::{Path, PathBuf};

use entify_ir::Entity;
use entify_schema::{Loader, SchemaProvider};
use tracing::info;

use super::{
    BuildContext, Stage, StageInfo,
    stages::{
        BuildModelsStage, CreateDirectoriesStage, EmitEntitiesStage, EmitSharedStage,
        ParseSpecStage,
    },
};
use crate::{
    BuildConfig, EmittedFile, EnglishInflector, Error, FileEmitter, GO_NAMING, NameTransformer,
    Result, TemplateRegistry,
};

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Entities built, in schema order.
    pub entities: Vec<Entity>,
    /// Files emitted, in emission order.
    pub files: Vec<EmittedFile>,
}

/// The generation pipeline orchestrator.
///
/// Runs its stages strictly in order; the first failing stage aborts the
/// run and nothing already written is rolled back.
///
/// # Example
///
/// ```ignore
/// let report = Pipeline::new().run(Path::new("schema.toml"), &config)?;
/// ```
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Create a pipeline running the full generation.
    pub fn new() -> Self {
        Self::models()
            .stage(CreateDirectoriesStage)
            .stage(EmitSharedStage)
            .stage(EmitEntitiesStage)
    }

    /// Create a pipeline that stops once entity models are built.
    pub fn models() -> Self {
        Self::empty()
            .stage(ParseSpecStage)
            .stage(BuildModelsStage::default())
    }

    /// Create a pipeline with no stages.
    pub fn empty() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage.
    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Describe the stages in execution order.
    pub fn stages(&self) -> Vec<StageInfo> {
        self.stages.iter().map(|stage| stage.info()).collect()
    }

    /// Run on `spec` with the TOML loader and the embedded templates.
    pub fn run(&self, spec: &Path, config: &BuildConfig) -> Result<BuildReport> {
        let templates = TemplateRegistry::embedded()?;
        self.run_with(spec, config, &Loader::new(), &templates)
    }

    /// Run on `spec` with an explicit schema provider and template registry.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure wrapped as [`Error::Stage`].
    pub fn run_with(
        &self,
        spec: &Path,
        config: &BuildConfig,
        provider: &dyn SchemaProvider,
        templates: &TemplateRegistry,
    ) -> Result<BuildReport> {
        let formatter = config.formatter.formatter();
        let inflector = EnglishInflector;
        let emitter = FileEmitter::new(&config.output, templates, formatter.as_ref())
            .dry_run(config.dry_run);

        let mut ctx = BuildContext {
            spec: PathBuf::from(spec),
            config,
            provider,
            names: NameTransformer::new(&GO_NAMING, &inflector),
            schema: None,
            data: None,
            emitter,
        };

        for stage in &self.stages {
            info!("{}", stage.description());
            stage.run(&mut ctx).map_err(|source| Error::Stage {
                stage: stage.name(),
                source: Box::new(source),
            })?;
        }

        Ok(BuildReport {
            entities: ctx.data.map(|data| data.entities).unwrap_or_default(),
            files: ctx.emitter.into_emitted(),
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
