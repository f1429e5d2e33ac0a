//! Built-in pipeline stages.

use tracing::{debug, info};

use super::{BuildContext, Stage};
use crate::{
    EntityModelBuilder, Error, GoTypeMapper, Placeholders, Result,
    paths::{ENTITY_PACKAGE_DIR, PREDICATE_DIR, placeholder, template},
};

/// Reads and parses the schema spec.
///
/// The dialect selector is resolved before the file is read, so an unknown
/// dialect fails without touching the file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseSpecStage;

impl Stage for ParseSpecStage {
    fn name(&self) -> &'static str {
        "parse-spec"
    }

    fn description(&self) -> &'static str {
        "Parse the schema spec"
    }

    fn run(&self, ctx: &mut BuildContext<'_>) -> Result<()> {
        let schema = ctx.provider.parse_file(&ctx.config.dialect, &ctx.spec)?;
        info!(
            "parsed {} table(s) from {}",
            schema.tables.len(),
            ctx.spec.display()
        );
        ctx.schema = Some(schema);
        Ok(())
    }
}

/// Builds one entity model per table.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildModelsStage {
    mapper: GoTypeMapper<'static>,
}

impl Stage for BuildModelsStage {
    fn name(&self) -> &'static str {
        "build-models"
    }

    fn description(&self) -> &'static str {
        "Build entity models from tables"
    }

    fn run(&self, ctx: &mut BuildContext<'_>) -> Result<()> {
        let schema = ctx.schema.as_ref().ok_or(Error::StageOrder {
            needs: "parsed schema",
        })?;
        let module = ctx.config.module_path();
        let data = EntityModelBuilder::new(&self.mapper, ctx.names).build(
            schema,
            &ctx.config.package,
            &module,
        )?;

        for entity in &data.entities {
            debug!(
                "entity {} ({} fields, {} primary key(s))",
                entity.struct_name,
                entity.fields_count,
                entity.primary_keys.len()
            );
        }
        ctx.data = Some(data);
        Ok(())
    }
}

/// Creates the output root, one directory per entity package and the
/// predicate directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateDirectoriesStage;

impl Stage for CreateDirectoriesStage {
    fn name(&self) -> &'static str {
        "create-directories"
    }

    fn description(&self) -> &'static str {
        "Create the output directory tree"
    }

    fn run(&self, ctx: &mut BuildContext<'_>) -> Result<()> {
        let data = ctx.data.as_ref().ok_or(Error::StageOrder {
            needs: "entity models",
        })?;
        let root = ctx.emitter.root().to_path_buf();

        ctx.emitter.create_dir(&root)?;
        for entity in &data.entities {
            let placeholders = Placeholders::from_iter([(
                placeholder::ENTITY_PACKAGE,
                entity.package_name.as_str(),
            )]);
            let dir = ctx.emitter.resolve(ENTITY_PACKAGE_DIR, &placeholders)?;
            ctx.emitter.create_dir(&dir)?;
        }
        ctx.emitter.create_dir(&root.join(PREDICATE_DIR))
    }
}

/// Writes the files shared by every entity: the client and the predicate
/// helpers.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmitSharedStage;

impl Stage for EmitSharedStage {
    fn name(&self) -> &'static str {
        "emit-shared"
    }

    fn description(&self) -> &'static str {
        "Generate the client and predicate helpers"
    }

    fn run(&self, ctx: &mut BuildContext<'_>) -> Result<()> {
        let data = ctx.data.as_ref().ok_or(Error::StageOrder {
            needs: "entity models",
        })?;

        for name in [template::CLIENT, template::PREDICATE] {
            ctx.emitter.emit(name, &Placeholders::new(), data)?;
        }
        Ok(())
    }
}

/// Writes every per-entity file, entity by entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmitEntitiesStage;

impl Stage for EmitEntitiesStage {
    fn name(&self) -> &'static str {
        "emit-entities"
    }

    fn description(&self) -> &'static str {
        "Generate entity files"
    }

    fn run(&self, ctx: &mut BuildContext<'_>) -> Result<()> {
        let data = ctx.data.as_ref().ok_or(Error::StageOrder {
            needs: "entity models",
        })?;

        for entity in &data.entities {
            let placeholders = Placeholders::from_iter([
                (placeholder::ENTITY_PACKAGE, entity.package_name.as_str()),
                (placeholder::ENTITY_FILE, entity.file_name.as_str()),
            ]);
            let context = data.context(entity);

            for name in template::ENTITY_PACKAGE.iter().chain(template::ENTITY_ROOT) {
                ctx.emitter.emit(name, &placeholders, &context)?;
            }
            info!("generated {}", entity.struct_name);
        }
        Ok(())
    }
}
