use std::path::PathBuf;

use clap::Args;
use entify_codegen::{BuildConfig, pipeline::Pipeline};
use eyre::{Context, Result};

use super::ExitOnSchemaError;
use crate::reports::{CheckReport, Report, TerminalOutput};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to the schema spec
    pub spec: PathBuf,

    /// SQL dialect the spec is written for (mysql, mariadb, postgres)
    #[arg(short, long, default_value = "mysql")]
    pub provider: String,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let config = BuildConfig::new(&self.provider);
        let result = Pipeline::models()
            .run(&self.spec, &config)
            .exit_on_schema_error()
            .wrap_err("Validation failed")?;

        CheckReport::new(&self.spec, &result.entities).render(&mut TerminalOutput::new());
        Ok(())
    }
}
