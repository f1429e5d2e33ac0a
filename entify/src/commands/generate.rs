use std::path::PathBuf;

use clap::Args;
use entify_codegen::{
    BuildConfig, FormatterKind,
    paths::{DEFAULT_OUTPUT, DEFAULT_PACKAGE},
    pipeline::Pipeline,
};
use eyre::{Context, Result};
use tracing::info;

use super::ExitOnSchemaError;
use crate::reports::{GenerateReport, Report, TerminalOutput};

#[derive(Args)]
pub struct GenerateCommand {
    /// Path to the schema spec
    pub spec: PathBuf,

    /// Output directory of the generated package
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub out: PathBuf,

    /// SQL dialect the spec is written for (mysql, mariadb, postgres)
    #[arg(short, long, default_value = "mysql")]
    pub provider: String,

    /// Go import path of the output directory (defaults to the output path)
    #[arg(long)]
    pub module: Option<String>,

    /// Name of the generated root package
    #[arg(long, default_value = DEFAULT_PACKAGE)]
    pub package: String,

    /// Format with the external gofmt binary instead of the built-in formatter
    #[arg(long)]
    pub gofmt: bool,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        let config = self.config();
        let result = Pipeline::new()
            .run(&self.spec, &config)
            .exit_on_schema_error()
            .wrap_err_with(|| format!("Failed to generate from {}", self.spec.display()))?;

        info!("done");

        GenerateReport::new(&config, result).render(&mut TerminalOutput::new());
        Ok(())
    }

    fn config(&self) -> BuildConfig {
        let formatter = if self.gofmt {
            FormatterKind::Gofmt
        } else {
            FormatterKind::Builtin
        };

        let config = BuildConfig::new(&self.provider)
            .output(&self.out)
            .package(&self.package)
            .formatter(formatter)
            .dry_run(self.dry_run);

        match &self.module {
            Some(module) => config.module(module),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        cmd: GenerateCommand,
    }

    fn parse(args: &[&str]) -> GenerateCommand {
        Wrapper::try_parse_from(std::iter::once("generate").chain(args.iter().copied()))
            .unwrap()
            .cmd
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["schema.toml"]).config();
        assert_eq!(config.output, PathBuf::from("entify/entity"));
        assert_eq!(config.dialect, "mysql");
        assert_eq!(config.package, "entity");
        assert_eq!(config.module, None);
        assert_eq!(config.formatter, FormatterKind::Builtin);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_flags() {
        let config = parse(&[
            "schema.toml",
            "-o",
            "gen/entity",
            "-p",
            "postgres",
            "--module",
            "github.com/acme/app/gen/entity",
            "--package",
            "models",
            "--gofmt",
            "--dry-run",
        ])
        .config();

        assert_eq!(config.output, PathBuf::from("gen/entity"));
        assert_eq!(config.dialect, "postgres");
        assert_eq!(config.package, "models");
        assert_eq!(config.module_path(), "github.com/acme/app/gen/entity");
        assert_eq!(config.formatter, FormatterKind::Gofmt);
        assert!(config.dry_run);
    }
}
