mod check;
mod completions;
mod generate;

use check::CheckCommand;
use clap::{ArgAction, Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use generate::GenerateCommand;

/// Extension trait for exiting on schema errors with pretty formatting
pub(crate) trait ExitOnSchemaError<T> {
    fn exit_on_schema_error(self) -> entify_codegen::Result<T>;
}

impl<T> ExitOnSchemaError<T> for entify_codegen::Result<T> {
    fn exit_on_schema_error(self) -> entify_codegen::Result<T> {
        self.map_err(|err| match err.into_schema_error() {
            Ok(schema) => {
                eprintln!("{:?}", miette::Report::new(*schema));
                std::process::exit(1);
            }
            Err(err) => err,
        })
    }
}

#[derive(Parser)]
#[command(name = "entify")]
#[command(version)]
#[command(about = "Generate Go data-access entities from a SQL schema spec")]
pub(crate) struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate entities from a schema spec
    Generate(GenerateCommand),

    /// Validate a schema spec and show the entities it describes
    Check(CheckCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["entify", "check", "schema.toml", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
