use std::{
    fs::File,
    io::{self, Write},
    path::PathBuf,
};

use clap::{Args, CommandFactory};
use clap_complete::Shell;
use eyre::{Result, WrapErr};
use tracing::info;

use super::Cli;

#[derive(Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    shell: Shell,

    /// Write the script to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl CompletionsCommand {
    pub fn run(&self) -> Result<()> {
        let Some(path) = &self.output else {
            return self.write_to(&mut io::stdout().lock());
        };

        let mut file = File::create(path)
            .wrap_err_with(|| format!("failed to create '{}'", path.display()))?;
        self.write_to(&mut file)?;
        info!("wrote {} completions to {}", self.shell, path.display());
        Ok(())
    }

    /// Write the completion script, named after the binary.
    fn write_to(&self, out: &mut dyn Write) -> Result<()> {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(self.shell, &mut cmd, name, out);
        out.flush()?;
        Ok(())
    }
}
