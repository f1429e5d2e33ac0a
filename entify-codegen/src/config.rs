//! Build configuration.

use std::path::{Path, PathBuf};

use crate::{
    GoFormatter, Gofmt, SourceFormatter,
    paths::{DEFAULT_OUTPUT, DEFAULT_PACKAGE},
};

/// Which formatting pass runs over rendered files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormatterKind {
    /// [`GoFormatter`]
    #[default]
    Builtin,
    /// [`Gofmt`]
    Gofmt,
}

impl FormatterKind {
    pub fn formatter(&self) -> Box<dyn SourceFormatter> {
        match self {
            FormatterKind::Builtin => Box::new(GoFormatter),
            FormatterKind::Gofmt => Box::new(Gofmt::default()),
        }
    }
}

/// Settings for one generation run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Output root.
    pub output: PathBuf,
    /// Dialect selector, resolved when the spec is parsed.
    pub dialect: String,
    /// Name of the generated root package.
    pub package: String,
    /// Go import path of the output root; derived from `output` when unset.
    pub module: Option<String>,
    pub formatter: FormatterKind,
    pub dry_run: bool,
}

impl BuildConfig {
    pub fn new(dialect: impl Into<String>) -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            dialect: dialect.into(),
            package: DEFAULT_PACKAGE.to_string(),
            module: None,
            formatter: FormatterKind::default(),
            dry_run: false,
        }
    }

    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn formatter(mut self, formatter: FormatterKind) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The Go import path of the output root.
    pub fn module_path(&self) -> String {
        match &self.module {
            Some(module) => module.trim_end_matches('/').to_string(),
            None => module_from_path(&self.output),
        }
    }
}

/// Render a relative path as an import path: `entify\entity` -> `entify/entity`.
fn module_from_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BuildConfig::new("mysql");
        assert_eq!(config.output, PathBuf::from("entify/entity"));
        assert_eq!(config.package, "entity");
        assert_eq!(config.module_path(), "entify/entity");
        assert_eq!(config.formatter, FormatterKind::Builtin);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_explicit_module() {
        let config = BuildConfig::new("mysql")
            .output("gen/entity")
            .module("github.com/acme/app/gen/entity/");
        assert_eq!(config.module_path(), "github.com/acme/app/gen/entity");
    }

    #[test]
    fn test_module_from_output() {
        let config = BuildConfig::new("postgres").output("./internal/entity");
        assert_eq!(config.module_path(), "internal/entity");
    }

    #[test]
    fn test_formatter_kind() {
        assert_eq!(FormatterKind::Builtin.formatter().name(), "builtin");
        assert_eq!(FormatterKind::Gofmt.formatter().name(), "gofmt");
    }
}
