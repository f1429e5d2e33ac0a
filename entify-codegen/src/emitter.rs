//! Template-to-file emission.

use std::path::{Path, PathBuf};

use entify_core::{ensure_dir, write_file};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::{
    Error, Result, SourceFormatter, TemplateRegistry, paths::TEMPLATE_SUFFIX,
};

/// Placeholder token -> value.
pub type Placeholders<'a> = IndexMap<&'a str, &'a str>;

/// A file produced by the emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFile {
    pub path: PathBuf,
    pub content: String,
}

/// Resolve a template name into its destination path under `root`.
///
/// `__token__` markers (lowercase letters, digits and `-`) are replaced with
/// their placeholder value and [`TEMPLATE_SUFFIX`] is stripped:
/// `__entity-package__/where.go.tmpl` becomes `<root>/user/where.go`.
///
/// A value must be a single path segment: one that is empty, `.` or `..`, or
/// that holds a separator fails with [`Error::UnsafePlaceholder`], so the
/// result always stays under `root`.
pub fn resolve(root: &Path, template: &str, placeholders: &Placeholders<'_>) -> Result<PathBuf> {
    let name = template.strip_suffix(TEMPLATE_SUFFIX).unwrap_or(template);
    let mut resolved = String::with_capacity(name.len());
    let mut rest = name;

    while let Some(start) = rest.find("__") {
        let after = &rest[start + 2..];
        let len = after
            .bytes()
            .take_while(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
            .count();

        if len > 0 && after[len..].starts_with("__") {
            let token = &after[..len];
            let value = placeholders
                .get(token)
                .ok_or_else(|| Error::MissingPlaceholder {
                    template: template.to_string(),
                    token: token.to_string(),
                })?;
            if !is_plain_segment(value) {
                return Err(Error::UnsafePlaceholder {
                    template: template.to_string(),
                    token: token.to_string(),
                    value: value.to_string(),
                });
            }
            resolved.push_str(&rest[..start]);
            resolved.push_str(value);
            rest = &after[len + 2..];
        } else {
            resolved.push_str(&rest[..start + 1]);
            rest = &rest[start + 1..];
        }
    }
    resolved.push_str(rest);

    let mut path = root.to_path_buf();
    path.extend(resolved.split('/').filter(|part| !part.is_empty()));
    Ok(path)
}

fn is_plain_segment(value: &str) -> bool {
    !matches!(value, "" | "." | "..") && !value.contains(['/', '\\', ':'])
}

/// Renders templates into formatted files under an output root.
///
/// Files are processed one at a time: resolve, render, format, then write.
/// A failure leaves files written before it in place.
pub struct FileEmitter<'a> {
    root: PathBuf,
    templates: &'a TemplateRegistry,
    formatter: &'a dyn SourceFormatter,
    dry_run: bool,
    emitted: Vec<EmittedFile>,
}

impl<'a> FileEmitter<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        templates: &'a TemplateRegistry,
        formatter: &'a dyn SourceFormatter,
    ) -> Self {
        Self {
            root: root.into(),
            templates,
            formatter,
            dry_run: false,
            emitted: Vec::new(),
        }
    }

    /// Record files without touching the file system.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `template` under this emitter's root.
    pub fn resolve(&self, template: &str, placeholders: &Placeholders<'_>) -> Result<PathBuf> {
        resolve(&self.root, template, placeholders)
    }

    /// Create `path` and its parents; a no-op in dry-run mode.
    pub fn create_dir(&self, path: &Path) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        debug!("create dir {}", path.display());
        ensure_dir(path).map_err(|err| Error::file_system(path, err))
    }

    /// Format `rendered` and write it to `path`.
    pub fn write(&mut self, template: &str, path: PathBuf, rendered: &str) -> Result<()> {
        let content = self
            .formatter
            .format(rendered)
            .map_err(|source| Error::Format {
                template: template.to_string(),
                source,
            })?;

        if self.dry_run {
            debug!("skip {} (dry run)", path.display());
        } else {
            debug!("create {}", path.display());
            write_file(&path, content.as_bytes()).map_err(|err| Error::file_system(&path, err))?;
        }

        self.emitted.push(EmittedFile { path, content });
        Ok(())
    }

    /// Render `template` with `data` and write it to its resolved path.
    pub fn emit<T: Serialize>(
        &mut self,
        template: &str,
        placeholders: &Placeholders<'_>,
        data: &T,
    ) -> Result<PathBuf> {
        let path = self.resolve(template, placeholders)?;
        let rendered = self.templates.render_to_string(template, data)?;
        self.write(template, path.clone(), &rendered)?;
        Ok(path)
    }

    /// Files emitted so far, in emission order.
    pub fn emitted(&self) -> &[EmittedFile] {
        &self.emitted
    }

    pub fn into_emitted(self) -> Vec<EmittedFile> {
        self.emitted
    }
}
