//! Generate command report data structures.

use std::path::{Path, PathBuf};

use entify_codegen::{BuildConfig, EmittedFile, pipeline::BuildReport};

use super::output::{Output, Report};

/// Report data from a generation run.
#[derive(Debug)]
pub struct GenerateReport {
    /// Output directory.
    pub output_dir: PathBuf,
    /// Struct names of the generated entities, in schema order.
    pub entities: Vec<String>,
    /// Files written or previewed.
    pub result: GenerationResult,
}

/// Result of code generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(Vec<PathBuf>),
    /// Dry-run preview.
    Preview(Vec<EmittedFile>),
}

impl GenerateReport {
    pub fn new(config: &BuildConfig, report: BuildReport) -> Self {
        let entities = report
            .entities
            .iter()
            .map(|e| format!("{} ({})", e.struct_name, e.name))
            .collect();

        let result = if config.dry_run {
            GenerationResult::Preview(report.files)
        } else {
            GenerationResult::Written(report.files.into_iter().map(|f| f.path).collect())
        };

        Self {
            output_dir: config.output.clone(),
            entities,
            result,
        }
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.output_dir).unwrap_or(path)
    }
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        match &self.result {
            GenerationResult::Written(paths) => {
                out.section(&format!("Entities ({})", self.entities.len()));
                for entity in &self.entities {
                    out.list_item(entity);
                }
                out.newline();

                out.section(&format!("Generated ({})", paths.len()));
                for path in paths {
                    out.added_item(&self.relative(path).display().to_string());
                }
                out.newline();
                out.key_value("Output", &self.output_dir.display().to_string());
            }
            GenerationResult::Preview(files) => {
                for file in files {
                    out.divider(&file.path.display().to_string());
                    out.preformatted(&file.content);
                }

                out.divider("Summary");
                out.preformatted(&format!("{} files would be generated", files.len()));
            }
        }
    }
}
