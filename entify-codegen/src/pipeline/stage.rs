//! Pipeline stage trait.

use super::BuildContext;
use crate::Result;

/// Information about a pipeline stage.
#[derive(Debug, Clone)]
pub struct StageInfo {
    /// The stage name.
    pub name: &'static str,
    /// A human-readable description.
    pub description: &'static str,
}

/// A stage in the generation pipeline.
///
/// Stages are executed in order by the pipeline. Each stage reads what
/// earlier stages left in the context and adds its own results.
pub trait Stage: Send + Sync {
    /// The name of this stage (used in errors and logs).
    fn name(&self) -> &'static str;

    /// A human-readable description of what this stage does.
    fn description(&self) -> &'static str;

    /// Run this stage on the build context.
    ///
    /// # Errors
    ///
    /// Any error aborts the build; the pipeline wraps it with the stage name.
    fn run(&self, ctx: &mut BuildContext<'_>) -> Result<()>;

    /// Get information about this stage.
    fn info(&self) -> StageInfo {
        StageInfo {
            name: self.name(),
            description: self.description(),
        }
    }
}
