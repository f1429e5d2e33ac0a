//! Import collection for generated files.

use indexmap::IndexSet;

/// Tracks import paths and deduplicates them.
///
/// Maintains insertion order for deterministic output.
///
/// # Example
///
/// ```
/// use entify_codegen::ImportCollector;
///
/// let mut imports = ImportCollector::new();
/// imports.add("time");
/// imports.add("encoding/json");
/// imports.add("time");
///
/// assert_eq!(imports.into_vec(), vec!["time", "encoding/json"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImportCollector {
    imports: IndexSet<String>,
}

impl ImportCollector {
    /// Create a new empty import collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an import path; returns false if it was already present.
    pub fn add(&mut self, path: &str) -> bool {
        if self.imports.contains(path) {
            return false;
        }
        self.imports.insert(path.to_string())
    }

    /// Consume the collector, returning paths in insertion order.
    pub fn into_vec(self) -> Vec<String> {
        self.imports.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let mut imports = ImportCollector::new();
        assert!(imports.add("time"));
        assert!(imports.add("encoding/json"));
        assert!(!imports.add("time"));

        assert_eq!(imports.into_vec(), vec!["time", "encoding/json"]);
    }

    #[test]
    fn test_empty() {
        assert!(ImportCollector::new().into_vec().is_empty());
    }
}
