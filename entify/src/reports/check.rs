//! Check command report data structures.

use std::path::{Path, PathBuf};

use entify_ir::Entity;

use super::output::{Output, Report};

/// Report data from schema validation.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the schema spec.
    pub spec_path: PathBuf,
    pub entities: Vec<EntityInfo>,
}

/// Summary of one entity.
#[derive(Debug)]
pub struct EntityInfo {
    pub struct_name: String,
    pub table: String,
    /// `(column, declared Go type)` pairs in column order.
    pub fields: Vec<(String, String)>,
    pub primary_keys: Vec<String>,
    pub auto_increment: bool,
}

impl From<&Entity> for EntityInfo {
    fn from(entity: &Entity) -> Self {
        Self {
            struct_name: entity.struct_name.clone(),
            table: entity.name.clone(),
            fields: entity
                .fields
                .iter()
                .map(|f| (f.name.clone(), f.declared_type().to_string()))
                .collect(),
            primary_keys: entity.primary_keys.iter().map(|f| f.name.clone()).collect(),
            auto_increment: entity.primary_key_auto_incr,
        }
    }
}

impl CheckReport {
    pub fn new(spec_path: &Path, entities: &[Entity]) -> Self {
        Self {
            spec_path: spec_path.to_path_buf(),
            entities: entities.iter().map(EntityInfo::from).collect(),
        }
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        out.preformatted(&format!("✓ {} is valid", self.spec_path.display()));
        out.newline();

        let count = self.entities.len();
        out.section(&format!(
            "{} entit{}",
            count,
            if count == 1 { "y" } else { "ies" }
        ));
        for entity in &self.entities {
            out.list_item(&format!("{} ({})", entity.struct_name, entity.table));
            for (name, ty) in &entity.fields {
                out.preformatted(&format!("      {}: {}", name, ty));
            }

            let key = if entity.primary_keys.is_empty() {
                "none".to_string()
            } else {
                entity.primary_keys.join(", ")
            };
            let suffix = if entity.auto_increment {
                " (auto increment)"
            } else {
                ""
            };
            out.preformatted(&format!("      primary key: {}{}", key, suffix));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::testing::Recorder;

    #[test]
    fn test_render() {
        let report = CheckReport {
            spec_path: PathBuf::from("schema.toml"),
            entities: vec![EntityInfo {
                struct_name: "User".to_string(),
                table: "users".to_string(),
                fields: vec![
                    ("id".to_string(), "int64".to_string()),
                    ("firstname".to_string(), "sql.NullString".to_string()),
                ],
                primary_keys: vec!["id".to_string()],
                auto_increment: true,
            }],
        };

        let mut out = Recorder::default();
        report.render(&mut out);

        assert_eq!(
            out.lines,
            vec![
                "✓ schema.toml is valid",
                "",
                "1 entity:",
                "  - User (users)",
                "      id: int64",
                "      firstname: sql.NullString",
                "      primary key: id (auto increment)",
            ]
        );
    }
}
