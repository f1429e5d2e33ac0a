//! Entity model types.

use std::sync::Arc;

use serde::Serialize;

use crate::FieldTypeKind;

/// Per-column metadata driving code generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Raw column name as declared in the schema.
    pub name: String,
    /// Exported Go name (e.g., "user_id" -> "UserID").
    pub property_name: String,
    /// Unexported Go name (e.g., "user_id" -> "userID").
    pub variable_name: String,
    pub type_kind: FieldTypeKind,
    /// Base Go type (e.g., "int32").
    #[serde(rename = "type")]
    pub ty: String,
    /// Nullable wrapper used when scanning (e.g., "sql.NullInt32").
    pub sql_type: String,
    pub nullable: bool,
    /// Member of the nullable wrapper holding the value (e.g., "Int32").
    pub nullable_access: String,
    /// Zero value literal (e.g., `""`).
    pub default_value: String,
    /// Whether the column belongs to the table's primary key.
    pub primary_key: bool,
}

impl Field {
    /// The Go type a struct member for this field is declared with.
    pub fn declared_type(&self) -> &str {
        if self.nullable { &self.sql_type } else { &self.ty }
    }
}

/// Generated per-table data-access model.
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    /// Raw table name.
    pub name: String,
    /// Method receiver name (e.g., "user_accounts" -> "ua").
    pub receiver: String,
    /// Go import path of the generated root package.
    pub module: String,
    pub struct_name: String,
    pub package_name: String,
    pub file_name: String,
    pub variable_name: String,
    /// Packages the field types need, in first-seen order.
    pub imports: Vec<String>,
    /// Fields in column order.
    pub fields: Vec<Arc<Field>>,
    pub fields_count: usize,
    /// Primary-key fields; every entry is shared with `fields`.
    pub primary_keys: Vec<Arc<Field>>,
    pub primary_key_auto_incr: bool,
}

/// Complete build unit passed to the shared templates.
#[derive(Debug, Clone, Serialize)]
pub struct Data {
    /// Name of the generated root package.
    pub package: String,
    /// Go import path of the generated root package.
    pub module: String,
    pub entities: Vec<Entity>,
}

impl Data {
    pub fn new(package: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            module: module.into(),
            entities: Vec::new(),
        }
    }

    /// Build the per-entity template context for `entity`.
    pub fn context<'a>(&'a self, entity: &'a Entity) -> EntityContext<'a> {
        EntityContext {
            package: &self.package,
            module: &self.module,
            entity,
        }
    }
}

/// Data bound to the per-entity templates of the root package.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EntityContext<'a> {
    pub package: &'a str,
    pub module: &'a str,
    pub entity: &'a Entity,
}
