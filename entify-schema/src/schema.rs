//! Parsed schema types.

/// Integer width class as declared by the dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegerKind {
    Tiny,
    Small,
    Medium,
    Int,
    Big,
}

impl IntegerKind {
    /// Get the MySQL spelling of this width class.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegerKind::Tiny => "tinyint",
            IntegerKind::Small => "smallint",
            IntegerKind::Medium => "mediumint",
            IntegerKind::Int => "int",
            IntegerKind::Big => "bigint",
        }
    }
}

/// Dialect-neutral column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlType {
    String,
    Bool,
    Integer { kind: IntegerKind, unsigned: bool },
    Float,
    Time,
    Json,
    /// A type the dialect knows but the generator has no mapping for.
    Unsupported { raw: String },
}

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// The type exactly as written in the spec.
    pub raw_type: String,
    pub sql_type: SqlType,
    pub null: bool,
}

/// A table with its columns in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    /// Names of the primary-key columns.
    pub primary_key: Vec<String>,
}

impl Table {
    /// Find a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check whether the named column is part of the primary key.
    pub fn is_primary_key(&self, column: &str) -> bool {
        self.primary_key.iter().any(|pk| pk == column)
    }
}

/// A parsed schema spec.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub tables: Vec<Table>,
}

impl Schema {
    /// Find a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}
