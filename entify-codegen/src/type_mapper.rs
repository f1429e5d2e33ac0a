//! Mapping from dialect-neutral column types to Go types.

use entify_ir::FieldTypeKind;
use entify_schema::{IntegerKind, SqlType};

use crate::{Error, Result};

/// Go type metadata derived for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnType {
    pub kind: FieldTypeKind,
    /// Base Go type (e.g., "int32").
    pub base: &'static str,
    /// `database/sql` wrapper able to hold NULL (e.g., "sql.NullInt32").
    pub nullable_type: &'static str,
    /// Wrapper member holding the value (e.g., "Int32").
    pub nullable_access: &'static str,
    /// Zero value literal of `base`.
    pub default_value: &'static str,
    /// Import path `base` needs, if any.
    pub package: Option<&'static str>,
    /// Nullability the type was derived with.
    pub nullable: bool,
}

impl ColumnType {
    /// The Go type a struct member for this column is declared with.
    pub fn declared_type(&self) -> &'static str {
        if self.nullable {
            self.nullable_type
        } else {
            self.base
        }
    }
}

/// Integer width tiers.
///
/// Each row maps a width class to its signed type, unsigned type, nullable
/// wrapper and wrapper member.
#[derive(Debug)]
pub struct IntegerTable {
    pub rows: &'static [IntegerRow],
}

#[derive(Debug)]
pub struct IntegerRow {
    pub kind: IntegerKind,
    pub signed: &'static str,
    pub unsigned: &'static str,
    pub nullable: &'static str,
    pub access: &'static str,
}

impl IntegerTable {
    pub fn row(&self, kind: IntegerKind) -> Option<&IntegerRow> {
        self.rows.iter().find(|row| row.kind == kind)
    }
}

/// Go integer tiers; tiny and small share the 16-bit wrapper, medium and int
/// the 32-bit one.
pub const GO_INTEGERS: IntegerTable = IntegerTable {
    rows: &[
        IntegerRow {
            kind: IntegerKind::Tiny,
            signed: "int8",
            unsigned: "uint8",
            nullable: "sql.NullInt16",
            access: "Int16",
        },
        IntegerRow {
            kind: IntegerKind::Small,
            signed: "int16",
            unsigned: "uint16",
            nullable: "sql.NullInt16",
            access: "Int16",
        },
        IntegerRow {
            kind: IntegerKind::Medium,
            signed: "int32",
            unsigned: "uint32",
            nullable: "sql.NullInt32",
            access: "Int32",
        },
        IntegerRow {
            kind: IntegerKind::Int,
            signed: "int32",
            unsigned: "uint32",
            nullable: "sql.NullInt32",
            access: "Int32",
        },
        IntegerRow {
            kind: IntegerKind::Big,
            signed: "int64",
            unsigned: "uint64",
            nullable: "sql.NullInt64",
            access: "Int64",
        },
    ],
};

/// Trait for mapping schema column types to target type metadata.
pub trait TypeMapper {
    /// The target language name
    fn language(&self) -> &'static str;

    /// Map a column type, failing with [`Error::UnsupportedType`] when the
    /// type has no mapping.
    fn map_column(&self, sql_type: &SqlType, nullable: bool) -> Result<ColumnType>;
}

/// Go type mapper.
#[derive(Debug, Clone, Copy)]
pub struct GoTypeMapper<'a> {
    integers: &'a IntegerTable,
}

impl<'a> GoTypeMapper<'a> {
    pub fn new(integers: &'a IntegerTable) -> Self {
        Self { integers }
    }
}

impl Default for GoTypeMapper<'static> {
    fn default() -> Self {
        Self::new(&GO_INTEGERS)
    }
}

impl TypeMapper for GoTypeMapper<'_> {
    fn language(&self) -> &'static str {
        "go"
    }

    fn map_column(&self, sql_type: &SqlType, nullable: bool) -> Result<ColumnType> {
        let simple = |kind, base, nullable_type, nullable_access, default_value, package| {
            ColumnType {
                kind,
                base,
                nullable_type,
                nullable_access,
                default_value,
                package,
                nullable,
            }
        };

        let ct = match sql_type {
            SqlType::String => simple(
                FieldTypeKind::String,
                "string",
                "sql.NullString",
                "String",
                r#""""#,
                None,
            ),
            SqlType::Bool => simple(
                FieldTypeKind::Bool,
                "bool",
                "sql.NullBool",
                "Bool",
                "false",
                None,
            ),
            SqlType::Integer { kind, unsigned } => {
                let row = self
                    .integers
                    .row(*kind)
                    .ok_or_else(|| Error::UnsupportedType {
                        raw: kind.as_str().to_string(),
                    })?;
                let base = if *unsigned { row.unsigned } else { row.signed };
                simple(
                    FieldTypeKind::Number,
                    base,
                    row.nullable,
                    row.access,
                    "0",
                    None,
                )
            }
            SqlType::Float => simple(
                FieldTypeKind::Number,
                "float64",
                "sql.NullFloat64",
                "Float64",
                "0.0",
                None,
            ),
            SqlType::Time => simple(
                FieldTypeKind::Date,
                "time.Time",
                "sql.NullTime",
                "Time",
                "time.Time{}",
                Some("time"),
            ),
            SqlType::Json => simple(
                FieldTypeKind::Json,
                "json.RawMessage",
                "sql.NullString",
                "String",
                "json.RawMessage{}",
                Some("encoding/json"),
            ),
            SqlType::Unsupported { raw } => {
                return Err(Error::UnsupportedType { raw: raw.clone() });
            }
        };

        Ok(ct)
    }
}
