//! Schema spec loading from files and bytes.

use std::{collections::HashSet, path::Path, str::FromStr};

use miette::SourceSpan;
use serde::Deserialize;

use crate::{Column, Dialect, Error, Result, Schema, Table, error::SourceContext};

/// Filename used in diagnostics when the spec does not come from a file.
pub const DEFAULT_FILENAME: &str = "schema.toml";

/// Capability turning a raw spec into a [`Schema`] for a dialect.
pub trait SchemaProvider {
    /// Resolve a dialect selector such as "mysql".
    fn dialect(&self, selector: &str) -> Result<Dialect>;

    /// Parse raw spec bytes, using `filename` for error reporting.
    fn parse(&self, dialect: Dialect, raw: &[u8], filename: &str) -> Result<Schema>;

    /// Read and parse a spec file.
    ///
    /// The selector is resolved before the file is touched.
    fn parse_file(&self, selector: &str, path: &Path) -> Result<Schema> {
        let dialect = self.dialect(selector)?;
        let raw = std::fs::read(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        self.parse(dialect, &raw, &path.display().to_string())
    }
}

/// TOML schema spec loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct Loader;

impl Loader {
    pub fn new() -> Self {
        Self
    }

    /// Parse a spec held in a string.
    pub fn parse_str(&self, selector: &str, content: &str) -> Result<Schema> {
        let dialect = self.dialect(selector)?;
        self.parse(dialect, content.as_bytes(), DEFAULT_FILENAME)
    }
}

impl SchemaProvider for Loader {
    fn dialect(&self, selector: &str) -> Result<Dialect> {
        Dialect::from_str(selector)
    }

    fn parse(&self, dialect: Dialect, raw: &[u8], filename: &str) -> Result<Schema> {
        let content = std::str::from_utf8(raw).map_err(|e| {
            Box::new(Error::Encoding {
                filename: filename.to_string(),
                source: e,
            })
        })?;

        let ctx = SourceContext::new(content, filename);
        let spec: RawSpec = toml::from_str(content).map_err(|e| ctx.parse_error(e))?;

        build_schema(spec, dialect, &ctx)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSpec {
    #[serde(default)]
    table: Vec<RawTable>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTable {
    name: String,
    #[serde(default)]
    primary_key: Vec<String>,
    #[serde(default)]
    column: Vec<RawColumn>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawColumn {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    null: bool,
    #[serde(default)]
    unsigned: bool,
}

fn build_schema(spec: RawSpec, dialect: Dialect, ctx: &SourceContext) -> Result<Schema> {
    if spec.table.is_empty() {
        return Err(ctx.validation_error("schema spec declares no tables", None));
    }

    let mut seen = HashSet::new();
    let mut tables = Vec::with_capacity(spec.table.len());

    for raw in spec.table {
        if raw.name.trim().is_empty() {
            return Err(ctx.validation_error("table name cannot be empty", None));
        }
        if !is_identifier(&raw.name) {
            return Err(ctx.validation_error(
                format!("table name '{}' is not a valid identifier", raw.name),
                find_name_span(ctx.src(), &raw.name),
            ));
        }
        if !seen.insert(raw.name.clone()) {
            return Err(ctx.validation_error(
                format!("duplicate table '{}'", raw.name),
                find_name_span(ctx.src(), &raw.name),
            ));
        }
        tables.push(build_table(raw, dialect, ctx)?);
    }

    Ok(Schema { tables })
}

fn build_table(raw: RawTable, dialect: Dialect, ctx: &SourceContext) -> Result<Table> {
    if raw.column.is_empty() {
        return Err(ctx.validation_error(
            format!("table '{}' has no columns", raw.name),
            find_name_span(ctx.src(), &raw.name),
        ));
    }

    let mut columns: Vec<Column> = Vec::with_capacity(raw.column.len());
    for col in raw.column {
        if col.name.trim().is_empty() {
            return Err(ctx.validation_error(
                format!("column name cannot be empty in table '{}'", raw.name),
                find_name_span(ctx.src(), &raw.name),
            ));
        }
        if !is_identifier(&col.name) {
            return Err(ctx.validation_error(
                format!(
                    "column name '{}' in table '{}' is not a valid identifier",
                    col.name, raw.name
                ),
                find_name_span(ctx.src(), &col.name),
            ));
        }
        if columns.iter().any(|c| c.name == col.name) {
            return Err(ctx.validation_error(
                format!("duplicate column '{}' in table '{}'", col.name, raw.name),
                find_name_span(ctx.src(), &col.name),
            ));
        }

        let sql_type = dialect.column_type(&col.ty, col.unsigned).map_err(|reason| {
            ctx.validation_error(
                format!("column '{}.{}': {}", raw.name, col.name, reason),
                find_quoted_span(ctx.src(), &col.ty),
            )
        })?;

        columns.push(Column {
            name: col.name,
            raw_type: col.ty,
            sql_type,
            null: col.null,
        });
    }

    for (i, pk) in raw.primary_key.iter().enumerate() {
        let Some(column) = columns.iter().find(|c| &c.name == pk) else {
            return Err(ctx.validation_error(
                format!(
                    "primary key of table '{}' references unknown column '{}'",
                    raw.name, pk
                ),
                find_quoted_span(ctx.src(), pk),
            ));
        };
        if column.null {
            return Err(ctx.validation_error(
                format!(
                    "primary key column '{}.{}' cannot be nullable",
                    raw.name, pk
                ),
                find_name_span(ctx.src(), pk),
            ));
        }
        if raw.primary_key[..i].contains(pk) {
            return Err(ctx.validation_error(
                format!(
                    "column '{}' is listed twice in the primary key of table '{}'",
                    pk, raw.name
                ),
                find_quoted_span(ctx.src(), pk),
            ));
        }
    }

    Ok(Table {
        name: raw.name,
        columns,
        primary_key: raw.primary_key,
    })
}

/// Whether `name` is usable as a table or column name.
///
/// Letters, digits and `_` only, and the first character after any leading
/// underscores must be a letter, so every derived Go identifier is valid.
pub(crate) fn is_identifier(name: &str) -> bool {
    name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
        && name
            .trim_start_matches('_')
            .starts_with(|c: char| c.is_ascii_alphabetic())
}

/// Find the span of a `name = "value"` entry in the TOML source
pub(crate) fn find_name_span(src: &str, name: &str) -> Option<SourceSpan> {
    for pattern in [format!("name = \"{}\"", name), format!("name = '{}'", name)] {
        if let Some(pos) = src.find(&pattern) {
            // The name starts after 'name = "' (8 characters)
            return Some(SourceSpan::from((pos + 8, name.len())));
        }
    }
    find_quoted_span(src, name)
}

/// Find the span of the first quoted occurrence of `value`
pub(crate) fn find_quoted_span(src: &str, value: &str) -> Option<SourceSpan> {
    for quote in ['"', '\''] {
        let pattern = format!("{quote}{value}{quote}");
        if let Some(pos) = src.find(&pattern) {
            return Some(SourceSpan::from((pos + 1, value.len())));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::{IntegerKind, SqlType};

    const USERS: &str = r#"
        [[table]]
        name = "users"
        primary_key = ["id"]

        [[table.column]]
        name = "id"
        type = "varchar(36)"

        [[table.column]]
        name = "email"
        type = "varchar(255)"

        [[table.column]]
        name = "firstname"
        type = "varchar(255)"
        null = true

        [[table.column]]
        name = "age"
        type = "int"
        unsigned = true
    "#;

    fn validation_message(err: &Error) -> &str {
        match err {
            Error::Validation { message, .. } => message,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_users() {
        let schema = Loader::new().parse_str("mysql", USERS).unwrap();

        assert_eq!(schema.tables.len(), 1);
        let users = schema.table("users").unwrap();
        let names: Vec<_> = users.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "email", "firstname", "age"]);
        assert_eq!(users.primary_key, vec!["id"]);
        assert!(users.is_primary_key("id"));
        assert!(users.column("firstname").unwrap().null);
        assert!(!users.column("email").unwrap().null);
        assert_eq!(
            users.column("age").unwrap().sql_type,
            SqlType::Integer {
                kind: IntegerKind::Int,
                unsigned: true
            }
        );
        assert_eq!(users.column("id").unwrap().raw_type, "varchar(36)");
    }

    #[test]
    fn test_table_order_is_preserved() {
        let schema = Loader::new()
            .parse_str(
                "postgres",
                r#"
                [[table]]
                name = "posts"
                [[table.column]]
                name = "id"
                type = "bigserial"

                [[table]]
                name = "authors"
                [[table.column]]
                name = "id"
                type = "serial"
                "#,
            )
            .unwrap();

        let names: Vec<_> = schema.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["posts", "authors"]);
    }

    #[test]
    fn test_unsupported_dialect() {
        let err = Loader::new().parse_str("oracle", USERS).unwrap_err();
        assert!(matches!(*err, Error::UnsupportedDialect { .. }));
    }

    #[test]
    fn test_unsupported_dialect_checked_before_reading() {
        let err = Loader::new()
            .parse_file("sqlite", Path::new("/nonexistent/schema.toml"))
            .unwrap_err();
        assert!(matches!(*err, Error::UnsupportedDialect { .. }));
    }

    #[test]
    fn test_parse_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(USERS.as_bytes()).unwrap();

        let schema = Loader::new().parse_file("mariadb", file.path()).unwrap();
        assert_eq!(schema.tables[0].name, "users");
    }

    #[test]
    fn test_missing_file() {
        let err = Loader::new()
            .parse_file("mysql", Path::new("/nonexistent/schema.toml"))
            .unwrap_err();
        assert!(err.is_read_error());
    }

    #[test]
    fn test_invalid_toml() {
        let err = Loader::new()
            .parse_str("mysql", "[[table]\nname = ")
            .unwrap_err();
        assert!(matches!(*err, Error::Parse { .. }));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Loader::new()
            .parse_str(
                "mysql",
                r#"
                [[table]]
                name = "users"
                [[table.column]]
                name = "id"
                type = "int"
                nullable = true
                "#,
            )
            .unwrap_err();
        assert!(matches!(*err, Error::Parse { .. }));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = Loader::new()
            .parse(Dialect::MySql, &[0xff, 0xfe], DEFAULT_FILENAME)
            .unwrap_err();
        assert!(matches!(*err, Error::Encoding { .. }));
    }

    #[test]
    fn test_empty_spec() {
        let err = Loader::new().parse_str("mysql", "").unwrap_err();
        assert_eq!(validation_message(&err), "schema spec declares no tables");
    }

    #[test]
    fn test_duplicate_table() {
        let err = Loader::new()
            .parse_str(
                "mysql",
                r#"
                [[table]]
                name = "users"
                [[table.column]]
                name = "id"
                type = "int"

                [[table]]
                name = "users"
                [[table.column]]
                name = "id"
                type = "int"
                "#,
            )
            .unwrap_err();
        assert_eq!(validation_message(&err), "duplicate table 'users'");
    }

    #[test]
    fn test_duplicate_column() {
        let err = Loader::new()
            .parse_str(
                "mysql",
                r#"
                [[table]]
                name = "users"
                [[table.column]]
                name = "email"
                type = "text"
                [[table.column]]
                name = "email"
                type = "text"
                "#,
            )
            .unwrap_err();
        assert_eq!(
            validation_message(&err),
            "duplicate column 'email' in table 'users'"
        );
    }

    #[test]
    fn test_table_without_columns() {
        let err = Loader::new()
            .parse_str("mysql", "[[table]]\nname = \"users\"\n")
            .unwrap_err();
        assert_eq!(validation_message(&err), "table 'users' has no columns");
        match *err {
            Error::Validation { span, .. } => assert_eq!(span, Some((18, 5).into())),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_primary_key_unknown_column() {
        let err = Loader::new()
            .parse_str(
                "mysql",
                r#"
                [[table]]
                name = "users"
                primary_key = ["uid"]
                [[table.column]]
                name = "id"
                type = "int"
                "#,
            )
            .unwrap_err();
        assert_eq!(
            validation_message(&err),
            "primary key of table 'users' references unknown column 'uid'"
        );
    }

    #[test]
    fn test_primary_key_listed_twice() {
        let err = Loader::new()
            .parse_str(
                "mysql",
                r#"
                [[table]]
                name = "users"
                primary_key = ["id", "id"]
                [[table.column]]
                name = "id"
                type = "int"
                "#,
            )
            .unwrap_err();
        assert_eq!(
            validation_message(&err),
            "column 'id' is listed twice in the primary key of table 'users'"
        );
    }

    #[test]
    fn test_unsigned_postgres_rejected() {
        let err = Loader::new()
            .parse_str(
                "postgres",
                r#"
                [[table]]
                name = "counters"
                [[table.column]]
                name = "hits"
                type = "integer"
                unsigned = true
                "#,
            )
            .unwrap_err();
        assert!(validation_message(&err).starts_with("column 'counters.hits'"));
    }

    #[test]
    fn test_unknown_type_is_not_a_parse_failure() {
        let schema = Loader::new()
            .parse_str(
                "mysql",
                r#"
                [[table]]
                name = "files"
                [[table.column]]
                name = "payload"
                type = "blob"
                "#,
            )
            .unwrap();
        assert_eq!(
            schema.tables[0].columns[0].sql_type,
            SqlType::Unsupported {
                raw: "blob".to_string()
            }
        );
    }

    #[test]
    fn test_table_name_must_be_identifier() {
        let err = Loader::new()
            .parse_str(
                "mysql",
                r#"
                [[table]]
                name = "../escape"
                [[table.column]]
                name = "id"
                type = "int"
                "#,
            )
            .unwrap_err();
        assert_eq!(
            validation_message(&err),
            "table name '../escape' is not a valid identifier"
        );
        match *err {
            Error::Validation { span, .. } => assert!(span.is_some()),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_column_name_must_be_identifier() {
        let err = Loader::new()
            .parse_str(
                "mysql",
                r#"
                [[table]]
                name = "users"
                [[table.column]]
                name = "first-name"
                type = "text"
                "#,
            )
            .unwrap_err();
        assert_eq!(
            validation_message(&err),
            "column name 'first-name' in table 'users' is not a valid identifier"
        );
    }

    #[test]
    fn test_is_identifier() {
        for name in ["users", "user_accounts", "_meta", "v2_items", "ID"] {
            assert!(is_identifier(name), "{name}");
        }
        for name in ["../escape", "a/b", "first-name", "2fa", "_1", "__", "na me", "é"] {
            assert!(!is_identifier(name), "{name}");
        }
    }

    #[test]
    fn test_nullable_primary_key_rejected() {
        let err = Loader::new()
            .parse_str(
                "mysql",
                r#"
                [[table]]
                name = "users"
                primary_key = ["id"]
                [[table.column]]
                name = "id"
                type = "int"
                null = true
                "#,
            )
            .unwrap_err();
        assert_eq!(
            validation_message(&err),
            "primary key column 'users.id' cannot be nullable"
        );
    }

    #[test]
    fn test_find_name_span() {
        let src = "name = \"users\"";
        assert_eq!(find_name_span(src, "users"), Some((8, 5).into()));
        assert_eq!(find_name_span(src, "posts"), None);
        assert_eq!(find_quoted_span("pk = ['id']", "id"), Some((7, 2).into()));
    }
}
