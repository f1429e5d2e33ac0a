//! SQL dialects and their column type vocabularies.

use std::{fmt, str::FromStr};

use crate::{Error, IntegerKind, SqlType};

/// Supported schema dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    MySql,
    /// Shares the MySQL type vocabulary.
    MariaDb,
    Postgres,
}

impl Dialect {
    /// Selectors accepted by [`Dialect::from_str`].
    pub const SUPPORTED: &'static [&'static str] = &["mysql", "mariadb", "postgres"];

    /// Returns the dialect identifier as a static string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::MariaDb => "mariadb",
            Dialect::Postgres => "postgres",
        }
    }

    /// Resolve a declared column type into its dialect-neutral form.
    ///
    /// Types outside the vocabulary resolve to [`SqlType::Unsupported`]; the
    /// only hard failure is a request the dialect cannot express, such as an
    /// unsigned postgres integer.
    pub fn column_type(&self, raw: &str, unsigned: bool) -> Result<SqlType, String> {
        let decl = TypeDecl::parse(raw);
        let unsigned = unsigned || decl.unsigned;

        match self {
            Dialect::MySql | Dialect::MariaDb => Ok(mysql_type(raw, &decl, unsigned)),
            Dialect::Postgres => {
                if unsigned {
                    return Err(format!("postgres has no unsigned type for '{raw}'"));
                }
                Ok(postgres_type(raw, &decl))
            }
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" => Ok(Dialect::MySql),
            "mariadb" => Ok(Dialect::MariaDb),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            _ => Err(Error::unsupported_dialect(s)),
        }
    }
}

/// A declared column type split into its parts.
///
/// `int(11) unsigned` becomes base `int`, args `11`, unsigned.
#[derive(Debug, PartialEq, Eq)]
struct TypeDecl {
    base: String,
    args: Option<String>,
    unsigned: bool,
}

impl TypeDecl {
    fn parse(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();

        let (head, args) = match (lowered.find('('), lowered.rfind(')')) {
            (Some(open), Some(close)) if open < close => {
                let args = lowered[open + 1..close].trim().to_string();
                let rest = format!("{} {}", &lowered[..open], &lowered[close + 1..]);
                (rest, Some(args))
            }
            _ => (lowered, None),
        };

        let mut unsigned = false;
        let words: Vec<&str> = head
            .split_whitespace()
            .filter(|word| match *word {
                "unsigned" => {
                    unsigned = true;
                    false
                }
                "signed" | "zerofill" => false,
                _ => true,
            })
            .collect();

        Self {
            base: words.join(" "),
            args,
            unsigned,
        }
    }
}

fn unsupported(raw: &str) -> SqlType {
    SqlType::Unsupported {
        raw: raw.trim().to_string(),
    }
}

fn mysql_type(raw: &str, decl: &TypeDecl, unsigned: bool) -> SqlType {
    let integer = |kind| SqlType::Integer { kind, unsigned };

    match decl.base.as_str() {
        "char" | "varchar" | "tinytext" | "text" | "mediumtext" | "longtext" => SqlType::String,
        "bool" | "boolean" => SqlType::Bool,
        "tinyint" if decl.args.as_deref() == Some("1") => SqlType::Bool,
        "tinyint" => integer(IntegerKind::Tiny),
        "smallint" => integer(IntegerKind::Small),
        "mediumint" => integer(IntegerKind::Medium),
        "int" | "integer" => integer(IntegerKind::Int),
        "bigint" => integer(IntegerKind::Big),
        "float" | "double" | "double precision" | "real" => SqlType::Float,
        "date" | "datetime" | "timestamp" | "time" | "year" => SqlType::Time,
        "json" => SqlType::Json,
        _ => unsupported(raw),
    }
}

fn postgres_type(raw: &str, decl: &TypeDecl) -> SqlType {
    let integer = |kind| SqlType::Integer {
        kind,
        unsigned: false,
    };

    match decl.base.as_str() {
        "char" | "character" | "varchar" | "character varying" | "text" | "citext" => {
            SqlType::String
        }
        "boolean" | "bool" => SqlType::Bool,
        "smallint" | "int2" | "smallserial" | "serial2" => integer(IntegerKind::Small),
        "integer" | "int" | "int4" | "serial" | "serial4" => integer(IntegerKind::Int),
        "bigint" | "int8" | "bigserial" | "serial8" => integer(IntegerKind::Big),
        "real" | "float4" | "double precision" | "float8" => SqlType::Float,
        "date"
        | "time"
        | "timetz"
        | "time with time zone"
        | "time without time zone"
        | "timestamp"
        | "timestamptz"
        | "timestamp with time zone"
        | "timestamp without time zone" => SqlType::Time,
        "json" | "jsonb" => SqlType::Json,
        _ => unsupported(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mysql(raw: &str) -> SqlType {
        Dialect::MySql.column_type(raw, false).unwrap()
    }

    fn postgres(raw: &str) -> SqlType {
        Dialect::Postgres.column_type(raw, false).unwrap()
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Dialect::from_str("mysql").unwrap(), Dialect::MySql);
        assert_eq!(Dialect::from_str("MariaDB").unwrap(), Dialect::MariaDb);
        assert_eq!(Dialect::from_str("postgres").unwrap(), Dialect::Postgres);
        assert_eq!(Dialect::from_str("pg").unwrap(), Dialect::Postgres);
    }

    #[test]
    fn test_from_str_unsupported() {
        let err = Dialect::from_str("oracle").unwrap_err();
        assert!(matches!(*err, Error::UnsupportedDialect { ref name } if name == "oracle"));
    }

    #[test]
    fn test_type_decl_parse() {
        assert_eq!(
            TypeDecl::parse("INT(11) UNSIGNED"),
            TypeDecl {
                base: "int".to_string(),
                args: Some("11".to_string()),
                unsigned: true,
            }
        );
        assert_eq!(
            TypeDecl::parse("character varying(255)"),
            TypeDecl {
                base: "character varying".to_string(),
                args: Some("255".to_string()),
                unsigned: false,
            }
        );
    }

    #[test]
    fn test_mysql_types() {
        assert_eq!(mysql("varchar(255)"), SqlType::String);
        assert_eq!(mysql("longtext"), SqlType::String);
        assert_eq!(mysql("tinyint(1)"), SqlType::Bool);
        assert_eq!(mysql("boolean"), SqlType::Bool);
        assert_eq!(
            mysql("tinyint(4)"),
            SqlType::Integer {
                kind: IntegerKind::Tiny,
                unsigned: false
            }
        );
        assert_eq!(
            mysql("bigint unsigned"),
            SqlType::Integer {
                kind: IntegerKind::Big,
                unsigned: true
            }
        );
        assert_eq!(mysql("double"), SqlType::Float);
        assert_eq!(mysql("datetime"), SqlType::Time);
        assert_eq!(mysql("json"), SqlType::Json);
    }

    #[test]
    fn test_mysql_unsigned_flag() {
        assert_eq!(
            Dialect::MariaDb.column_type("mediumint", true).unwrap(),
            SqlType::Integer {
                kind: IntegerKind::Medium,
                unsigned: true
            }
        );
    }

    #[test]
    fn test_postgres_types() {
        assert_eq!(postgres("character varying(64)"), SqlType::String);
        assert_eq!(postgres("bool"), SqlType::Bool);
        assert_eq!(
            postgres("serial"),
            SqlType::Integer {
                kind: IntegerKind::Int,
                unsigned: false
            }
        );
        assert_eq!(
            postgres("int8"),
            SqlType::Integer {
                kind: IntegerKind::Big,
                unsigned: false
            }
        );
        assert_eq!(postgres("double precision"), SqlType::Float);
        assert_eq!(postgres("timestamp with time zone"), SqlType::Time);
        assert_eq!(postgres("jsonb"), SqlType::Json);
    }

    #[test]
    fn test_unknown_types_are_kept_raw() {
        assert_eq!(
            mysql("decimal(10,2)"),
            SqlType::Unsupported {
                raw: "decimal(10,2)".to_string()
            }
        );
        assert_eq!(
            postgres("uuid"),
            SqlType::Unsupported {
                raw: "uuid".to_string()
            }
        );
    }

    #[test]
    fn test_postgres_rejects_unsigned() {
        assert!(Dialect::Postgres.column_type("integer", true).is_err());
        assert!(Dialect::Postgres.column_type("int unsigned", false).is_err());
    }
}
