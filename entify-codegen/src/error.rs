use std::{fmt, io, path::PathBuf};

use entify_schema::Error as SchemaError;
use thiserror::Error;

use crate::format::FormatError;

/// Result type for entify-codegen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure classes a build can end with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SpecRead,
    UnsupportedDialect,
    SpecParse,
    UnsupportedType,
    /// Two generated Go identifiers in one scope came out the same.
    NameCollision,
    TemplateNotFound,
    /// Malformed template text, a binding failure or an unresolved placeholder.
    Template,
    FileSystem,
    /// A destination path would leave the output root.
    InvalidPath,
    Format,
    /// A stage ran without the input an earlier stage provides.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::SpecRead => "spec read error",
            ErrorKind::UnsupportedDialect => "unsupported dialect",
            ErrorKind::SpecParse => "spec parse error",
            ErrorKind::UnsupportedType => "unsupported type",
            ErrorKind::NameCollision => "name collision",
            ErrorKind::TemplateNotFound => "template not found",
            ErrorKind::Template => "template error",
            ErrorKind::FileSystem => "file system error",
            ErrorKind::InvalidPath => "invalid output path",
            ErrorKind::Format => "format error",
            ErrorKind::Internal => "internal error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] Box<SchemaError>),

    #[error("unsupported column type '{raw}'")]
    UnsupportedType { raw: String },

    #[error("'{name}' is declared twice in {scope}")]
    NameCollision { name: String, scope: String },

    #[error("table '{table}'")]
    Table {
        table: String,
        #[source]
        source: Box<Error>,
    },

    #[error("table '{table}', column '{column}'")]
    Column {
        table: String,
        column: String,
        #[source]
        source: Box<Error>,
    },

    #[error("template '{name}' not found")]
    TemplateNotFound { name: String },

    #[error("template '{name}' is malformed")]
    TemplateSyntax {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("failed to render template '{name}'")]
    TemplateRender {
        name: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    #[error("template '{template}' uses placeholder '__{token}__' with no value")]
    MissingPlaceholder { template: String, token: String },

    #[error("template '{template}': '{value}' is not a single path segment for '__{token}__'")]
    UnsafePlaceholder {
        template: String,
        token: String,
        value: String,
    },

    #[error("failed to write '{}'", .path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to format the output of template '{template}'")]
    Format {
        template: String,
        #[source]
        source: FormatError,
    },

    #[error("no {needs} available; stages ran out of order")]
    StageOrder { needs: &'static str },

    #[error("{stage} failed")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a file system error for `path`.
    pub fn file_system(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Attach table context to a failure raised for a whole table.
    pub fn in_table(self, table: impl Into<String>) -> Self {
        Error::Table {
            table: table.into(),
            source: Box::new(self),
        }
    }

    /// Attach table/column context to a failure raised for one column.
    pub fn in_column(self, table: impl Into<String>, column: impl Into<String>) -> Self {
        Error::Column {
            table: table.into(),
            column: column.into(),
            source: Box::new(self),
        }
    }

    /// Classify the error, looking through context wrappers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Schema(err) => match &**err {
                SchemaError::Io { .. } => ErrorKind::SpecRead,
                SchemaError::UnsupportedDialect { .. } => ErrorKind::UnsupportedDialect,
                _ => ErrorKind::SpecParse,
            },
            Error::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            Error::NameCollision { .. } => ErrorKind::NameCollision,
            Error::Table { source, .. }
            | Error::Column { source, .. }
            | Error::Stage { source, .. } => source.kind(),
            Error::TemplateNotFound { .. } => ErrorKind::TemplateNotFound,
            Error::TemplateSyntax { .. }
            | Error::TemplateRender { .. }
            | Error::MissingPlaceholder { .. } => ErrorKind::Template,
            Error::FileSystem { .. } => ErrorKind::FileSystem,
            Error::UnsafePlaceholder { .. } => ErrorKind::InvalidPath,
            Error::Format { .. } => ErrorKind::Format,
            Error::StageOrder { .. } => ErrorKind::Internal,
        }
    }

    /// Name of the stage the error was raised in, if it went through the pipeline.
    pub fn stage(&self) -> Option<&'static str> {
        match self {
            Error::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Unwrap stage wrappers down to a schema diagnostic.
    ///
    /// Schema errors carry source spans and render best through `miette`;
    /// anything else is handed back unchanged.
    pub fn into_schema_error(self) -> std::result::Result<Box<SchemaError>, Self> {
        match self {
            Error::Schema(err) => Ok(err),
            Error::Stage { stage, source } => (*source)
                .into_schema_error()
                .map_err(|source| Error::Stage {
                    stage,
                    source: Box::new(source),
                }),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_looks_through_wrappers() {
        let err = Error::UnsupportedType {
            raw: "decimal(10,2)".to_string(),
        }
        .in_column("orders", "total");
        let err = Error::Stage {
            stage: "build-models",
            source: Box::new(err),
        };

        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
        assert_eq!(err.stage(), Some("build-models"));
    }

    #[test]
    fn test_schema_error_kinds() {
        let err = Error::from(SchemaError::unsupported_dialect("oracle"));
        assert_eq!(err.kind(), ErrorKind::UnsupportedDialect);

        let err = Error::from(Box::new(SchemaError::Io {
            path: PathBuf::from("missing.toml"),
            source: io::Error::from(io::ErrorKind::NotFound),
        }));
        assert_eq!(err.kind(), ErrorKind::SpecRead);
    }

    #[test]
    fn test_into_schema_error_unwraps_stage() {
        let err = Error::Stage {
            stage: "parse-spec",
            source: Box::new(Error::from(SchemaError::unsupported_dialect("oracle"))),
        };
        let schema = err.into_schema_error().unwrap();
        assert!(matches!(*schema, SchemaError::UnsupportedDialect { .. }));
    }

    #[test]
    fn test_into_schema_error_keeps_other_errors() {
        let err = Error::Stage {
            stage: "emit-shared",
            source: Box::new(Error::TemplateNotFound {
                name: "client.go.tmpl".to_string(),
            }),
        };
        let err = err.into_schema_error().unwrap_err();
        assert_eq!(err.stage(), Some("emit-shared"));
        assert_eq!(err.kind(), ErrorKind::TemplateNotFound);
    }

    #[test]
    fn test_column_message() {
        let err = Error::UnsupportedType {
            raw: "blob".to_string(),
        }
        .in_column("files", "data");
        assert_eq!(err.to_string(), "table 'files', column 'data'");
    }
}
