use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for entify-schema operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Encapsulates the spec content and filename, reducing parameter passing
/// in error factory functions.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    /// Create a new source context.
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    /// Get the source content.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Get the filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create a parse error from a toml error.
    pub fn parse_error(&self, source: toml::de::Error) -> Box<Error> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            src: self.named_source(),
            span,
            source,
        })
    }

    /// Create a validation error, pointing at `span` when known.
    pub fn validation_error(
        &self,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::Validation {
            src: self.named_source(),
            span,
            message: message.into(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(
        code(entify::read_error),
        help("check that the spec file exists and is readable")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dialect '{name}' is not supported")]
    #[diagnostic(
        code(entify::unsupported_dialect),
        help("supported dialects are: mysql, mariadb, postgres")
    )]
    UnsupportedDialect { name: String },

    #[error("spec file '{filename}' is not valid UTF-8")]
    #[diagnostic(code(entify::encoding_error))]
    Encoding {
        filename: String,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("failed to parse schema spec")]
    #[diagnostic(code(entify::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(entify::validation_error))]
    Validation {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },
}

impl Error {
    /// Create an unsupported dialect error.
    pub fn unsupported_dialect(name: impl Into<String>) -> Box<Self> {
        Box::new(Error::UnsupportedDialect { name: name.into() })
    }

    /// Whether the error stems from reading the spec file.
    pub fn is_read_error(&self) -> bool {
        matches!(self, Error::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_keeps_message_and_span() {
        let ctx = SourceContext::new("name = \"users\"", "schema.toml");
        let err = ctx.validation_error("duplicate table 'users'", Some((8, 5).into()));

        assert_eq!(err.to_string(), "duplicate table 'users'");
        match *err {
            Error::Validation { span, .. } => assert_eq!(span, Some((8, 5).into())),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_dialect_message() {
        let err = Error::unsupported_dialect("oracle");
        assert_eq!(err.to_string(), "dialect 'oracle' is not supported");
        assert!(!err.is_read_error());
    }
}
