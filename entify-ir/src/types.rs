//! Core type definitions.

use std::fmt;

use serde::Serialize;

/// Semantic kind of a field type.
///
/// Templates branch on it (e.g. numeric keys, JSON payloads), so it
/// serializes as its lowercase name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldTypeKind {
    #[default]
    Unknown,
    Number,
    String,
    Bool,
    Date,
    Json,
}

impl FieldTypeKind {
    /// Get the lowercase string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldTypeKind::Unknown => "unknown",
            FieldTypeKind::Number => "number",
            FieldTypeKind::String => "string",
            FieldTypeKind::Bool => "bool",
            FieldTypeKind::Date => "date",
            FieldTypeKind::Json => "json",
        }
    }
}

impl fmt::Display for FieldTypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_kind_as_str() {
        assert_eq!(FieldTypeKind::Number.as_str(), "number");
        assert_eq!(FieldTypeKind::Json.as_str(), "json");
        assert_eq!(FieldTypeKind::default(), FieldTypeKind::Unknown);
    }

    #[test]
    fn test_field_type_kind_serializes_lowercase() {
        let value = serde_json::to_value(FieldTypeKind::Date).unwrap();
        assert_eq!(value, serde_json::json!("date"));
    }
}
