//! GraphQL scalar to admin-panel property type mapping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// UI-facing property type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Number,
    Float,
    String,
    Id,
    Boolean,
    Object,
    Date,
    Datetime,
    Reference,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Float => "float",
            Self::String => "string",
            Self::Id => "id",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Reference => "reference",
        }
    }

    /// `date` or `datetime`.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::Datetime)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a named GraphQL scalar to its property type.
///
/// Hasura's `json`/`jsonb` columns become opaque objects. Any scalar not in
/// the table (`uuid`, `numeric`, custom scalars) is treated as text.
pub fn map_scalar(name: &str) -> PropertyType {
    match name {
        "Int" | "bigint" => PropertyType::Number,
        "Float" => PropertyType::Float,
        "String" => PropertyType::String,
        "ID" => PropertyType::Id,
        "Boolean" => PropertyType::Boolean,
        "json" | "jsonb" => PropertyType::Object,
        "timestamp" => PropertyType::Date,
        "timestamptz" => PropertyType::Datetime,
        _ => PropertyType::String,
    }
}
