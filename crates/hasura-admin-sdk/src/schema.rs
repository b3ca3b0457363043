//! GraphQL introspection data model.
//!
//! Only the parts of the introspection document the adapter reads are
//! modelled: the type list, each type's fields, and the recursive type
//! references of those fields. Unknown keys are ignored.

use crate::error::HasuraError;
use serde::{Deserialize, Serialize};

/// Standard introspection query. The `TypeRef` fragment unwraps seven
/// levels, enough for `[[T!]!]!`-style references.
pub const INTROSPECTION_QUERY: &str = r#"
query IntrospectionQuery {
  __schema {
    types {
      kind
      name
      description
      fields(includeDeprecated: true) {
        name
        description
        args {
          name
          description
          type { ...TypeRef }
          defaultValue
        }
        type { ...TypeRef }
        isDeprecated
        deprecationReason
      }
    }
  }
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
            }
          }
        }
      }
    }
  }
}
"#;

/// The `kind` of a GraphQL type node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
    #[serde(other)]
    Unknown,
}

/// A (possibly wrapped) type reference.
///
/// `LIST` and `NON_NULL` nodes carry no name and wrap `of_type`; terminal
/// nodes carry the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeNode {
    pub kind: TypeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub of_type: Option<Box<TypeNode>>,
}

impl TypeNode {
    /// A terminal scalar node.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Scalar,
            name: Some(name.into()),
            of_type: None,
        }
    }

    /// Wrap `inner` in a `NON_NULL` node.
    pub fn non_null(inner: TypeNode) -> Self {
        Self {
            kind: TypeKind::NonNull,
            name: None,
            of_type: Some(Box::new(inner)),
        }
    }

    /// Wrap `inner` in a `LIST` node.
    pub fn list(inner: TypeNode) -> Self {
        Self {
            kind: TypeKind::List,
            name: None,
            of_type: Some(Box::new(inner)),
        }
    }

    /// Strip `LIST`/`NON_NULL` wrappers until a named node is found.
    ///
    /// Returns `None` when the chain ends without a name, which only
    /// happens for a malformed schema.
    pub fn named_type(&self) -> Option<&str> {
        if let Some(name) = self.name.as_deref() {
            return Some(name);
        }
        self.of_type.as_deref().and_then(TypeNode::named_type)
    }

    /// Kind of the innermost node.
    pub fn terminal_kind(&self) -> TypeKind {
        match self.of_type.as_deref() {
            Some(inner) if self.name.is_none() => inner.terminal_kind(),
            _ => self.kind,
        }
    }

    /// Render the reference in SDL notation, e.g. `[String!]!`.
    pub fn render(&self) -> String {
        match self.kind {
            TypeKind::NonNull => format!("{}!", self.render_inner()),
            TypeKind::List => format!("[{}]", self.render_inner()),
            _ => self.name.clone().unwrap_or_else(|| "String".to_string()),
        }
    }

    fn render_inner(&self) -> String {
        self.of_type
            .as_deref()
            .map(TypeNode::render)
            .unwrap_or_else(|| "String".to_string())
    }
}

/// An argument of a field definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentNode {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeNode,
    #[serde(default)]
    pub default_value: Option<String>,
}

/// A field definition, verbatim from the introspection document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldNode {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub args: Vec<ArgumentNode>,
    #[serde(rename = "type")]
    pub ty: TypeNode,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

impl FieldNode {
    pub fn new(name: impl Into<String>, ty: TypeNode) -> Self {
        Self {
            name: name.into(),
            description: None,
            args: Vec::new(),
            ty,
            is_deprecated: false,
            deprecation_reason: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A named type of the schema. Only object-like types carry `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefinition {
    pub kind: TypeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<FieldNode>>,
}

/// The `__schema` object of an introspection result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntrospectionSchema {
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
}

impl IntrospectionSchema {
    /// Parse an introspection document.
    ///
    /// Accepts the bare `__schema` object, `{"__schema": …}` as written by
    /// schema download tools, or a whole response `{"data": {"__schema": …}}`.
    pub fn from_json(text: &str) -> Result<Self, HasuraError> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| HasuraError::SchemaResolution(format!("Invalid schema JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Same as [`from_json`](Self::from_json) for an already parsed value.
    pub fn from_value(mut value: serde_json::Value) -> Result<Self, HasuraError> {
        if let Some(data) = value.get_mut("data") {
            value = data.take();
        }
        if let Some(schema) = value.get_mut("__schema") {
            value = schema.take();
        }
        serde_json::from_value(value).map_err(|e| {
            HasuraError::SchemaResolution(format!("Invalid introspection schema: {}", e))
        })
    }

    /// Exact-name lookup in the type list.
    pub fn find_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.iter().find(|t| t.name.as_deref() == Some(name))
    }
}
