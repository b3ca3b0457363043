//! Property inference from introspected field definitions.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::host::BaseProperty;
use crate::schema::{FieldNode, TypeKind};
use crate::type_mapping::{map_scalar, PropertyType};

const TYPENAME_FIELD: &str = "__typename";

/// Optional visibility/editability heuristics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyPolicy {
    /// Hide fields whose name contains `password`.
    pub hide_password_fields: bool,
    /// Treat `jsonb` columns as read-only.
    pub jsonb_read_only: bool,
}

/// A resource field as an admin-panel property.
///
/// Built fresh by [`Resource::properties`](crate::Resource::properties) and
/// never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    field: Arc<FieldNode>,
    pk_property: String,
    referenced_resource: Option<String>,
    policy: PropertyPolicy,
}

impl Property {
    pub fn new(field: Arc<FieldNode>, pk_property: impl Into<String>) -> Self {
        Self {
            field,
            pk_property: pk_property.into(),
            referenced_resource: None,
            policy: PropertyPolicy::default(),
        }
    }

    /// Mark the property as a reference to another resource.
    pub fn referencing(mut self, resource_name: impl Into<String>) -> Self {
        self.referenced_resource = Some(resource_name.into());
        self
    }

    pub fn with_policy(mut self, policy: PropertyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The underlying field definition.
    pub fn field(&self) -> &FieldNode {
        &self.field
    }

    /// Innermost named GraphQL type, if the schema names one.
    pub fn type_name(&self) -> Option<&str> {
        self.field.ty.named_type()
    }

    /// Whether the field can appear in a flat selection set. Object and
    /// list fields need a sub-selection and are left out.
    pub fn is_selectable(&self) -> bool {
        !self.is_array()
            && !matches!(
                self.field.ty.terminal_kind(),
                TypeKind::Object | TypeKind::Interface | TypeKind::Union
            )
    }
}

impl BaseProperty for Property {
    fn name(&self) -> &str {
        &self.field.name
    }

    fn property_type(&self) -> PropertyType {
        if self.reference().is_some() {
            return PropertyType::Reference;
        }
        self.type_name()
            .map(map_scalar)
            .unwrap_or(PropertyType::String)
    }

    /// `LIST`, or `NON_NULL` wrapping a `LIST`.
    fn is_array(&self) -> bool {
        let ty = &self.field.ty;
        match ty.kind {
            TypeKind::List => true,
            TypeKind::NonNull => ty
                .of_type
                .as_deref()
                .is_some_and(|inner| inner.kind == TypeKind::List),
            _ => false,
        }
    }

    fn is_required(&self) -> bool {
        self.field.ty.kind == TypeKind::NonNull
    }

    fn is_id(&self) -> bool {
        let name = self.name().to_lowercase();
        name == "id" || name == self.pk_property
    }

    fn is_editable(&self) -> bool {
        if self.is_id() || self.is_array() {
            return false;
        }
        !(self.policy.jsonb_read_only && self.type_name() == Some("jsonb"))
    }

    fn is_visible(&self) -> bool {
        if self.name() == TYPENAME_FIELD {
            return false;
        }
        !(self.policy.hide_password_fields && self.name().to_lowercase().contains("password"))
    }

    fn reference(&self) -> Option<&str> {
        self.referenced_resource.as_deref()
    }
}
