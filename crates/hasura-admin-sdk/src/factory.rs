//! Resource construction.
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use hasura_admin_sdk::{build_resource, BaseResource, IntrospectionSchema, Relationship, ResourceOptions};
//! use std::sync::Arc;
//!
//! let schema = Arc::new(IntrospectionSchema::from_json(&std::fs::read_to_string("schema.json")?)?);
//! let person = build_resource(
//!     ResourceOptions::new("person", "http://localhost:8080/v1/graphql", schema, "person_id")
//!         .parent("Hasura")
//!         .relationship("drink", Relationship::new("drink", "favorite_drink_id")),
//! )?;
//! let _total = person.count(&[]).await?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::client::{Client, Transport};
use crate::error::HasuraError;
use crate::property::PropertyPolicy;
use crate::resource::Resource;
use crate::schema::IntrospectionSchema;

/// Declares that the field named by the map key is not a plain column but a
/// reference to `resource_name` through the column `reference_field`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(alias = "resourceName")]
    pub resource_name: String,
    #[serde(alias = "referenceField")]
    pub reference_field: String,
}

impl Relationship {
    pub fn new(resource_name: impl Into<String>, reference_field: impl Into<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
            reference_field: reference_field.into(),
        }
    }
}

/// Everything needed to build one [`Resource`].
#[derive(Debug, Clone)]
pub struct ResourceOptions {
    /// Table (type) name in the schema; also the resource id.
    pub id: String,
    /// Grouping label; defaults to `hasura`.
    pub parent: Option<String>,
    pub endpoint: String,
    pub schema: Arc<IntrospectionSchema>,
    pub pk_property: String,
    /// Keyed by the relationship field name.
    pub relationships: BTreeMap<String, Relationship>,
    pub admin_secret: Option<String>,
    pub role: Option<String>,
    pub policy: PropertyPolicy,
}

impl ResourceOptions {
    pub fn new(
        id: impl Into<String>,
        endpoint: impl Into<String>,
        schema: Arc<IntrospectionSchema>,
        pk_property: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            parent: None,
            endpoint: endpoint.into(),
            schema,
            pk_property: pk_property.into(),
            relationships: BTreeMap::new(),
            admin_secret: None,
            role: None,
            policy: PropertyPolicy::default(),
        }
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn relationship(mut self, field: impl Into<String>, relationship: Relationship) -> Self {
        self.relationships.insert(field.into(), relationship);
        self
    }

    pub fn admin_secret(mut self, secret: impl Into<String>) -> Self {
        self.admin_secret = Some(secret.into());
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn policy(mut self, policy: PropertyPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn validate(&self) -> Result<(), HasuraError> {
        if self.id.trim().is_empty() {
            return Err(HasuraError::InvalidOptions(
                "Resource id cannot be empty".to_string(),
            ));
        }
        if self.pk_property.trim().is_empty() {
            return Err(HasuraError::InvalidOptions(format!(
                "Primary key of '{}' cannot be empty",
                self.id
            )));
        }
        if self.schema.types.is_empty() {
            return Err(HasuraError::InvalidOptions(
                "Introspection schema has no types".to_string(),
            ));
        }
        Ok(())
    }
}

/// Build a resource talking to `options.endpoint` over HTTP.
pub fn build_resource(options: ResourceOptions) -> Result<Resource<Client>, HasuraError> {
    if options.endpoint.trim().is_empty() {
        return Err(HasuraError::InvalidOptions(
            "Endpoint cannot be empty".to_string(),
        ));
    }
    options.validate()?;

    let mut client = Client::new(options.endpoint.clone())?;
    if let Some(secret) = &options.admin_secret {
        client = client.with_admin_secret(secret.clone());
    }
    if let Some(role) = &options.role {
        client = client.with_role(role.clone());
    }
    Resource::resolve(options, client)
}

/// Build a resource on a caller-supplied transport. `options.endpoint`,
/// `admin_secret` and `role` are ignored.
pub fn build_resource_with_transport<T: Transport>(
    options: ResourceOptions,
    transport: T,
) -> Result<Resource<T>, HasuraError> {
    options.validate()?;
    Resource::resolve(options, transport)
}
