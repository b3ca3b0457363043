//! Admin-panel resources backed by Hasura GraphQL tables.
//!
//! Given an introspection schema, an endpoint and a primary key name,
//! [`build_resource`] produces a [`Resource`] that lists, counts, fetches,
//! creates, updates and deletes rows of one table, and describes the
//! table's columns as typed [`Property`] values for forms and filters.

pub mod client;
pub mod config;
pub mod error;
pub mod factory;
pub mod host;
pub mod property;
pub mod querying;
pub mod record;
pub mod resource;
pub mod schema;
pub mod type_mapping;

// Re-export key types at crate root for convenience.
pub use client::{Client, Transport};
pub use error::{GraphQLError, HasuraError};
pub use factory::{build_resource, build_resource_with_transport, Relationship, ResourceOptions};
pub use host::{BaseProperty, BaseResource};
pub use property::{Property, PropertyPolicy};
pub use querying::{Filter, FindOptions, Operation, Sort, SortDirection};
pub use record::{Params, Record, RecordJson};
pub use resource::Resource;
pub use schema::{FieldNode, IntrospectionSchema, TypeKind, TypeNode};
pub use type_mapping::PropertyType;
