//! Hasura table exposed as an admin-panel resource.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::client::{Client, Transport};
use crate::error::HasuraError;
use crate::factory::{Relationship, ResourceOptions};
use crate::host::{BaseProperty, BaseResource};
use crate::property::{Property, PropertyPolicy};
use crate::querying::{
    count_variables, create_variables, delete_variables, find_many_variables,
    find_one_variables, find_variables, mutation_document, operation_name, query_document,
    strip_typename, update_variables, Filter, FindOptions, Operation, Variables, TYPENAME_FIELD,
};
use crate::record::{unflatten_params, Params, Record};
use crate::schema::FieldNode;

pub const DATABASE_TYPE: &str = "hasura";

/// Marker Hasura puts in the description of relationship fields
/// ("An object relationship", "An array relationship").
const RELATIONSHIP_MARKER: &str = "relationship";

/// One Hasura table or view.
///
/// The field list is resolved once from the introspection schema; every
/// other call is stateless, so a resource can be shared between tasks.
#[derive(Debug, Clone)]
pub struct Resource<T: Transport = Client> {
    resource_name: String,
    database_name: String,
    pk_property: String,
    pk_type: String,
    transport: T,
    fields: Vec<Arc<FieldNode>>,
    relationships: BTreeMap<String, Relationship>,
    policy: PropertyPolicy,
}

impl<T: Transport> Resource<T> {
    /// Resolve `options.id` against the schema and bind `transport`.
    pub(crate) fn resolve(options: ResourceOptions, transport: T) -> Result<Self, HasuraError> {
        let definition = options.schema.find_type(&options.id).ok_or_else(|| {
            HasuraError::SchemaResolution(format!("No type '{}' in schema", options.id))
        })?;
        let fields: Vec<Arc<FieldNode>> = definition
            .fields
            .iter()
            .flatten()
            .cloned()
            .map(Arc::new)
            .collect();

        let pk_field = fields
            .iter()
            .find(|f| f.name == options.pk_property)
            .ok_or_else(|| {
                HasuraError::SchemaResolution(format!(
                    "Primary key '{}' is not a field of '{}'",
                    options.pk_property, options.id
                ))
            })?;
        let mut pk_type = pk_field.ty.render();
        if !pk_type.ends_with('!') {
            pk_type.push('!');
        }

        for (field, relationship) in &options.relationships {
            if !fields.iter().any(|f| f.name == relationship.reference_field) {
                tracing::warn!(
                    resource = %options.id,
                    relationship = %field,
                    reference_field = %relationship.reference_field,
                    "relationship reference column not found, skipping"
                );
            }
        }

        let resource = Self {
            database_name: options.parent.unwrap_or_else(|| DATABASE_TYPE.to_string()),
            resource_name: options.id,
            pk_property: options.pk_property,
            pk_type,
            transport,
            fields,
            relationships: options.relationships,
            policy: options.policy,
        };
        if resource.selection().is_empty() {
            return Err(HasuraError::SchemaResolution(format!(
                "'{}' has no scalar column to select",
                resource.resource_name
            )));
        }
        Ok(resource)
    }

    pub fn pk_property(&self) -> &str {
        &self.pk_property
    }

    /// Non-null GraphQL type of the primary key column, e.g. `bigint!`.
    pub fn pk_type(&self) -> &str {
        &self.pk_type
    }

    pub fn fields(&self) -> &[Arc<FieldNode>] {
        &self.fields
    }

    pub fn relationships(&self) -> &BTreeMap<String, Relationship> {
        &self.relationships
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn property_for(&self, field: &Arc<FieldNode>) -> Property {
        Property::new(Arc::clone(field), self.pk_property.clone()).with_policy(self.policy)
    }

    fn relationship_by_column(&self, column: &str) -> Option<&Relationship> {
        self.relationships
            .values()
            .find(|r| r.reference_field == column)
    }

    fn is_claimed(&self, field: &FieldNode) -> bool {
        self.relationships.contains_key(&field.name)
            || self.relationship_by_column(&field.name).is_some()
            || field
                .description
                .as_deref()
                .is_some_and(|d| d.contains(RELATIONSHIP_MARKER))
    }

    /// Space-separated selection of every flat property.
    pub fn selection(&self) -> String {
        self.properties()
            .iter()
            .filter(|p| p.is_selectable())
            .map(|p| p.name().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn record(&self, row: Value) -> Record {
        Record::new(strip_typename(row), &self.resource_name, &self.pk_property)
    }

    fn records(&self, payload: Value, data_path: &str) -> Result<Vec<Record>, HasuraError> {
        match payload {
            Value::Array(rows) => Ok(rows.into_iter().map(|row| self.record(row)).collect()),
            Value::Null => Ok(Vec::new()),
            other => Err(HasuraError::MissingData(format!(
                "Expected a list at '{}', got {}",
                data_path, other
            ))),
        }
    }

    async fn run(
        &self,
        operation: Operation,
        variables: &Variables,
        selection: &str,
    ) -> Result<(Value, String), HasuraError> {
        let name = operation_name(&self.resource_name, operation);
        let document = if operation.is_mutation() {
            mutation_document(&name, variables, selection)
        } else {
            query_document(&name, variables, selection)
        };
        tracing::debug!(
            resource = %self.resource_name,
            %operation,
            variables = variables.len(),
            "running {}",
            name
        );
        let payload = self
            .transport
            .execute(&document, variables.values(), &name)
            .await?;
        Ok((payload, name))
    }
}

#[async_trait]
impl<T: Transport> BaseResource for Resource<T> {
    type Property = Property;

    fn id(&self) -> &str {
        &self.resource_name
    }

    fn database_name(&self) -> &str {
        &self.database_name
    }

    fn database_type(&self) -> &str {
        DATABASE_TYPE
    }

    /// Reference properties (one per relationship whose column exists) in
    /// field order, then every unclaimed plain field in field order.
    fn properties(&self) -> Vec<Property> {
        let references = self.fields.iter().filter_map(|field| {
            self.relationship_by_column(&field.name)
                .map(|r| self.property_for(field).referencing(r.resource_name.clone()))
        });
        let plain = self
            .fields
            .iter()
            .filter(|field| !self.is_claimed(field))
            .map(|field| self.property_for(field));
        references.chain(plain).collect()
    }

    async fn count(&self, filters: &[Filter]) -> Result<u64, HasuraError> {
        let variables = count_variables(&self.resource_name, filters);
        let (payload, name) = self
            .run(Operation::Count, &variables, "aggregate { count }")
            .await?;
        payload
            .pointer("/aggregate/count")
            .and_then(Value::as_u64)
            .ok_or_else(|| HasuraError::MissingData(format!("No 'aggregate.count' in '{}'", name)))
    }

    async fn find(
        &self,
        filters: &[Filter],
        options: FindOptions,
    ) -> Result<Vec<Record>, HasuraError> {
        let variables = find_variables(&self.resource_name, filters, &options);
        let (payload, name) = self
            .run(Operation::Find, &variables, &self.selection())
            .await?;
        self.records(payload, &name)
    }

    async fn find_one(&self, id: &str) -> Result<Record, HasuraError> {
        let variables = find_one_variables(id, &self.pk_property, &self.pk_type);
        let (payload, _) = self
            .run(Operation::FindOne, &variables, &self.selection())
            .await?;
        Ok(self.record(payload))
    }

    async fn find_many(&self, ids: &[String]) -> Result<Vec<Record>, HasuraError> {
        let variables =
            find_many_variables(ids, &self.pk_property, &self.pk_type, &self.resource_name);
        let (payload, name) = self
            .run(Operation::FindMany, &variables, &self.selection())
            .await?;
        self.records(payload, &name)
    }

    async fn create(&self, params: Params) -> Result<Record, HasuraError> {
        let variables = create_variables(unflatten_params(params), &self.resource_name);
        let selection = format!("returning {{ {} }}", self.selection());
        let (payload, name) = self.run(Operation::Create, &variables, &selection).await?;
        let row = payload
            .pointer("/returning/0")
            .cloned()
            .ok_or_else(|| HasuraError::MissingData(format!("No returned row in '{}'", name)))?;
        Ok(self.record(row))
    }

    async fn update(&self, id: &str, mut params: Params) -> Result<Record, HasuraError> {
        params.remove(TYPENAME_FIELD);
        let variables = update_variables(
            id,
            unflatten_params(params),
            &self.pk_property,
            &self.pk_type,
            &self.resource_name,
        );
        let (payload, _) = self
            .run(Operation::Update, &variables, &self.selection())
            .await?;
        Ok(self.record(payload))
    }

    async fn delete(&self, id: &str) -> Result<(), HasuraError> {
        let variables = delete_variables(id, &self.pk_property, &self.pk_type);
        self.run(Operation::Delete, &variables, &self.selection())
            .await?;
        Ok(())
    }
}
