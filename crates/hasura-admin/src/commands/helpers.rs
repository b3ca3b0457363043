use anyhow::Context as _;
use hasura_admin_sdk::config::{admin_secret_from_env, resolve_endpoint};
use hasura_admin_sdk::{
    build_resource, BaseProperty, BaseResource, Client, Filter, IntrospectionSchema, Params,
    Property, PropertyType, Resource, ResourceOptions,
};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ResourcesConfig;

/// Connection and resource settings shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub endpoint: Option<String>,
    pub admin_secret: Option<String>,
    pub role: Option<String>,
    pub schema_path: Option<PathBuf>,
    pub config: ResourcesConfig,
}

impl Context {
    fn endpoint(&self) -> anyhow::Result<String> {
        Ok(resolve_endpoint(self.endpoint.clone())?)
    }

    fn admin_secret(&self) -> Option<String> {
        self.admin_secret.clone().or_else(admin_secret_from_env)
    }

    pub fn client(&self) -> anyhow::Result<Client> {
        let mut client = Client::new(self.endpoint()?)?;
        if let Some(secret) = self.admin_secret() {
            client = client.with_admin_secret(secret);
        }
        if let Some(role) = &self.role {
            client = client.with_role(role.clone());
        }
        Ok(client)
    }

    /// The `--schema` file if given, else a fresh introspection.
    pub async fn schema(&self) -> anyhow::Result<Arc<IntrospectionSchema>> {
        let schema = match &self.schema_path {
            Some(path) => {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read schema '{}'", path.display()))?;
                IntrospectionSchema::from_json(&text)?
            }
            None => {
                tracing::info!("no --schema given, introspecting endpoint");
                self.client()?.introspect().await?
            }
        };
        Ok(Arc::new(schema))
    }

    /// Build the resource for table `id` from the config file entry, or with
    /// `id` as primary key when the config does not list it.
    pub async fn resource(&self, id: &str) -> anyhow::Result<Resource> {
        let endpoint = self.endpoint()?;
        let entry = self.config.entry(id);
        let schema = self.schema().await?;

        let mut options = ResourceOptions::new(entry.id, endpoint, schema, entry.pk_property)
            .policy(self.config.policy);
        options.relationships = entry.relationships;
        if let Some(parent) = entry.parent {
            options = options.parent(parent);
        }
        if let Some(secret) = self.admin_secret() {
            options = options.admin_secret(secret);
        }
        if let Some(role) = &self.role {
            options = options.role(role.clone());
        }
        Ok(build_resource(options)?)
    }
}

/// Parse a command-line value: JSON if it parses, else a plain string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Parse a value for `property`. Text columns keep the raw text, so
/// `name=123` stays a string; a JSON array still matches any of its
/// elements, each as text.
pub fn typed_value(property: Option<&Property>, raw: &str) -> Value {
    let is_text = property.is_some_and(|p| {
        matches!(p.property_type(), PropertyType::String | PropertyType::Id)
    });
    if !is_text {
        return parse_value(raw);
    }
    match parse_value(raw) {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(_) | Value::Null => item,
                    other => Value::String(other.to_string()),
                })
                .collect(),
        ),
        _ => Value::String(raw.to_string()),
    }
}

/// Split `FIELD=VALUE`, keeping the value as raw text.
pub fn parse_assignment(raw: &str) -> anyhow::Result<(String, String)> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Expected FIELD=VALUE, got '{}'", raw))?;
    let field = field.trim();
    if field.is_empty() {
        anyhow::bail!("Expected FIELD=VALUE, got '{}'", raw);
    }
    Ok((field.to_string(), value.to_string()))
}

pub fn parse_assignments(raw: &[String]) -> anyhow::Result<Vec<(String, String)>> {
    raw.iter().map(|r| parse_assignment(r)).collect()
}

/// Record params, typed by the resource's properties. Dotted paths into
/// JSON columns are parsed as plain values.
pub fn to_params(resource: &Resource, assignments: Vec<(String, String)>) -> Params {
    assignments
        .into_iter()
        .map(|(path, raw)| {
            let value = typed_value(resource.property(&path).as_ref(), &raw);
            (path, value)
        })
        .collect()
}

/// Turn assignments into filters with the property metadata attached, so
/// date ranges are recognized. Fields that are not properties of the
/// resource are skipped with a warning.
pub fn to_filters(resource: &Resource, assignments: Vec<(String, String)>) -> Vec<Filter> {
    assignments
        .into_iter()
        .filter_map(|(path, raw)| match resource.property(&path) {
            Some(property) => {
                let value = typed_value(Some(&property), &raw);
                Some(Filter::new(path, value).with_property(property))
            }
            None => {
                tracing::warn!(resource = resource.id(), field = %path, "not a property, filter ignored");
                None
            }
        })
        .collect()
}
