//! GraphQL transport.
//!
//! [`Transport`] is the capability a [`Resource`](crate::Resource) needs:
//! run one document with variables and hand back the payload found under the
//! operation's root field. [`Client`] implements it over HTTP with `reqwest`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config;
use crate::error::{GraphQLError, HasuraError};
use crate::schema::{IntrospectionSchema, INTROSPECTION_QUERY};

const ADMIN_SECRET_HEADER: &str = "x-hasura-admin-secret";
const ROLE_HEADER: &str = "x-hasura-role";

/// Executes GraphQL documents. Implementations must allow concurrent
/// in-flight requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Run `document` and return `data[data_path]`.
    async fn execute(
        &self,
        document: &str,
        variables: serde_json::Value,
        data_path: &str,
    ) -> Result<serde_json::Value, HasuraError>;
}

/// HTTP client for a Hasura GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: String,
    admin_secret: Option<String>,
    role: Option<String>,
}

/// Raw GraphQL response shape.
#[derive(serde::Deserialize)]
struct GraphQLResponse {
    data: Option<serde_json::Value>,
    errors: Option<Vec<GraphQLError>>,
}

impl Client {
    /// Create a client for `endpoint` (e.g. `http://localhost:8080/v1/graphql`).
    pub fn new(endpoint: impl Into<String>) -> Result<Self, HasuraError> {
        let endpoint = endpoint.into();
        let url = url::Url::parse(&endpoint).map_err(|e| {
            HasuraError::Config(format!("Invalid endpoint '{}': {}", endpoint, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(HasuraError::Config(format!(
                "Endpoint '{}' must use http or https",
                endpoint
            )));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
            admin_secret: None,
            role: None,
        })
    }

    /// Create a client from `HASURA_GRAPHQL_ENDPOINT` and
    /// `HASURA_GRAPHQL_ADMIN_SECRET`.
    pub fn from_env() -> Result<Self, HasuraError> {
        let client = Self::new(config::endpoint_from_env()?)?;
        Ok(match config::admin_secret_from_env() {
            Some(secret) => client.with_admin_secret(secret),
            None => client,
        })
    }

    /// Send `x-hasura-admin-secret` with every request.
    pub fn with_admin_secret(mut self, secret: impl Into<String>) -> Self {
        self.admin_secret = Some(secret.into());
        self
    }

    /// Send `x-hasura-role` with every request.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute a document and deserialize `data[data_path]`.
    pub async fn execute_as<T: DeserializeOwned>(
        &self,
        document: &str,
        variables: serde_json::Value,
        data_path: &str,
    ) -> Result<T, HasuraError> {
        let value = self.execute_raw(document, variables, data_path).await?;
        serde_json::from_value(value).map_err(|e| {
            HasuraError::MissingData(format!("Failed to deserialize '{}': {}", data_path, e))
        })
    }

    /// Download the endpoint's introspection schema.
    pub async fn introspect(&self) -> Result<IntrospectionSchema, HasuraError> {
        let schema: serde_json::Value = self
            .execute_as(INTROSPECTION_QUERY, serde_json::json!({}), "__schema")
            .await?;
        IntrospectionSchema::from_value(schema)
    }

    async fn execute_raw(
        &self,
        document: &str,
        variables: serde_json::Value,
        data_path: &str,
    ) -> Result<serde_json::Value, HasuraError> {
        let body = serde_json::json!({
            "query": document,
            "variables": variables,
        });

        let mut request = self
            .http
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header(
                "User-Agent",
                format!("hasura-admin-sdk/{}", env!("CARGO_PKG_VERSION")),
            );
        if let Some(secret) = &self.admin_secret {
            request = request.header(ADMIN_SECRET_HEADER, secret);
        }
        if let Some(role) = &self.role {
            request = request.header(ROLE_HEADER, role);
        }

        tracing::debug!(endpoint = %self.endpoint, data_path, "executing GraphQL document");
        let response = request.json(&body).send().await?;

        let status = response.status();
        if status == 401 {
            let text = response.text().await.unwrap_or_default();
            return Err(HasuraError::Authentication(text));
        }
        if status == 403 {
            let text = response.text().await.unwrap_or_default();
            return Err(HasuraError::Forbidden(text));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HasuraError::HttpError {
                status: status.as_u16(),
                body,
            });
        }

        let gql_response: GraphQLResponse = response.json().await?;

        if let Some(errors) = gql_response.errors {
            if !errors.is_empty() {
                // Hasura reports a bad admin secret as a GraphQL error.
                let code = errors[0]
                    .extensions
                    .as_ref()
                    .and_then(|ext| ext.get("code"))
                    .and_then(|c| c.as_str());
                if code == Some("access-denied") {
                    return Err(HasuraError::Authentication(errors[0].message.clone()));
                }
                return Err(HasuraError::GraphQL {
                    errors,
                    operation_name: operation_name_of(document),
                });
            }
        }

        let data = gql_response
            .data
            .ok_or_else(|| HasuraError::MissingData("No data in response".to_string()))?;

        data.get(data_path)
            .cloned()
            .ok_or_else(|| HasuraError::MissingData(format!("No '{}' in response data", data_path)))
    }

    /// Override the endpoint (for testing against mock servers).
    #[cfg(test)]
    pub(crate) fn with_endpoint(mut self, url: String) -> Self {
        self.endpoint = url;
        self
    }
}

#[async_trait]
impl Transport for Client {
    async fn execute(
        &self,
        document: &str,
        variables: serde_json::Value,
        data_path: &str,
    ) -> Result<serde_json::Value, HasuraError> {
        self.execute_raw(document, variables, data_path).await
    }
}

/// Extract the operation name from a document
/// (`"query person_by_pk($id: Int!) { … }"` → `person_by_pk`).
fn operation_name_of(document: &str) -> Option<String> {
    let document = document.trim_start();
    document
        .strip_prefix("query ")
        .or_else(|| document.strip_prefix("mutation "))
        .and_then(|rest| rest.trim_start().split(['(', ' ', '{']).next())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}
