//! Endpoint and credential resolution from the environment.

use crate::error::HasuraError;

pub const ENDPOINT_ENV: &str = "HASURA_GRAPHQL_ENDPOINT";
pub const ADMIN_SECRET_ENV: &str = "HASURA_GRAPHQL_ADMIN_SECRET";

/// Resolve the GraphQL endpoint from `HASURA_GRAPHQL_ENDPOINT`.
pub fn endpoint_from_env() -> Result<String, HasuraError> {
    non_empty_var(ENDPOINT_ENV)
        .ok_or_else(|| HasuraError::Config(format!("{} environment variable not set", ENDPOINT_ENV)))
}

/// Resolve the admin secret from `HASURA_GRAPHQL_ADMIN_SECRET`, if any.
/// Endpoints without access control need none.
pub fn admin_secret_from_env() -> Option<String> {
    non_empty_var(ADMIN_SECRET_ENV)
}

/// Pick the explicit value if given, else the environment's.
pub fn resolve_endpoint(explicit: Option<String>) -> Result<String, HasuraError> {
    match explicit.filter(|e| !e.trim().is_empty()) {
        Some(endpoint) => Ok(endpoint),
        None => endpoint_from_env(),
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
