//! Error types for the Hasura admin SDK.
//!
//! [`HasuraError`] covers schema resolution failures at construction time,
//! HTTP transport errors, GraphQL-level errors, and malformed options.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single GraphQL error from the response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
    #[serde(default)]
    pub path: Option<Vec<serde_json::Value>>,
}

/// Errors that can occur while building or using a Hasura resource.
#[derive(Debug)]
pub enum HasuraError {
    /// The resource identifier (or its primary key) has no match in the
    /// introspection schema.
    SchemaResolution(String),
    /// An operation kind without a query or mutation name.
    UnsupportedOperation(String),
    /// Required resource options are missing or empty.
    InvalidOptions(String),
    /// Configuration error (bad endpoint URL, missing environment variable).
    Config(String),
    /// Network or HTTP transport error.
    Network(reqwest::Error),
    /// The endpoint rejected the credentials.
    Authentication(String),
    /// The credentials lack permission for the operation.
    Forbidden(String),
    /// Non-2xx HTTP response not covered by a more specific variant.
    HttpError { status: u16, body: String },
    /// GraphQL errors returned by the endpoint.
    GraphQL {
        errors: Vec<GraphQLError>,
        operation_name: Option<String>,
    },
    /// The requested data path was not found in the response.
    MissingData(String),
}

impl HasuraError {
    /// Whether the error was surfaced by the transport layer (network, HTTP
    /// status, or a GraphQL `errors` payload).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::Authentication(_)
                | Self::Forbidden(_)
                | Self::HttpError { .. }
                | Self::GraphQL { .. }
                | Self::MissingData(_)
        )
    }
}

impl fmt::Display for HasuraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaResolution(msg) => write!(f, "Schema resolution error: {}", msg),
            Self::UnsupportedOperation(op) => write!(f, "Unsupported operation: {}", op),
            Self::InvalidOptions(msg) => write!(f, "Invalid resource options: {}", msg),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Network(e) => write!(f, "Network error: {}", e),
            Self::Authentication(msg) => write!(f, "Authentication error: {}", msg),
            Self::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            Self::HttpError { status, body } => {
                write!(f, "HTTP error {}: {}", status, body)
            }
            Self::GraphQL {
                errors,
                operation_name,
            } => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| {
                        let mut parts = vec![e.message.clone()];
                        if let Some(path) = &e.path {
                            let path_str: Vec<String> =
                                path.iter().map(|p| p.to_string()).collect();
                            parts.push(format!("at {}", path_str.join(".")));
                        }
                        if let Some(ext) = &e.extensions {
                            parts.push(format!("({})", ext));
                        }
                        parts.join(" ")
                    })
                    .collect();
                if let Some(name) = operation_name {
                    write!(f, "GraphQL errors in {}: {}", name, msgs.join("; "))
                } else {
                    write!(f, "GraphQL errors: {}", msgs.join("; "))
                }
            }
            Self::MissingData(path) => write!(f, "Missing data at path: {}", path),
        }
    }
}

impl std::error::Error for HasuraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Network(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HasuraError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e)
    }
}
