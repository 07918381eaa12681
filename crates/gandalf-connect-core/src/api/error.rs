//! Error types for the GraphQL transport.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error entry from a GraphQL response. Only the message is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl GraphqlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extensions: None,
        }
    }
}

/// Error type for GraphQL client operations.
#[derive(Debug, Clone, Error)]
pub enum GraphqlClientError {
    /// HTTP/network error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-success HTTP status.
    #[error("HTTP status {status} with body: {body}")]
    Status { status: StatusCode, body: String },

    /// The server answered with a GraphQL `errors` array.
    #[error("{}", join_messages(.errors))]
    GraphqlErrors { errors: Vec<GraphqlError> },

    /// The response was well-formed JSON but not a usable GraphQL response.
    #[error("GraphQL protocol error: {message}")]
    Protocol { message: String },

    /// Request or response body could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(String),
}

fn join_messages(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<reqwest::Error> for GraphqlClientError {
    fn from(err: reqwest::Error) -> Self {
        GraphqlClientError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for GraphqlClientError {
    fn from(err: serde_json::Error) -> Self {
        GraphqlClientError::Json(err.to_string())
    }
}
