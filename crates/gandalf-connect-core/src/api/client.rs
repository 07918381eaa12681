//! GraphQL HTTP client for the Gandalf public endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::error::GraphqlClientError;
use super::operation::{
    GetAppByPublicKey, GetSupportedServices, GraphqlOperation, GraphqlRequest, GraphqlResponse,
    IntrospectedEnum, NoVars, PublicKeyVars,
};
use super::{Application, ConnectApi, SupportedServices};
use crate::config::{ConnectConfig, DEFAULT_ENDPOINT};

/// GraphQL client.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    endpoint: String,
    http: Client,
}

impl GraphqlClient {
    /// Create a client for `endpoint` with the given request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, GraphqlClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }

    pub fn from_config(config: &ConnectConfig) -> Result<Self, GraphqlClientError> {
        Self::new(config.endpoint.clone(), config.request_timeout())
    }

    /// Execute a typed operation and return the full response.
    pub async fn execute<O: GraphqlOperation>(
        &self,
        variables: O::Variables,
    ) -> Result<GraphqlResponse<O::ResponseData>, GraphqlClientError> {
        let request = GraphqlRequest {
            query: O::QUERY,
            variables,
            operation_name: O::OPERATION_NAME,
        };

        debug!(
            operation = O::OPERATION_NAME,
            endpoint = %self.endpoint,
            "sending GraphQL request"
        );

        let resp = self.http.post(&self.endpoint).json(&request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GraphqlClientError::Status { status, body });
        }

        let bytes = resp.bytes().await?;
        let response: GraphqlResponse<O::ResponseData> = serde_json::from_slice(&bytes)?;

        debug!(
            operation = O::OPERATION_NAME,
            errors = response.errors.len(),
            has_data = response.data.is_some(),
            "GraphQL response received"
        );

        Ok(response)
    }

    /// Execute a typed operation and return its data.
    ///
    /// Partial responses are accepted: errors only fail the call when no
    /// data came back.
    pub async fn execute_data<O: GraphqlOperation>(
        &self,
        variables: O::Variables,
    ) -> Result<O::ResponseData, GraphqlClientError> {
        let response = self.execute::<O>(variables).await?;
        match response.data {
            Some(data) => {
                if !response.errors.is_empty() {
                    warn!(
                        operation = O::OPERATION_NAME,
                        errors = response.errors.len(),
                        "GraphQL response carried errors alongside data"
                    );
                }
                Ok(data)
            }
            None if !response.errors.is_empty() => Err(GraphqlClientError::GraphqlErrors {
                errors: response.errors,
            }),
            None => Err(GraphqlClientError::Protocol {
                message: "missing GraphQL data".to_string(),
            }),
        }
    }
}

impl Default for GraphqlClient {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            http: Client::new(),
        }
    }
}

impl GraphqlClient {
    /// Plain HTTP client for the configured endpoint, used when the tuned
    /// builder fails.
    pub(crate) fn fallback(config: &ConnectConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl ConnectApi for GraphqlClient {
    async fn get_app_by_public_key(
        &self,
        public_key: &str,
    ) -> Result<Option<Application>, GraphqlClientError> {
        let data = self
            .execute_data::<GetAppByPublicKey>(PublicKeyVars {
                public_key: public_key.to_string(),
            })
            .await?;

        Ok(data.app.map(|node| Application {
            app_name: node.app_name,
            gandalf_id: node.gandalf_id,
        }))
    }

    async fn get_supported_services(&self) -> Result<SupportedServices, GraphqlClientError> {
        let data = self.execute_data::<GetSupportedServices>(NoVars {}).await?;

        let names = |e: Option<IntrospectedEnum>| {
            e.map(|e| e.value_names()).unwrap_or_default()
        };

        Ok(SupportedServices {
            services: names(data.source_type),
            traits: names(data.trait_type),
            activities: names(data.activity_type),
        })
    }
}
