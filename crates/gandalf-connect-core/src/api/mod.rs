pub mod client;
pub mod error;
pub mod operation;

pub use client::GraphqlClient;
pub use error::{GraphqlClientError, GraphqlError};

use async_trait::async_trait;

/// Application registered on the Gandalf platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub app_name: String,
    pub gandalf_id: String,
}

/// Raw enum value names as published by the platform schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportedServices {
    pub services: Vec<String>,
    pub traits: Vec<String>,
    pub activities: Vec<String>,
}

/// The two read operations a session needs from the Gandalf platform.
///
/// [`GraphqlClient`] is the production implementation; sessions accept any
/// implementation so the transport can be swapped or stubbed.
#[async_trait]
pub trait ConnectApi: Send + Sync {
    /// Resolve a public key. `Ok(None)` when the key is unknown.
    async fn get_app_by_public_key(
        &self,
        public_key: &str,
    ) -> Result<Option<Application>, GraphqlClientError>;

    /// Fetch the services, trait labels and activity types currently supported.
    async fn get_supported_services(&self) -> Result<SupportedServices, GraphqlClientError>;
}
