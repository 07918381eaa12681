//! Supported services, trait labels and activity types.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::api::{ConnectApi, SupportedServices};

/// Lowercased names the platform currently accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportedTaxonomy {
    pub services: HashSet<String>,
    pub traits: HashSet<String>,
    pub activities: HashSet<String>,
}

impl SupportedTaxonomy {
    pub fn new<S, T, A>(services: S, traits: T, activities: A) -> Self
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        Self {
            services: lowercase_set(services),
            traits: lowercase_set(traits),
            activities: lowercase_set(activities),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty() && self.traits.is_empty() && self.activities.is_empty()
    }

    pub fn supports_service(&self, name: &str) -> bool {
        self.services.contains(&name.to_lowercase())
    }

    pub fn supports_trait(&self, name: &str) -> bool {
        self.traits.contains(&name.to_lowercase())
    }

    pub fn supports_activity(&self, name: &str) -> bool {
        self.activities.contains(&name.to_lowercase())
    }
}

impl From<SupportedServices> for SupportedTaxonomy {
    fn from(raw: SupportedServices) -> Self {
        Self::new(raw.services, raw.traits, raw.activities)
    }
}

fn lowercase_set<I>(names: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    names.into_iter().map(|n| n.as_ref().to_lowercase()).collect()
}

/// Fetch the taxonomy once.
///
/// A transport failure yields an empty taxonomy, which rejects every service
/// during validation. The error itself is only logged.
pub async fn fetch_supported_taxonomy(api: &dyn ConnectApi) -> SupportedTaxonomy {
    match api.get_supported_services().await {
        Ok(raw) => {
            let taxonomy = SupportedTaxonomy::from(raw);
            debug!(
                services = taxonomy.services.len(),
                traits = taxonomy.traits.len(),
                activities = taxonomy.activities.len(),
                "fetched supported taxonomy"
            );
            taxonomy
        }
        Err(e) => {
            warn!(error = %e, "failed to fetch supported services; treating taxonomy as empty");
            SupportedTaxonomy::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Application, GraphqlClientError};
    use async_trait::async_trait;

    struct FixedApi(Result<SupportedServices, GraphqlClientError>);

    #[async_trait]
    impl ConnectApi for FixedApi {
        async fn get_app_by_public_key(
            &self,
            _public_key: &str,
        ) -> Result<Option<Application>, GraphqlClientError> {
            Ok(None)
        }

        async fn get_supported_services(&self) -> Result<SupportedServices, GraphqlClientError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn names_are_lowercased() {
        let api = FixedApi(Ok(SupportedServices {
            services: vec!["NETFLIX".into(), "Uber".into()],
            traits: vec!["RATING".into()],
            activities: vec!["TRIP".into()],
        }));

        let taxonomy = fetch_supported_taxonomy(&api).await;
        assert!(taxonomy.services.contains("netflix"));
        assert!(taxonomy.services.contains("uber"));
        assert!(taxonomy.supports_trait("Rating"));
        assert!(taxonomy.supports_activity("trip"));
    }

    #[tokio::test]
    async fn transport_failure_degrades_to_empty() {
        let api = FixedApi(Err(GraphqlClientError::Http("connection refused".into())));
        let taxonomy = fetch_supported_taxonomy(&api).await;
        assert!(taxonomy.is_empty());
    }
}
