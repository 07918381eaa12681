//! Public key verification.

use tracing::info;

use crate::api::{Application, ConnectApi};
use crate::error::{ConnectError, Result};

/// Resolve `public_key` to a registered application.
///
/// Every failure, transport included, is reported as `InvalidPublicKey`.
pub async fn verify_public_key(api: &dyn ConnectApi, public_key: &str) -> Result<Application> {
    let app = api
        .get_app_by_public_key(public_key)
        .await
        .map_err(|e| ConnectError::invalid_public_key(e.to_string()))?;

    match app {
        Some(app) if !app.gandalf_id.is_empty() => {
            info!(app_name = %app.app_name, gandalf_id = %app.gandalf_id, "public key verified");
            Ok(app)
        }
        _ => Err(ConnectError::invalid_public_key("Public key does not exist")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{GraphqlClientError, GraphqlError, SupportedServices};
    use crate::error::ErrorCode;
    use async_trait::async_trait;

    struct LookupApi(Result<Option<Application>, GraphqlClientError>);

    #[async_trait]
    impl ConnectApi for LookupApi {
        async fn get_app_by_public_key(
            &self,
            _public_key: &str,
        ) -> std::result::Result<Option<Application>, GraphqlClientError> {
            self.0.clone()
        }

        async fn get_supported_services(
            &self,
        ) -> std::result::Result<SupportedServices, GraphqlClientError> {
            Ok(SupportedServices::default())
        }
    }

    fn app(gandalf_id: &str) -> Application {
        Application {
            app_name: "Demo".into(),
            gandalf_id: gandalf_id.into(),
        }
    }

    #[tokio::test]
    async fn known_key_resolves() {
        let api = LookupApi(Ok(Some(app("17"))));
        let resolved = verify_public_key(&api, "0xabc").await.unwrap();
        assert_eq!(resolved.gandalf_id, "17");
    }

    #[tokio::test]
    async fn missing_or_empty_identity_is_invalid() {
        for api in [LookupApi(Ok(None)), LookupApi(Ok(Some(app(""))))] {
            let err = verify_public_key(&api, "0xabc").await.unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidPublicKey);
            assert_eq!(err.message, "Public key does not exist");
        }
    }

    #[tokio::test]
    async fn transport_errors_keep_their_message() {
        let api = LookupApi(Err(GraphqlClientError::GraphqlErrors {
            errors: vec![GraphqlError::new("application not found")],
        }));
        let err = verify_public_key(&api, "0xabc").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPublicKey);
        assert_eq!(err.message, "application not found");
    }
}
