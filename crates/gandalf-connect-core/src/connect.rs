//! Connect session: validates once, then generates App Clip URLs.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};
use url::Url;

use crate::api::{ConnectApi, GraphqlClient};
use crate::config::ConnectConfig;
use crate::encoder::encode_url;
use crate::error::{ConnectError, Result};
use crate::model::{ConnectInput, ConnectOptions, InputData};
use crate::taxonomy::fetch_supported_taxonomy;
use crate::validator::{ensure_required_service, validate_input_data, ValidationRules};
use crate::verifier::verify_public_key;

/// Validation progress of a [`Connect`] session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unvalidated,
    /// Terminal. The stored data is the cleaned, validated mapping.
    Validated,
}

/// One Connect session.
///
/// The first successful [`generate_url`](Self::generate_url) validates the
/// public key, redirect URL and services against the platform; later calls
/// reuse that result without touching the network.
pub struct Connect {
    public_key: String,
    redirect_url: String,
    data: InputData,
    options: Option<ConnectOptions>,
    state: SessionState,
    api: Arc<dyn ConnectApi>,
    config: ConnectConfig,
    reference_date: Option<NaiveDate>,
}

impl Connect {
    /// Session against the default Gandalf endpoint.
    pub fn new(input: ConnectInput) -> Self {
        Self::from_config(input, ConnectConfig::default())
    }

    /// Session whose endpoint, timeout and rules come from `config`.
    pub fn from_config(input: ConnectInput, config: ConnectConfig) -> Self {
        let client = GraphqlClient::from_config(&config).unwrap_or_else(|e| {
            warn!(
                error = %e,
                timeout_secs = config.request_timeout_secs,
                "HTTP client build failed, using a client without request timeout"
            );
            GraphqlClient::fallback(&config)
        });
        Self::with_api(input, Arc::new(client)).with_config(config)
    }

    /// Session using a caller-provided transport.
    pub fn with_api(input: ConnectInput, api: Arc<dyn ConnectApi>) -> Self {
        let redirect_url = match input.redirect_url.strip_suffix('/') {
            Some(stripped) => stripped.to_string(),
            None => input.redirect_url,
        };
        Self {
            public_key: input.public_key,
            redirect_url,
            data: input.services,
            options: input.options,
            state: SessionState::Unvalidated,
            api,
            config: ConnectConfig::default(),
            reference_date: None,
        }
    }

    /// Replace the URL base and validation settings. The transport is kept.
    pub fn with_config(mut self, config: ConnectConfig) -> Self {
        self.config = config;
        self
    }

    /// Evaluate time frames against `date` instead of the local calendar.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn redirect_url(&self) -> &str {
        &self.redirect_url
    }

    /// Current services: the raw input before validation, the cleaned mapping after.
    pub fn data(&self) -> &InputData {
        &self.data
    }

    pub fn options(&self) -> Option<&ConnectOptions> {
        self.options.as_ref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_verified(&self) -> bool {
        self.state == SessionState::Validated
    }

    /// Validate (first call only) and build the App Clip URL.
    ///
    /// # Errors
    ///
    /// `InvalidPublicKey`, `InvalidRedirectURL`, `InvalidService` or
    /// `InvalidTimeFrame`, checked in that order.
    pub async fn generate_url(&mut self) -> Result<String> {
        if self.state == SessionState::Unvalidated {
            self.validate().await?;
        }

        encode_url(
            &self.data,
            self.options.as_ref().map(|o| &o.style),
            &self.redirect_url,
            &self.public_key,
            &self.config.app_clip_base_url,
        )
    }

    /// Extract the `dataKey` query parameter from the redirect URL the
    /// App Clip sends the user back to.
    ///
    /// # Errors
    ///
    /// `InvalidRedirectURL` if `redirect_url` does not parse,
    /// `DataKeyNotFound` if it has no `dataKey` parameter.
    pub fn get_data_key_from_url(redirect_url: &str) -> Result<String> {
        let url = parse_redirect_url(redirect_url)?;
        url.query_pairs()
            .find(|(name, _)| name == "dataKey")
            .map(|(_, value)| value.into_owned())
            .ok_or_else(|| {
                ConnectError::data_key_not_found(format!(
                    "Datakey not found in the URL {redirect_url}"
                ))
            })
    }

    async fn validate(&mut self) -> Result<()> {
        let api = Arc::clone(&self.api);

        // Both reads are independent; their results are still checked in
        // the fixed order public key -> redirect URL -> services.
        let (app, taxonomy) = tokio::join!(
            verify_public_key(api.as_ref(), &self.public_key),
            fetch_supported_taxonomy(api.as_ref()),
        );
        app?;
        parse_redirect_url(&self.redirect_url)?;

        let rules = match self.reference_date {
            Some(date) => ValidationRules::new(date, &self.config.time_frame_service),
            None => ValidationRules::for_today(&self.config.time_frame_service),
        };
        let clean = validate_input_data(&self.data, &taxonomy, &rules)?;
        self.data = clean;
        ensure_required_service(&self.data)?;

        self.state = SessionState::Validated;
        info!(services = self.data.len(), "connect input validated");
        Ok(())
    }
}

fn parse_redirect_url(redirect_url: &str) -> Result<Url> {
    Url::parse(redirect_url)
        .map_err(|_| ConnectError::invalid_redirect_url("Invalid redirectURL"))
}
