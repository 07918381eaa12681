//! # Gandalf Connect Core Library
//!
//! Client-side SDK for Gandalf Connect. A caller describes which services
//! (and which traits and activities within them) a user should connect; the
//! SDK checks that request against the platform schema and turns it into an
//! App Clip deep link.
//!
//! ## Architecture
//!
//! - **API**: GraphQL client for the two platform reads (application by
//!   public key, supported services via introspection)
//! - **Taxonomy / Verifier**: thin wrappers that map those reads onto the
//!   SDK's error model
//! - **Validator**: pure rules over the requested services
//! - **Encoder**: canonical JSON, base64, App Clip URL
//! - **Connect**: the session that ties them together and validates once
//!
//! ## Key Components
//!
//! - [`Connect`]: session state machine and public entry point
//! - [`ConnectApi`]: transport seam, implemented by [`GraphqlClient`]
//! - [`ConnectConfig`]: endpoint and rule configuration
//! - [`ConnectError`]: flat error code plus message

pub mod api;
pub mod config;
pub mod connect;
pub mod encoder;
pub mod error;
pub mod model;
pub mod taxonomy;
pub mod validator;
pub mod verifier;

pub use api::{Application, ConnectApi, GraphqlClient, GraphqlClientError, SupportedServices};
pub use config::ConnectConfig;
pub use connect::{Connect, SessionState};
pub use error::{ConfigError, ConnectError, ErrorCode, Result};
pub use model::{
    ConnectInput, ConnectOptions, InputData, InputValue, ServiceConfig, StylingOptions, TimeRange,
};
pub use taxonomy::SupportedTaxonomy;
pub use validator::ValidationRules;
