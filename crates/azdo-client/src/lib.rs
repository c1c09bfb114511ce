//! Azure DevOps REST client adapter.
//!
//! Implements the [`serviceendpoint::ServiceEndpointClient`] trait over the
//! Azure DevOps service endpoint REST API (`_apis/serviceendpoint/endpoints`).
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** URL construction, authentication, serialisation, and
//! mapping of HTTP failures onto [`serviceendpoint::ClientError`] all live
//! here. The [`serviceendpoint`] crate sees only the trait.
//!
//! ## Transport
//!
//! - HTTPS via `reqwest` with rustls.
//! - HTTP Basic authentication with an empty user name and the organisation
//!   personal access token.
//! - Every request carries `api-version` (default `5.1-preview.2`).
//! - No retries or back-off: a failure is returned to the caller as-is.

pub mod client;
pub mod config;

pub use client::AzureDevOpsClient;
pub use config::{
    AzureDevOpsConfig, ConfigError, API_VERSION_ENV, DEFAULT_API_VERSION, DEFAULT_TIMEOUT,
    HTTP_TIMEOUT_ENV, ORG_SERVICE_URL_ENV, PERSONAL_ACCESS_TOKEN_ENV,
};
