//! Port for the remote service endpoint API.
//!
//! Infrastructure crates implement [`ServiceEndpointClient`]; this crate only
//! calls it. Requests and responses are the wire-shaped
//! [`ServiceEndpoint`] values, passed through unchanged.

use async_trait::async_trait;
use thiserror::Error;

use crate::{EndpointId, ProjectId, ServiceEndpoint};

/// Result type for remote service endpoint calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Remote service endpoint operations, scoped by project.
#[async_trait]
pub trait ServiceEndpointClient: Send + Sync {
    /// Creates a service endpoint and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns the remote failure verbatim.
    async fn create_service_endpoint(
        &self,
        endpoint: &ServiceEndpoint,
        project: &ProjectId,
    ) -> ClientResult<ServiceEndpoint>;

    /// Fetches a service endpoint by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the endpoint does not exist.
    async fn get_service_endpoint_details(
        &self,
        id: EndpointId,
        project: &ProjectId,
    ) -> ClientResult<ServiceEndpoint>;

    /// Replaces the service endpoint identified by `endpoint.id`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] when `endpoint.id` is unset and
    /// [`ClientError::NotFound`] when the endpoint does not exist.
    async fn update_service_endpoint(
        &self,
        endpoint: &ServiceEndpoint,
        project: &ProjectId,
    ) -> ClientResult<ServiceEndpoint>;

    /// Deletes a service endpoint.
    ///
    /// # Errors
    ///
    /// Returns the remote failure verbatim.
    async fn delete_service_endpoint(&self, project: &ProjectId, id: EndpointId)
        -> ClientResult<()>;
}

/// Errors returned by [`ServiceEndpointClient`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The endpoint does not exist (or no longer exists) in the project.
    #[error("service endpoint not found")]
    NotFound,

    /// The service rejected the request.
    #[error("Azure DevOps returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The request could not be built from the given endpoint.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("could not decode response: {0}")]
    Decode(String),
}
