//! Error types for service endpoint lifecycle operations.
//!
//! [`ServiceEndpointError`] is what every lifecycle callback returns to the
//! host. Remote failures arrive as [`ClientError`] and are wrapped with the
//! operation (and, where known, the endpoint and project) so the host can
//! report them without extra context. Nothing here is retried.

use thiserror::Error;

use crate::{ClientError, EndpointId, ProjectId};

// ---------------------------------------------------------------------------
// Lifecycle errors
// ---------------------------------------------------------------------------

/// Errors produced by the generated CRUD callbacks and the marshalling
/// functions they drive.
#[derive(Debug, Error)]
pub enum ServiceEndpointError {
    /// The identifier stored in resource state is not a UUID.
    ///
    /// Produced before any remote call is made.
    #[error("Error parsing the service endpoint ID '{value}' from the resource data: {source}")]
    MalformedId {
        /// The raw identifier as stored.
        value: String,
        /// Underlying parse failure.
        source: uuid::Error,
    },

    /// The configuration cannot be expanded into a request.
    #[error("Invalid configuration for '{attribute}': {message}")]
    InvalidConfig {
        /// Attribute that failed expansion.
        attribute: String,
        /// Description of the problem.
        message: String,
    },

    /// The service answered without a field the flattener requires.
    #[error("Service endpoint response is missing '{field}'")]
    IncompleteResponse {
        /// Name of the missing response field.
        field: &'static str,
    },

    /// The configuration does not satisfy the resource schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The service rejected or failed the create call.
    #[error("Error creating service endpoint in Azure DevOps: {0}")]
    Create(#[source] ClientError),

    /// The endpoint could not be fetched.
    #[error("Error looking up service endpoint given ID ({id}) and project ID ({project}): {source}")]
    Read {
        /// Endpoint that was requested.
        id: EndpointId,
        /// Project scope of the request.
        project: ProjectId,
        /// Underlying remote failure.
        source: ClientError,
    },

    /// The service rejected or failed the update call.
    #[error("Error updating service endpoint in Azure DevOps: {0}")]
    Update(#[source] ClientError),

    /// The endpoint could not be deleted.
    #[error("Error deleting service endpoint ({id}) in project ({project}): {source}")]
    Delete {
        /// Endpoint that was targeted.
        id: EndpointId,
        /// Project scope of the request.
        project: ProjectId,
        /// Underlying remote failure.
        source: ClientError,
    },
}

impl ServiceEndpointError {
    /// Shorthand for [`ServiceEndpointError::InvalidConfig`].
    pub fn invalid_config(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    /// Returns the remote failure behind this error, if there was one.
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Create(source) | Self::Update(source) => Some(source),
            Self::Read { source, .. } | Self::Delete { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Schema errors
// ---------------------------------------------------------------------------

/// Configuration did not satisfy the declared attribute schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A required attribute has no value after defaults were applied.
    #[error("The argument \"{attribute}\" is required, but no definition was found")]
    MissingRequired {
        /// Name of the missing attribute.
        attribute: String,
    },

    /// The configuration sets an attribute the schema does not declare.
    #[error("An argument named \"{attribute}\" is not expected here")]
    UnknownAttribute {
        /// Name of the unexpected attribute.
        attribute: String,
    },

    /// An attribute value has the wrong JSON type.
    #[error("Inappropriate value for attribute \"{attribute}\": {expected} required")]
    TypeMismatch {
        /// Name of the attribute.
        attribute: String,
        /// Expected type name.
        expected: &'static str,
    },
}
