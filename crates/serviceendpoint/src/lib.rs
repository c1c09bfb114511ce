//! Azure DevOps service endpoint domain.
//!
//! This crate contains the wire-shaped endpoint types, newtype identifiers, the
//! host-facing resource record and schema model, the lifecycle callback
//! generator shared by every service endpoint resource, and the port trait the
//! remote API adapter implements.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates (`azdo-client`) define
//! *how* to supply it, and resource crates (`github`) specialise the shared
//! expand/flatten logic.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | `EndpointId`, `ProjectId` |
//! | [`types`] | `ServiceEndpoint`, `EndpointAuthorization` |
//! | [`errors`] | `ServiceEndpointError`, `SchemaError` |
//! | [`ports`] | `ServiceEndpointClient`, `ClientError` |
//! | [`resource_data`] | `ResourceData`, the host's configuration record |
//! | [`schema`] | Attribute declarations, defaults, diff-suppress hooks |
//! | [`secrets`] | Memo hashes for secret attributes |
//! | [`crud`] | `Marshaller`, `generate_crud_funcs`, base expand/flatten |
//! | [`adapters`] | In-memory port implementation |

pub mod adapters;
pub mod crud;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod resource_data;
pub mod schema;
pub mod secrets;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use crud::{
    base_expander, base_flattener, generate_crud_funcs, make_base_resource, CrudFuncs, Marshaller,
    Resource,
};
pub use errors::{SchemaError, ServiceEndpointError};
pub use identifiers::{EndpointId, ProjectId};
pub use ports::{ClientError, ClientResult, ServiceEndpointClient};
pub use resource_data::ResourceData;
pub use schema::{Attribute, AttributeDefault, AttributeType, DiffSuppressFn, ResourceSchema};
pub use types::{
    EndpointAuthorization, ServiceEndpoint, SCHEME_NONE, SCHEME_PERSONAL_ACCESS_TOKEN,
};
