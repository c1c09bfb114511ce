//! Lifecycle callback generation for service endpoint resources.
//!
//! Every service endpoint type follows the same create/read/update/delete
//! flow against the same remote API; only the translation between resource
//! data and the wire shape differs. A resource supplies that translation as a
//! [`Marshaller`], and [`generate_crud_funcs`] turns it into the four callbacks
//! the host invokes.
//!
//! ```text
//! host ──▶ CrudFuncs::create ──▶ Marshaller::expand ──▶ ServiceEndpointClient
//!                                                              │
//!          ResourceData ◀── Marshaller::flatten ◀──────────────┘
//! ```

mod base;
mod sdk;

use std::sync::Arc;

use tracing::{info, instrument, Span};

use crate::{
    EndpointId, ProjectId, ResourceData, ResourceSchema, ServiceEndpoint, ServiceEndpointClient,
    ServiceEndpointError,
};

pub use base::{
    base_expander, base_flattener, base_schema, BaseMarshaller, DEFAULT_OWNER, PROJECT_ID,
    SERVICE_ENDPOINT_NAME, SERVICE_ENDPOINT_OWNER, SERVICE_ENDPOINT_TYPE, SERVICE_ENDPOINT_URL,
};

// ---------------------------------------------------------------------------
// Extension point
// ---------------------------------------------------------------------------

/// Translation between resource data and the service endpoint wire shape.
///
/// Implementations typically call [`base_expander`] / [`base_flattener`] and
/// then layer their connection-specific fields on top.
pub trait Marshaller: Send + Sync {
    /// Converts resource data into a request and the project scope it targets.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceEndpointError::InvalidConfig`] when the data cannot be
    /// expressed as a request.
    fn expand(&self, data: &ResourceData)
        -> Result<(ServiceEndpoint, ProjectId), ServiceEndpointError>;

    /// Writes a service response back into resource data.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceEndpointError::IncompleteResponse`] when the response
    /// lacks a field the resource depends on.
    fn flatten(
        &self,
        data: &mut ResourceData,
        endpoint: &ServiceEndpoint,
        project: &ProjectId,
    ) -> Result<(), ServiceEndpointError>;
}

// ---------------------------------------------------------------------------
// Generated callbacks
// ---------------------------------------------------------------------------

/// The four lifecycle callbacks generated from a [`Marshaller`].
#[derive(Clone)]
pub struct CrudFuncs {
    marshaller: Arc<dyn Marshaller>,
}

impl std::fmt::Debug for CrudFuncs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudFuncs").finish_non_exhaustive()
    }
}

/// Builds the lifecycle callbacks for a service endpoint resource.
pub fn generate_crud_funcs(marshaller: Arc<dyn Marshaller>) -> CrudFuncs {
    CrudFuncs { marshaller }
}

impl CrudFuncs {
    /// Creates the endpoint and records the server-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceEndpointError::Create`] when the remote call fails.
    #[instrument(name = "service_endpoint.create", skip_all, fields(project = tracing::field::Empty, id = tracing::field::Empty))]
    pub async fn create(
        &self,
        data: &mut ResourceData,
        client: &dyn ServiceEndpointClient,
    ) -> Result<(), ServiceEndpointError> {
        let (endpoint, project) = self.marshaller.expand(data)?;
        Span::current().record("project", project.as_str());

        let created = sdk::create_service_endpoint(client, &endpoint, &project)
            .await
            .map_err(ServiceEndpointError::Create)?;
        self.marshaller.flatten(data, &created, &project)?;

        Span::current().record("id", data.id());
        info!("Created service endpoint");
        Ok(())
    }

    /// Refreshes resource data from the service.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceEndpointError::MalformedId`] without calling the
    /// service when the stored identifier does not parse, and
    /// [`ServiceEndpointError::Read`] when the lookup fails.
    #[instrument(name = "service_endpoint.read", skip_all, fields(project = tracing::field::Empty, id = data.id()))]
    pub async fn read(
        &self,
        data: &mut ResourceData,
        client: &dyn ServiceEndpointClient,
    ) -> Result<(), ServiceEndpointError> {
        let id = EndpointId::parse(data.id())?;
        let project = ProjectId::new(data.get_str(PROJECT_ID))
            .ok_or_else(|| ServiceEndpointError::invalid_config(PROJECT_ID, "must not be empty"))?;
        Span::current().record("project", project.as_str());

        let endpoint = sdk::get_service_endpoint_details(client, id, &project)
            .await
            .map_err(|source| ServiceEndpointError::Read {
                id,
                project: project.clone(),
                source,
            })?;

        self.marshaller.flatten(data, &endpoint, &project)
    }

    /// Pushes the configured fields to the existing endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceEndpointError::MalformedId`] without calling the
    /// service when the stored identifier does not parse, and
    /// [`ServiceEndpointError::Update`] when the remote call fails.
    #[instrument(name = "service_endpoint.update", skip_all, fields(project = tracing::field::Empty, id = data.id()))]
    pub async fn update(
        &self,
        data: &mut ResourceData,
        client: &dyn ServiceEndpointClient,
    ) -> Result<(), ServiceEndpointError> {
        let id = EndpointId::parse(data.id())?;
        let (mut endpoint, project) = self.marshaller.expand(data)?;
        endpoint.id = Some(id);
        Span::current().record("project", project.as_str());

        let updated = sdk::update_service_endpoint(client, &endpoint, &project)
            .await
            .map_err(ServiceEndpointError::Update)?;
        self.marshaller.flatten(data, &updated, &project)?;

        info!("Updated service endpoint");
        Ok(())
    }

    /// Deletes the endpoint. Resource data is left untouched; the host drops
    /// it once this returns successfully.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceEndpointError::MalformedId`] without calling the
    /// service when the stored identifier does not parse, and
    /// [`ServiceEndpointError::Delete`] when the remote call fails.
    #[instrument(name = "service_endpoint.delete", skip_all, fields(project = tracing::field::Empty, id = data.id()))]
    pub async fn delete(
        &self,
        data: &ResourceData,
        client: &dyn ServiceEndpointClient,
    ) -> Result<(), ServiceEndpointError> {
        let id = EndpointId::parse(data.id())?;
        let (_, project) = self.marshaller.expand(data)?;
        Span::current().record("project", project.as_str());

        sdk::delete_service_endpoint(client, &project, id)
            .await
            .map_err(|source| ServiceEndpointError::Delete {
                id,
                project: project.clone(),
                source,
            })?;

        info!("Deleted service endpoint");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Resource
// ---------------------------------------------------------------------------

/// A complete resource definition: its attribute schema plus its callbacks.
#[derive(Debug, Clone)]
pub struct Resource {
    /// Attribute declarations handed to the host.
    pub schema: ResourceSchema,
    /// Lifecycle callbacks.
    pub crud: CrudFuncs,
}

/// Starts a service endpoint resource from the shared schema, with callbacks
/// generated from `marshaller`. Connection types add their own attributes to
/// [`Resource::schema`] afterwards.
pub fn make_base_resource(marshaller: Arc<dyn Marshaller>) -> Resource {
    Resource {
        schema: base_schema(),
        crud: generate_crud_funcs(marshaller),
    }
}

#[cfg(test)]
mod tests;
