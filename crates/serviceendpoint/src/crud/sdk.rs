//! Thin pass-through calls into the [`ServiceEndpointClient`] port.
//!
//! Each function forwards its arguments unchanged and returns the port's
//! answer verbatim. They exist so every remote call is logged the same way
//! (never including credentials).

use tracing::debug;

use crate::{ClientResult, EndpointId, ProjectId, ServiceEndpoint, ServiceEndpointClient};

pub(crate) async fn create_service_endpoint(
    client: &dyn ServiceEndpointClient,
    endpoint: &ServiceEndpoint,
    project: &ProjectId,
) -> ClientResult<ServiceEndpoint> {
    debug!(
        %project,
        name = endpoint.name.as_deref().unwrap_or_default(),
        endpoint_type = endpoint.endpoint_type.as_deref().unwrap_or_default(),
        "Creating service endpoint"
    );
    client.create_service_endpoint(endpoint, project).await
}

pub(crate) async fn get_service_endpoint_details(
    client: &dyn ServiceEndpointClient,
    id: EndpointId,
    project: &ProjectId,
) -> ClientResult<ServiceEndpoint> {
    debug!(%project, %id, "Reading service endpoint");
    client.get_service_endpoint_details(id, project).await
}

pub(crate) async fn update_service_endpoint(
    client: &dyn ServiceEndpointClient,
    endpoint: &ServiceEndpoint,
    project: &ProjectId,
) -> ClientResult<ServiceEndpoint> {
    debug!(
        %project,
        id = ?endpoint.id,
        name = endpoint.name.as_deref().unwrap_or_default(),
        "Updating service endpoint"
    );
    client.update_service_endpoint(endpoint, project).await
}

pub(crate) async fn delete_service_endpoint(
    client: &dyn ServiceEndpointClient,
    project: &ProjectId,
    id: EndpointId,
) -> ClientResult<()> {
    debug!(%project, %id, "Deleting service endpoint");
    client.delete_service_endpoint(project, id).await
}
