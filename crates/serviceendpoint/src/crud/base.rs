//! Expand/flatten chores shared by every service endpoint type.

use crate::{
    Attribute, EndpointAuthorization, EndpointId, Marshaller, ProjectId, ResourceData,
    ResourceSchema, ServiceEndpoint, ServiceEndpointError, SCHEME_NONE,
};

/// Project that owns the endpoint. Changing it replaces the resource.
pub const PROJECT_ID: &str = "project_id";
/// Display name of the endpoint.
pub const SERVICE_ENDPOINT_NAME: &str = "service_endpoint_name";
/// Connection type tag, e.g. `github`.
pub const SERVICE_ENDPOINT_TYPE: &str = "service_endpoint_type";
/// URL of the external service.
pub const SERVICE_ENDPOINT_URL: &str = "service_endpoint_url";
/// Owner recorded by the service, usually `library`.
pub const SERVICE_ENDPOINT_OWNER: &str = "service_endpoint_owner";

/// Owner assigned when the configuration does not name one.
pub const DEFAULT_OWNER: &str = "library";

/// Attributes every service endpoint resource starts with.
pub fn base_schema() -> ResourceSchema {
    ResourceSchema::new()
        .with_attribute(
            PROJECT_ID,
            Attribute::required_string()
                .force_new()
                .with_description("The project in which the service endpoint is created."),
        )
        .with_attribute(
            SERVICE_ENDPOINT_NAME,
            Attribute::required_string().with_description("The service endpoint name."),
        )
        .with_attribute(
            SERVICE_ENDPOINT_TYPE,
            Attribute::optional_computed_string()
                .with_description("The service endpoint type tag."),
        )
        .with_attribute(
            SERVICE_ENDPOINT_URL,
            Attribute::required_string().with_description("URL of the external service."),
        )
        .with_attribute(
            SERVICE_ENDPOINT_OWNER,
            Attribute::optional_string()
                .with_default(DEFAULT_OWNER)
                .with_description("Owner of the service endpoint."),
        )
}

/// Builds the request fields common to all service endpoints.
///
/// The identifier is included only when the stored one parses; a resource
/// that has never been created legitimately has none. The authorization block
/// defaults to scheme `None` and is expected to be replaced by the
/// connection-specific expander.
///
/// # Errors
///
/// Returns [`ServiceEndpointError::InvalidConfig`] when `project_id` is empty.
pub fn base_expander(
    data: &ResourceData,
) -> Result<(ServiceEndpoint, ProjectId), ServiceEndpointError> {
    let project = ProjectId::new(data.get_str(PROJECT_ID))
        .ok_or_else(|| ServiceEndpointError::invalid_config(PROJECT_ID, "must not be empty"))?;

    let field = |key: &str| data.get_non_empty(key).map(str::to_owned);
    let endpoint = ServiceEndpoint {
        id: EndpointId::parse(data.id()).ok(),
        name: field(SERVICE_ENDPOINT_NAME),
        endpoint_type: field(SERVICE_ENDPOINT_TYPE),
        url: field(SERVICE_ENDPOINT_URL),
        owner: field(SERVICE_ENDPOINT_OWNER),
        authorization: Some(EndpointAuthorization::with_scheme(SCHEME_NONE)),
        ..ServiceEndpoint::default()
    };

    Ok((endpoint, project))
}

/// Writes the response fields common to all service endpoints back into
/// `data`, including the server-assigned identifier.
///
/// # Errors
///
/// Returns [`ServiceEndpointError::IncompleteResponse`] when the service
/// answered without an identifier.
pub fn base_flattener(
    data: &mut ResourceData,
    endpoint: &ServiceEndpoint,
    project: &ProjectId,
) -> Result<(), ServiceEndpointError> {
    let id = endpoint
        .id
        .ok_or(ServiceEndpointError::IncompleteResponse { field: "id" })?;

    data.set_id(id.to_string());
    data.set_optional(SERVICE_ENDPOINT_NAME, endpoint.name.as_deref());
    data.set_optional(SERVICE_ENDPOINT_TYPE, endpoint.endpoint_type.as_deref());
    data.set_optional(SERVICE_ENDPOINT_URL, endpoint.url.as_deref());
    data.set_optional(SERVICE_ENDPOINT_OWNER, endpoint.owner.as_deref());
    data.set(PROJECT_ID, project.as_str());
    Ok(())
}

/// Marshaller for endpoints that need nothing beyond the shared fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseMarshaller;

impl Marshaller for BaseMarshaller {
    fn expand(
        &self,
        data: &ResourceData,
    ) -> Result<(ServiceEndpoint, ProjectId), ServiceEndpointError> {
        base_expander(data)
    }

    fn flatten(
        &self,
        data: &mut ResourceData,
        endpoint: &ServiceEndpoint,
        project: &ProjectId,
    ) -> Result<(), ServiceEndpointError> {
        base_flattener(data, endpoint, project)
    }
}
