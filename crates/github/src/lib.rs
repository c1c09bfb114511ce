//! Azure DevOps GitHub service connection resource.
//!
//! Specialises the shared service endpoint resource from [`serviceendpoint`]:
//! adds the GitHub personal access token (required, sensitive, defaultable
//! from `AZDO_GITHUB_SERVICE_CONNECTION_PAT`) with its memo hash, and layers a
//! `PersonalAccessToken` authorization block onto the base expand/flatten
//! pair.
//!
//! ## Architectural Layer
//!
//! **Resource definition.** No transport lives here; the lifecycle callbacks
//! run against whatever [`serviceendpoint::ServiceEndpointClient`] the
//! composition root supplies.

use std::sync::Arc;

use serviceendpoint::crud::{SERVICE_ENDPOINT_TYPE, SERVICE_ENDPOINT_URL};
use serviceendpoint::secrets::{diff_suppress_secret_changed, flatten_secret, secret_memo_attribute};
use serviceendpoint::{
    base_expander, base_flattener, make_base_resource, Attribute, EndpointAuthorization,
    Marshaller, ProjectId, Resource, ResourceData, ServiceEndpoint, ServiceEndpointError,
    SCHEME_PERSONAL_ACCESS_TOKEN,
};
use tracing::debug;

/// Name under which the host registers this resource.
pub const RESOURCE_NAME: &str = "azuredevops_serviceendpoint_github";

/// Attribute holding the GitHub personal access token.
pub const GITHUB_SERVICE_ENDPOINT_PAT: &str = "github_service_endpoint_pat";

/// Environment variable consulted when the token is not configured.
pub const GITHUB_PAT_ENV_VAR: &str = "AZDO_GITHUB_SERVICE_CONNECTION_PAT";

/// Service endpoint type tag for GitHub connections.
pub const GITHUB_ENDPOINT_TYPE: &str = "github";

/// URL used when the configuration does not name one.
pub const GITHUB_DEFAULT_URL: &str = "https://github.com";

/// Authorization parameter carrying the token.
pub const ACCESS_TOKEN_PARAMETER: &str = "accessToken";

/// Expand/flatten pair for GitHub service connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitHubMarshaller;

impl Marshaller for GitHubMarshaller {
    fn expand(
        &self,
        data: &ResourceData,
    ) -> Result<(ServiceEndpoint, ProjectId), ServiceEndpointError> {
        let (mut endpoint, project) = base_expander(data)?;
        // The type tag decides how the service reads the authorization block.
        endpoint.endpoint_type = Some(GITHUB_ENDPOINT_TYPE.to_owned());
        endpoint.authorization = Some(
            EndpointAuthorization::with_scheme(SCHEME_PERSONAL_ACCESS_TOKEN)
                .with_parameter(ACCESS_TOKEN_PARAMETER, data.get_str(GITHUB_SERVICE_ENDPOINT_PAT)),
        );
        Ok((endpoint, project))
    }

    fn flatten(
        &self,
        data: &mut ResourceData,
        endpoint: &ServiceEndpoint,
        project: &ProjectId,
    ) -> Result<(), ServiceEndpointError> {
        base_flattener(data, endpoint, project)?;
        flatten_secret(data, GITHUB_SERVICE_ENDPOINT_PAT);

        let returned = endpoint
            .authorization
            .as_ref()
            .and_then(|auth| auth.parameter(ACCESS_TOKEN_PARAMETER))
            .filter(|token| !is_masked(token));
        match returned {
            Some(token) => data.set(GITHUB_SERVICE_ENDPOINT_PAT, token),
            None => debug!("Service returned a masked access token; keeping the configured one"),
        }
        Ok(())
    }
}

/// The service blanks or star-masks secrets in responses.
fn is_masked(token: &str) -> bool {
    token.is_empty() || token.chars().all(|c| c == '*')
}

/// Builds the `azuredevops_serviceendpoint_github` resource.
pub fn resource_service_endpoint_github() -> Resource {
    let mut resource = make_base_resource(Arc::new(GitHubMarshaller));
    let schema = &mut resource.schema;

    if let Some(endpoint_type) = schema.attribute_mut(SERVICE_ENDPOINT_TYPE) {
        endpoint_type.default = Some(serviceendpoint::AttributeDefault::Value(
            GITHUB_ENDPOINT_TYPE.to_owned(),
        ));
    }
    if let Some(url) = schema.attribute_mut(SERVICE_ENDPOINT_URL) {
        url.default = Some(serviceendpoint::AttributeDefault::Value(
            GITHUB_DEFAULT_URL.to_owned(),
        ));
    }

    schema.insert(
        GITHUB_SERVICE_ENDPOINT_PAT,
        Attribute::required_string()
            .sensitive()
            .with_env_default(GITHUB_PAT_ENV_VAR)
            .with_description("The GitHub personal access token which should be used.")
            .with_diff_suppress(diff_suppress_secret_changed),
    );
    let (hash_key, hash_attribute) = secret_memo_attribute(GITHUB_SERVICE_ENDPOINT_PAT);
    schema.insert(hash_key, hash_attribute);

    resource
}
