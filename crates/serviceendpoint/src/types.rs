//! Wire-shaped value types for Azure DevOps service endpoints.
//!
//! These mirror the JSON the service accepts and returns (camelCase field
//! names, every field optional). They are passed through the client port
//! unchanged; only the expand/flatten functions interpret them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::EndpointId;

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

/// Authorization scheme used when a connection type has not supplied its own.
pub const SCHEME_NONE: &str = "None";

/// Authorization scheme for personal-access-token credentials.
pub const SCHEME_PERSONAL_ACCESS_TOKEN: &str = "PersonalAccessToken";

/// Credentials attached to a service endpoint.
///
/// `parameters` is scheme-specific; for [`SCHEME_PERSONAL_ACCESS_TOKEN`] it
/// carries a single `accessToken` entry. The service masks secret parameters
/// in its responses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointAuthorization {
    /// Scheme name, e.g. `"PersonalAccessToken"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    /// Scheme parameters keyed by parameter name. Parameters the service
    /// returns as `null` are dropped on decode.
    #[serde(default, deserialize_with = "deserialize_parameters")]
    pub parameters: BTreeMap<String, String>,
}

fn deserialize_parameters<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect())
}

impl EndpointAuthorization {
    /// Creates an authorization block with the given scheme and no parameters.
    pub fn with_scheme(scheme: impl Into<String>) -> Self {
        Self {
            scheme: Some(scheme.into()),
            parameters: BTreeMap::new(),
        }
    }

    /// Adds a parameter, replacing any existing value for `key`.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Returns a parameter value, or `None` when the service omitted it.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Service endpoint
// ---------------------------------------------------------------------------

/// A service endpoint (service connection) as exchanged with Azure DevOps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEndpoint {
    /// Server-assigned identifier; `None` on a create request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EndpointId>,

    /// Display name, unique within the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Connection type tag, e.g. `"github"`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub endpoint_type: Option<String>,

    /// Target URL of the external service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Owner of the endpoint, e.g. `"library"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Credentials for the external service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<EndpointAuthorization>,

    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the service has finished provisioning the endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_ready: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialises_service_response_shape() {
        let endpoint: ServiceEndpoint = serde_json::from_value(json!({
            "id": "5b0e0d4f-86f4-4ab5-9b39-4c9cbd9b1a10",
            "name": "gh",
            "type": "github",
            "url": "https://github.com",
            "owner": "library",
            "isReady": true,
            "authorization": { "scheme": "PersonalAccessToken", "parameters": { "accessToken": null } },
            "serviceEndpointProjectReferences": []
        }))
        .expect("decode service response");

        assert_eq!(endpoint.endpoint_type.as_deref(), Some("github"));
        assert_eq!(endpoint.is_ready, Some(true));
        let auth = endpoint.authorization.expect("authorization present");
        assert_eq!(auth.scheme.as_deref(), Some(SCHEME_PERSONAL_ACCESS_TOKEN));
        assert_eq!(auth.parameter("accessToken"), None);
    }

    #[test]
    fn create_request_omits_unset_fields() {
        let endpoint = ServiceEndpoint {
            name: Some("gh".to_owned()),
            endpoint_type: Some("github".to_owned()),
            ..ServiceEndpoint::default()
        };
        let value = serde_json::to_value(&endpoint).expect("encode");
        assert_eq!(value, json!({ "name": "gh", "type": "github" }));
    }
}
