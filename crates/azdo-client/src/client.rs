//! HTTP implementation of the service endpoint port.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serviceendpoint::{
    ClientError, ClientResult, EndpointId, ProjectId, ServiceEndpoint, ServiceEndpointClient,
};
use tracing::{debug, warn};

use crate::{AzureDevOpsConfig, ConfigError};

const USER_AGENT: &str = concat!("azdo-serviceendpoint/", env!("CARGO_PKG_VERSION"));

/// Longest raw body excerpt carried in an error message.
const MAX_ERROR_BODY: usize = 512;

/// Azure DevOps error envelope; only the message is used.
#[derive(Debug, Deserialize)]
struct WrappedError {
    message: Option<String>,
}

/// REST client for the Azure DevOps service endpoint API.
#[derive(Debug, Clone)]
pub struct AzureDevOpsClient {
    http: reqwest::Client,
    config: AzureDevOpsConfig,
}

impl AzureDevOpsClient {
    /// Builds a client for the configured organisation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] when the TLS backend cannot be
    /// initialised.
    pub fn new(config: AzureDevOpsConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(ConfigError::HttpClient)?;
        Ok(Self { http, config })
    }

    /// `{org}/{project}/_apis/serviceendpoint/endpoints[/{id}]`, with the
    /// project name percent-encoded as a single path segment.
    fn endpoints_url(&self, project: &ProjectId, id: Option<EndpointId>) -> ClientResult<Url> {
        let mut url = self.config.organization_url().clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                ClientError::InvalidRequest("organisation URL cannot be a base".to_owned())
            })?;
            segments
                .pop_if_empty()
                .push(project.as_str())
                .extend(["_apis", "serviceendpoint", "endpoints"]);
            if let Some(id) = id {
                segments.push(&id.to_string());
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth("", Some(self.config.personal_access_token()))
            .query(&[("api-version", self.config.api_version())])
    }

    async fn send(&self, builder: RequestBuilder) -> ClientResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        debug!(%status, url = %response.url().path(), "Azure DevOps responded");
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(status, &body);
            warn!(status = status.as_u16(), %message, "Azure DevOps rejected the request");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    /// Decodes an endpoint body; `None` for an empty or `null` body.
    async fn decode(response: Response) -> ClientResult<Option<ServiceEndpoint>> {
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// Extracts the service's error message, falling back to the raw body and
/// then to the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(WrappedError {
        message: Some(message),
    }) = serde_json::from_str::<WrappedError>(body)
    {
        return message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_owned();
    }
    trimmed.chars().take(MAX_ERROR_BODY).collect()
}

#[async_trait]
impl ServiceEndpointClient for AzureDevOpsClient {
    async fn create_service_endpoint(
        &self,
        endpoint: &ServiceEndpoint,
        project: &ProjectId,
    ) -> ClientResult<ServiceEndpoint> {
        let url = self.endpoints_url(project, None)?;
        let response = self.send(self.request(Method::POST, url).json(endpoint)).await?;
        Self::decode(response)
            .await?
            .ok_or_else(|| ClientError::Decode("empty response to create".to_owned()))
    }

    async fn get_service_endpoint_details(
        &self,
        id: EndpointId,
        project: &ProjectId,
    ) -> ClientResult<ServiceEndpoint> {
        let url = self.endpoints_url(project, Some(id))?;
        let response = self.send(self.request(Method::GET, url)).await?;
        // Deleted endpoints come back as `200 null`.
        Self::decode(response).await?.ok_or(ClientError::NotFound)
    }

    async fn update_service_endpoint(
        &self,
        endpoint: &ServiceEndpoint,
        project: &ProjectId,
    ) -> ClientResult<ServiceEndpoint> {
        let id = endpoint
            .id
            .ok_or_else(|| ClientError::InvalidRequest("endpoint id is required".to_owned()))?;
        let url = self.endpoints_url(project, Some(id))?;
        let response = self.send(self.request(Method::PUT, url).json(endpoint)).await?;
        Self::decode(response)
            .await?
            .ok_or_else(|| ClientError::Decode("empty response to update".to_owned()))
    }

    async fn delete_service_endpoint(&self, project: &ProjectId, id: EndpointId) -> ClientResult<()> {
        let url = self.endpoints_url(project, Some(id))?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
