//! In-memory service endpoint store for tests and dry runs.
//!
//! Behaves like the Azure DevOps service as far as the lifecycle callbacks can
//! observe: identifiers are assigned on create, updates replace the stored
//! record, deleted endpoints read as not found, and secret parameters are
//! masked in every response.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use crate::{
    ClientError, ClientResult, EndpointId, ProjectId, ServiceEndpoint, ServiceEndpointClient,
};

/// Value the service substitutes for secret parameters in responses.
pub const MASKED_SECRET: &str = "********";

/// Parameters the store treats as secret.
const SECRET_PARAMETERS: &[&str] = &["accessToken", "password", "apitoken"];

/// Thread-safe in-memory implementation of [`ServiceEndpointClient`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryServiceEndpointClient {
    state: Arc<RwLock<HashMap<(ProjectId, EndpointId), ServiceEndpoint>>>,
    calls: Arc<AtomicUsize>,
    failure: Arc<RwLock<Option<ClientError>>>,
}

impl InMemoryServiceEndpointClient {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of port calls received so far, failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent call fail with `error` (or succeed again with `None`).
    pub fn fail_with(&self, error: Option<ClientError>) {
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = error;
    }

    /// Returns the record as stored, secrets unmasked.
    pub fn stored(&self, project: &ProjectId, id: EndpointId) -> Option<ServiceEndpoint> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.get(&(project.clone(), id)).cloned())
    }

    /// Number of endpoints currently stored across all projects.
    pub fn len(&self) -> usize {
        self.state.read().map(|state| state.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn begin_call(&self) -> ClientResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failure = self.failure.read().unwrap_or_else(PoisonError::into_inner);
        match failure.as_ref() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> ClientError {
    ClientError::Transport(err.to_string())
}

fn masked(endpoint: &ServiceEndpoint) -> ServiceEndpoint {
    let mut response = endpoint.clone();
    if let Some(authorization) = response.authorization.as_mut() {
        for (key, value) in authorization.parameters.iter_mut() {
            if SECRET_PARAMETERS.contains(&key.as_str()) {
                *value = MASKED_SECRET.to_owned();
            }
        }
    }
    response
}

#[async_trait]
impl ServiceEndpointClient for InMemoryServiceEndpointClient {
    async fn create_service_endpoint(
        &self,
        endpoint: &ServiceEndpoint,
        project: &ProjectId,
    ) -> ClientResult<ServiceEndpoint> {
        self.begin_call()?;
        let mut stored = endpoint.clone();
        let id = EndpointId::new_random();
        stored.id = Some(id);
        stored.is_ready = Some(true);

        let mut state = self.state.write().map_err(poisoned)?;
        state.insert((project.clone(), id), stored.clone());
        Ok(masked(&stored))
    }

    async fn get_service_endpoint_details(
        &self,
        id: EndpointId,
        project: &ProjectId,
    ) -> ClientResult<ServiceEndpoint> {
        self.begin_call()?;
        let state = self.state.read().map_err(poisoned)?;
        state
            .get(&(project.clone(), id))
            .map(masked)
            .ok_or(ClientError::NotFound)
    }

    async fn update_service_endpoint(
        &self,
        endpoint: &ServiceEndpoint,
        project: &ProjectId,
    ) -> ClientResult<ServiceEndpoint> {
        self.begin_call()?;
        let id = endpoint
            .id
            .ok_or_else(|| ClientError::InvalidRequest("endpoint id is required".to_owned()))?;

        let mut state = self.state.write().map_err(poisoned)?;
        let current = state
            .get_mut(&(project.clone(), id))
            .ok_or(ClientError::NotFound)?;

        // Fields absent from the request keep their stored values.
        let mut merged = endpoint.clone();
        merged.name = merged.name.or_else(|| current.name.clone());
        merged.endpoint_type = merged.endpoint_type.or_else(|| current.endpoint_type.clone());
        merged.url = merged.url.or_else(|| current.url.clone());
        merged.owner = merged.owner.or_else(|| current.owner.clone());
        merged.authorization = merged
            .authorization
            .or_else(|| current.authorization.clone());
        merged.description = merged.description.or_else(|| current.description.clone());
        merged.is_ready = current.is_ready;
        *current = merged;

        Ok(masked(current))
    }

    async fn delete_service_endpoint(&self, project: &ProjectId, id: EndpointId) -> ClientResult<()> {
        self.begin_call()?;
        let mut state = self.state.write().map_err(poisoned)?;
        state
            .remove(&(project.clone(), id))
            .map(|_| ())
            .ok_or(ClientError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EndpointAuthorization;

    fn project() -> ProjectId {
        ProjectId::new("project").expect("non-empty")
    }

    fn endpoint() -> ServiceEndpoint {
        ServiceEndpoint {
            name: Some("gh".to_owned()),
            authorization: Some(
                EndpointAuthorization::with_scheme("PersonalAccessToken")
                    .with_parameter("accessToken", "secret"),
            ),
            ..ServiceEndpoint::default()
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_masks_secrets() {
        let client = InMemoryServiceEndpointClient::new();
        let created = client
            .create_service_endpoint(&endpoint(), &project())
            .await
            .expect("create succeeds");

        let id = created.id.expect("id assigned");
        let auth = created.authorization.expect("authorization echoed");
        assert_eq!(auth.parameter("accessToken"), Some(MASKED_SECRET));

        let stored = client.stored(&project(), id).expect("stored");
        let stored_auth = stored.authorization.expect("authorization stored");
        assert_eq!(stored_auth.parameter("accessToken"), Some("secret"));
    }

    #[tokio::test]
    async fn endpoints_are_scoped_by_project() {
        let client = InMemoryServiceEndpointClient::new();
        let created = client
            .create_service_endpoint(&endpoint(), &project())
            .await
            .expect("create succeeds");
        let other = ProjectId::new("other").expect("non-empty");

        let result = client
            .get_service_endpoint_details(created.id.expect("id"), &other)
            .await;
        assert_eq!(result, Err(ClientError::NotFound));
    }

    #[tokio::test]
    async fn injected_failure_is_returned_and_counted() {
        let client = InMemoryServiceEndpointClient::new();
        client.fail_with(Some(ClientError::Transport("down".to_owned())));

        let result = client.create_service_endpoint(&endpoint(), &project()).await;
        assert_eq!(result, Err(ClientError::Transport("down".to_owned())));
        assert_eq!(client.call_count(), 1);
        assert!(client.is_empty());
    }

    #[tokio::test]
    async fn failure_injection_survives_a_poisoned_lock() {
        let client = InMemoryServiceEndpointClient::new();
        let failure = Arc::clone(&client.failure);
        let _ = std::thread::spawn(move || {
            let _guard = failure.write().expect("first writer");
            panic!("test thread panics while holding the lock");
        })
        .join();
        assert!(client.failure.is_poisoned());

        client.fail_with(Some(ClientError::NotFound));
        let result = client.create_service_endpoint(&endpoint(), &project()).await;
        assert_eq!(result, Err(ClientError::NotFound));

        client.fail_with(None);
        assert!(client
            .create_service_endpoint(&endpoint(), &project())
            .await
            .is_ok());
    }
}
