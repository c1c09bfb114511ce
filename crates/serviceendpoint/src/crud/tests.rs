//! Lifecycle tests for the generated callbacks, driven through the base
//! marshaller and the in-memory port.

use std::sync::Arc;

use async_trait::async_trait;
use rstest::{fixture, rstest};

use super::*;
use crate::adapters::memory::InMemoryServiceEndpointClient;
use crate::{ClientError, ClientResult, SCHEME_NONE};

#[fixture]
fn crud() -> CrudFuncs {
    generate_crud_funcs(Arc::new(BaseMarshaller))
}

#[fixture]
fn client() -> InMemoryServiceEndpointClient {
    InMemoryServiceEndpointClient::new()
}

#[fixture]
fn config() -> ResourceData {
    ResourceData::from_attributes([
        (PROJECT_ID, "project"),
        (SERVICE_ENDPOINT_NAME, "endpoint"),
        (SERVICE_ENDPOINT_TYPE, "generic"),
        (SERVICE_ENDPOINT_URL, "https://example.com"),
        (SERVICE_ENDPOINT_OWNER, "library"),
    ])
}

fn project() -> ProjectId {
    ProjectId::new("project").expect("non-empty")
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[rstest]
#[tokio::test]
async fn create_records_server_assigned_id(
    crud: CrudFuncs,
    client: InMemoryServiceEndpointClient,
    mut config: ResourceData,
) {
    crud.create(&mut config, &client).await.expect("create succeeds");

    let id = EndpointId::parse(config.id()).expect("id is a uuid");
    assert!(client.stored(&project(), id).is_some());
}

#[rstest]
#[tokio::test]
async fn create_then_read_returns_the_written_fields(
    crud: CrudFuncs,
    client: InMemoryServiceEndpointClient,
    mut config: ResourceData,
) {
    crud.create(&mut config, &client).await.expect("create succeeds");
    let written = config.clone();

    let mut state = ResourceData::from_attributes([(PROJECT_ID, "project")]);
    state.set_id(written.id());
    crud.read(&mut state, &client).await.expect("read succeeds");

    assert_eq!(state, written);
}

#[rstest]
#[tokio::test]
async fn base_expander_sends_default_authorization(
    crud: CrudFuncs,
    client: InMemoryServiceEndpointClient,
    mut config: ResourceData,
) {
    crud.create(&mut config, &client).await.expect("create succeeds");

    let id = EndpointId::parse(config.id()).expect("id is a uuid");
    let stored = client.stored(&project(), id).expect("stored");
    let authorization = stored.authorization.expect("authorization sent");
    assert_eq!(authorization.scheme.as_deref(), Some(SCHEME_NONE));
    assert!(authorization.parameters.is_empty());
}

#[rstest]
#[tokio::test]
async fn create_failure_is_wrapped_and_leaves_data_untouched(
    crud: CrudFuncs,
    client: InMemoryServiceEndpointClient,
    mut config: ResourceData,
) {
    client.fail_with(Some(ClientError::Api {
        status: 400,
        message: "bad".to_owned(),
    }));
    let before = config.clone();

    let err = crud.create(&mut config, &client).await.expect_err("create fails");

    assert!(matches!(err, ServiceEndpointError::Create(ClientError::Api { status: 400, .. })));
    assert!(err.to_string().starts_with("Error creating service endpoint in Azure DevOps"));
    assert_eq!(config, before);
}

#[rstest]
#[tokio::test]
async fn empty_project_is_rejected_before_any_call(
    crud: CrudFuncs,
    client: InMemoryServiceEndpointClient,
    mut config: ResourceData,
) {
    config.set(PROJECT_ID, "");

    let err = crud.create(&mut config, &client).await.expect_err("create fails");

    assert!(matches!(err, ServiceEndpointError::InvalidConfig { ref attribute, .. } if attribute == PROJECT_ID));
    assert_eq!(client.call_count(), 0);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[rstest]
#[tokio::test]
async fn update_changes_only_submitted_fields(
    crud: CrudFuncs,
    client: InMemoryServiceEndpointClient,
    mut config: ResourceData,
) {
    crud.create(&mut config, &client).await.expect("create succeeds");
    let id = config.id().to_owned();

    config.set(SERVICE_ENDPOINT_NAME, "renamed");
    config.set_optional(SERVICE_ENDPOINT_OWNER, None);
    crud.update(&mut config, &client).await.expect("update succeeds");

    assert_eq!(config.id(), id);
    assert_eq!(config.get_str(SERVICE_ENDPOINT_NAME), "renamed");
    assert_eq!(config.get_str(SERVICE_ENDPOINT_URL), "https://example.com");
    // Unsubmitted owner comes back as the server-held value.
    assert_eq!(config.get_str(SERVICE_ENDPOINT_OWNER), "library");
}

#[rstest]
#[tokio::test]
async fn update_failure_is_wrapped(
    crud: CrudFuncs,
    client: InMemoryServiceEndpointClient,
    mut config: ResourceData,
) {
    crud.create(&mut config, &client).await.expect("create succeeds");
    client.fail_with(Some(ClientError::Transport("reset".to_owned())));

    let err = crud.update(&mut config, &client).await.expect_err("update fails");
    assert!(matches!(err, ServiceEndpointError::Update(ClientError::Transport(_))));
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[rstest]
#[tokio::test]
async fn delete_then_read_fails(
    crud: CrudFuncs,
    client: InMemoryServiceEndpointClient,
    mut config: ResourceData,
) {
    crud.create(&mut config, &client).await.expect("create succeeds");
    crud.delete(&config, &client).await.expect("delete succeeds");
    assert!(client.is_empty());

    let err = crud.read(&mut config, &client).await.expect_err("read fails");
    assert!(matches!(
        err,
        ServiceEndpointError::Read {
            source: ClientError::NotFound,
            ..
        }
    ));
}

#[rstest]
#[tokio::test]
async fn delete_does_not_mutate_data(
    crud: CrudFuncs,
    client: InMemoryServiceEndpointClient,
    mut config: ResourceData,
) {
    crud.create(&mut config, &client).await.expect("create succeeds");
    let before = config.clone();

    crud.delete(&config, &client).await.expect("delete succeeds");
    assert_eq!(config, before);
}

#[rstest]
#[tokio::test]
async fn deleting_twice_reports_the_remote_failure(
    crud: CrudFuncs,
    client: InMemoryServiceEndpointClient,
    mut config: ResourceData,
) {
    crud.create(&mut config, &client).await.expect("create succeeds");
    crud.delete(&config, &client).await.expect("first delete succeeds");

    let err = crud.delete(&config, &client).await.expect_err("second delete fails");
    assert_eq!(err.client_error(), Some(&ClientError::NotFound));
}

// ---------------------------------------------------------------------------
// Malformed identifiers
// ---------------------------------------------------------------------------

#[rstest]
#[case::empty("")]
#[case::garbage("not-a-uuid")]
#[case::truncated("5b0e0d4f-86f4-4ab5-9b39")]
#[tokio::test]
async fn malformed_id_fails_without_calling_the_service(
    crud: CrudFuncs,
    client: InMemoryServiceEndpointClient,
    mut config: ResourceData,
    #[case] raw: &str,
) {
    config.set_id(raw);

    let read = crud.read(&mut config, &client).await;
    let update = crud.update(&mut config, &client).await;
    let delete = crud.delete(&config, &client).await;

    for result in [read, update, delete] {
        assert!(matches!(
            result,
            Err(ServiceEndpointError::MalformedId { ref value, .. }) if value == raw
        ));
    }
    assert_eq!(client.call_count(), 0);
}

// ---------------------------------------------------------------------------
// Response handling
// ---------------------------------------------------------------------------

/// Answers every call with an endpoint that has no identifier.
struct AnonymousEndpointClient;

#[async_trait]
impl ServiceEndpointClient for AnonymousEndpointClient {
    async fn create_service_endpoint(
        &self,
        endpoint: &ServiceEndpoint,
        _project: &ProjectId,
    ) -> ClientResult<ServiceEndpoint> {
        Ok(ServiceEndpoint {
            id: None,
            ..endpoint.clone()
        })
    }

    async fn get_service_endpoint_details(
        &self,
        _id: EndpointId,
        _project: &ProjectId,
    ) -> ClientResult<ServiceEndpoint> {
        Ok(ServiceEndpoint::default())
    }

    async fn update_service_endpoint(
        &self,
        endpoint: &ServiceEndpoint,
        _project: &ProjectId,
    ) -> ClientResult<ServiceEndpoint> {
        Ok(endpoint.clone())
    }

    async fn delete_service_endpoint(&self, _project: &ProjectId, _id: EndpointId) -> ClientResult<()> {
        Ok(())
    }
}

#[rstest]
#[tokio::test]
async fn response_without_id_is_incomplete(crud: CrudFuncs, mut config: ResourceData) {
    let err = crud
        .create(&mut config, &AnonymousEndpointClient)
        .await
        .expect_err("flatten fails");

    assert!(matches!(err, ServiceEndpointError::IncompleteResponse { field: "id" }));
    assert!(config.is_new());
}

#[rstest]
fn make_base_resource_declares_shared_attributes() {
    let resource = make_base_resource(Arc::new(BaseMarshaller));
    let project = resource.schema.attribute(PROJECT_ID).expect("declared");
    assert!(project.required && project.force_new);
    assert!(resource.schema.attribute(SERVICE_ENDPOINT_TYPE).is_some_and(|a| a.computed));
    assert_eq!(
        resource
            .schema
            .attribute(SERVICE_ENDPOINT_OWNER)
            .and_then(|a| a.default.clone()),
        Some(crate::AttributeDefault::Value(DEFAULT_OWNER.to_owned()))
    );
}
