//! Dispatch of one lifecycle operation against a state document.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use azdo_client::{AzureDevOpsClient, AzureDevOpsConfig};
use github::{resource_service_endpoint_github, RESOURCE_NAME};
use serde::Serialize;
use serviceendpoint::{Resource, ResourceData, ResourceSchema, ServiceEndpointClient};
use tracing::info;

use crate::args::{Cli, Command};

/// Lifecycle operation requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create the endpoint and record its id.
    Create,
    /// Refresh state from the service.
    Read,
    /// Push configuration changes to the service.
    Update,
    /// Remove the endpoint.
    Delete,
}

#[derive(Serialize)]
struct SchemaDocument<'a> {
    name: &'a str,
    #[serde(flatten)]
    schema: &'a ResourceSchema,
}

/// Runs the command selected by `cli`.
pub async fn run(cli: &Cli) -> Result<()> {
    let resource = resource_service_endpoint_github();

    let (operation, state) = match &cli.command {
        Command::Schema => {
            return write_json(&SchemaDocument {
                name: RESOURCE_NAME,
                schema: &resource.schema,
            })
        }
        Command::Create(args) => (Operation::Create, &args.state),
        Command::Read(args) => (Operation::Read, &args.state),
        Command::Update(args) => (Operation::Update, &args.state),
        Command::Delete(args) => (Operation::Delete, &args.state),
    };

    let data = parse_state(&read_input(state)?)?;
    let client = build_client(cli)?;

    if let Some(data) = execute(&resource, operation, data, &client).await? {
        write_json(&data)?;
    }
    Ok(())
}

/// Runs `operation` and returns the state the host should persist, or `None`
/// when the resource is gone.
pub async fn execute(
    resource: &Resource,
    operation: Operation,
    mut data: ResourceData,
    client: &dyn ServiceEndpointClient,
) -> Result<Option<ResourceData>> {
    match operation {
        Operation::Create => {
            resource
                .schema
                .prepare(&mut data)
                .context("invalid configuration")?;
            resource
                .crud
                .create(&mut data, client)
                .await
                .context("create failed")?;
            info!(id = data.id(), "Service connection created");
        }
        Operation::Read => {
            resource
                .crud
                .read(&mut data, client)
                .await
                .context("read failed")?;
        }
        Operation::Update => {
            resource
                .schema
                .prepare(&mut data)
                .context("invalid configuration")?;
            resource
                .crud
                .update(&mut data, client)
                .await
                .context("update failed")?;
        }
        Operation::Delete => {
            resource
                .crud
                .delete(&data, client)
                .await
                .context("delete failed")?;
            return Ok(None);
        }
    }
    Ok(Some(data))
}

fn build_client(cli: &Cli) -> Result<AzureDevOpsClient> {
    let url = cli
        .org_service_url
        .as_deref()
        .context("organisation URL missing: pass --org-service-url or set AZDO_ORG_SERVICE_URL")?;
    let token = cli.personal_access_token.clone().context(
        "personal access token missing: pass --personal-access-token or set AZDO_PERSONAL_ACCESS_TOKEN",
    )?;

    let config = AzureDevOpsConfig::new(url, token)?
        .with_api_version(cli.api_version.clone())
        .with_timeout(Duration::from_secs(cli.timeout_secs));
    Ok(AzureDevOpsClient::new(config)?)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        return std::io::read_to_string(std::io::stdin()).context("failed to read state from stdin");
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read state file {}", path.display()))
}

pub fn parse_state(raw: &str) -> Result<ResourceData> {
    serde_json::from_str(raw).context("state document is not valid JSON")
}

fn write_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("failed to write output")?;
    writeln!(stdout).context("failed to write output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use github::GITHUB_SERVICE_ENDPOINT_PAT;
    use rstest::{fixture, rstest};
    use serviceendpoint::adapters::memory::InMemoryServiceEndpointClient;
    use serviceendpoint::crud::{PROJECT_ID, SERVICE_ENDPOINT_NAME};

    const STATE: &str = r#"{
        "attributes": {
            "project_id": "project",
            "service_endpoint_name": "github",
            "github_service_endpoint_pat": "ghp_token"
        }
    }"#;

    #[fixture]
    fn resource() -> Resource {
        resource_service_endpoint_github()
    }

    #[rstest]
    fn parse_state_accepts_documents_without_id() {
        let data = parse_state(STATE).expect("valid document");
        assert!(data.is_new());
        assert_eq!(data.get_str(PROJECT_ID), "project");
    }

    #[rstest]
    fn parse_state_rejects_garbage() {
        assert!(parse_state("id=1").is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn create_then_read_through_execute(resource: Resource) {
        let client = InMemoryServiceEndpointClient::new();
        let state = parse_state(STATE).expect("valid document");

        let created = execute(&resource, Operation::Create, state, &client)
            .await
            .expect("create succeeds")
            .expect("state returned");
        assert!(!created.is_new());
        assert_eq!(created.get_str(GITHUB_SERVICE_ENDPOINT_PAT), "ghp_token");

        let read = execute(&resource, Operation::Read, created.clone(), &client)
            .await
            .expect("read succeeds")
            .expect("state returned");
        assert_eq!(read, created);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_returns_no_state(resource: Resource) {
        let client = InMemoryServiceEndpointClient::new();
        let created = execute(&resource, Operation::Create, parse_state(STATE).expect("valid"), &client)
            .await
            .expect("create succeeds")
            .expect("state returned");

        let deleted = execute(&resource, Operation::Delete, created, &client)
            .await
            .expect("delete succeeds");
        assert!(deleted.is_none());
        assert!(client.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn create_rejects_incomplete_configuration(resource: Resource) {
        let client = InMemoryServiceEndpointClient::new();
        let mut state = parse_state(STATE).expect("valid document");
        state.set(SERVICE_ENDPOINT_NAME, "");

        let err = execute(&resource, Operation::Create, state, &client)
            .await
            .expect_err("name is required");
        assert!(format!("{err:#}").contains("service_endpoint_name"));
        assert_eq!(client.call_count(), 0);
    }
}
