//! Subcommand implementations.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use futures::future::join_all;
use scp_client::model::{CreateServerRequest, StorageTag};
use scp_client::{ApiResponse, ClientResult, OpenApiClient, Resource, Transport};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::metrics::{self, MetricsService};

/// Resolve a resource name to its path; anything else is used verbatim.
pub fn resolve_path(arg: &str) -> String {
    arg.parse::<Resource>()
        .map_or_else(|_| arg.to_owned(), Resource::path)
}

/// Fetch every path concurrently and print each outcome.
///
/// A failed path does not stop the others. Fails only if every request failed.
pub async fn inventory<T: Transport>(client: &OpenApiClient<T>, args: &[String]) -> Result<()> {
    let paths: Vec<String> = if args.is_empty() {
        Resource::INVENTORY.iter().map(|r| r.path()).collect()
    } else {
        args.iter().map(|a| resolve_path(a)).collect()
    };

    let results: Vec<ClientResult<ApiResponse>> =
        join_all(paths.iter().map(|path| client.get(path))).await;

    let mut failures = 0;
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(response) if response.data().is_null() => {
                warn!(path = %path, "response carried no data");
                println!("{path}: no data");
            }
            Ok(response) => println!("{path}:\n{}", pretty(&response)?),
            Err(e) => {
                failures += 1;
                println!("{path}: {e}");
            }
        }
    }

    if failures == paths.len() {
        bail!("all {failures} inventory requests failed");
    }
    Ok(())
}

/// Signed GET of one path, pretty-printed.
pub async fn get<T: Transport>(client: &OpenApiClient<T>, arg: &str) -> Result<()> {
    let path = resolve_path(arg);
    let response = client
        .get(&path)
        .await
        .with_context(|| format!("GET {path} failed"))?;
    println!("{}", pretty(&response)?);
    Ok(())
}

/// List storage tags as `ID | Name` lines.
pub async fn storage_tags<T: Transport>(client: &OpenApiClient<T>) -> Result<()> {
    let response = client
        .get(&Resource::StorageTags.path())
        .await
        .context("failed to fetch storage-tag list")?;

    let lines = storage_tag_lines(&response)?;
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

/// Render a storage-tag listing. Requires `success: true`.
pub fn storage_tag_lines(response: &ApiResponse) -> Result<Vec<String>> {
    if response.success() != Some(true) {
        bail!("storage-tag listing was not successful: {}", response.value());
    }
    let tags: Vec<StorageTag> = response
        .items_as()
        .context("unexpected storage-tag entry")?;
    Ok(tags
        .iter()
        .map(|tag| format!("ID: {} | Name: {}", tag.id, tag.name))
        .collect())
}

/// Submit a VM creation request, optionally saving the body first.
pub async fn create_server<T: Transport>(
    client: &OpenApiClient<T>,
    request: &CreateServerRequest,
    payload_out: Option<&Path>,
) -> Result<()> {
    if let Some(path) = payload_out {
        write_payload(request, path)?;
        info!(path = %path.display(), "wrote server request payload");
    }

    let response = client
        .post(&Resource::Servers.path(), request)
        .await
        .with_context(|| format!("failed to create server {}", request.name))?;

    println!("{}", pretty(&response)?);
    if response.success() == Some(false) {
        bail!("server creation was rejected");
    }
    Ok(())
}

/// Write `request` as pretty JSON.
pub fn write_payload(request: &CreateServerRequest, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(request).context("failed to encode payload")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

/// Bind `listen` and serve host metrics until Ctrl-C.
pub async fn serve<T: Transport + 'static>(client: OpenApiClient<T>, listen: &str) -> Result<()> {
    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("failed to bind to {listen}"))?;

    info!(addr = %listen, endpoint = %client.endpoint(), "serving host metrics");

    metrics::serve(listener, MetricsService::new(Arc::new(client))).await
}

fn pretty(response: &ApiResponse) -> Result<String> {
    serde_json::to_string_pretty(response.value()).context("failed to render response")
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use scp_client::model::NetworkSpec;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_should_resolve_names_and_keep_paths() {
        assert_eq!(resolve_path("azs"), "/janus/20180725/azs");
        assert_eq!(resolve_path("storage-tags"), "/janus/20180725/storage-tags");
        assert_eq!(
            resolve_path("/janus/20180725/servers/abc"),
            "/janus/20180725/servers/abc"
        );
    }

    #[test]
    fn test_should_render_storage_tags() {
        let response = ApiResponse::new(
            StatusCode::OK,
            json!({"success": true, "data": [
                {"id": "tag-1", "name": "ssd"},
                {"id": "tag-2", "name": "hdd"}
            ]}),
        );
        assert_eq!(
            storage_tag_lines(&response).unwrap(),
            vec!["ID: tag-1 | Name: ssd", "ID: tag-2 | Name: hdd"]
        );
    }

    #[test]
    fn test_should_reject_unsuccessful_storage_tag_listing() {
        let response = ApiResponse::new(StatusCode::OK, json!({"success": false}));
        assert!(storage_tag_lines(&response).is_err());
    }

    #[test]
    fn test_should_write_pretty_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vm_payload.json");
        let request = CreateServerRequest::builder()
            .az_id("az-1")
            .image_id("img-1")
            .storage_tag_id("tag-1")
            .name("win10")
            .networks(vec![NetworkSpec::builder().vpc_id("v").subnet_id("s").build()])
            .build();

        write_payload(&request, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n  \"az_id\": \"az-1\""));
        let parsed: CreateServerRequest = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, request);
    }
}
