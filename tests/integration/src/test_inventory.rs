//! Read-only inventory integration tests.

#[cfg(test)]
mod tests {
    use futures::future::join_all;
    use scp_client::Resource;
    use scp_client::model::StorageTag;

    use crate::live_client;

    #[tokio::test]
    #[ignore = "requires live open-api endpoint"]
    async fn test_should_list_storage_tags() {
        let client = live_client();

        let response = client.get(&Resource::StorageTags.path()).await.unwrap();

        assert_eq!(response.success(), Some(true));
        let tags: Vec<StorageTag> = response.items_as().unwrap();
        assert!(tags.iter().all(|t| !t.id.is_empty()));
    }

    #[tokio::test]
    #[ignore = "requires live open-api endpoint"]
    async fn test_should_fetch_inventory_concurrently() {
        let client = live_client();
        let paths: Vec<String> = Resource::INVENTORY.iter().map(|r| r.path()).collect();

        let results = join_all(paths.iter().map(|p| client.get(p))).await;

        for (path, result) in paths.iter().zip(results) {
            let response = result.unwrap_or_else(|e| panic!("GET {path} failed: {e}"));
            assert!(response.status().is_success());
        }
    }

    #[tokio::test]
    #[ignore = "requires live open-api endpoint"]
    async fn test_should_list_hosts() {
        let client = live_client();

        let response = client.get(&Resource::Hosts.path()).await.unwrap();

        assert!(response.data().is_array());
    }
}
