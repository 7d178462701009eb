//! Signature acceptance integration tests.

#[cfg(test)]
mod tests {
    use scp_auth::Credentials;
    use scp_client::{ClientError, OpenApiClient, ReqwestTransport, Resource, TransportOptions};

    use crate::{live_client, live_config};

    #[tokio::test]
    #[ignore = "requires live open-api endpoint"]
    async fn test_should_accept_signed_get() {
        let client = live_client();

        let response = client.get(&Resource::Azs.path()).await.unwrap();

        assert!(response.status().is_success());
    }

    #[tokio::test]
    #[ignore = "requires live open-api endpoint"]
    async fn test_should_reject_wrong_secret() {
        let config = live_config();
        let transport = ReqwestTransport::new(TransportOptions::from(&config)).unwrap();
        let credentials = Credentials::new(config.access_key.clone(), "not-the-secret").unwrap();
        let client = OpenApiClient::new(
            transport,
            credentials,
            config.endpoint().unwrap(),
            config.signing_scope(),
        );

        match client.get(&Resource::Azs.path()).await {
            Err(ClientError::Server { status, .. }) => assert!(status.is_client_error()),
            Ok(response) => assert_ne!(response.success(), Some(true)),
            Err(other) => panic!("expected server rejection, got {other:?}"),
        }
    }
}
