//! Host metrics endpoint.
//!
//! `GET /api/metrics` reports CPU and memory usage of every physical host, as
//! seen by the open-api. Failures are logged and answered with `[]` so that
//! dashboards polling the endpoint keep rendering.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use scp_client::{ApiResponse, OpenApiClient, Resource, Transport};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

const CONTENT_TYPE: &str = "application/json";

/// CPU and memory usage of one host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostMetric {
    pub host_name: Value,
    pub cpu_usage: Value,
    pub memory_usage: Value,
}

impl HostMetric {
    fn from_host(host: &Value) -> Self {
        let field = |key: &str, default: Value| host.get(key).cloned().unwrap_or(default);
        Self {
            host_name: field("name", json!("N/A")),
            cpu_usage: field("cpu_usage", json!(0)),
            memory_usage: field("mem_usage", json!(0)),
        }
    }
}

/// Project a `hosts` listing onto [`HostMetric`]s.
pub fn host_metrics(response: &ApiResponse) -> Vec<HostMetric> {
    response.items().iter().map(HostMetric::from_host).collect()
}

/// Hyper `Service` answering metrics and health requests.
#[derive(Debug)]
pub struct MetricsService<T> {
    client: Arc<OpenApiClient<T>>,
}

impl<T> MetricsService<T> {
    pub fn new(client: Arc<OpenApiClient<T>>) -> Self {
        Self { client }
    }
}

impl<T> Clone for MetricsService<T> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<T: Transport + 'static> MetricsService<T> {
    /// Route one request.
    pub async fn handle(&self, method: &http::Method, path: &str) -> http::Response<Full<Bytes>> {
        match (method, path) {
            (&http::Method::GET, "/api/metrics") => {
                let metrics = self.collect().await;
                json_response(http::StatusCode::OK, &json!(metrics))
            }
            (&http::Method::GET, "/health") => {
                json_response(http::StatusCode::OK, &json!({"status": "ok"}))
            }
            _ => json_response(http::StatusCode::NOT_FOUND, &json!({"error": "not found"})),
        }
    }

    async fn collect(&self) -> Vec<HostMetric> {
        match self.client.get(&Resource::Hosts.path()).await {
            Ok(response) => host_metrics(&response),
            Err(e) => {
                warn!(error = %e, "failed to fetch host metrics");
                Vec::new()
            }
        }
    }
}

impl<T: Transport + 'static> hyper::service::Service<http::Request<Incoming>>
    for MetricsService<T>
{
    type Response = http::Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let service = self.clone();
        let method = req.method().clone();
        let path = req.uri().path().to_owned();
        Box::pin(async move {
            let response = service.handle(&method, &path).await;
            info!(%method, path = %path, status = response.status().as_u16(), "served metrics request");
            Ok(response)
        })
    }
}

fn json_response(status: http::StatusCode, body: &Value) -> http::Response<Full<Bytes>> {
    let mut response = http::Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static(CONTENT_TYPE),
    );
    response
}

/// Run the accept loop until Ctrl-C, then drain in-flight connections.
pub async fn serve<T: Transport + 'static>(
    listener: TcpListener,
    service: MetricsService<T>,
) -> anyhow::Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}
