//! Shared utilities for integration testing.

use dynamic_upstreams::config::schema::AppConfig;
use dynamic_upstreams::http::server::{AppState, HttpServer};
use dynamic_upstreams::lifecycle::Shutdown;
use tokio::net::TcpListener;

/// Spawn the real server over the given config on an ephemeral port.
/// Returns the base URL and the shutdown handle.
pub async fn spawn_app(config: AppConfig) -> (String, Shutdown) {
    let state = AppState::from_config(&config);
    state.ensure_loaded();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    let server = HttpServer::with_state(state);
    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    (format!("http://{addr}"), shutdown)
}

/// POST one upstream and return its assigned id.
#[allow(dead_code)]
pub async fn create_upstream(
    client: &reqwest::Client,
    base: &str,
    body: serde_json::Value,
) -> u64 {
    let res = client
        .post(format!("{base}/upstreams"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = res.status();
    let envelope: serde_json::Value = res.json().await.unwrap();
    assert_eq!(status, 201, "create failed: {envelope}");
    envelope["result"]["id"].as_u64().unwrap()
}
