//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tokio::net::TcpListener;
use vanity_import::config::{load_from_source, ServerSettings};
use vanity_import::{Shutdown, VanityServer};

/// Path of a file under `tests/fixtures`.
pub fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .display()
        .to_string()
}

/// Build a server for `settings.redirects` without binding it.
pub async fn build_server(settings: &ServerSettings) -> VanityServer {
    let config = load_from_source(&settings.redirects, Duration::from_secs(5))
        .await
        .expect("redirect document should load");
    VanityServer::new(settings, config)
}

/// Start a server on an ephemeral port. Keep the `Shutdown` alive for the
/// duration of the test.
#[allow(dead_code)]
pub async fn start_server(settings: ServerSettings) -> (SocketAddr, Shutdown) {
    let server = build_server(&settings).await;
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// HTTP client that never goes through a proxy.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}
