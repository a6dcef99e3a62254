//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate the redirect document
//! - Start the metrics exporter when enabled
//! - Bind the listener (plain or TLS) and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, nothing is retried
//! - Listener binds last (traffic only when the resolver is ready)

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;

use crate::config::validation::validate_bind_address;
use crate::config::{load_from_source, ConfigError, ServerSettings, TlsConfig};
use crate::http::VanityServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Error type for startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {error}")]
    Bind {
        address: String,
        #[source]
        error: std::io::Error,
    },

    #[error("TLS setup failed: {0}")]
    Tls(#[source] std::io::Error),

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Load the redirect document, then serve until `shutdown` fires.
pub async fn run(settings: ServerSettings, shutdown: &Shutdown) -> Result<(), StartupError> {
    let config = load_from_source(
        &settings.redirects,
        Duration::from_secs(settings.timeouts.fetch_secs),
    )
    .await?;

    if settings.observability.metrics_enabled {
        match settings.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %settings.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let address = validate_bind_address(&settings.listener.bind_address).to_string();
    let server = VanityServer::new(&settings, config);

    match &settings.listener.tls {
        Some(tls) => {
            let tls_config = load_tls_config(tls).await?;
            let addr = resolve_address(&address).await?;
            server.run_tls(addr, tls_config, shutdown.subscribe()).await?;
        }
        None => {
            let listener = TcpListener::bind(&address)
                .await
                .map_err(|error| StartupError::Bind {
                    address: address.clone(),
                    error,
                })?;
            server.run(listener, shutdown.subscribe()).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Load the certificate and key named in `tls`.
pub async fn load_tls_config(tls: &TlsConfig) -> Result<RustlsConfig, StartupError> {
    for file in [&tls.cert_path, &tls.key_path] {
        if !Path::new(file).exists() {
            return Err(StartupError::Tls(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found: {file}"),
            )));
        }
    }
    RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
        .await
        .map_err(StartupError::Tls)
}

async fn resolve_address(address: &str) -> Result<SocketAddr, StartupError> {
    let bind_error = |error: std::io::Error| StartupError::Bind {
        address: address.to_string(),
        error,
    };
    tokio::net::lookup_host(address)
        .await
        .map_err(bind_error)?
        .next()
        .ok_or_else(|| {
            bind_error(std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                "address resolved to nothing",
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_source_is_fatal() {
        let shutdown = Shutdown::new();
        let err = run(ServerSettings::default(), &shutdown).await.unwrap_err();
        assert!(matches!(err, StartupError::Config(ConfigError::MissingConfigSource)));
    }

    #[tokio::test]
    async fn test_missing_certificate() {
        let tls = TlsConfig {
            cert_path: "/nonexistent/cert.pem".to_string(),
            key_path: "/nonexistent/key.pem".to_string(),
        };
        assert!(matches!(load_tls_config(&tls).await, Err(StartupError::Tls(_))));
    }

    #[tokio::test]
    async fn test_resolve_address() {
        let addr = resolve_address("127.0.0.1:8443").await.unwrap();
        assert_eq!(addr.port(), 8443);
    }
}
