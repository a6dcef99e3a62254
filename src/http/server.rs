//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the index and import handlers
//! - Register import routes up to the configured subpath depth
//! - Wire up middleware (tracing, timeout, request ID, basic auth)
//! - Bind server to a plain or TLS listener

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use askama::Template;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    middleware,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use percent_encoding::percent_decode_str;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{ServerSettings, VanityConfig};
use crate::http::pages::{ImportPage, IndexPage};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, X_REQUEST_ID};
use crate::observability::metrics;
use crate::routing::PathResolver;
use crate::security::{basic_auth_middleware, BasicAuth};

/// Body of every 404 response.
pub const NOT_FOUND_BODY: &str = "404 page not found";

/// Application state injected into handlers.
#[derive(Debug)]
pub struct AppState {
    pub resolver: PathResolver,
    /// Overrides the request's Host header when set.
    pub host: Option<String>,
    pub cache_control: String,
}

impl AppState {
    pub fn new(config: VanityConfig) -> Self {
        let cache_control = config.cache_control();
        Self {
            resolver: PathResolver::new(config.entries),
            host: config.host,
            cache_control,
        }
    }

    /// Host used to build import paths for this request.
    pub fn host(&self, headers: &HeaderMap, uri: &Uri) -> String {
        if let Some(host) = &self.host {
            return host.clone();
        }
        headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
            .or_else(|| uri.authority().map(|a| a.to_string()))
            .unwrap_or_default()
    }
}

/// HTTP server for vanity import redirects.
pub struct VanityServer {
    router: Router,
    state: Arc<AppState>,
}

impl VanityServer {
    /// Build the server from settings and a validated redirect document.
    pub fn new(settings: &ServerSettings, config: VanityConfig) -> Self {
        let state = Arc::new(AppState::new(config));
        metrics::record_registered_paths(state.resolver.len());
        let router = Self::build_router(settings, state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(settings: &ServerSettings, state: Arc<AppState>) -> Router {
        let mut router = Router::new().route("/", get(handle_index));

        let mut route = String::from("/{project}");
        router = router.route(&route, get(handle_import));
        for depth in 0..settings.subpath_depth {
            route = format!("{route}/{{path{depth}}}");
            tracing::debug!(route = %route, "Adding import route");
            router = router.route(&route, get(handle_import));
        }

        let mut router = router.fallback(handle_not_found).with_state(state);

        if settings.auth.enabled {
            let auth = Arc::new(BasicAuth::from_config(&settings.auth));
            router = router.layer(middleware::from_fn_with_state(auth, basic_auth_middleware));
        }

        router.layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer())
                .layer(TimeoutLayer::new(Duration::from_secs(settings.timeouts.request_secs))),
        )
    }

    /// The configured router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            paths = self.state.resolver.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve over TLS on `addr` until `shutdown` fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(
            address = %addr,
            paths = self.state.resolver.len(),
            "HTTPS server starting"
        );

        let handle = axum_server::Handle::new();
        let signal_handle = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received");
            signal_handle.graceful_shutdown(Some(Duration::from_secs(5)));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Serves the list of all supported import paths for this host.
async fn handle_index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let start = Instant::now();
    let host = state.host(&headers, &uri);
    let page = IndexPage {
        imports: state
            .resolver
            .entries()
            .iter()
            .map(|entry| format!("{}{}", host, entry.path()))
            .collect(),
        host: &host,
    };

    let response = render(page, None);
    metrics::record_request("index", response.status().as_u16(), start);
    response
}

/// Answers vanity import requests for a project and its subpackages.
async fn handle_import(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let start = Instant::now();
    let request_id = headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    let decoded = percent_decode_str(uri.path()).decode_utf8_lossy();
    let path = decoded.as_ref();

    let Some(resolved) = state.resolver.find(path) else {
        metrics::record_lookup(false);
        tracing::debug!(request_id = %request_id, path = %path, "No import path matched");
        metrics::record_request("import", StatusCode::NOT_FOUND.as_u16(), start);
        return not_found();
    };
    metrics::record_lookup(true);

    tracing::debug!(
        request_id = %request_id,
        path = %path,
        import = %resolved.entry.path(),
        subpath = %resolved.subpath,
        "Resolved import path"
    );

    let page = ImportPage {
        import_path: format!("{}{}", state.host(&headers, &uri), resolved.entry.path()),
        vcs: resolved.entry.vcs(),
        repo: resolved.entry.repository(),
        display: resolved.entry.display(),
    };

    let response = render(page, Some(state.cache_control.as_str()));
    metrics::record_request("import", response.status().as_u16(), start);
    response
}

async fn handle_not_found() -> Response {
    not_found()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
}

fn render<T: Template>(page: T, cache_control: Option<&str>) -> Response {
    match page.render() {
        Ok(body) => match cache_control {
            Some(value) => ([(header::CACHE_CONTROL, value.to_string())], Html(body)).into_response(),
            None => Html(body).into_response(),
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "cannot render the page").into_response()
        }
    }
}
