//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the gateway handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Map each request onto a content path and run the resolution pipeline
//! - Swap configuration and store atomically on hot reload
//! - Record per-request metrics and log failures by severity

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::{Path, State},
    http::Request,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::content::PathError;
use crate::error::GatewayError;
use crate::http::host::map_request;
use crate::http::request::{self, MakeRequestUuid};
use crate::http::response::{redirect_response, render_content};
use crate::observability::metrics;
use crate::resolution::{GatewayRequest, Pipeline, Resolution};
use crate::store::{ContentStore, FsStore};

/// Configuration and store serving the current generation of requests.
#[derive(Debug)]
pub struct GatewayState {
    pub config: GatewayConfig,
    pub store: Arc<dyn ContentStore>,
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<ArcSwap<GatewayState>>,
    /// Rebuild the store from `[store]` on reload. False for injected stores.
    store_from_config: bool,
}

impl AppState {
    fn new(config: GatewayConfig, store: Arc<dyn ContentStore>, store_from_config: bool) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(GatewayState { config, store })),
            store_from_config,
        }
    }

    /// Snapshot for one request; a concurrent reload does not affect it.
    pub fn current(&self) -> Arc<GatewayState> {
        self.inner.load_full()
    }

    /// Install a new (already validated) configuration.
    pub fn apply_config(&self, config: GatewayConfig) -> Result<(), PathError> {
        let current = self.current();

        let store = if self.store_from_config && current.config.store != config.store {
            tracing::info!(root = %config.store.root, offline = config.store.offline, "Rebuilding content store");
            Arc::new(FsStore::from_config(&config.store)?) as Arc<dyn ContentStore>
        } else {
            current.store.clone()
        };

        if current.config.listener != config.listener || current.config.timeouts != config.timeouts {
            tracing::warn!("Listener and timeout changes take effect after a restart");
        }

        self.inner.store(Arc::new(GatewayState { config, store }));
        tracing::info!("Configuration reloaded");
        Ok(())
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server backed by the filesystem store described in `config`.
    pub fn new(config: GatewayConfig) -> Result<Self, PathError> {
        let store = Arc::new(FsStore::from_config(&config.store)?);
        Ok(Self::build(config, store, true))
    }

    /// Create a server over an existing store. Reloads keep this store.
    pub fn with_store(config: GatewayConfig, store: Arc<dyn ContentStore>) -> Self {
        Self::build(config, store, false)
    }

    fn build(config: GatewayConfig, store: Arc<dyn ContentStore>, store_from_config: bool) -> Self {
        let timeout = Duration::from_secs(config.timeouts.request_secs);
        let state = AppState::new(config, store, store_from_config);
        let router = Self::build_router(timeout, state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(timeout: Duration, state: AppState) -> Router {
        Router::new()
            .route("/", get(root_handler))
            .route("/{*path}", get(path_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(timeout))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = %request::request_id(request.headers()),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for serving or for in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Run the server until `shutdown` fires, applying config updates as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        let mut reload_shutdown = shutdown.resubscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    update = config_updates.recv() => match update {
                        Some(config) => {
                            if let Err(e) = state.apply_config(config) {
                                tracing::error!(error = %e, "Rejected configuration update");
                            }
                        }
                        None => break,
                    },
                    _ = reload_shutdown.recv() => break,
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn root_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    gateway_handler(state, "/".to_string(), request).await
}

async fn path_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    request: Request<Body>,
) -> Response {
    gateway_handler(state, format!("/{}", path), request).await
}

/// Main gateway handler.
/// Maps the host, resolves with fallbacks, and renders the outcome.
async fn gateway_handler(state: AppState, path: String, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request::request_id(request.headers());
    let method = request.method().to_string();
    let host = request::host(&request);
    let accept = request::accept_values(request.headers());
    drop(request);

    tracing::debug!(
        request_id = %request_id,
        host = host.as_deref().unwrap_or(""),
        path = %path,
        "Serving request"
    );

    let current = state.current();
    let response = match serve(&current, host.as_deref(), &path, accept).await {
        Ok(response) => response,
        Err(e) => {
            metrics::record_outcome(e.outcome());
            let status = e.status_code();
            if status.is_server_error() {
                tracing::error!(request_id = %request_id, path = %path, status = status.as_u16(), error = %e, "Request failed");
            } else {
                tracing::debug!(request_id = %request_id, path = %path, status = status.as_u16(), error = %e, "Request failed");
            }
            e.into_response()
        }
    };

    metrics::record_request(&method, response.status().as_u16(), start_time);
    response
}

async fn serve(
    state: &GatewayState,
    host: Option<&str>,
    path: &str,
    accept: Vec<String>,
) -> Result<Response, GatewayError> {
    let mapping = map_request(host, path, &state.config.gateway)?;
    let request = GatewayRequest {
        content_path: mapping.content_path.clone(),
        context: mapping.context.clone(),
        accept,
    };

    let pipeline = Pipeline::new(state.store.as_ref(), &state.config.redirects);
    let resolution = pipeline.resolve_with_fallback(&request).await?;
    metrics::record_outcome(resolution.outcome());

    match resolution {
        Resolution::Serve(content) => {
            tracing::debug!(
                path = %content.content_path,
                via = content.via.as_str(),
                "Serving content"
            );
            render_content(state.store.as_ref(), content).await
        }
        Resolution::Redirect { target, status } => {
            let location = mapping.client_location(&target);
            tracing::debug!(target = %target, location = %location, status, "Redirecting");
            redirect_response(&location, status)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn server(config: GatewayConfig) -> HttpServer {
        let store = MemoryStore::new()
            .with_file("/ipfs/bafyroot/index.html", "home")
            .unwrap()
            .with_file("/ipfs/bafyroot/_redirects", "/old /index.html 302\n")
            .unwrap();
        HttpServer::with_store(config, Arc::new(store))
    }

    fn get(host: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("Host", host)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_response_carries_request_id() {
        let response = server(GatewayConfig::default())
            .router()
            .oneshot(get("localhost", "/ipfs/bafyroot/index.html"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(request::X_REQUEST_ID));
    }

    #[tokio::test]
    async fn test_client_request_id_is_echoed() {
        let mut req = get("localhost", "/ipfs/bafyroot/index.html");
        req.headers_mut()
            .insert(request::X_REQUEST_ID, "abc-123".parse().unwrap());
        let response = server(GatewayConfig::default()).router().oneshot(req).await.unwrap();
        assert_eq!(response.headers()[request::X_REQUEST_ID], "abc-123");
    }

    #[tokio::test]
    async fn test_non_content_path_is_bad_request() {
        let response = server(GatewayConfig::default())
            .router()
            .oneshot(get("localhost", "/favicon.ico"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_apply_config_disables_rules() {
        let server = server(GatewayConfig::default());
        let router = server.router();

        let response = router
            .clone()
            .oneshot(get("bafyroot.ipfs.localhost", "/old"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);

        let mut config = GatewayConfig::default();
        config.redirects.enabled = false;
        server.state().apply_config(config).unwrap();

        let response = router
            .oneshot(get("bafyroot.ipfs.localhost", "/old"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
