//! Application startup and lifecycle management.

use crate::config::DocConfig;
use crate::handlers;
use crate::services::{Database, DocumentStore};
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Method,
    middleware,
    routing::{get, put},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::metrics::metrics_middleware;
use service_core::middleware::tracing::{make_request_span, request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service_name: Arc<str>,
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(service_name: impl Into<Arc<str>>, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            service_name: service_name.into(),
            store,
        }
    }
}

/// Any origin, the usual verbs, any request header.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(Any)
}

pub fn build_router(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/api/doc", get(handlers::list_documents))
        .route("/api/doc/:id", put(handlers::update_document))
        .route("/api/hello", get(handlers::hello))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(cors_layer())
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build against the configured PostgreSQL database.
    pub async fn build(config: DocConfig) -> Result<Self, AppError> {
        let db = Database::connect_lazy(&config.database);
        Self::build_with_store(config, Arc::new(db)).await
    }

    /// Build with a caller-supplied store. The port in `config` may be 0 to
    /// let the OS pick one.
    pub async fn build_with_store(
        config: DocConfig,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self, AppError> {
        let state = AppState::new(config.service_name.as_str(), store);
        let router = build_router(state, config.http.body_limit_bytes);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            service = %config.service_name,
            version = env!("CARGO_PKG_VERSION"),
            port = port,
            "Server running on http://localhost:{}",
            port
        );

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until the listener fails or the future is dropped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }
}
