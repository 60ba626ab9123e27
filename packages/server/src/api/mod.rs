//! HTTP API
//!
//! REST surface over the Atlas services. Endpoint modules each expose a
//! `routes(state)` function and are merged into one router here.
//!
//! # Architecture
//!
//! - `country_endpoints`: health, create, list and get countries
//! - `neighbor_endpoints`: read, add and remove neighbor relations
//! - `http_error`: per-route error body shapes and status mapping
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin atlas-server
//! ATLAS_PORT=8080 RUST_LOG=debug cargo run --bin atlas-server
//! ```

use axum::{http::Method, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{ServerConfig, StoreBackend};
use atlas_core::db::{MemoryStore, RecordStore};
use atlas_core::repositories::{CountryRepository, NeighborRepository};
use atlas_core::{CountryListingService, NeighborService};

mod country_endpoints;
mod http_error;
mod neighbor_endpoints;

pub use http_error::{status_for, ErrorBody, HttpError};

/// `{message, data}` success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// Application state shared across all endpoints
///
/// Every service holds its own handle to the same injected store. Handlers
/// share no mutable state, so requests are isolated from one another.
#[derive(Clone)]
pub struct AppState {
    pub countries: CountryRepository,
    pub listing: CountryListingService,
    pub neighbors: NeighborService,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let countries = CountryRepository::new(store.clone());
        let neighbors = NeighborRepository::new(store);

        Self {
            listing: CountryListingService::new(countries.clone()),
            neighbors: NeighborService::new(countries.clone(), neighbors),
            countries,
        }
    }
}

/// Create the application router with all endpoint modules
///
/// CORS is added by [`start_server`] from configuration so tests can drive
/// the bare router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(country_endpoints::routes(state.clone()))
        .merge(neighbor_endpoints::routes(state))
        .layer(TraceLayer::new_for_http())
}

/// CORS layer from configured origins; any origin when none are configured
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any)
        .allow_credentials(false);

    if config.cors_origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(config.cors_origins.clone())
    }
}

/// Construct the configured record store backend
pub async fn open_store(backend: &StoreBackend) -> anyhow::Result<Arc<dyn RecordStore>> {
    match backend {
        StoreBackend::Memory => {
            tracing::info!("📦 Store: in-memory (data is lost on shutdown)");
            Ok(Arc::new(MemoryStore::new()))
        }
        #[cfg(feature = "surrealdb")]
        StoreBackend::Surreal { path } => {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tracing::info!("📦 Store: SurrealDB at {}", path.display());
            let store = atlas_core::db::SurrealStore::new(path.clone()).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "surrealdb"))]
        StoreBackend::Surreal { .. } => {
            anyhow::bail!("SurrealDB backend requested but the `surrealdb` feature is not enabled")
        }
    }
}

/// Start the HTTP server and run until Ctrl-C
///
/// # Errors
///
/// Returns error if the store cannot be opened or the listener fails to bind.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let store = open_store(&config.store).await?;
    let app = create_router(AppState::new(store)).layer(cors_layer(&config));

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 Atlas API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("👋 Atlas API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("⚠️  Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
