//! Atlas HTTP Server Binary
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (127.0.0.1:3001, in-memory store)
//! cargo run --bin atlas-server
//!
//! # Persistent store
//! ATLAS_STORE=surreal ATLAS_DB_PATH=./data/atlas.db \
//!     cargo run --bin atlas-server --features surrealdb
//! ```
//!
//! # Environment Variables
//!
//! - `ATLAS_HOST`, `ATLAS_PORT`: bind address (default 127.0.0.1:3001)
//! - `ATLAS_STORE`, `ATLAS_DB_PATH`: record store backend
//! - `CORS_ALLOW_ORIGIN`: comma-separated allowed origins
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "atlas_core=trace")

use atlas_server::api::start_server;
use atlas_server::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🌍 Atlas API Server");

    let config = ServerConfig::from_env()?;
    tracing::info!("📡 Bind: {}", config.socket_addr());

    start_server(config).await
}
