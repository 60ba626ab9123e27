//! Atlas HTTP server
//!
//! Wires the `atlas-core` services to an axum router and reads runtime
//! configuration from the environment.
//!
//! - [`config`] - `ServerConfig` loaded from `ATLAS_*` variables
//! - [`api`] - router, endpoint modules and error responses

pub mod api;
pub mod config;
