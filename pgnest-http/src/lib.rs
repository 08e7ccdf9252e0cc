//! PGNest HTTP API Server
//!
//! Serves the student-housing marketplace from `pgnest-core` over a JSON API,
//! with tokens resolved by a static identity provider.

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod server;

use pgnest_core::config::{AppConfig, SecretConfig};
use server::{ServerConfig, build_state, start_server};

/// Start the server with the given configuration and secrets.
///
/// Tracing must already be initialised by the caller.
pub async fn start(config: AppConfig, secret: SecretConfig) -> anyhow::Result<()> {
    let state = build_state(&config, &secret).await?;
    start_server(ServerConfig::from(&config), state).await
}
