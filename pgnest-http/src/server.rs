use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{Router, http::HeaderValue, middleware};
use pgnest_core::config::{AppConfig, SecretConfig};
use pgnest_core::identity::IdentityProvider;
use pgnest_core::services::Marketplace;
use pgnest_core::store::Store;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::auth::{StaticIdentityProvider, auth_middleware};
use crate::routes::create_api_router;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins; empty allows any
    pub cors_origins: Vec<String>,

    /// How often the store is written to disk; zero disables
    pub flush_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ServerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            cors_origins: config.server.cors_origins.clone(),
            flush_interval: config.store.flush_interval,
        }
    }
}

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub market: Marketplace,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(market: Marketplace, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { market, identity }
    }
}

/// Open the store and wire the marketplace to the configured tokens.
pub async fn build_state(config: &AppConfig, secret: &SecretConfig) -> anyhow::Result<AppState> {
    let store = match &config.store.data_dir {
        Some(dir) => Store::open(dir)
            .await
            .with_context(|| format!("Failed to open store at {}", dir.display()))?,
        None => {
            warn!("No data_dir configured, data will not survive a restart");
            Store::in_memory()
        }
    };

    let market = Marketplace::new(store, config)
        .with_bootstrap_admins(secret.bootstrap_admins.iter().cloned());
    let promoted = market.apply_bootstrap_admins()?;
    if promoted > 0 {
        info!("Promoted {} bootstrap admin(s)", promoted);
    }

    let identity = StaticIdentityProvider::from_tokens(secret.token_pairs());
    info!("Loaded {} identity token(s)", identity.len());

    Ok(AppState::new(market, Arc::new(identity)))
}

pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return Ok(cors.allow_origin(Any));
    }
    let origins = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", o))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(cors.allow_origin(AllowOrigin::list(origins)))
}

/// The full application: routes, authentication, tracing and CORS.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    create_api_router()
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state.clone(), cors_layer(&config.cors_origins)?);

    let flusher = spawn_flusher(state.market.clone(), config.flush_interval);

    let addr = format!("{}:{}", config.host, config.port).parse::<SocketAddr>()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = flusher {
        handle.abort();
    }
    state.market.store().flush().await?;
    info!("Store flushed, server stopped");
    Ok(())
}

fn spawn_flusher(
    market: Marketplace,
    interval: Duration,
) -> Option<tokio::task::JoinHandle<()>> {
    if interval.is_zero() || market.store().data_dir().is_none() {
        return None;
    }
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // the first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = market.store().flush().await {
                error!("Periodic flush failed: {}", e);
            }
        }
    }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
