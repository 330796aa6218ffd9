//! REST API around the settlement engine.
//!
//! Provides three endpoints:
//! - `GET /config`: current VPP configuration
//! - `PUT /config`: partial configuration update
//! - `POST /optimize`: settle one day, returning result and summary

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::sync::RwLock;
use tracing::info;

use crate::settlement::{NetPositionMap, Prosumer, SettlementEngine};

pub use types::{ErrorResponse, OptimizeRequest, OptimizeResponse};

/// Application state shared across all request handlers.
///
/// Prosumers and default positions are read-only. The engine sits behind a
/// lock so that config updates never interleave with an optimization.
pub struct AppState {
    /// Participants priced by every optimization.
    pub prosumers: Vec<Prosumer>,
    /// Positions used when a request does not supply its own.
    pub net_positions: NetPositionMap,
    /// Engine holding the current configuration.
    pub engine: RwLock<SettlementEngine>,
}

impl AppState {
    pub fn new(
        prosumers: Vec<Prosumer>,
        net_positions: NetPositionMap,
        engine: SettlementEngine,
    ) -> Self {
        Self {
            prosumers,
            net_positions,
            engine: RwLock::new(engine),
        }
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/config", get(handlers::get_config).put(handlers::put_config))
        .route("/optimize", post(handlers::post_optimize))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
