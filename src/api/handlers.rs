//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use super::AppState;
use super::types::{ErrorResponse, OptimizeRequest, OptimizeResponse};
use crate::config::{ValidationErrors, VppConfig, VppConfigUpdate, validate_net_positions};
use crate::settlement::SettlementSummary;

/// Returns the current VPP configuration.
///
/// `GET /config` → 200 + `VppConfig` JSON
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<VppConfig> {
    let engine = state.engine.read().await;
    Json(engine.config().as_ref().clone())
}

/// Merges a partial update into the configuration.
///
/// `PUT /config` → 200 + updated `VppConfig` JSON
/// `PUT /config` with an invalid merge → 400 + `ErrorResponse`, config unchanged
pub async fn put_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<VppConfigUpdate>,
) -> Result<Json<VppConfig>, (StatusCode, Json<ErrorResponse>)> {
    let mut engine = state.engine.write().await;
    match engine.update_config(&update) {
        Ok(()) => Ok(Json(engine.config().as_ref().clone())),
        Err(errors) => Err(bad_request(&errors)),
    }
}

/// Settles one day for the scenario prosumers.
///
/// `POST /optimize` with `{}` → settles the scenario's own positions
/// `POST /optimize` with `{"net_positions": {...}}` → settles the given positions
/// `POST /optimize` with unknown ids or non-finite positions → 400 + `ErrorResponse`
pub async fn post_optimize(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let net_positions = request
        .net_positions
        .unwrap_or_else(|| state.net_positions.clone());

    let errors = validate_net_positions(&net_positions, &state.prosumers);
    if !errors.is_empty() {
        let errors = ValidationErrors(errors);
        warn!(%errors, "rejected optimize request");
        return Err(bad_request(&errors));
    }

    let engine = state.engine.read().await;
    let result = engine.optimize(&state.prosumers, &net_positions);
    let summary = SettlementSummary::from_result(&result, &net_positions);

    Ok(Json(OptimizeResponse { result, summary }))
}

fn bad_request(errors: &ValidationErrors) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: errors.to_string(),
        }),
    )
}
