//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::settlement::{NetPositionMap, SettlementResult, SettlementSummary};

/// Body of `POST /optimize`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptimizeRequest {
    /// Positions to settle; the scenario's positions when absent.
    #[serde(default)]
    pub net_positions: Option<NetPositionMap>,
}

/// Settlement result together with its derived summary.
#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub result: SettlementResult,
    pub summary: SettlementSummary,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
