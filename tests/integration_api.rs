//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use vpp_settle::api::{AppState, router};
use vpp_settle::config::ScenarioConfig;
use vpp_settle::settlement::SettlementEngine;

/// Build the API state from the sunny-surplus preset.
fn build_api_state() -> Arc<AppState> {
    let scenario = ScenarioConfig::sunny_surplus();
    let positions = scenario.resolved_net_positions();
    let engine = SettlementEngine::new(scenario.vpp.clone()).unwrap();
    Arc::new(AppState::new(scenario.prosumers, positions, engine))
}

async fn send(state: Arc<AppState>, method: &str, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn config_update_changes_following_settlement() {
    let state = build_api_state();

    let (status, before) = send(Arc::clone(&state), "POST", "/optimize", "{}").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(before["result"]["external_trades"][0]["side"], "sell");
    assert_eq!(before["result"]["external_trades"][0]["price"], 0.22);

    let (status, cfg) = send(Arc::clone(&state), "PUT", "/config", r#"{"sell_price":0.05}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cfg["sell_price"], 0.05);

    let (_, after) = send(Arc::clone(&state), "POST", "/optimize", "{}").await;
    assert_eq!(after["result"]["external_trades"][0]["price"], 0.05);
    assert_eq!(after["result"]["prosumer_final_prices"]["house-1"], 0.05);
}

#[tokio::test]
async fn schedule_entries_use_flat_action_fields() {
    let state = build_api_state();
    let (_, json) = send(state, "POST", "/optimize", "{}").await;

    let first = &json["result"]["battery_schedule"][0];
    assert_eq!(first["hour"], 0);
    assert_eq!(first["action"], "charge");
    assert!(first.get("change_kwh").is_some());
    assert!(first.get("level_kwh").is_some());
}

#[tokio::test]
async fn rejected_update_leaves_config_untouched() {
    let state = build_api_state();

    let (status, err) = send(
        Arc::clone(&state),
        "PUT",
        "/config",
        r#"{"buy_price":-1.0,"battery_efficiency":2.0}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = err["error"].as_str().unwrap();
    assert!(message.contains("vpp.buy_price"));
    assert!(message.contains("vpp.battery_efficiency"));

    let (_, cfg) = send(state, "GET", "/config", "").await;
    assert_eq!(cfg["buy_price"], 0.35);
    assert_eq!(cfg["battery_efficiency"], 0.9);
}

#[tokio::test]
async fn overflowing_positions_are_rejected_before_settling() {
    let state = build_api_state();
    let (status, _) = send(Arc::clone(&state), "PUT", "/config", r#"{"sell_price":0.0}"#).await;
    assert_eq!(status, StatusCode::OK);

    let (status, err) = send(
        state,
        "POST",
        "/optimize",
        r#"{"net_positions":{"house-1":1e308,"house-2":1e308}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["error"].as_str().unwrap().contains("net_positions"));
}
