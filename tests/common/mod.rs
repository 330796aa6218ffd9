//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use vpp_settle::config::VppConfig;
use vpp_settle::settlement::{NetPositionMap, Prosumer, SettlementEngine};

/// Default VPP configuration (buy 0.35, sell 0.22, 5 kWh, 90% efficiency).
pub fn default_config() -> VppConfig {
    VppConfig::default()
}

/// Engine with the default configuration and sinusoidal shape.
pub fn default_engine() -> SettlementEngine {
    SettlementEngine::new(default_config()).expect("default config is valid")
}

/// Builds a net-position map from `(id, kWh)` pairs.
pub fn positions(values: &[(&str, f64)]) -> NetPositionMap {
    values.iter().map(|(id, v)| (id.to_string(), *v)).collect()
}

/// Builds prosumers with the given `(id, reference price)` pairs.
pub fn prosumers(values: &[(&str, f64)]) -> Vec<Prosumer> {
    values.iter().map(|(id, p)| Prosumer::new(*id, *p)).collect()
}
