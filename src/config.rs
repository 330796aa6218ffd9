//! TOML-based scenario configuration, VPP settings, and preset definitions.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::demo;
use crate::settlement::shape::aggregate_net_position;
use crate::settlement::types::{NetPositionMap, Orientation, Prosumer};

/// Retailer prices and shared-battery parameters held by the engine.
///
/// Treated as an immutable snapshot: changes produce a new value that
/// replaces the old one wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VppConfig {
    /// Price paid to the retailer for imported energy ($/kWh).
    pub buy_price: f64,
    /// Price received from the retailer for exported energy ($/kWh).
    pub sell_price: f64,
    /// Shared battery capacity (kWh).
    pub battery_capacity_kwh: f64,
    /// Round-trip efficiency, in (0.0, 1.0].
    pub battery_efficiency: f64,
}

impl Default for VppConfig {
    fn default() -> Self {
        Self {
            buy_price: 0.35,
            sell_price: 0.22,
            battery_capacity_kwh: 5.0,
            battery_efficiency: 0.9,
        }
    }
}

/// Partial update merged over the current [`VppConfig`].
///
/// Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VppConfigUpdate {
    pub buy_price: Option<f64>,
    pub sell_price: Option<f64>,
    pub battery_capacity_kwh: Option<f64>,
    pub battery_efficiency: Option<f64>,
}

impl VppConfig {
    /// Returns a copy with every field present in `update` overwritten.
    pub fn merged(&self, update: &VppConfigUpdate) -> Self {
        Self {
            buy_price: update.buy_price.unwrap_or(self.buy_price),
            sell_price: update.sell_price.unwrap_or(self.sell_price),
            battery_capacity_kwh: update
                .battery_capacity_kwh
                .unwrap_or(self.battery_capacity_kwh),
            battery_efficiency: update
                .battery_efficiency
                .unwrap_or(self.battery_efficiency),
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("vpp.buy_price", self.buy_price),
            ("vpp.sell_price", self.sell_price),
            ("vpp.battery_capacity_kwh", self.battery_capacity_kwh),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(ConfigError::new(field, "must be a finite number >= 0"));
            }
        }

        let eta = self.battery_efficiency;
        if !(eta.is_finite() && eta > 0.0 && eta <= 1.0) {
            errors.push(ConfigError::new(
                "vpp.battery_efficiency",
                format!("must be in (0.0, 1.0], got {eta}"),
            ));
        }

        errors
    }

    /// Consumes the config, returning it only if it passes [`validate`](Self::validate).
    ///
    /// # Errors
    ///
    /// Returns every violated constraint at once.
    pub fn validated(self) -> Result<Self, ValidationErrors> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ValidationErrors(errors))
        }
    }
}

/// Parameters of the synthetic net-position generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Master random seed for weather noise.
    pub seed: u64,
    /// Latitude used for prosumers without their own (degrees).
    pub latitude: f64,
    /// Flat daily consumption per prosumer (kWh).
    pub daily_consumption_kwh: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            latitude: 40.7128,
            daily_consumption_kwh: 12.0,
        }
    }
}

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use a preset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Retailer prices and battery parameters.
    #[serde(default)]
    pub vpp: VppConfig,
    /// Participating prosumers.
    #[serde(default)]
    pub prosumers: Vec<Prosumer>,
    /// Explicit daily net positions. When empty, positions are generated.
    #[serde(default)]
    pub net_positions: NetPositionMap,
    /// Synthetic generator parameters.
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"vpp.battery_efficiency"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Checks net positions against the prosumers they are settled for.
///
/// Every id must belong to a prosumer and every value must be finite, as must
/// their sum.
pub fn validate_net_positions(
    net_positions: &NetPositionMap,
    prosumers: &[Prosumer],
) -> Vec<ConfigError> {
    let ids: BTreeSet<&str> = prosumers.iter().map(|p| p.id.as_str()).collect();
    let mut errors = Vec::new();
    for (id, kwh) in net_positions {
        if !ids.contains(id.as_str()) {
            errors.push(ConfigError::new(
                format!("net_positions.{id}"),
                "does not match any prosumer id",
            ));
        }
        if !kwh.is_finite() {
            errors.push(ConfigError::new(format!("net_positions.{id}"), "must be finite"));
        }
    }
    if errors.is_empty() && !aggregate_net_position(net_positions).is_finite() {
        errors.push(ConfigError::new("net_positions", "aggregate overflows"));
    }
    errors
}

/// One or more rejected configuration fields.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", join_errors(.0))]
pub struct ValidationErrors(pub Vec<ConfigError>);

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn house(id: &str, price: f64, area_m2: f64, orientation: Orientation) -> Prosumer {
    Prosumer {
        area_m2,
        panel_efficiency_pct: 20.0,
        orientation,
        max_buy_kwh: 20.0,
        max_sell_kwh: 20.0,
        location: "New York".to_string(),
        ..Prosumer::new(id, price)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: four houses with generated net positions.
    pub fn baseline() -> Self {
        Self {
            vpp: VppConfig::default(),
            prosumers: vec![
                house("house-1", 0.30, 30.0, Orientation::South),
                house("house-2", 0.28, 18.0, Orientation::East),
                house("house-3", 0.32, 10.0, Orientation::West),
                house("house-4", 0.30, 0.0, Orientation::South),
            ],
            net_positions: NetPositionMap::new(),
            demo: DemoConfig::default(),
        }
    }

    /// Returns the sunny-surplus preset: every house exports, battery saturates.
    pub fn sunny_surplus() -> Self {
        let base = Self::baseline();
        let net_positions = [("house-1", 8.0), ("house-2", 4.5), ("house-3", 2.0), ("house-4", 1.5)]
            .into_iter()
            .map(|(id, kwh)| (id.to_string(), kwh))
            .collect();
        Self {
            net_positions,
            ..base
        }
    }

    /// Returns the evening-deficit preset: mostly importing houses, larger battery.
    pub fn evening_deficit() -> Self {
        let base = Self::baseline();
        let net_positions = [("house-1", 1.0), ("house-2", -3.5), ("house-3", -4.0), ("house-4", -6.0)]
            .into_iter()
            .map(|(id, kwh)| (id.to_string(), kwh))
            .collect();
        Self {
            vpp: VppConfig {
                battery_capacity_kwh: 10.0,
                ..VppConfig::default()
            },
            net_positions,
            ..base
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "sunny_surplus", "evening_deficit"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "sunny_surplus" => Ok(Self::sunny_surplus()),
            "evening_deficit" => Ok(Self::evening_deficit()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Net positions to settle: the explicit table, or generated ones when
    /// the scenario provides none.
    pub fn resolved_net_positions(&self) -> NetPositionMap {
        if self.net_positions.is_empty() {
            demo::demo_net_positions(&self.prosumers, &self.demo)
        } else {
            self.net_positions.clone()
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.vpp.validate();

        let mut ids = BTreeSet::new();
        for (i, p) in self.prosumers.iter().enumerate() {
            if p.id.is_empty() {
                errors.push(ConfigError::new(format!("prosumers[{i}].id"), "must not be empty"));
            } else if !ids.insert(p.id.as_str()) {
                errors.push(ConfigError::new(
                    format!("prosumers[{i}].id"),
                    format!("duplicate id \"{}\"", p.id),
                ));
            }
            if !p.price.is_finite() || p.price < 0.0 {
                errors.push(ConfigError::new(
                    format!("prosumers[{i}].price"),
                    "must be a finite number >= 0",
                ));
            }
        }

        errors.extend(validate_net_positions(&self.net_positions, &self.prosumers));

        if !self.demo.daily_consumption_kwh.is_finite() || self.demo.daily_consumption_kwh < 0.0 {
            errors.push(ConfigError::new(
                "demo.daily_consumption_kwh",
                "must be a finite number >= 0",
            ));
        }
        if !(-90.0..=90.0).contains(&self.demo.latitude) {
            errors.push(ConfigError::new("demo.latitude", "must be in [-90, 90]"));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[vpp]
buy_price = 0.40
sell_price = 0.18
battery_capacity_kwh = 8.0
battery_efficiency = 0.95

[[prosumers]]
id = "alice"
price = 0.30
name = "Alice"
area_m2 = 25.0
panel_efficiency_pct = 19.5
orientation = "southwest"
has_battery = true
battery_capacity_kwh = 5.0

[[prosumers]]
id = "bob"
price = 0.28
role = "retailer"

[net_positions]
alice = 4.2
bob = -1.5

[demo]
seed = 7
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.vpp.buy_price), Some(0.40));
        assert_eq!(cfg.as_ref().map(|c| c.prosumers.len()), Some(2));
        assert_eq!(
            cfg.as_ref().and_then(|c| c.net_positions.get("bob").copied()),
            Some(-1.5)
        );
        assert_eq!(
            cfg.as_ref().map(|c| c.prosumers[0].orientation),
            Some(Orientation::Southwest)
        );
        assert!(cfg.map(|c| c.validate().is_empty()).unwrap_or(false));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[vpp]
buy_price = 0.3
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[vpp]
sell_price = 0.10
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.vpp.sell_price), Some(0.10));
        // untouched fields keep their defaults
        assert_eq!(cfg.as_ref().map(|c| c.vpp.buy_price), Some(0.35));
        assert_eq!(cfg.as_ref().map(|c| c.vpp.battery_efficiency), Some(0.9));
    }

    #[test]
    fn validation_catches_zero_efficiency() {
        let cfg = VppConfig {
            battery_efficiency: 0.0,
            ..VppConfig::default()
        };
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "vpp.battery_efficiency"));
    }

    #[test]
    fn validation_catches_efficiency_above_one_and_negative_price() {
        let cfg = VppConfig {
            battery_efficiency: 1.2,
            buy_price: -0.1,
            ..VppConfig::default()
        };
        let errors = cfg.validated().unwrap_err();
        assert_eq!(errors.0.len(), 2);
        let msg = errors.to_string();
        assert!(msg.contains("vpp.battery_efficiency"));
        assert!(msg.contains("vpp.buy_price"));
    }

    #[test]
    fn validation_catches_nan_capacity() {
        let cfg = VppConfig {
            battery_capacity_kwh: f64::NAN,
            ..VppConfig::default()
        };
        assert!(cfg.validate().iter().any(|e| e.field == "vpp.battery_capacity_kwh"));
    }

    #[test]
    fn merge_overwrites_only_present_fields() {
        let base = VppConfig::default();
        let merged = base.merged(&VppConfigUpdate {
            sell_price: Some(0.15),
            ..VppConfigUpdate::default()
        });
        assert_eq!(merged.sell_price, 0.15);
        assert_eq!(merged.buy_price, base.buy_price);
        assert_eq!(merged.battery_capacity_kwh, base.battery_capacity_kwh);
    }

    #[test]
    fn validation_catches_duplicate_ids_and_unknown_positions() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.prosumers.push(Prosumer::new("house-1", 0.3));
        cfg.net_positions.insert("ghost".to_string(), 1.0);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.message.contains("duplicate id")));
        assert!(errors.iter().any(|e| e.field == "net_positions.ghost"));
    }

    #[test]
    fn net_positions_reject_unknown_ids_and_overflowing_sum() {
        let prosumers = vec![Prosumer::new("a", 0.3), Prosumer::new("b", 0.3)];

        let huge: NetPositionMap = [("a".to_string(), 1e308), ("b".to_string(), 1e308)]
            .into_iter()
            .collect();
        let errors = validate_net_positions(&huge, &prosumers);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "net_positions");

        let stray: NetPositionMap = [("c".to_string(), f64::NAN)].into_iter().collect();
        let errors = validate_net_positions(&stray, &prosumers);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.field == "net_positions.c"));

        let fine: NetPositionMap = [("a".to_string(), 2.0)].into_iter().collect();
        assert!(validate_net_positions(&fine, &prosumers).is_empty());
    }

    #[test]
    fn explicit_positions_take_precedence_over_demo() {
        let cfg = ScenarioConfig::sunny_surplus();
        let positions = cfg.resolved_net_positions();
        assert_eq!(positions.get("house-1"), Some(&8.0));
        assert_eq!(positions.len(), 4);
    }

    #[test]
    fn baseline_generates_one_position_per_prosumer() {
        let cfg = ScenarioConfig::baseline();
        let positions = cfg.resolved_net_positions();
        assert_eq!(positions.len(), cfg.prosumers.len());
        assert!(positions.values().all(|v| v.is_finite()));
    }
}
