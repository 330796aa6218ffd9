//! Core settlement types: prosumers, battery schedule entries, trades, and results.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of hourly slots in one settlement day.
pub const HOURS_PER_DAY: usize = 24;

/// Daily net position per prosumer id (kWh; positive=surplus, negative=deficit).
///
/// Ordered so that aggregation and output order are deterministic.
pub type NetPositionMap = BTreeMap<String, f64>;

/// Final settlement price per prosumer id ($/kWh).
pub type PriceMap = BTreeMap<String, f64>;

/// Compass orientation of a prosumer's PV array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    East,
    Southeast,
    #[default]
    South,
    Southwest,
    West,
}

/// Market role of a participant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Prosumer,
    Retailer,
}

/// A household that both produces and consumes energy.
///
/// Only `id` and `price` take part in settlement. The remaining fields
/// describe the installation and feed the demo generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Prosumer {
    /// Unique identifier.
    pub id: String,
    /// Reference price ($/kWh), used when the prosumer has no net position.
    pub price: f64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// PV panel area (m²).
    #[serde(default)]
    pub area_m2: f64,
    /// PV panel efficiency (percent, 0-100).
    #[serde(default)]
    pub panel_efficiency_pct: f64,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub has_battery: bool,
    /// Behind-the-meter battery capacity (kWh).
    #[serde(default)]
    pub battery_capacity_kwh: f64,
    /// Maximum daily purchase (kWh).
    #[serde(default)]
    pub max_buy_kwh: f64,
    /// Maximum daily sale (kWh).
    #[serde(default)]
    pub max_sell_kwh: f64,
    #[serde(default)]
    pub role: Role,
}

impl Prosumer {
    /// Creates a prosumer with the given id and reference price and empty
    /// descriptive fields.
    pub fn new(id: impl Into<String>, price: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            price,
            location: String::new(),
            latitude: None,
            longitude: None,
            area_m2: 0.0,
            panel_efficiency_pct: 0.0,
            orientation: Orientation::default(),
            has_battery: false,
            battery_capacity_kwh: 0.0,
            max_buy_kwh: 0.0,
            max_sell_kwh: 0.0,
            role: Role::default(),
        }
    }
}

/// What the shared battery does in one hour, with the energy moved (kWh, >= 0).
///
/// For `Charge` the amount is drawn from the community surplus; for
/// `Discharge` it is delivered back to the community.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "action", content = "change_kwh", rename_all = "lowercase")]
pub enum BatteryAction {
    Charge(f64),
    Discharge(f64),
    Idle,
}

impl BatteryAction {
    /// Energy moved this hour (kWh, >= 0).
    pub fn change_kwh(&self) -> f64 {
        match *self {
            Self::Charge(kwh) | Self::Discharge(kwh) => kwh,
            Self::Idle => 0.0,
        }
    }

    /// Effect on the community position: charging absorbs surplus, discharging
    /// releases stored energy.
    pub fn community_contribution_kwh(&self) -> f64 {
        match *self {
            Self::Charge(kwh) => -kwh,
            Self::Discharge(kwh) => kwh,
            Self::Idle => 0.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Charge(_) => "charge",
            Self::Discharge(_) => "discharge",
            Self::Idle => "idle",
        }
    }
}

/// One hour of the battery schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryScheduleEntry {
    /// Hour of day (0..24).
    pub hour: usize,
    #[serde(flatten)]
    pub action: BatteryAction,
    /// Battery level after this hour (kWh, within `[0, capacity]`).
    pub level_kwh: f64,
}

impl fmt::Display for BatteryScheduleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "h={:>2} | {:<9} {:>7.3} kWh | level={:>7.3} kWh",
            self.hour,
            self.action.label(),
            self.action.change_kwh(),
            self.level_kwh,
        )
    }
}

/// Direction of a trade with the external retailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    /// The VPP buys its deficit from the retailer.
    Buy,
    /// The VPP sells its surplus to the retailer.
    Sell,
}

/// A settling trade with the external retailer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalTrade {
    pub side: TradeSide,
    /// Traded energy (kWh, >= 0).
    pub amount_kwh: f64,
    /// Unit price ($/kWh).
    pub price: f64,
    /// `amount_kwh * price` ($).
    pub total: f64,
}

impl ExternalTrade {
    pub fn new(side: TradeSide, amount_kwh: f64, price: f64) -> Self {
        Self {
            side,
            amount_kwh,
            price,
            total: amount_kwh * price,
        }
    }
}

impl fmt::Display for ExternalTrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.side {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        };
        write!(
            f,
            "{side:<4} {:.3} kWh @ {:.4} $/kWh = {:.2} $",
            self.amount_kwh, self.price, self.total
        )
    }
}

/// Output of one optimization call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementResult {
    /// Hourly battery schedule in hour order.
    pub battery_schedule: Vec<BatteryScheduleEntry>,
    /// Zero or one settling trade.
    pub external_trades: Vec<ExternalTrade>,
    /// Total energy bought from the retailer (kWh).
    pub total_external_buy: f64,
    /// Total energy sold to the retailer (kWh).
    pub total_external_sell: f64,
    /// Final settlement price per prosumer id.
    pub prosumer_final_prices: PriceMap,
    /// Capacity of the battery the schedule was computed for (kWh).
    pub battery_capacity_kwh: f64,
    /// Battery level before hour 0 (kWh).
    pub initial_level_kwh: f64,
}

impl SettlementResult {
    /// Battery level at the end of the day, if a schedule was produced.
    pub fn final_level_kwh(&self) -> Option<f64> {
        self.battery_schedule.last().map(|e| e.level_kwh)
    }
}
