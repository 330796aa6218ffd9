/// Shared battery state machine.
pub mod battery;
pub mod engine;
pub mod pricing;
/// Hourly decomposition strategies.
pub mod shape;
pub mod summary;
pub mod trade;
pub mod types;

pub use engine::{SettlementEngine, settle};
pub use shape::{HourlyShape, MeasuredProfile, SinusoidalShape};
pub use summary::SettlementSummary;
pub use types::{
    BatteryAction, BatteryScheduleEntry, ExternalTrade, NetPositionMap, Prosumer,
    SettlementResult, TradeSide,
};
