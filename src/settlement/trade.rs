//! Daily netting of the community position against the retailer.

use crate::config::VppConfig;

use super::shape::aggregate_net_position;
use super::types::{BatteryScheduleEntry, ExternalTrade, NetPositionMap, TradeSide};

/// Net energy the battery moved to (+) or from (-) the community over the day.
pub fn battery_contribution_kwh(schedule: &[BatteryScheduleEntry]) -> f64 {
    schedule
        .iter()
        .map(|e| e.action.community_contribution_kwh())
        .sum()
}

/// Community position left after battery action (kWh; positive=surplus).
pub fn residual_net_position(
    net_positions: &NetPositionMap,
    schedule: &[BatteryScheduleEntry],
) -> f64 {
    aggregate_net_position(net_positions) + battery_contribution_kwh(schedule)
}

/// Sums traded energy on one side (kWh).
pub fn traded_kwh(trades: &[ExternalTrade], side: TradeSide) -> f64 {
    trades
        .iter()
        .filter(|t| t.side == side)
        .map(|t| t.amount_kwh)
        .sum()
}

/// Computes the single trade that settles the residual with the retailer.
///
/// A surplus is sold at `sell_price`, a deficit bought at `buy_price`.
/// Returns `None` when the residual is exactly zero.
pub fn external_trade(
    config: &VppConfig,
    net_positions: &NetPositionMap,
    schedule: &[BatteryScheduleEntry],
) -> Option<ExternalTrade> {
    let residual = residual_net_position(net_positions, schedule);
    if residual > 0.0 {
        Some(ExternalTrade::new(TradeSide::Sell, residual, config.sell_price))
    } else if residual < 0.0 {
        Some(ExternalTrade::new(TradeSide::Buy, -residual, config.buy_price))
    } else {
        None
    }
}
