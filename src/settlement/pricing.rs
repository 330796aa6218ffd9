//! Per-prosumer settlement prices.

use crate::config::VppConfig;

use super::types::{NetPositionMap, PriceMap, Prosumer};

/// Price for one prosumer given its own daily net position.
///
/// A surplus is credited at the VPP's sell price and a deficit charged at
/// its buy price. With no net position the prosumer keeps its reference price.
pub fn final_price(config: &VppConfig, prosumer: &Prosumer, net_kwh: f64) -> f64 {
    if net_kwh > 0.0 {
        config.sell_price
    } else if net_kwh < 0.0 {
        config.buy_price
    } else {
        prosumer.price
    }
}

/// Assigns a final price to every prosumer.
///
/// Prosumers missing from `net_positions` are priced as having a zero position.
pub fn final_prices(
    config: &VppConfig,
    prosumers: &[Prosumer],
    net_positions: &NetPositionMap,
) -> PriceMap {
    prosumers
        .iter()
        .map(|p| {
            let net = net_positions.get(&p.id).copied().unwrap_or(0.0);
            (p.id.clone(), final_price(config, p, net))
        })
        .collect()
}
