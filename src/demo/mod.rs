//! Synthetic daily net positions for scenarios without measured data.

/// Per-prosumer PV generation model.
pub mod pv;
/// Seeded demo weather generator.
pub mod weather;

use crate::config::DemoConfig;
use crate::settlement::types::{NetPositionMap, Prosumer};

pub use pv::solar_generation_kwh;
pub use weather::{HourlyWeather, demo_weather};

/// Derives each prosumer's daily net position from demo weather.
///
/// Net position is the day's PV generation minus the flat daily consumption.
/// Each prosumer gets its own weather draw, seeded from the demo seed and
/// its index so results are reproducible.
pub fn demo_net_positions(prosumers: &[Prosumer], demo: &DemoConfig) -> NetPositionMap {
    prosumers
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let latitude = p.latitude.unwrap_or(demo.latitude);
            let weather = demo_weather(latitude, demo.seed.wrapping_add(i as u64));
            let generation: f64 =
                solar_generation_kwh(&weather, p.area_m2, p.panel_efficiency_pct, p.orientation)
                    .iter()
                    .sum();
            (p.id.clone(), generation - demo.daily_consumption_kwh)
        })
        .collect()
}
