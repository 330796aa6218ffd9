use crate::settlement::types::{HOURS_PER_DAY, Orientation};

use super::weather::HourlyWeather;

/// Relative exposure per hour of day for each panel orientation.
pub fn orientation_factors(orientation: Orientation) -> &'static [f64; HOURS_PER_DAY] {
    const EAST: [f64; 24] = [
        0.8, 0.9, 1.0, 0.9, 0.8, 0.6, 0.4, 0.3, 0.2, 0.1, 0.1, 0.1, 0.1, 0.2, 0.3, 0.4, 0.6, 0.8,
        0.9, 1.0, 0.9, 0.8, 0.6, 0.4,
    ];
    const SOUTHEAST: [f64; 24] = [
        0.6, 0.7, 0.8, 0.9, 1.0, 0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7,
        0.8, 0.9, 1.0, 0.9, 0.8, 0.6,
    ];
    const SOUTH: [f64; 24] = [
        0.1, 0.1, 0.2, 0.3, 0.4, 0.6, 0.8, 0.9, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.9,
        0.8, 0.6, 0.4, 0.3, 0.2, 0.1,
    ];
    const SOUTHWEST: [f64; 24] = [
        0.4, 0.6, 0.8, 0.9, 1.0, 0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7,
        0.8, 0.9, 1.0, 0.9, 0.8, 0.6,
    ];
    const WEST: [f64; 24] = [
        0.2, 0.1, 0.1, 0.1, 0.1, 0.2, 0.3, 0.4, 0.6, 0.8, 0.9, 1.0, 0.9, 0.8, 0.6, 0.4, 0.3, 0.2,
        0.1, 0.1, 0.1, 0.1, 0.2, 0.3,
    ];

    match orientation {
        Orientation::East => &EAST,
        Orientation::Southeast => &SOUTHEAST,
        Orientation::South => &SOUTH,
        Orientation::Southwest => &SOUTHWEST,
        Orientation::West => &WEST,
    }
}

/// Estimates hourly PV output (kWh per hour) for one installation.
///
/// Output is irradiance (kW/m²) × area × panel efficiency, scaled by the
/// orientation factor, a temperature derate of 0.4 %/°C above 25 °C
/// (floored at 80 %), and a cloud derate of up to 30 %. Each hour is capped
/// at the array's rated output under 1 kW/m².
///
/// # Arguments
///
/// * `weather` - Hourly weather, indexed by hour of day
/// * `area_m2` - Panel area (m²)
/// * `efficiency_pct` - Panel efficiency (percent)
/// * `orientation` - Panel orientation
pub fn solar_generation_kwh(
    weather: &[HourlyWeather],
    area_m2: f64,
    efficiency_pct: f64,
    orientation: Orientation,
) -> Vec<f64> {
    let factors = orientation_factors(orientation);
    let efficiency = efficiency_pct / 100.0;
    let rated_kw = (area_m2 * efficiency).max(0.0);

    weather
        .iter()
        .map(|w| {
            let irradiance_kw_m2 = w.solar_irradiance_w_m2 / 1000.0;
            let orientation_factor = factors[w.hour % HOURS_PER_DAY];
            let temp_effect = (1.0 - (w.temperature_c - 25.0) * 0.004).max(0.8);
            let cloud_effect = 1.0 - (w.cloud_cover_pct / 100.0) * 0.3;

            let kwh = irradiance_kw_m2
                * area_m2
                * efficiency
                * orientation_factor
                * temp_effect
                * cloud_effect;
            kwh.clamp(0.0, rated_kw)
        })
        .collect()
}
