use std::f64::consts::PI;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;

use crate::settlement::types::HOURS_PER_DAY;

/// Weather conditions for one hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyWeather {
    pub hour: usize,
    /// Global horizontal irradiance (W/m²).
    pub solar_irradiance_w_m2: f64,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub cloud_cover_pct: f64,
}

/// Uniform noise in `[-0.5, 0.5) * span`.
fn jitter(rng: &mut StdRng, span: f64) -> f64 {
    (rng.random::<f64>() - 0.5) * span
}

/// Generates one day of demo weather for a latitude.
///
/// Irradiance follows a quarter-cosine around solar noon between 06:00 and
/// 18:00 with a peak that drops with latitude. Temperature and humidity
/// follow a daily cosine; cloud cover a daily sine. All values carry
/// uniform noise from a generator seeded with `seed`.
pub fn demo_weather(latitude: f64, seed: u64) -> Vec<HourlyWeather> {
    let mut rng = StdRng::seed_from_u64(seed);
    let abs_lat = latitude.abs();

    (0..HOURS_PER_DAY)
        .map(|hour| {
            let h = hour as f64;

            let base_irradiance = if (6..=18).contains(&hour) {
                let from_noon = (h - 12.0).abs();
                let peak = (1000.0 - abs_lat * 2.0).max(0.0);
                peak * ((from_noon / 6.0) * PI / 2.0).cos()
            } else {
                0.0
            };
            let irradiance = (base_irradiance * (1.0 + jitter(&mut rng, 0.2))).max(0.0);

            let daily = ((h - 6.0) * PI / 12.0).cos();
            let temperature = 20.0 - abs_lat * 0.5 + daily * 10.0 + jitter(&mut rng, 5.0);
            let humidity = 60.0 + daily * 20.0 + jitter(&mut rng, 10.0);
            let cloud_cover =
                (30.0 + (h * PI / 12.0).sin() * 20.0 + jitter(&mut rng, 30.0)).clamp(0.0, 100.0);

            HourlyWeather {
                hour,
                solar_irradiance_w_m2: irradiance.round(),
                temperature_c: (temperature * 10.0).round() / 10.0,
                humidity_pct: humidity.round(),
                cloud_cover_pct: cloud_cover.round(),
            }
        })
        .collect()
}
