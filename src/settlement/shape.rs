//! Hourly decomposition of daily net positions.
//!
//! The battery scheduler consumes 24 hourly community net positions. Where
//! only a daily figure per prosumer exists, an [`HourlyShape`] spreads it
//! over the day. Swap the shape to feed measured telemetry instead.

use std::f64::consts::PI;

use thiserror::Error;

use super::types::{HOURS_PER_DAY, NetPositionMap};

/// Strategy producing the hourly community net position for one day.
pub trait HourlyShape {
    /// Returns one community net position per hour (kWh; positive=surplus).
    fn hourly_net_positions(&self, net_positions: &NetPositionMap) -> [f64; HOURS_PER_DAY];
}

impl<S: HourlyShape + ?Sized> HourlyShape for &S {
    fn hourly_net_positions(&self, net_positions: &NetPositionMap) -> [f64; HOURS_PER_DAY] {
        (**self).hourly_net_positions(net_positions)
    }
}

/// Sum of all prosumer net positions (kWh).
pub fn aggregate_net_position(net_positions: &NetPositionMap) -> f64 {
    net_positions.values().sum()
}

/// Scales the daily aggregate by a sine wave with its crest at solar noon.
///
/// `hourly[h] = aggregate * (1 + amplitude * sin((h - 6) * PI / 12))`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinusoidalShape {
    /// Relative swing around the aggregate.
    pub amplitude: f64,
}

impl SinusoidalShape {
    /// Default relative swing.
    pub const DEFAULT_AMPLITUDE: f64 = 0.3;

    pub fn with_amplitude(amplitude: f64) -> Self {
        Self { amplitude }
    }
}

impl Default for SinusoidalShape {
    fn default() -> Self {
        Self::with_amplitude(Self::DEFAULT_AMPLITUDE)
    }
}

impl HourlyShape for SinusoidalShape {
    fn hourly_net_positions(&self, net_positions: &NetPositionMap) -> [f64; HOURS_PER_DAY] {
        let aggregate = aggregate_net_position(net_positions);
        std::array::from_fn(|hour| {
            let phase = (hour as f64 - 6.0) * PI / 12.0;
            aggregate * (1.0 + self.amplitude * phase.sin())
        })
    }
}

/// Error building a [`MeasuredProfile`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("expected {expected} hourly values, got {got}")]
    WrongLength { expected: usize, got: usize },

    #[error("hour {hour} is not a finite number")]
    NonFinite { hour: usize },
}

/// Measured hourly community net positions, used verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredProfile {
    hourly: [f64; HOURS_PER_DAY],
}

impl MeasuredProfile {
    /// Builds a profile from exactly 24 finite hourly values.
    ///
    /// # Errors
    ///
    /// Returns a `ProfileError` for a wrong length or a non-finite value.
    pub fn from_slice(values: &[f64]) -> Result<Self, ProfileError> {
        let hourly: [f64; HOURS_PER_DAY] =
            values.try_into().map_err(|_| ProfileError::WrongLength {
                expected: HOURS_PER_DAY,
                got: values.len(),
            })?;
        if let Some(hour) = hourly.iter().position(|v| !v.is_finite()) {
            return Err(ProfileError::NonFinite { hour });
        }
        Ok(Self { hourly })
    }

    pub fn values(&self) -> &[f64; HOURS_PER_DAY] {
        &self.hourly
    }
}

impl HourlyShape for MeasuredProfile {
    /// Ignores the daily map; the measured curve already is the community position.
    fn hourly_net_positions(&self, _net_positions: &NetPositionMap) -> [f64; HOURS_PER_DAY] {
        self.hourly
    }
}
