//! Settlement engine for a neighborhood-scale Virtual Power Plant.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
/// Synthetic weather and PV generation for demo net positions.
pub mod demo;
pub mod io;
pub mod reporting;
/// Battery scheduling, external trading, and prosumer pricing.
pub mod settlement;
