//! Settlement engine that orchestrates scheduling, trading, and pricing.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{ValidationErrors, VppConfig, VppConfigUpdate};

use super::battery::BatteryScheduler;
use super::pricing::final_prices;
use super::shape::{HourlyShape, SinusoidalShape};
use super::trade::{external_trade, traded_kwh};
use super::types::{NetPositionMap, Prosumer, SettlementResult, TradeSide};

/// Runs one settlement day against an explicit configuration.
///
/// Schedules the battery over the hourly shape of `net_positions`, settles
/// the residual with the retailer, then prices every prosumer.
///
/// # Errors
///
/// Returns `ValidationErrors` if `config` is invalid; nothing is scheduled.
pub fn settle<S: HourlyShape + ?Sized>(
    config: &VppConfig,
    shape: &S,
    prosumers: &[Prosumer],
    net_positions: &NetPositionMap,
) -> Result<SettlementResult, ValidationErrors> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }
    Ok(settle_day(config, shape, prosumers, net_positions))
}

/// Settlement pipeline; `config` must already be validated.
fn settle_day<S: HourlyShape + ?Sized>(
    config: &VppConfig,
    shape: &S,
    prosumers: &[Prosumer],
    net_positions: &NetPositionMap,
) -> SettlementResult {
    // 1. Battery schedule over the hourly community position
    let scheduler = BatteryScheduler::from_config(config);
    let hourly = shape.hourly_net_positions(net_positions);
    let battery_schedule = scheduler.schedule(&hourly);

    // 2. Residual trade with the retailer
    let external_trades: Vec<_> = external_trade(config, net_positions, &battery_schedule)
        .into_iter()
        .collect();

    // 3. Per-prosumer prices
    let prosumer_final_prices = final_prices(config, prosumers, net_positions);

    SettlementResult {
        total_external_buy: traded_kwh(&external_trades, TradeSide::Buy),
        total_external_sell: traded_kwh(&external_trades, TradeSide::Sell),
        battery_schedule,
        external_trades,
        prosumer_final_prices,
        battery_capacity_kwh: scheduler.capacity_kwh,
        initial_level_kwh: scheduler.initial_level_kwh(),
    }
}

/// Settlement engine owning the VPP configuration and the hourly shape.
///
/// Generic over `S: HourlyShape` for static dispatch. The configuration is
/// held as a shared immutable snapshot: every [`optimize`](Self::optimize)
/// call captures it at entry, and updates swap in a new validated value.
#[derive(Debug)]
pub struct SettlementEngine<S: HourlyShape = SinusoidalShape> {
    config: Arc<VppConfig>,
    shape: S,
}

impl SettlementEngine<SinusoidalShape> {
    /// Creates an engine with the default sinusoidal hourly shape.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` if `config` is invalid.
    pub fn new(config: VppConfig) -> Result<Self, ValidationErrors> {
        Self::with_shape(config, SinusoidalShape::default())
    }
}

impl<S: HourlyShape> SettlementEngine<S> {
    /// Creates an engine with a custom hourly shape.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` if `config` is invalid.
    pub fn with_shape(config: VppConfig, shape: S) -> Result<Self, ValidationErrors> {
        Ok(Self {
            config: Arc::new(config.validated()?),
            shape,
        })
    }

    /// Returns the current configuration snapshot.
    pub fn config(&self) -> Arc<VppConfig> {
        Arc::clone(&self.config)
    }

    /// Returns the hourly shape strategy.
    pub fn shape(&self) -> &S {
        &self.shape
    }

    /// Replaces the whole configuration.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` and keeps the previous configuration if
    /// `config` is invalid.
    pub fn replace_config(&mut self, config: VppConfig) -> Result<(), ValidationErrors> {
        match config.validated() {
            Ok(config) => {
                info!(
                    buy_price = config.buy_price,
                    sell_price = config.sell_price,
                    capacity_kwh = config.battery_capacity_kwh,
                    efficiency = config.battery_efficiency,
                    "vpp config replaced"
                );
                self.config = Arc::new(config);
                Ok(())
            }
            Err(errors) => {
                warn!(%errors, "rejected vpp config");
                Err(errors)
            }
        }
    }

    /// Merges `update` over the current configuration and replaces it.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` and keeps the previous configuration if the
    /// merged result is invalid.
    pub fn update_config(&mut self, update: &VppConfigUpdate) -> Result<(), ValidationErrors> {
        let merged = self.config.merged(update);
        self.replace_config(merged)
    }

    /// Optimizes one settlement day.
    ///
    /// # Arguments
    ///
    /// * `prosumers` - Participants to price
    /// * `net_positions` - Daily net position per prosumer id (kWh)
    ///
    /// # Returns
    ///
    /// A `SettlementResult` with the battery schedule, the settling trade,
    /// and one final price per prosumer.
    pub fn optimize(
        &self,
        prosumers: &[Prosumer],
        net_positions: &NetPositionMap,
    ) -> SettlementResult {
        let config = self.config();
        let result = settle_day(&config, &self.shape, prosumers, net_positions);
        debug!(
            prosumers = prosumers.len(),
            buy_kwh = result.total_external_buy,
            sell_kwh = result.total_external_sell,
            final_level_kwh = result.final_level_kwh().unwrap_or_default(),
            "settlement day optimized"
        );
        result
    }
}
