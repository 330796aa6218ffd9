//! Post-hoc summary of one settlement day.

use std::fmt;

use serde::Serialize;

use crate::reporting::{format_currency, format_energy};

use super::types::{BatteryAction, NetPositionMap, SettlementResult, TradeSide};

/// What one prosumer is credited (positive) or charged (negative).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProsumerStatement {
    pub id: String,
    /// Daily net position (kWh).
    pub net_kwh: f64,
    /// Final settlement price ($/kWh).
    pub final_price: f64,
    /// `net_kwh * final_price` ($).
    pub amount: f64,
}

/// Aggregate indicators derived from a complete settlement result.
///
/// Computed post-hoc from a `SettlementResult` so that reported figures
/// always agree with the schedule and trades.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementSummary {
    /// Energy drawn into the battery (kWh).
    pub charged_kwh: f64,
    /// Energy released by the battery (kWh).
    pub discharged_kwh: f64,
    /// Energy lost to conversion (kWh, >= 0).
    pub conversion_loss_kwh: f64,
    /// Battery throughput (kWh, charged + discharged).
    pub battery_throughput_kwh: f64,
    /// Battery equivalent full cycles (throughput / 2*capacity).
    pub battery_equivalent_full_cycles: f64,
    /// Battery level at the end of the day (kWh).
    pub final_level_kwh: f64,
    /// Paid to the retailer ($).
    pub external_cost: f64,
    /// Received from the retailer ($).
    pub external_revenue: f64,
    /// `external_revenue - external_cost` ($).
    pub net_cash_flow: f64,
    /// One statement per priced prosumer, ordered by id.
    pub statements: Vec<ProsumerStatement>,
}

impl SettlementSummary {
    /// Computes the summary for one settlement day.
    ///
    /// # Arguments
    ///
    /// * `result` - Output of the optimization call
    /// * `net_positions` - Net positions the result was computed from
    pub fn from_result(result: &SettlementResult, net_positions: &NetPositionMap) -> Self {
        let mut charged = 0.0_f64;
        let mut discharged = 0.0_f64;
        for entry in &result.battery_schedule {
            match entry.action {
                BatteryAction::Charge(kwh) => charged += kwh,
                BatteryAction::Discharge(kwh) => discharged += kwh,
                BatteryAction::Idle => {}
            }
        }

        let battery_capacity_kwh = result.battery_capacity_kwh;
        let initial_level = result.initial_level_kwh;
        let final_level = result.final_level_kwh().unwrap_or(initial_level);
        // Whatever went in and did not come out or stay stored was lost
        let conversion_loss = (charged - discharged - (final_level - initial_level)).max(0.0);

        let throughput = charged + discharged;
        let cycles = if battery_capacity_kwh > 0.0 {
            throughput / (2.0 * battery_capacity_kwh)
        } else {
            0.0
        };

        let side_total = |side: TradeSide| -> f64 {
            result
                .external_trades
                .iter()
                .filter(|t| t.side == side)
                .map(|t| t.total)
                .sum()
        };
        let external_cost = side_total(TradeSide::Buy);
        let external_revenue = side_total(TradeSide::Sell);

        let statements = result
            .prosumer_final_prices
            .iter()
            .map(|(id, &final_price)| {
                let net_kwh = net_positions.get(id).copied().unwrap_or(0.0);
                ProsumerStatement {
                    id: id.clone(),
                    net_kwh,
                    final_price,
                    amount: net_kwh * final_price,
                }
            })
            .collect();

        Self {
            charged_kwh: charged,
            discharged_kwh: discharged,
            conversion_loss_kwh: conversion_loss,
            battery_throughput_kwh: throughput,
            battery_equivalent_full_cycles: cycles,
            final_level_kwh: final_level,
            external_cost,
            external_revenue,
            net_cash_flow: external_revenue - external_cost,
            statements,
        }
    }
}

impl fmt::Display for SettlementSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Settlement Summary ---")?;
        writeln!(f, "Battery charged:       {}", format_energy(self.charged_kwh))?;
        writeln!(f, "Battery discharged:    {}", format_energy(self.discharged_kwh))?;
        writeln!(f, "Conversion loss:       {}", format_energy(self.conversion_loss_kwh))?;
        writeln!(
            f,
            "Battery throughput:    {} ({:.2} equiv. cycles)",
            format_energy(self.battery_throughput_kwh),
            self.battery_equivalent_full_cycles
        )?;
        writeln!(f, "Final battery level:   {}", format_energy(self.final_level_kwh))?;
        writeln!(f, "External cost:         {}", format_currency(self.external_cost))?;
        writeln!(f, "External revenue:      {}", format_currency(self.external_revenue))?;
        write!(f, "Net cash flow:         {}", format_currency(self.net_cash_flow))?;
        for s in &self.statements {
            write!(
                f,
                "\n  {:<12} {:>9} @ {:.4} $/kWh -> {}",
                s.id,
                format_energy(s.net_kwh),
                s.final_price,
                format_currency(s.amount)
            )?;
        }
        Ok(())
    }
}
