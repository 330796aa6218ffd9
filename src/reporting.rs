//! Human-readable rendering of settlement output.

use crate::settlement::{SettlementResult, SettlementSummary};

/// Formats an energy amount, switching to MWh at 1000 kWh.
pub fn format_energy(kwh: f64) -> String {
    if kwh.abs() >= 1000.0 {
        format!("{:.2} MWh", kwh / 1000.0)
    } else {
        format!("{kwh:.2} kWh")
    }
}

/// Formats a dollar amount with the sign in front of the currency symbol.
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("${amount:.2}")
    }
}

/// Prints schedule, trades, prices, and summary to stdout.
pub fn print_settlement(result: &SettlementResult, summary: &SettlementSummary) {
    println!("--- Battery Schedule ---");
    for entry in &result.battery_schedule {
        println!("{entry}");
    }

    println!("\n--- External Trades ---");
    if result.external_trades.is_empty() {
        println!("none (community balanced after battery)");
    }
    for trade in &result.external_trades {
        println!("{trade}");
    }

    println!("\n--- Final Prices ---");
    for (id, price) in &result.prosumer_final_prices {
        println!("{id:<12} {price:.4} $/kWh");
    }

    println!("\n{summary}");
}
