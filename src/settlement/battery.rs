use crate::config::VppConfig;

use super::types::{BatteryAction, BatteryScheduleEntry, HOURS_PER_DAY};

/// Schedules the shared community battery over one day.
///
/// The scheduler is a state machine over the hours of the day whose only
/// state is the battery level, starting at half capacity. Surplus hours
/// charge and deficit hours discharge, limited by the remaining headroom
/// or stored energy.
///
/// # Efficiency Convention
/// - Charging `change` kWh stores `change * efficiency`.
/// - Discharging `change` kWh debits `change / efficiency`.
///
/// The level is clamped to `[0, capacity]` after every hour and the clamped
/// value is carried into the next hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryScheduler {
    /// Battery capacity in kilowatt-hours.
    pub capacity_kwh: f64,

    /// Round-trip efficiency (0..1.0].
    pub efficiency: f64,
}

impl BatteryScheduler {
    /// Creates a scheduler for a battery with the given parameters.
    ///
    /// # Arguments
    ///
    /// * `capacity_kwh` - Battery capacity in kWh (must be >= 0)
    /// * `efficiency` - Round-trip efficiency (0..1.0]
    ///
    /// # Panics
    ///
    /// Panics if capacity is negative or efficiency is outside (0, 1].
    pub fn new(capacity_kwh: f64, efficiency: f64) -> Self {
        assert!(capacity_kwh >= 0.0);
        assert!(efficiency > 0.0 && efficiency <= 1.0);
        Self {
            capacity_kwh,
            efficiency,
        }
    }

    /// Builds a scheduler from a validated [`VppConfig`].
    pub fn from_config(config: &VppConfig) -> Self {
        Self::new(config.battery_capacity_kwh, config.battery_efficiency)
    }

    /// Battery level at the start of the day (half capacity).
    pub fn initial_level_kwh(&self) -> f64 {
        self.capacity_kwh / 2.0
    }

    /// Decides one hour and returns the action with the resulting level.
    ///
    /// # Arguments
    ///
    /// * `level_kwh` - Battery level before this hour
    /// * `net_kwh` - Community net position this hour (positive=surplus)
    pub fn step(&self, level_kwh: f64, net_kwh: f64) -> (BatteryAction, f64) {
        let (action, level) = if net_kwh > 0.0 && level_kwh < self.capacity_kwh {
            // Surplus: store what fits, minus conversion losses
            let change = net_kwh.min(self.capacity_kwh - level_kwh);
            (
                BatteryAction::Charge(change),
                level_kwh + change * self.efficiency,
            )
        } else if net_kwh < 0.0 && level_kwh > 0.0 {
            // Deficit: deliver what is stored, debiting extra for losses
            let change = (-net_kwh).min(level_kwh);
            (
                BatteryAction::Discharge(change),
                level_kwh - change / self.efficiency,
            )
        } else {
            (BatteryAction::Idle, level_kwh)
        };

        (action, level.clamp(0.0, self.capacity_kwh))
    }

    /// Produces the hour-ordered schedule for one day of net positions.
    pub fn schedule(&self, hourly_net_kwh: &[f64; HOURS_PER_DAY]) -> Vec<BatteryScheduleEntry> {
        let mut level = self.initial_level_kwh();
        let mut schedule = Vec::with_capacity(HOURS_PER_DAY);
        for (hour, &net) in hourly_net_kwh.iter().enumerate() {
            let (action, next_level) = self.step(level, net);
            level = next_level;
            schedule.push(BatteryScheduleEntry {
                hour,
                action,
                level_kwh: level,
            });
        }
        schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_half_capacity() {
        let s = BatteryScheduler::new(10.0, 0.9);
        assert_eq!(s.initial_level_kwh(), 5.0);
    }

    #[test]
    #[should_panic]
    fn zero_efficiency_panics() {
        BatteryScheduler::new(5.0, 0.0);
    }

    #[test]
    #[should_panic]
    fn negative_capacity_panics() {
        BatteryScheduler::new(-1.0, 0.9);
    }

    #[test]
    fn charge_limited_by_headroom() {
        let s = BatteryScheduler::new(5.0, 1.0);
        let (action, level) = s.step(4.0, 3.0);
        assert_eq!(action, BatteryAction::Charge(1.0));
        assert_eq!(level, 5.0);
    }

    #[test]
    fn charge_loses_energy_to_efficiency() {
        // 2 kWh in at 90% stores 1.8 kWh
        let s = BatteryScheduler::new(10.0, 0.9);
        let (action, level) = s.step(5.0, 2.0);
        assert_eq!(action, BatteryAction::Charge(2.0));
        assert!((level - 6.8).abs() < 1e-12);
    }

    #[test]
    fn discharge_debits_more_than_delivered() {
        // 1.8 kWh out at 90% debits 2 kWh
        let s = BatteryScheduler::new(10.0, 0.9);
        let (action, level) = s.step(5.0, -1.8);
        assert_eq!(action, BatteryAction::Discharge(1.8));
        assert!((level - 3.0).abs() < 1e-12);
    }

    #[test]
    fn discharge_limited_by_level_and_clamped_at_zero() {
        let s = BatteryScheduler::new(5.0, 0.9);
        let (action, level) = s.step(2.5, -7.0);
        assert_eq!(action, BatteryAction::Discharge(2.5));
        assert_eq!(level, 0.0);
    }

    #[test]
    fn idle_when_full_and_surplus() {
        let s = BatteryScheduler::new(5.0, 0.9);
        assert_eq!(s.step(5.0, 3.0), (BatteryAction::Idle, 5.0));
    }

    #[test]
    fn idle_when_empty_and_deficit() {
        let s = BatteryScheduler::new(5.0, 0.9);
        assert_eq!(s.step(0.0, -3.0), (BatteryAction::Idle, 0.0));
    }

    #[test]
    fn idle_on_zero_net() {
        let s = BatteryScheduler::new(5.0, 0.9);
        assert_eq!(s.step(2.5, 0.0), (BatteryAction::Idle, 2.5));
    }

    #[test]
    fn zero_capacity_battery_never_acts() {
        let s = BatteryScheduler::new(0.0, 0.9);
        let schedule = s.schedule(&[4.0; HOURS_PER_DAY]);
        assert!(schedule.iter().all(|e| e.action == BatteryAction::Idle));
        assert!(schedule.iter().all(|e| e.level_kwh == 0.0));
    }

    #[test]
    fn schedule_has_one_entry_per_hour_in_order() {
        let s = BatteryScheduler::new(5.0, 0.9);
        let mut hourly = [0.0; HOURS_PER_DAY];
        hourly[3] = 1.0;
        hourly[20] = -2.0;
        let schedule = s.schedule(&hourly);
        assert_eq!(schedule.len(), 24);
        for (i, entry) in schedule.iter().enumerate() {
            assert_eq!(entry.hour, i);
        }
        assert_eq!(schedule[3].action, BatteryAction::Charge(1.0));
        assert_eq!(schedule[20].action, BatteryAction::Discharge(2.0));
        assert!(schedule[0..3].iter().all(|e| e.action == BatteryAction::Idle));
    }

    #[test]
    fn level_is_carried_between_hours() {
        let s = BatteryScheduler::new(5.0, 1.0);
        let mut hourly = [0.0; HOURS_PER_DAY];
        hourly[0] = 1.0;
        hourly[1] = 1.0;
        let schedule = s.schedule(&hourly);
        assert_eq!(schedule[0].level_kwh, 3.5);
        assert_eq!(schedule[1].level_kwh, 4.5);
        assert_eq!(schedule[23].level_kwh, 4.5);
    }
}
