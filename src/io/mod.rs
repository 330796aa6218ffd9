/// CSV export of the battery schedule.
pub mod export;
