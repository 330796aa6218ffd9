//! CSV export for battery schedules.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::settlement::types::BatteryScheduleEntry;

/// Column header for schedule CSV export.
const HEADER: &str = "hour,action,change_kwh,level_kwh";

/// Exports a battery schedule to a CSV file at the given path.
///
/// Writes a header row followed by one row per hour. Produces deterministic
/// output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_schedule_csv(schedule: &[BatteryScheduleEntry], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_schedule_csv(schedule, buf)
}

/// Writes a battery schedule as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_schedule_csv(schedule: &[BatteryScheduleEntry], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for e in schedule {
        wtr.write_record(&[
            e.hour.to_string(),
            e.action.label().to_string(),
            format!("{:.6}", e.action.change_kwh()),
            format!("{:.6}", e.level_kwh),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
