//! Availability recording.
//!
//! A fact is written only when exactly the "Yes" cell carries the checked
//! sentinel. Contradictory rows are diagnosed and dropped; duplicate facts are
//! fatal in strict mode and skipped with a warning otherwise.

use crate::db;
use crate::errors::{AppError, AppResult};
use crate::ingest::sheet::AvailabilityRow;
use crate::ui::messages::warning;
use chrono::NaiveDate;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    Inserted,
    /// Neither box checked: absence of availability is the default.
    NoMark,
    /// Both boxes checked: data-entry contradiction, nothing written.
    Ambiguous,
    /// Lenient mode only.
    DuplicateSkipped,
}

pub fn is_checked(cell: &str, marker: &str) -> bool {
    cell.trim().eq_ignore_ascii_case(marker.trim())
}

pub fn record_availability(
    conn: &Connection,
    worker_id: i64,
    day: NaiveDate,
    row: &AvailabilityRow,
    sheet_name: &str,
    marker: &str,
    strict: bool,
) -> AppResult<Recorded> {
    if !is_checked(&row.yes, marker) {
        return Ok(Recorded::NoMark);
    }
    if is_checked(&row.no, marker) {
        warning(format!(
            "Worker {} {} (VR# {}) has both 'Yes' & 'No' checked for {}",
            row.first_name, row.last_name, row.vr_id, sheet_name
        ));
        db::log_operation(conn, "ambiguous", sheet_name, &row.raw)?;
        return Ok(Recorded::Ambiguous);
    }

    match db::insert_availability(conn, worker_id, day) {
        Ok(()) => Ok(Recorded::Inserted),
        Err(AppError::DuplicateAvailability { .. }) if !strict => {
            warning(format!(
                "Worker {} {} already marked available on {}; duplicate row skipped ({})",
                row.first_name, row.last_name, day, sheet_name
            ));
            db::log_operation(conn, "duplicate", sheet_name, &row.raw)?;
            Ok(Recorded::DuplicateSkipped)
        }
        Err(e) => Err(e),
    }
}
