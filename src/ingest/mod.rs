//! Workbook ingestion pipeline.
//!
//! Both survey roles run through the same loop, parameterized by a
//! `SheetSpec`. A fatal row error abandons the remaining rows of that sheet
//! only; the failure is accumulated and the run moves on to the next sheet.

pub mod header;
pub mod record;
pub mod resolve;
pub mod sheet;

use crate::config::Config;
use crate::db;
use crate::errors::{AppError, AppResult, SheetFailure};
use crate::ui::messages::{info, warning};
use calamine::{Reader, Xlsx, open_workbook};
use chrono::NaiveDate;
use header::{HeaderCheck, HeaderStyle};
use record::{Recorded, record_availability};
use resolve::{Resolved, resolve_availability_row, upsert_roster_row};
use rusqlite::Connection;
use serde::Serialize;
use sheet::{AVAILABILITY_SHEET, AvailabilityRow, ROSTER_SHEET, RosterRow, pad_columns, raw_row};
use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    pub create_missing: bool,
    pub strict_duplicates: bool,
}

/// Per-run counters, written out by `run --summary`.
#[derive(Debug, Default, Serialize)]
pub struct RunStats {
    pub sheets_processed: usize,
    pub workers_created: usize,
    pub workers_updated: usize,
    pub availability_recorded: usize,
    pub ambiguous_rows: usize,
    pub duplicates_skipped: usize,
    pub unresolved_skipped: usize,
    pub header_mismatches: usize,
}

/// What a workbook pass hands back: the header style hint (if any sheet had a
/// valid header row) and the sheets that aborted.
#[derive(Debug, Default)]
pub struct IngestOutcome {
    pub header_style: Option<HeaderStyle>,
    pub failures: Vec<SheetFailure>,
}

/// Roster pass: every sheet, upsert mode.
pub fn process_roster(
    conn: &Connection,
    path: &Path,
    stats: &mut RunStats,
) -> AppResult<IngestOutcome> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let mut outcome = IngestOutcome::default();

    for name in workbook.sheet_names().to_owned() {
        let range = workbook.worksheet_range(&name)?;
        info(format!("Working sheet {}", name));
        stats.sheets_processed += 1;

        let col_offset = range.start().map(|(_, c)| c as usize).unwrap_or(0);
        for (j, cells) in range.rows().enumerate() {
            let cells = pad_columns(cells, col_offset);
            let cells = cells.as_ref();
            if j == 0 {
                match header::validate_header(cells, &ROSTER_SHEET) {
                    HeaderCheck::Consumed(style) => {
                        outcome.header_style.get_or_insert(style);
                        continue;
                    }
                    HeaderCheck::DataRow => {
                        stats.header_mismatches += 1;
                        db::log_operation(
                            conn,
                            "schema_mismatch",
                            &name,
                            &raw_row(cells, ROSTER_SHEET.width()),
                        )?;
                    }
                }
            }
            let row = RosterRow::parse(cells);
            match upsert_roster_row(conn, &row) {
                Ok(Resolved::Created(_)) => stats.workers_created += 1,
                Ok(Resolved::Existing(_)) => stats.workers_updated += 1,
                Ok(_) => {}
                Err(e) => {
                    abandon_sheet(conn, &mut outcome.failures, &name, &row.raw, e)?;
                    break;
                }
            }
        }
    }

    Ok(outcome)
}

/// Availability pass: one sheet per calendar date, lookup-with-fallback mode.
pub fn process_availability(
    conn: &Connection,
    path: &Path,
    cfg: &Config,
    opts: &IngestOptions,
    stats: &mut RunStats,
) -> AppResult<IngestOutcome> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let mut outcome = IngestOutcome::default();

    for name in workbook.sheet_names().to_owned() {
        let day = match sheet_date(&name, cfg.report_year) {
            Ok(day) => day,
            Err(e) => {
                warning(format!("Skipping sheet '{}': {}", name, e));
                db::log_operation(conn, "skipped_sheet", &name, &e.to_string())?;
                continue;
            }
        };
        let range = workbook.worksheet_range(&name)?;
        info(format!("Working day {}", name));
        stats.sheets_processed += 1;

        let col_offset = range.start().map(|(_, c)| c as usize).unwrap_or(0);
        for (j, cells) in range.rows().enumerate() {
            let cells = pad_columns(cells, col_offset);
            let cells = cells.as_ref();
            if j == 0 {
                match header::validate_header(cells, &AVAILABILITY_SHEET) {
                    HeaderCheck::Consumed(style) => {
                        outcome.header_style.get_or_insert(style);
                        continue;
                    }
                    HeaderCheck::DataRow => {
                        stats.header_mismatches += 1;
                        db::log_operation(
                            conn,
                            "schema_mismatch",
                            &name,
                            &raw_row(cells, AVAILABILITY_SHEET.width()),
                        )?;
                    }
                }
            }
            let row = AvailabilityRow::parse(cells);
            if row.is_blank() {
                continue;
            }
            if let Err(e) =
                ingest_availability_row(conn, &row, day, &name, &cfg.checked_marker, opts, stats)
            {
                abandon_sheet(conn, &mut outcome.failures, &name, &row.raw, e)?;
                break;
            }
        }
    }

    Ok(outcome)
}

fn ingest_availability_row(
    conn: &Connection,
    row: &AvailabilityRow,
    day: NaiveDate,
    sheet_name: &str,
    marker: &str,
    opts: &IngestOptions,
    stats: &mut RunStats,
) -> AppResult<()> {
    let worker_id = match resolve_availability_row(conn, row, opts.create_missing)? {
        Resolved::Existing(id) => id,
        Resolved::Created(id) => {
            stats.workers_created += 1;
            id
        }
        Resolved::NotFound => {
            warning(format!(
                "No registered worker matches {} {}; row skipped ({})",
                row.first_name, row.last_name, sheet_name
            ));
            db::log_operation(conn, "unresolved", sheet_name, &row.raw)?;
            stats.unresolved_skipped += 1;
            return Ok(());
        }
        Resolved::Skipped => return Ok(()),
    };

    match record_availability(
        conn,
        worker_id,
        day,
        row,
        sheet_name,
        marker,
        opts.strict_duplicates,
    )? {
        Recorded::Inserted => stats.availability_recorded += 1,
        Recorded::Ambiguous => stats.ambiguous_rows += 1,
        Recorded::DuplicateSkipped => stats.duplicates_skipped += 1,
        Recorded::NoMark => {}
    }
    Ok(())
}

fn abandon_sheet(
    conn: &Connection,
    failures: &mut Vec<SheetFailure>,
    sheet: &str,
    raw: &str,
    error: AppError,
) -> AppResult<()> {
    warning(format!("Unable to insert data for: {}", raw));
    db::log_operation(conn, "sheet_failure", sheet, raw)?;
    failures.push(SheetFailure {
        sheet: sheet.to_string(),
        row: raw.to_string(),
        message: error.to_string(),
    });
    Ok(())
}

/// Availability sheet names carry the calendar date as an `MM-DD` prefix.
pub fn sheet_date(name: &str, year: i32) -> AppResult<NaiveDate> {
    let month = name.get(0..2).and_then(|s| s.parse::<u32>().ok());
    let sep = name.get(2..3) == Some("-");
    let day = name.get(3..5).and_then(|s| s.parse::<u32>().ok());
    match (month, sep, day) {
        (Some(month), true, Some(day)) => NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| AppError::SheetDate(name.to_string())),
        _ => Err(AppError::SheetDate(name.to_string())),
    }
}
