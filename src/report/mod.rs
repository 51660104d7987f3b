//! Report workbook assembly.

pub mod grid;
mod xlsx;

pub use xlsx::{MASTER_COLUMNS, WEEKLY_COLUMNS};

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ingest::header::HeaderStyle;
use crate::ui::messages::{info, success};
use rusqlite::Connection;
use rust_xlsxwriter::Workbook;
use std::io;
use std::path::Path;

/// Build the three report views from the accumulated registry state.
pub fn build_report(
    conn: &Connection,
    cfg: &Config,
    style: Option<HeaderStyle>,
) -> AppResult<Workbook> {
    let mut workbook = Workbook::new();
    let header = xlsx::header_format(style.as_ref());
    let center = xlsx::center_format();

    {
        let worksheet = workbook.add_worksheet();
        xlsx::write_master(worksheet, conn, cfg, &header, &center)?;
    }
    for window in grid::weekly_windows(cfg.window_first_day, cfg.window_last_day, cfg.week_length)
    {
        let worksheet = workbook.add_worksheet();
        xlsx::write_weekly(worksheet, conn, cfg, &window, &header, &center)?;
    }
    {
        let worksheet = workbook.add_worksheet();
        xlsx::write_unscheduled(worksheet, conn, &header, &center)?;
    }

    Ok(workbook)
}

pub fn write_report(
    conn: &Connection,
    cfg: &Config,
    style: Option<HeaderStyle>,
    path: &Path,
) -> AppResult<()> {
    info(format!("Writing report: {}", path.display()));
    let mut workbook = build_report(conn, cfg, style)?;
    workbook.save(path_str(path)?)?;
    success(format!("Report written: {}", path.display()));
    Ok(())
}

fn path_str(path: &Path) -> AppResult<&str> {
    path.to_str()
        .ok_or_else(|| AppError::from(io::Error::other("invalid path")))
}
