//! Report worksheet writers.

use crate::config::Config;
use crate::db;
use crate::errors::{AppError, AppResult};
use crate::ingest::header::HeaderStyle;
use crate::models::Worker;
use crate::report::grid::{Window, day_column, window_dates};
use chrono::Datelike;
use rusqlite::Connection;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Worksheet};
use unicode_width::UnicodeWidthStr;

pub const MASTER_COLUMNS: [&str; 12] = [
    "Note",
    "Last Name",
    "First Name",
    "VR #",
    "City",
    "Phone",
    "Email",
    "Experienced",
    "Languages",
    "Location",
    "Precinct",
    "Role",
];

pub const WEEKLY_COLUMNS: [&str; 5] = ["Last Name", "First Name", "VR #", "Precinct", "Role"];

const EXPERIENCED_COL: usize = 7;

/// Header format from the style hint threaded out of ingestion. No hint means
/// the input headers never validated; emit plain headers.
pub fn header_format(style: Option<&HeaderStyle>) -> Format {
    match style {
        Some(style) => {
            let mut format = Format::new()
                .set_font_color(Color::RGB(style.font_color))
                .set_background_color(Color::RGB(style.fill_color))
                .set_pattern(FormatPattern::Solid)
                .set_border(FormatBorder::Thin);
            if style.bold {
                format = format.set_bold();
            }
            format
        }
        None => Format::new(),
    }
}

pub fn center_format() -> Format {
    Format::new().set_align(FormatAlign::Center)
}

/// Column widths grown to fit content, applied once per sheet.
struct ColWidths(Vec<usize>);

impl ColWidths {
    fn new() -> Self {
        ColWidths(Vec::new())
    }

    fn note(&mut self, col: usize, value: &str) {
        if self.0.len() <= col {
            self.0.resize(col + 1, 0);
        }
        self.0[col] = self.0[col].max(UnicodeWidthStr::width(value));
    }

    fn apply(&self, worksheet: &mut Worksheet) -> AppResult<()> {
        for (col, width) in self.0.iter().enumerate() {
            worksheet.set_column_width(col as u16, *width as f64 + 2.0)?;
        }
        Ok(())
    }
}

fn write_header_row(
    worksheet: &mut Worksheet,
    titles: &[&str],
    window: Option<&Window>,
    format: &Format,
    widths: &mut ColWidths,
) -> AppResult<()> {
    for (col, title) in titles.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *title, format)?;
        widths.note(col, title);
    }
    if let Some(window) = window {
        for day in window.days() {
            let col = day_column(day, window.start, titles.len() as u16);
            let label = day.to_string();
            worksheet.write_with_format(0, col, label.as_str(), format)?;
            widths.note(col as usize, &label);
        }
    }
    worksheet.set_freeze_panes(1, 0).ok();
    Ok(())
}

fn master_identity_values(worker: &Worker) -> [String; 12] {
    [
        worker.notes.clone().unwrap_or_default(),
        worker.last_name.clone(),
        worker.first_name.clone(),
        worker.vr_id.clone().unwrap_or_default(),
        worker.city.clone().unwrap_or_default(),
        worker.phone.clone().unwrap_or_default(),
        worker.email.clone().unwrap_or_default(),
        if worker.experienced { "X" } else { "" }.to_string(),
        worker.languages.clone().unwrap_or_default(),
        worker.location.clone().unwrap_or_default(),
        worker
            .precinct
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_default(),
        worker.role.clone().unwrap_or_default(),
    ]
}

fn weekly_identity_values(worker: &Worker) -> [String; 5] {
    [
        worker.last_name.clone(),
        worker.first_name.clone(),
        worker.vr_id.clone().unwrap_or_default(),
        worker
            .precinct
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_default(),
        worker.role.clone().unwrap_or_default(),
    ]
}

fn write_identity_cells(
    worksheet: &mut Worksheet,
    row: u32,
    values: &[String],
    experienced_col: Option<usize>,
    center: &Format,
    widths: &mut ColWidths,
) -> AppResult<()> {
    for (col, value) in values.iter().enumerate() {
        if value.is_empty() {
            continue;
        }
        if experienced_col == Some(col) {
            worksheet.write_with_format(row, col as u16, value.as_str(), center)?;
        } else {
            worksheet.write(row, col as u16, value.as_str())?;
        }
        widths.note(col, value);
    }
    Ok(())
}

fn mark_days(
    worksheet: &mut Worksheet,
    conn: &Connection,
    worker: &Worker,
    row: u32,
    window: &Window,
    cfg: &Config,
    identity_columns: u16,
    center: &Format,
) -> AppResult<()> {
    let range = window_dates(window, cfg.report_year, cfg.report_month).ok_or_else(|| {
        AppError::Config(format!(
            "reporting window {}-{} does not fit {}-{:02}",
            window.start, window.end, cfg.report_year, cfg.report_month
        ))
    })?;
    for day in db::list_availability(conn, worker.id, Some(range))? {
        let col = day_column(day.day(), window.start, identity_columns);
        worksheet.write_with_format(row, col, "X", center)?;
    }
    Ok(())
}

/// Master sheet: full identity columns plus one column per day of the whole
/// reporting window.
pub fn write_master(
    worksheet: &mut Worksheet,
    conn: &Connection,
    cfg: &Config,
    header: &Format,
    center: &Format,
) -> AppResult<()> {
    worksheet.set_name("Workers")?;
    let window = Window {
        start: cfg.window_first_day,
        end: cfg.window_last_day,
    };
    let mut widths = ColWidths::new();
    write_header_row(worksheet, &MASTER_COLUMNS, Some(&window), header, &mut widths)?;

    for (i, worker) in db::list_workers(conn)?.iter().enumerate() {
        let row = (i + 1) as u32;
        let values = master_identity_values(worker);
        write_identity_cells(
            worksheet,
            row,
            &values,
            Some(EXPERIENCED_COL),
            center,
            &mut widths,
        )?;
        mark_days(
            worksheet,
            conn,
            worker,
            row,
            &window,
            cfg,
            MASTER_COLUMNS.len() as u16,
            center,
        )?;
    }

    widths.apply(worksheet)
}

/// One weekly sheet: abbreviated identity columns plus the window's days.
pub fn write_weekly(
    worksheet: &mut Worksheet,
    conn: &Connection,
    cfg: &Config,
    window: &Window,
    header: &Format,
    center: &Format,
) -> AppResult<()> {
    worksheet.set_name(&window.label(cfg.report_month))?;
    let mut widths = ColWidths::new();
    write_header_row(worksheet, &WEEKLY_COLUMNS, Some(window), header, &mut widths)?;

    for (i, worker) in db::list_workers(conn)?.iter().enumerate() {
        let row = (i + 1) as u32;
        let values = weekly_identity_values(worker);
        write_identity_cells(worksheet, row, &values, None, center, &mut widths)?;
        mark_days(
            worksheet,
            conn,
            worker,
            row,
            window,
            cfg,
            WEEKLY_COLUMNS.len() as u16,
            center,
        )?;
    }

    widths.apply(worksheet)
}

/// Workers with no usable identifier or no availability at all. Identity
/// columns only.
pub fn write_unscheduled(
    worksheet: &mut Worksheet,
    conn: &Connection,
    header: &Format,
    center: &Format,
) -> AppResult<()> {
    worksheet.set_name("NotScheduled")?;
    let mut widths = ColWidths::new();
    write_header_row(worksheet, &MASTER_COLUMNS, None, header, &mut widths)?;

    for (i, worker) in db::list_unscheduled(conn)?.iter().enumerate() {
        let row = (i + 1) as u32;
        let values = master_identity_values(worker);
        write_identity_cells(
            worksheet,
            row,
            &values,
            Some(EXPERIENCED_COL),
            center,
            &mut widths,
        )?;
    }

    widths.apply(worksheet)
}
