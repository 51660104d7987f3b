//! Unified application error type.
//! All modules (db, ingest, report, cli) return AppError to keep the error
//! handling consistent and easy to manage.

use chrono::NaiveDate;
use std::io;
use thiserror::Error;

/// One abandoned sheet: which sheet, which row, and why.
#[derive(Debug, Clone)]
pub struct SheetFailure {
    pub sheet: String,
    pub row: String,
    pub message: String,
}

fn format_failures(failures: &[SheetFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("  [{}] {} -- row: {}", f.sheet, f.message, f.row))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Repository-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Repository rejected operation: {0}")]
    Repository(String),

    #[error("Worker {worker_id} is already recorded as available on {day}")]
    DuplicateAvailability { worker_id: i64, day: NaiveDate },

    // ---------------------------
    // Workbook I/O
    // ---------------------------
    #[error("Workbook read error: {0}")]
    WorkbookRead(#[from] calamine::XlsxError),

    #[error("Workbook write error: {0}")]
    WorkbookWrite(#[from] rust_xlsxwriter::XlsxError),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Sheet name '{0}' does not carry an MM-DD date prefix")]
    SheetDate(String),

    // ---------------------------
    // Pipeline errors
    // ---------------------------
    #[error("{} sheet(s) aborted during processing:\n{}", .0.len(), format_failures(.0))]
    SheetFailures(Vec<SheetFailure>),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
