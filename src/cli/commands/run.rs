//! The reconciliation pipeline: roster upsert, availability ingestion, report.

use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db;
use crate::errors::{AppError, AppResult};
use crate::ingest::{self, IngestOptions, RunStats};
use crate::report;
use crate::ui::messages::info;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Run {
        availability,
        roster,
        out,
        strict,
        no_create,
        summary,
    } = cmd
    else {
        return Ok(());
    };

    cfg.validate()?;
    let availability_path = Path::new(availability);
    if !availability_path.is_file() {
        return Err(AppError::Other(format!(
            "Unable to read {}",
            availability_path.display()
        )));
    }

    // The registry lives exactly as long as the run; a file-backed repository
    // is reset the same way, keeping only the operational log. The connection
    // is released on every exit path when it drops.
    let conn = Connection::open(&cfg.database)?;
    db::reset_schema(&conn)?;
    db::log_operation(&conn, "run", availability, "pipeline started")?;

    let opts = IngestOptions {
        create_missing: cfg.create_missing_workers && !*no_create,
        strict_duplicates: cfg.strict_duplicates || *strict,
    };
    let mut stats = RunStats::default();
    let mut failures = Vec::new();
    let mut roster_style = None;

    if let Some(roster_file) = roster {
        let outcome = ingest::process_roster(&conn, Path::new(roster_file), &mut stats)?;
        roster_style = outcome.header_style;
        failures.extend(outcome.failures);
    }

    let outcome =
        ingest::process_availability(&conn, availability_path, cfg, &opts, &mut stats)?;
    let header_style = outcome.header_style.or(roster_style);
    failures.extend(outcome.failures);

    // Counters go out even when the run fails; the summary is for operators.
    if let Some(summary_file) = summary {
        write_summary(Path::new(summary_file), &stats)?;
    }

    if !failures.is_empty() {
        db::log_operation(
            &conn,
            "run_failed",
            availability,
            &format!("{} sheet(s) aborted", failures.len()),
        )?;
        return Err(AppError::SheetFailures(failures));
    }

    let out_path = resolve_out_path(out.as_deref(), availability_path, cfg);
    report::write_report(&conn, cfg, header_style, &out_path)?;
    db::log_operation(
        &conn,
        "run_complete",
        availability,
        &format!("{} availability facts recorded", stats.availability_recorded),
    )?;
    print_summary(&stats);

    Ok(())
}

fn resolve_out_path(out: Option<&str>, availability_path: &Path, cfg: &Config) -> PathBuf {
    match out {
        Some(path) => PathBuf::from(path),
        None => availability_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .join(&cfg.output_file),
    }
}

fn write_summary(path: &Path, stats: &RunStats) -> AppResult<()> {
    let json = serde_json::to_string_pretty(stats).map_err(|e| AppError::Other(e.to_string()))?;
    fs::write(path, json)?;
    info(format!("Run summary written: {}", path.display()));
    Ok(())
}

fn print_summary(stats: &RunStats) {
    info(format!(
        "{} sheet(s): {} worker(s) created, {} updated, {} availability fact(s) recorded",
        stats.sheets_processed,
        stats.workers_created,
        stats.workers_updated,
        stats.availability_recorded
    ));
    if stats.ambiguous_rows + stats.duplicates_skipped + stats.unresolved_skipped > 0 {
        info(format!(
            "Skipped rows: {} ambiguous, {} duplicate, {} unresolved",
            stats.ambiguous_rows, stats.duplicates_skipped, stats.unresolved_skipped
        ));
    }
}
