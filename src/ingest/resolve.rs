//! Identity resolution.
//!
//! Decides whether a survey row refers to an existing worker, creates one, or
//! reports it unresolved. Numeric-looking identifiers are authoritative;
//! everything else falls back to exact last+first name matching, a deliberate,
//! permissive policy for identifier-less records.

use crate::db;
use crate::errors::AppResult;
use crate::ingest::sheet::{AvailabilityRow, RosterRow};
use crate::models::{NewWorker, WorkerPatch};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    Existing(i64),
    Created(i64),
    /// Blank spreadsheet row, skipped entirely.
    Skipped,
    /// No match and creation disallowed; the caller skips the row.
    NotFound,
}

/// An identifier is usable as a match key only when it leads with a digit.
/// Whitespace or punctuation-only values take the name-match branch.
fn numeric_vr(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    match trimmed.chars().next() {
        Some(c) if c.is_ascii_digit() => Some(trimmed),
        _ => None,
    }
}

fn stored_vr(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Roster ingestion: create the worker or refresh the mutable contact fields
/// of the existing record.
pub fn upsert_roster_row(conn: &Connection, row: &RosterRow) -> AppResult<Resolved> {
    if row.first_name.is_empty() {
        // Empty row
        return Ok(Resolved::Skipped);
    }

    match db::find_by_id_and_name(conn, None, &row.last_name, &row.first_name)? {
        Some(existing) => {
            let patch = WorkerPatch {
                notes: row.notes.clone().or(existing.notes),
                email: row.email.clone().or(existing.email),
                ..WorkerPatch::default()
            };
            db::update_worker(conn, existing.id, &patch)?;
            Ok(Resolved::Existing(existing.id))
        }
        None => {
            let id = db::insert_worker(
                conn,
                &NewWorker {
                    vr_id: None,
                    last_name: row.last_name.clone(),
                    first_name: row.first_name.clone(),
                    city: row.city.clone(),
                    phone: row.phone.clone(),
                    email: row.email.clone(),
                    experienced: row.experienced,
                    languages: row.languages.clone(),
                    location: row.location.clone(),
                    precinct: None,
                    role: None,
                    notes: row.notes.clone(),
                },
            )?;
            Ok(Resolved::Created(id))
        }
    }
}

/// Availability ingestion: match by identifier, then by name, then backfill or
/// create.
pub fn resolve_availability_row(
    conn: &Connection,
    row: &AvailabilityRow,
    create_missing: bool,
) -> AppResult<Resolved> {
    let primary = match numeric_vr(&row.vr_id) {
        // A digit-leading VR # is unique per person: relax the name filter.
        Some(vr) => db::find_by_id_and_name(conn, Some(vr), "%", "%")?,
        None => db::find_by_id_and_name(conn, None, &row.last_name, &row.first_name)?,
    };
    if let Some(found) = primary {
        return Ok(Resolved::Existing(found.id));
    }

    // The worker may have been rostered before their VR # was known: retry by
    // name among identifier-less records and backfill what the row supplies.
    if let Some(found) = db::find_by_name_only(conn, &row.last_name, &row.first_name)? {
        let patch = WorkerPatch {
            vr_id: stored_vr(&row.vr_id),
            precinct: row.precinct.clone(),
            role: row.role.clone(),
            ..WorkerPatch::default()
        };
        if !patch.is_empty() {
            db::update_worker(conn, found.id, &patch)?;
        }
        return Ok(Resolved::Existing(found.id));
    }

    if create_missing {
        let id = db::insert_worker(
            conn,
            &NewWorker {
                vr_id: stored_vr(&row.vr_id),
                last_name: row.last_name.clone(),
                first_name: row.first_name.clone(),
                precinct: row.precinct.clone(),
                role: row.role.clone(),
                ..NewWorker::default()
            },
        )?;
        return Ok(Resolved::Created(id));
    }

    Ok(Resolved::NotFound)
}
