//! SQLite-backed worker registry.
//!
//! The registry is rebuilt on every run: `worker` and `availability` are
//! dropped and recreated, while the operational `log` table is kept so that a
//! file-backed repository can be inspected after the run.

use crate::errors::{AppError, AppResult};
use crate::models::{NewWorker, Worker, WorkerPatch};
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, ToSql, params};

const WORKER_COLUMNS: &str = "id, vr_id, last_name, first_name, city, phone, email, \
     experienced, languages, location, precinct, role, notes";

/// Drop and recreate the per-run tables. The log table is created on first use
/// and never dropped.
pub fn reset_schema(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        "
        DROP TABLE IF EXISTS availability;
        DROP TABLE IF EXISTS worker;

        CREATE TABLE worker (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            vr_id       TEXT,
            last_name   TEXT NOT NULL,
            first_name  TEXT NOT NULL,
            city        TEXT,
            phone       TEXT,
            email       TEXT,
            experienced INTEGER NOT NULL DEFAULT 0,
            languages   TEXT,
            location    TEXT,
            precinct    TEXT,
            role        TEXT,
            notes       TEXT
        );

        CREATE TABLE availability (
            worker_id INTEGER NOT NULL REFERENCES worker(id),
            day       TEXT NOT NULL,          -- YYYY-MM-DD
            PRIMARY KEY (worker_id, day)
        );

        CREATE TABLE IF NOT EXISTS log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            operation TEXT NOT NULL,
            target TEXT DEFAULT '',
            message TEXT NOT NULL
        );
        ",
    )?;
    Ok(())
}

/// Create the log table alone, for commands that inspect a repository without
/// resetting it.
pub fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            operation TEXT NOT NULL,
            target TEXT DEFAULT '',
            message TEXT NOT NULL
        );
        ",
    )?;
    Ok(())
}

/// Search by identifier and name patterns.
///
/// `Some(vr)` matches the exact identifier with `LIKE` name patterns (pass `%`
/// to relax the name filter). `None` matches exact names with a wildcard
/// identifier, NULL included.
pub fn find_by_id_and_name(
    conn: &Connection,
    vr_id: Option<&str>,
    last_pattern: &str,
    first_pattern: &str,
) -> AppResult<Option<Worker>> {
    let found = match vr_id {
        Some(vr) => conn
            .prepare_cached(&format!(
                "SELECT {WORKER_COLUMNS} FROM worker
                 WHERE vr_id = ?1 AND last_name LIKE ?2 AND first_name LIKE ?3"
            ))?
            .query_row(params![vr, last_pattern, first_pattern], Worker::from_row)
            .optional()?,
        None => conn
            .prepare_cached(&format!(
                "SELECT {WORKER_COLUMNS} FROM worker
                 WHERE last_name = ?1 AND first_name = ?2"
            ))?
            .query_row(params![last_pattern, first_pattern], Worker::from_row)
            .optional()?,
    };
    Ok(found)
}

/// Name-only search, restricted to records whose identifier is still unset.
pub fn find_by_name_only(
    conn: &Connection,
    last_name: &str,
    first_name: &str,
) -> AppResult<Option<Worker>> {
    let found = conn
        .prepare_cached(&format!(
            "SELECT {WORKER_COLUMNS} FROM worker
             WHERE vr_id IS NULL AND last_name = ?1 AND first_name = ?2"
        ))?
        .query_row(params![last_name, first_name], Worker::from_row)
        .optional()?;
    Ok(found)
}

pub fn insert_worker(conn: &Connection, worker: &NewWorker) -> AppResult<i64> {
    let affected = conn.execute(
        "INSERT INTO worker (vr_id, last_name, first_name, city, phone, email,
                             experienced, languages, location, precinct, role, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            worker.vr_id,
            worker.last_name,
            worker.first_name,
            worker.city,
            worker.phone,
            worker.email,
            worker.experienced as i64,
            worker.languages,
            worker.location,
            worker.precinct.as_ref().map(|p| p.to_string()),
            worker.role,
            worker.notes,
        ],
    )?;
    if affected != 1 {
        return Err(AppError::Repository(format!(
            "insert of worker {} {} affected {} rows",
            worker.first_name, worker.last_name, affected
        )));
    }
    Ok(conn.last_insert_rowid())
}

/// Apply the present fields of the patch. Returns the affected row count
/// (0 when the patch is empty).
pub fn update_worker(conn: &Connection, id: i64, patch: &WorkerPatch) -> AppResult<usize> {
    if patch.is_empty() {
        return Ok(0);
    }
    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();
    if let Some(vr) = &patch.vr_id {
        sets.push("vr_id = ?");
        values.push(Box::new(vr.clone()));
    }
    if let Some(precinct) = &patch.precinct {
        sets.push("precinct = ?");
        values.push(Box::new(precinct.to_string()));
    }
    if let Some(role) = &patch.role {
        sets.push("role = ?");
        values.push(Box::new(role.clone()));
    }
    if let Some(email) = &patch.email {
        sets.push("email = ?");
        values.push(Box::new(email.clone()));
    }
    if let Some(notes) = &patch.notes {
        sets.push("notes = ?");
        values.push(Box::new(notes.clone()));
    }
    values.push(Box::new(id));

    let sql = format!("UPDATE worker SET {} WHERE id = ?", sets.join(", "));
    let affected = conn.execute(
        &sql,
        rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())),
    )?;
    if affected != 1 {
        return Err(AppError::Repository(format!(
            "update of worker {} affected {} rows",
            id, affected
        )));
    }
    Ok(affected)
}

/// Record that a worker is available on a day. The composite primary key makes
/// a second insert for the same pair fail with a distinct error.
pub fn insert_availability(conn: &Connection, worker_id: i64, day: NaiveDate) -> AppResult<()> {
    let result = conn.execute(
        "INSERT INTO availability (worker_id, day) VALUES (?1, ?2)",
        params![worker_id, day.format("%Y-%m-%d").to_string()],
    );
    match result {
        Ok(1) => Ok(()),
        Ok(n) => Err(AppError::Repository(format!(
            "availability insert affected {} rows",
            n
        ))),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(AppError::DuplicateAvailability { worker_id, day })
        }
        Err(e) => Err(e.into()),
    }
}

pub fn list_workers(conn: &Connection) -> AppResult<Vec<Worker>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {WORKER_COLUMNS} FROM worker ORDER BY last_name, first_name"
    ))?;
    let rows = stmt.query_map([], Worker::from_row)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Workers with no usable identifier or no recorded availability.
pub fn list_unscheduled(conn: &Connection) -> AppResult<Vec<Worker>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {WORKER_COLUMNS} FROM worker w
         WHERE w.vr_id IS NULL
            OR substr(w.vr_id, 1, 1) NOT BETWEEN '0' AND '9'
            OR w.id NOT IN (SELECT DISTINCT a.worker_id FROM availability a)
         ORDER BY last_name, first_name"
    ))?;
    let rows = stmt.query_map([], Worker::from_row)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Ordered availability dates for one worker, optionally restricted to the
/// half-open range `[start, end)`.
pub fn list_availability(
    conn: &Connection,
    worker_id: i64,
    range: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<NaiveDate>> {
    let mut days: Vec<String> = Vec::new();
    match range {
        Some((start, end)) => {
            let mut stmt = conn.prepare_cached(
                "SELECT day FROM availability
                 WHERE worker_id = ?1 AND day >= ?2 AND day < ?3 ORDER BY day",
            )?;
            let rows = stmt.query_map(
                params![
                    worker_id,
                    start.format("%Y-%m-%d").to_string(),
                    end.format("%Y-%m-%d").to_string()
                ],
                |row| row.get::<_, String>(0),
            )?;
            for r in rows {
                days.push(r?);
            }
        }
        None => {
            let mut stmt = conn.prepare_cached(
                "SELECT day FROM availability WHERE worker_id = ?1 ORDER BY day",
            )?;
            let rows = stmt.query_map([worker_id], |row| row.get::<_, String>(0))?;
            for r in rows {
                days.push(r?);
            }
        }
    }

    let mut out = Vec::with_capacity(days.len());
    for day in days {
        let parsed = NaiveDate::parse_from_str(&day, "%Y-%m-%d")
            .map_err(|_| AppError::InvalidDate(day.clone()))?;
        out.push(parsed);
    }
    Ok(out)
}

pub fn log_operation(
    conn: &Connection,
    operation: &str,
    target: &str,
    message: &str,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message) VALUES (?1, ?2, ?3, ?4)",
        params![Local::now().to_rfc3339(), operation, target, message],
    )?;
    Ok(())
}

/// One row of the operational log table.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub fn load_log(conn: &Connection) -> AppResult<Vec<LogEntry>> {
    let mut stmt = conn
        .prepare_cached("SELECT id, date, operation, target, message FROM log ORDER BY id ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(LogEntry {
            id: row.get(0)?,
            date: row.get(1)?,
            operation: row.get(2)?,
            target: row.get(3)?,
            message: row.get(4)?,
        })
    })?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
