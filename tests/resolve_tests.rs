//! Identity resolution against an in-memory registry.

use pollsched::db;
use pollsched::ingest::resolve::{Resolved, resolve_availability_row, upsert_roster_row};
use pollsched::ingest::sheet::{AvailabilityRow, RosterRow};
use pollsched::models::Precinct;
use rusqlite::Connection;

fn mem_conn() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    db::reset_schema(&conn).expect("reset schema");
    conn
}

fn roster_row(first: &str, last: &str) -> RosterRow {
    RosterRow {
        notes: None,
        first_name: first.to_string(),
        last_name: last.to_string(),
        city: Some("Springfield".to_string()),
        phone: Some("555-1000".to_string()),
        email: Some(format!("{}@example.com", first.to_lowercase())),
        experienced: false,
        languages: None,
        location: None,
        raw: format!(",{},{},Springfield,555-1000,,,,", first, last),
    }
}

fn avail_row(last: &str, first: &str, vr: &str) -> AvailabilityRow {
    AvailabilityRow {
        last_name: last.to_string(),
        first_name: first.to_string(),
        vr_id: vr.to_string(),
        precinct: None,
        role: None,
        yes: String::new(),
        no: String::new(),
        raw: format!("{},{},{},,,,", last, first, vr),
    }
}

#[test]
fn test_upsert_creates_then_updates() {
    let conn = mem_conn();

    let first_pass = upsert_roster_row(&conn, &roster_row("Jane", "Doe")).expect("upsert");
    assert!(matches!(first_pass, Resolved::Created(_)));

    let mut updated = roster_row("Jane", "Doe");
    updated.notes = Some("confirmed".to_string());
    updated.email = None;
    let second_pass = upsert_roster_row(&conn, &updated).expect("upsert again");
    assert!(matches!(second_pass, Resolved::Existing(_)));

    let workers = db::list_workers(&conn).expect("list");
    assert_eq!(workers.len(), 1);
    assert_eq!(workers[0].notes.as_deref(), Some("confirmed"));
    // blank incoming email keeps the rostered address
    assert_eq!(workers[0].email.as_deref(), Some("jane@example.com"));
}

#[test]
fn test_upsert_skips_blank_first_name() {
    let conn = mem_conn();
    let mut blank = roster_row("", "Doe");
    blank.email = None;
    let resolved = upsert_roster_row(&conn, &blank).expect("upsert blank");
    assert!(matches!(resolved, Resolved::Skipped));
    assert!(db::list_workers(&conn).expect("list").is_empty());
}

#[test]
fn test_roster_reingest_is_idempotent_regardless_of_order() {
    let conn = mem_conn();
    let rows = [roster_row("Jane", "Doe"), roster_row("John", "Smith")];
    for row in &rows {
        upsert_roster_row(&conn, row).expect("first pass");
    }
    for row in rows.iter().rev() {
        upsert_roster_row(&conn, row).expect("second pass");
    }
    assert_eq!(db::list_workers(&conn).expect("list").len(), 2);
}

#[test]
fn test_numeric_vr_matches_regardless_of_name() {
    let conn = mem_conn();

    let created = resolve_availability_row(&conn, &avail_row("Doe", "Jane", "123"), true)
        .expect("create from availability");
    let Resolved::Created(id) = created else {
        panic!("expected creation, got {:?}", created);
    };

    // Same VR #, name entered differently: must resolve to the same worker.
    let resolved = resolve_availability_row(&conn, &avail_row("DOE", "Janie", "123"), true)
        .expect("resolve by vr");
    assert_eq!(resolved, Resolved::Existing(id));
    assert_eq!(db::list_workers(&conn).expect("list").len(), 1);
}

#[test]
fn test_name_fallback_backfills_vr_precinct_role() {
    let conn = mem_conn();
    upsert_roster_row(&conn, &roster_row("Jane", "Doe")).expect("roster upsert");

    let mut row = avail_row("Doe", "Jane", "123");
    row.precinct = Some(Precinct::Number(7));
    row.role = Some("Clerk".to_string());
    let resolved = resolve_availability_row(&conn, &row, true).expect("resolve");
    assert!(matches!(resolved, Resolved::Existing(_)));

    let workers = db::list_workers(&conn).expect("list");
    assert_eq!(workers.len(), 1);
    assert_eq!(workers[0].vr_id.as_deref(), Some("123"));
    assert_eq!(workers[0].precinct, Some(Precinct::Number(7)));
    assert_eq!(workers[0].role.as_deref(), Some("Clerk"));
}

#[test]
fn test_lookup_without_creation_reports_not_found() {
    let conn = mem_conn();
    let resolved = resolve_availability_row(&conn, &avail_row("Ghost", "Gary", ""), false)
        .expect("resolve unknown");
    assert_eq!(resolved, Resolved::NotFound);
    assert!(db::list_workers(&conn).expect("list").is_empty());
}

#[test]
fn test_whitespace_vr_takes_name_branch() {
    let conn = mem_conn();
    upsert_roster_row(&conn, &roster_row("Jane", "Doe")).expect("roster upsert");

    let resolved = resolve_availability_row(&conn, &avail_row("Doe", "Jane", "   "), true)
        .expect("resolve");
    assert!(matches!(resolved, Resolved::Existing(_)));

    let workers = db::list_workers(&conn).expect("list");
    assert_eq!(workers.len(), 1);
    assert_eq!(workers[0].vr_id, None);
}

#[test]
fn test_non_numeric_vr_matches_by_name() {
    let conn = mem_conn();
    let created = resolve_availability_row(&conn, &avail_row("Doe", "Jane", "pending"), true)
        .expect("create");
    let Resolved::Created(id) = created else {
        panic!("expected creation");
    };

    let resolved = resolve_availability_row(&conn, &avail_row("Doe", "Jane", "pending"), true)
        .expect("resolve again");
    assert_eq!(resolved, Resolved::Existing(id));
    assert_eq!(db::list_workers(&conn).expect("list").len(), 1);
}

#[test]
fn test_name_match_is_case_sensitive() {
    let conn = mem_conn();
    upsert_roster_row(&conn, &roster_row("Jane", "Doe")).expect("roster upsert");

    // Different casing is a different name on purpose.
    let resolved = resolve_availability_row(&conn, &avail_row("DOE", "JANE", ""), true)
        .expect("resolve");
    assert!(matches!(resolved, Resolved::Created(_)));
    assert_eq!(db::list_workers(&conn).expect("list").len(), 2);
}
