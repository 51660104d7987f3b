//! Report building against a seeded registry, verified by reading the saved
//! workbook back.

mod common;
use chrono::NaiveDate;
use common::{cell_str, find_row, read_sheet, sheet_names, temp_out};
use pollsched::config::Config;
use pollsched::models::{NewWorker, Precinct};
use pollsched::{db, report};
use rusqlite::Connection;

fn seeded_conn() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    db::reset_schema(&conn).expect("reset schema");

    let alice = db::insert_worker(
        &conn,
        &NewWorker {
            vr_id: Some("101".to_string()),
            last_name: "Adams".to_string(),
            first_name: "Alice".to_string(),
            city: Some("Springfield".to_string()),
            experienced: true,
            precinct: Some(Precinct::Number(5)),
            role: Some("Clerk".to_string()),
            ..NewWorker::default()
        },
    )
    .expect("insert alice");
    for day in [12, 19, 30] {
        db::insert_availability(&conn, alice, date(day)).expect("alice availability");
    }

    // rostered, never scheduled
    db::insert_worker(
        &conn,
        &NewWorker {
            vr_id: None,
            last_name: "Baker".to_string(),
            first_name: "Bob".to_string(),
            ..NewWorker::default()
        },
    )
    .expect("insert bob");

    // available but identifier unusable
    let carol = db::insert_worker(
        &conn,
        &NewWorker {
            vr_id: Some("pending".to_string()),
            last_name: "Chase".to_string(),
            first_name: "Carol".to_string(),
            ..NewWorker::default()
        },
    )
    .expect("insert carol");
    db::insert_availability(&conn, carol, date(26)).expect("carol availability");

    conn
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, day).expect("valid date")
}

fn saved_report(name: &str) -> String {
    let conn = seeded_conn();
    let cfg = Config::default();
    let out = temp_out(name, "xlsx");
    let mut workbook = report::build_report(&conn, &cfg, None).expect("build report");
    workbook.save(out.as_str()).expect("save report");
    out
}

#[test]
fn test_report_sheet_set() {
    let out = saved_report("report_sheet_set");
    assert_eq!(
        sheet_names(&out),
        vec!["Workers", "Oct 12-18", "Oct 19-25", "Oct 26-30", "NotScheduled"]
    );
}

#[test]
fn test_master_sheet_rows_and_marks() {
    let out = saved_report("report_master");
    let range = read_sheet(&out, "Workers");

    // ordered by last name, then first name
    assert_eq!(cell_str(&range, 1, 1), "Adams");
    assert_eq!(cell_str(&range, 2, 1), "Baker");
    assert_eq!(cell_str(&range, 3, 1), "Chase");

    // day headers span the full reporting window
    assert_eq!(cell_str(&range, 0, 12), "12");
    assert_eq!(cell_str(&range, 0, 30), "30");

    // identity columns
    let alice = find_row(&range, 1, "Adams").expect("alice row");
    assert_eq!(cell_str(&range, alice, 3), "101");
    assert_eq!(cell_str(&range, alice, 7), "X"); // experienced
    assert_eq!(cell_str(&range, alice, 10), "5");
    assert_eq!(cell_str(&range, alice, 11), "Clerk");

    // marks land at (day - 12) + 12
    for day in [12u32, 19, 30] {
        assert_eq!(cell_str(&range, alice, day), "X", "day {}", day);
    }
    assert_eq!(cell_str(&range, alice, 13), "");
}

#[test]
fn test_weekly_sheets_scope_marks_to_their_window() {
    let out = saved_report("report_weekly");

    let second = read_sheet(&out, "Oct 19-25");
    let alice = find_row(&second, 0, "Adams").expect("alice row");
    assert_eq!(cell_str(&second, alice, 5), "X"); // day 19
    assert_eq!(cell_str(&second, alice, 6), "");

    let third = read_sheet(&out, "Oct 26-30");
    // truncated window: headers 26..30 and nothing past them
    assert_eq!(cell_str(&third, 0, 5), "26");
    assert_eq!(cell_str(&third, 0, 9), "30");
    assert!(third.width() <= 10);

    let alice = find_row(&third, 0, "Adams").expect("alice row");
    assert_eq!(cell_str(&third, alice, 9), "X"); // day 30
    let carol = find_row(&third, 0, "Chase").expect("carol row");
    assert_eq!(cell_str(&third, carol, 5), "X"); // day 26
}

#[test]
fn test_not_scheduled_lists_unusable_or_unscheduled_workers() {
    let out = saved_report("report_unscheduled");
    let range = read_sheet(&out, "NotScheduled");

    assert!(find_row(&range, 1, "Baker").is_some());
    assert!(find_row(&range, 1, "Chase").is_some());
    assert!(find_row(&range, 1, "Adams").is_none());
}
