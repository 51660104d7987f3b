#![allow(dead_code)]
use assert_cmd::Command;
use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::Workbook;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn psc() -> Command {
    Command::cargo_bin("pollsched").expect("pollsched binary")
}

/// Create a unique repository path inside the system temp dir and remove any
/// existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_pollsched.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub const ROSTER_HEADER: [&str; 8] = [
    "",
    "First Name",
    "Last Name",
    "City",
    "Phone #",
    "Email",
    "Poll Worker Exp.",
    "Proficient in another language?",
];

pub const AVAILABILITY_HEADER: [&str; 7] =
    ["Last Name", "First Name", "VR #", "Precinct", "Role", "Yes", "No"];

/// Write a roster workbook with the given header cells and data rows.
/// Row layout: Notes, First, Last, City, Phone, Email, Experienced, Languages,
/// Location.
pub fn write_roster_workbook_with_header(path: &str, header: &[&str], rows: &[[&str; 9]]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, title) in header.iter().enumerate() {
        worksheet
            .write(0, col as u16, *title)
            .expect("write roster header");
    }
    for (i, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            worksheet
                .write((i + 1) as u32, col as u16, *value)
                .expect("write roster cell");
        }
    }
    workbook.save(path).expect("save roster workbook");
}

pub fn write_roster_workbook(path: &str, rows: &[[&str; 9]]) {
    write_roster_workbook_with_header(path, &ROSTER_HEADER, rows);
}

/// Write an availability workbook: one sheet per (name, rows) pair.
/// Row layout: Last, First, VR #, Precinct, Role, Yes, No.
pub fn write_availability_workbook(path: &str, sheets: &[(&str, Vec<[&str; 7]>)]) {
    write_availability_workbook_with_header(path, Some(AVAILABILITY_HEADER.as_slice()), sheets);
}

pub fn write_availability_workbook_with_header(
    path: &str,
    header: Option<&[&str]>,
    sheets: &[(&str, Vec<[&str; 7]>)],
) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).expect("sheet name");
        let mut next_row = 0u32;
        if let Some(titles) = header {
            for (col, title) in titles.iter().enumerate() {
                worksheet
                    .write(0, col as u16, *title)
                    .expect("write availability header");
            }
            next_row = 1;
        }
        for row in rows {
            for (col, value) in row.iter().enumerate() {
                worksheet
                    .write(next_row, col as u16, *value)
                    .expect("write availability cell");
            }
            next_row += 1;
        }
    }
    workbook.save(path).expect("save availability workbook");
}

pub fn read_sheet(path: &str, sheet: &str) -> Range<Data> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("open workbook");
    workbook.worksheet_range(sheet).expect("worksheet range")
}

pub fn sheet_names(path: &str) -> Vec<String> {
    let workbook: Xlsx<_> = open_workbook(path).expect("open workbook");
    workbook.sheet_names().to_owned()
}

pub fn cell_str(range: &Range<Data>, row: u32, col: u32) -> String {
    match range.get_value((row, col)) {
        Some(Data::String(s)) => s.clone(),
        Some(Data::Float(f)) if f.fract() == 0.0 => format!("{}", *f as i64),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Row index (0-based) of the first row whose `col` cell equals `value`.
pub fn find_row(range: &Range<Data>, col: u32, value: &str) -> Option<u32> {
    (0..range.height() as u32).find(|row| cell_str(range, *row, col) == value)
}
