//! Sheet-role descriptors and cell readers.
//!
//! Roster and availability sheets run through the same pipeline; a `SheetSpec`
//! value carries everything that differs between the two roles.

use crate::models::Precinct;
use calamine::Data;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKind {
    Roster,
    Availability,
}

/// Fixed column schema for one sheet role. `header_offset` is the column the
/// first expected title sits in (the roster sheet keeps an unlabeled Notes
/// column at index 0).
#[derive(Debug, Clone, Copy)]
pub struct SheetSpec {
    pub kind: SheetKind,
    pub columns: &'static [&'static str],
    pub header_offset: usize,
}

pub const ROSTER_SHEET: SheetSpec = SheetSpec {
    kind: SheetKind::Roster,
    columns: &[
        "First Name",
        "Last Name",
        "City",
        "Phone #",
        "Email",
        "Poll Worker Exp.",
        "Proficient in another language?",
    ],
    header_offset: 1,
};

pub const AVAILABILITY_SHEET: SheetSpec = SheetSpec {
    kind: SheetKind::Availability,
    columns: &["Last Name", "First Name", "VR #", "Precinct", "Role", "Yes", "No"],
    header_offset: 0,
};

impl SheetSpec {
    /// Total number of leading columns covered by the schema.
    pub fn width(&self) -> usize {
        self.header_offset + self.columns.len()
    }
}

/// Re-anchor a row at column 0. The reader's used range starts at the first
/// non-empty cell, but all schema positions are absolute.
pub fn pad_columns(cells: &[Data], offset: usize) -> Cow<'_, [Data]> {
    if offset == 0 {
        Cow::Borrowed(cells)
    } else {
        let mut out = vec![Data::Empty; offset];
        out.extend_from_slice(cells);
        Cow::Owned(out)
    }
}

/// Cell value as trimmed text. Numeric cells are stringified the way they were
/// typed (no trailing `.0` on whole numbers).
pub fn cell_text(row: &[Data], idx: usize) -> String {
    match row.get(idx) {
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Float(f)) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Trimmed cell text, `None` when the cell is blank or missing.
pub fn cell_opt(row: &[Data], idx: usize) -> Option<String> {
    let text = cell_text(row, idx);
    if text.is_empty() { None } else { Some(text) }
}

/// Exact string comparison against an expected header title.
pub fn cell_equals(row: &[Data], idx: usize, expected: &str) -> bool {
    matches!(row.get(idx), Some(Data::String(s)) if s == expected)
}

/// The row's literal cell values joined for diagnostics.
pub fn raw_row(row: &[Data], cols: usize) -> String {
    (0..cols)
        .map(|i| cell_text(row, i))
        .collect::<Vec<_>>()
        .join(",")
}

fn precinct_cell(row: &[Data], idx: usize) -> Option<Precinct> {
    match row.get(idx) {
        Some(Data::Float(f)) => Some(Precinct::Number(*f as i64)),
        Some(Data::Int(i)) => Some(Precinct::Number(*i)),
        Some(Data::String(s)) => Precinct::parse(s),
        _ => None,
    }
}

/// One parsed roster row. Column positions follow the roster schema; the raw
/// joined cell values ride along for diagnostics.
#[derive(Debug, Clone)]
pub struct RosterRow {
    pub notes: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub experienced: bool,
    pub languages: Option<String>,
    pub location: Option<String>,
    pub raw: String,
}

impl RosterRow {
    pub fn parse(cells: &[Data]) -> Self {
        RosterRow {
            notes: cell_opt(cells, 0),
            first_name: cell_text(cells, 1),
            last_name: cell_text(cells, 2),
            city: cell_opt(cells, 3),
            phone: cell_opt(cells, 4),
            email: parse_email(&cell_text(cells, 5)),
            experienced: cell_text(cells, 6).eq_ignore_ascii_case("Yes"),
            languages: parse_languages(&cell_text(cells, 7)),
            location: cell_opt(cells, 8),
            raw: raw_row(cells, 9),
        }
    }
}

/// An address is kept only when it looks like one.
fn parse_email(cell: &str) -> Option<String> {
    if cell.contains('@') {
        Some(cell.to_string())
    } else {
        None
    }
}

/// The survey asks "Proficient in another language?"; answers look like
/// "Yes (Spanish)". Anything that does not open with "Yes" means no.
fn parse_languages(cell: &str) -> Option<String> {
    if !cell.starts_with("Yes") {
        return None;
    }
    match (cell.find('('), cell.find(')')) {
        (Some(open), Some(close)) if close > open => {
            Some(cell[open + 1..close].trim().to_string())
        }
        // Language not supplied
        _ => Some(cell.to_string()),
    }
}

/// One parsed availability row.
#[derive(Debug, Clone)]
pub struct AvailabilityRow {
    pub last_name: String,
    pub first_name: String,
    pub vr_id: String,
    pub precinct: Option<Precinct>,
    pub role: Option<String>,
    pub yes: String,
    pub no: String,
    pub raw: String,
}

impl AvailabilityRow {
    pub fn parse(cells: &[Data]) -> Self {
        AvailabilityRow {
            last_name: cell_text(cells, 0),
            first_name: cell_text(cells, 1),
            vr_id: cell_text(cells, 2),
            precinct: precinct_cell(cells, 3),
            role: cell_opt(cells, 4),
            yes: cell_text(cells, 5),
            no: cell_text(cells, 6),
            raw: raw_row(cells, 7),
        }
    }

    /// Nothing usable in the row at all.
    pub fn is_blank(&self) -> bool {
        self.last_name.is_empty() && self.first_name.is_empty() && self.vr_id.is_empty()
    }
}
