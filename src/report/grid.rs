//! Calendar-window arithmetic for the report sheets.

use chrono::NaiveDate;

/// One reporting window, days inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: u32,
    pub end: u32,
}

impl Window {
    pub fn label(&self, month: u32) -> String {
        format!("{} {}-{}", month_abbrev(month), self.start, self.end)
    }

    pub fn days(&self) -> std::ops::RangeInclusive<u32> {
        self.start..=self.end
    }

    pub fn day_count(&self) -> u32 {
        self.end - self.start + 1
    }
}

/// Partition the reporting window into consecutive weekly windows; the last
/// one truncates at `last`.
pub fn weekly_windows(first: u32, last: u32, week_length: u32) -> Vec<Window> {
    let mut out = Vec::new();
    let mut start = first;
    while start <= last {
        out.push(Window {
            start,
            end: (start + week_length - 1).min(last),
        });
        start += week_length;
    }
    out
}

/// Column of the "available" mark for a day: offset from the window start,
/// shifted past the leading identity columns.
pub fn day_column(day: u32, window_start: u32, identity_columns: u16) -> u16 {
    (day - window_start) as u16 + identity_columns
}

/// Calendar dates covered by a window, as a half-open `[start, end)` range.
pub fn window_dates(window: &Window, year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, window.start)?;
    let end = NaiveDate::from_ymd_opt(year, month, window.end)?.succ_opt()?;
    Some((start, end))
}

pub fn month_abbrev(month: u32) -> String {
    match NaiveDate::from_ymd_opt(2000, month, 1) {
        Some(d) => d.format("%b").to_string(),
        None => month.to_string(),
    }
}
