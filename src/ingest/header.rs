//! First-row schema validation.
//!
//! A matching header row is consumed and yields the style hint used to stamp
//! the report's header rows. A mismatch is not an error: the row's literal
//! contents are reported and row 0 is re-scanned as ordinary data, since the
//! column positions may still be usable.

use crate::ingest::sheet::{SheetSpec, cell_equals, raw_row};
use crate::ui::messages::warning;

/// Header styling carried from a validated input sheet to the report writer.
/// The tabular reader does not expose cell formatting, so a validated header
/// yields the standard survey palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderStyle {
    pub bold: bool,
    pub font_color: u32,
    pub fill_color: u32,
}

impl HeaderStyle {
    pub fn survey() -> Self {
        HeaderStyle {
            bold: true,
            font_color: 0xFFFFFF,
            fill_color: 0x2F75B5,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum HeaderCheck {
    /// Row 0 matched the schema: treat it as consumed, not data.
    Consumed(HeaderStyle),
    /// Row 0 did not match: treat it as an ordinary data row.
    DataRow,
}

pub fn validate_header(row: &[calamine::Data], schema: &SheetSpec) -> HeaderCheck {
    let matches = schema
        .columns
        .iter()
        .enumerate()
        .all(|(i, title)| cell_equals(row, schema.header_offset + i, title));
    if matches {
        HeaderCheck::Consumed(HeaderStyle::survey())
    } else {
        warning(format!(
            "Incorrect header order/missing headers:\n{}",
            raw_row(row, schema.width())
        ));
        HeaderCheck::DataRow
    }
}
