//! Format-specific readers. Both produce a [`RawTable`] of string cells so
//! the rest of the pipeline never sees the file format.

use crate::error::ParseError;
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use csv::{Position, ReaderBuilder};
use std::io::Cursor;
use tracing::{debug, warn};

/// Rows as read from the file, header first, plus non-fatal reader problems.
///
/// `row_numbers[i]` is the 1-based position of `rows[i]` in the source file,
/// so diagnostics stay correct when the reader drops blank lines.
#[derive(Debug, Default)]
pub(crate) struct RawTable {
    pub rows: Vec<Vec<String>>,
    pub row_numbers: Vec<usize>,
    pub diagnostics: Vec<String>,
}

/// Data rows paired with their file row number.
pub(crate) type NumberedRows<'a> = Vec<(usize, &'a [String])>;

impl RawTable {
    fn push_row(&mut self, row_number: usize, cells: Vec<String>) {
        self.row_numbers.push(row_number);
        self.rows.push(cells);
    }

    fn next_row_number(&self) -> usize {
        self.row_numbers.last().map_or(1, |last| last + 1)
    }

    /// Pad every row with empty cells up to the widest row.
    pub fn into_rectangular(mut self) -> Self {
        let width = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
        self
    }

    /// Split into header and numbered data rows; at least one data row is required.
    pub fn split_header(&self) -> Result<(&[String], NumberedRows<'_>), ParseError> {
        match self.rows.split_first() {
            Some((header, data)) if !data.is_empty() => {
                let numbered = self.row_numbers[1..]
                    .iter()
                    .copied()
                    .zip(data.iter().map(Vec::as_slice))
                    .collect();
                Ok((header.as_slice(), numbered))
            }
            _ => Err(ParseError::InsufficientRows),
        }
    }
}

/// Read comma-separated text.
///
/// Rows may have different lengths. A record that cannot be decoded is
/// reported as a diagnostic and skipped; reading continues with the next one.
/// Blank lines are dropped but still count toward row numbers.
pub(crate) fn read_csv(bytes: &[u8]) -> RawTable {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut table = RawTable::default();
    for result in reader.records() {
        match result {
            Ok(record) => {
                let row_number = record
                    .position()
                    .map_or_else(|| table.next_row_number(), |pos| record_line(bytes, pos));
                table.push_row(row_number, record.iter().map(str::to_string).collect());
            }
            Err(err) => {
                warn!(error = %err, "Skipping unreadable CSV record");
                table.diagnostics.push(format!("CSV error: {}", err));
            }
        }
    }

    debug!(rows = table.rows.len(), "Read CSV file");
    table.into_rectangular()
}

/// Line on which a record starts.
///
/// A record's position is taken before the reader skips the blank lines in
/// front of it, so those are counted here.
fn record_line(bytes: &[u8], position: &Position) -> usize {
    let start = usize::try_from(position.byte()).unwrap_or(usize::MAX);
    let skipped = bytes
        .get(start..)
        .unwrap_or_default()
        .iter()
        .take_while(|b| matches!(b, b'\r' | b'\n'))
        .filter(|b| **b == b'\n')
        .count();

    position.line() as usize + skipped
}

/// Read the first worksheet of an Excel workbook (.xlsx or legacy .xls).
///
/// The container format is detected from the bytes, not the file name.
pub(crate) fn read_spreadsheet(bytes: &[u8]) -> Result<RawTable, ParseError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ParseError::Spreadsheet(e.to_string()))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ParseError::NoSheets)?;

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| ParseError::Spreadsheet(e.to_string()))?;

    // The used range may begin below row 1 when leading rows are blank.
    let first_row = range.start().map_or(1, |(row, _)| row as usize + 1);

    let mut table = RawTable::default();
    for (offset, row) in range.rows().enumerate() {
        table.push_row(first_row + offset, row.iter().map(cell_text).collect());
    }

    if table.rows.is_empty() {
        return Err(ParseError::EmptySheet);
    }

    debug!(sheet = %sheet, rows = table.rows.len(), "Read worksheet");
    Ok(table.into_rectangular())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
