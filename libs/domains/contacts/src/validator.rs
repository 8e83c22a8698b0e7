//! Row validation: applies a [`ColumnMapping`] to each data row and keeps the
//! rows that form a valid [`Contact`].

use crate::columns::ColumnMapping;
use crate::error::RowError;
use crate::models::{Contact, ParseOutcome};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// `local@domain.tld`, no whitespace, exactly one `@`.
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Offset between a data row's index and its row number in the file.
const FIRST_DATA_ROW: usize = 2;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// Resolve the header row and validate every data row.
///
/// A header that lacks one of the required fields rejects the whole file.
/// Otherwise invalid rows are skipped with one diagnostic each and valid rows
/// keep their file order.
pub fn process<H, R>(header_row: &[H], data_rows: &[R]) -> ParseOutcome
where
    H: AsRef<str>,
    R: AsRef<[String]>,
{
    match ColumnMapping::resolve(header_row) {
        Ok(mapping) => {
            let mut diagnostics = Vec::new();
            let numbered = data_rows
                .iter()
                .enumerate()
                .map(|(index, row)| (index + FIRST_DATA_ROW, row));
            let records = validate_rows(&mapping, numbered, &mut diagnostics);
            ParseOutcome {
                records,
                diagnostics,
            }
        }
        Err(err) => ParseOutcome::rejected(&err),
    }
}

/// Validate `(row number, cells)` pairs against a resolved mapping, appending
/// one diagnostic per rejected row.
pub(crate) fn validate_rows<I, R>(
    mapping: &ColumnMapping,
    rows: I,
    diagnostics: &mut Vec<String>,
) -> Vec<Contact>
where
    I: IntoIterator<Item = (usize, R)>,
    R: AsRef<[String]>,
{
    let rows = rows.into_iter();
    let mut records = Vec::with_capacity(rows.size_hint().0);

    for (row_number, row) in rows {
        match validate_row(mapping, row.as_ref(), row_number) {
            Ok(contact) => records.push(contact),
            Err(err) => {
                debug!(row = err.row, reason = %err.kind, "Skipping contact row");
                diagnostics.push(err.to_string());
            }
        }
    }

    records
}

fn validate_row(mapping: &ColumnMapping, row: &[String], row_number: usize) -> Result<Contact, RowError> {
    let cell = |index: usize| row.get(index).map(String::as_str).unwrap_or_default();

    Contact::new(
        cell(mapping.email),
        cell(mapping.name),
        cell(mapping.description),
    )
    .map_err(|kind| RowError {
        row: row_number,
        kind,
    })
}
