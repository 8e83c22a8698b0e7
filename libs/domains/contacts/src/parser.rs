//! Format-agnostic entry point: picks a reader from the file extension and
//! runs the shared column/row pipeline.

use crate::columns::ColumnMapping;
use crate::error::ParseError;
use crate::models::{Contact, ParseOutcome};
use crate::readers::{RawTable, read_csv, read_spreadsheet};
use crate::validator::validate_rows;
use tracing::{info, instrument, warn};

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    /// `.xlsx` or `.xls`; the reader sniffs the actual container.
    Spreadsheet,
}

impl FileFormat {
    /// Detect the format from the text after the last `.` of the file name.
    pub fn from_file_name(file_name: &str) -> Result<Self, ParseError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or(file_name)
            .to_ascii_lowercase();

        match extension.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" | "xls" => Ok(FileFormat::Spreadsheet),
            _ => Err(ParseError::UnsupportedFormat(extension)),
        }
    }

    fn read(&self, bytes: &[u8]) -> Result<RawTable, ParseError> {
        match self {
            FileFormat::Csv => Ok(read_csv(bytes)),
            FileFormat::Spreadsheet => read_spreadsheet(bytes),
        }
    }
}

/// Parse an uploaded contact file.
///
/// Never fails: a rejected file yields no records and a diagnostic describing
/// why, after any reader diagnostics collected before the rejection.
#[instrument(skip(bytes), fields(size = bytes.len()))]
pub fn parse(bytes: &[u8], file_name: &str) -> ParseOutcome {
    let mut diagnostics = Vec::new();

    match parse_into(bytes, file_name, &mut diagnostics) {
        Ok(records) => ParseOutcome {
            records,
            diagnostics,
        },
        Err(err) => {
            warn!(error = %err, "Contact file rejected");
            diagnostics.push(err.to_string());
            ParseOutcome {
                records: Vec::new(),
                diagnostics,
            }
        }
    }
}

/// Like [`parse`], but surfaces a file-level rejection as a typed error.
pub fn try_parse(bytes: &[u8], file_name: &str) -> Result<ParseOutcome, ParseError> {
    let mut diagnostics = Vec::new();
    let records = parse_into(bytes, file_name, &mut diagnostics)?;

    Ok(ParseOutcome {
        records,
        diagnostics,
    })
}

fn parse_into(
    bytes: &[u8],
    file_name: &str,
    diagnostics: &mut Vec<String>,
) -> Result<Vec<Contact>, ParseError> {
    let format = FileFormat::from_file_name(file_name)?;
    let mut table = format.read(bytes)?;
    diagnostics.append(&mut table.diagnostics);

    let (header, data) = table.split_header()?;
    let mapping = ColumnMapping::resolve(header)?;
    let records = validate_rows(&mapping, data, diagnostics);

    info!(
        file = %file_name,
        valid = records.len(),
        diagnostics = diagnostics.len(),
        "Processed contact rows"
    );

    Ok(records)
}
