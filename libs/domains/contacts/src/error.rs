use crate::columns::Field;
use thiserror::Error;

/// File-level failures. Any of these rejects the whole file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unsupported file format '{0}'. Only .xlsx, .xls and .csv files are accepted")]
    UnsupportedFormat(String),

    #[error("The spreadsheet does not contain any worksheets")]
    NoSheets,

    #[error("The first worksheet is empty")]
    EmptySheet,

    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("The file must contain a header row and at least one data row")]
    InsufficientRows,

    #[error("No {field} column found. Accepted columns: {list}", field = .0, list = .0.synonyms().join(", "))]
    MissingColumn(Field),
}

/// Why a single field value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("empty email")]
    EmptyEmail,

    #[error("invalid email ({0})")]
    InvalidEmail(String),

    #[error("empty name")]
    EmptyName,

    #[error("empty description")]
    EmptyDescription,
}

/// A rejected data row, numbered as it appears in the file (header is row 1).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Row {row}: {kind}")]
pub struct RowError {
    pub row: usize,
    pub kind: FieldError,
}
