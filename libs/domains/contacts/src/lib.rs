//! Contacts Domain
//!
//! Turns an uploaded contact list (CSV or Excel) into an ordered list of
//! validated [`Contact`] records ready for a mail merge.
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────┐
//! │ file bytes   │  ← .csv / .xlsx / .xls
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │   readers    │  ← format-specific, normalize to string rows
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │   columns    │  ← header synonyms → email / name / description
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │  validator   │  ← per-row checks, diagnostics never abort the batch
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │ ParseOutcome │  ← records + diagnostics
//! └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! let csv = b"email,name,description\nada@example.com,Ada,Welcome aboard";
//! let outcome = domain_contacts::parse(csv, "contacts.csv");
//!
//! assert_eq!(outcome.records.len(), 1);
//! assert!(outcome.diagnostics.is_empty());
//! ```

pub mod columns;
pub mod error;
pub mod models;
pub mod parser;
mod readers;
pub mod validator;

// Re-export commonly used types
pub use columns::{ColumnMapping, Field};
pub use error::{FieldError, ParseError, RowError};
pub use models::{Contact, ParseOutcome};
pub use parser::{FileFormat, parse, try_parse};
pub use validator::{is_valid_email, process};
