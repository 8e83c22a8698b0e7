//! Header inference: maps arbitrary header names onto the three fields a
//! contact needs.

use crate::error::ParseError;
use serde::Serialize;
use std::fmt;

/// A semantic column of the contact sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Email,
    Name,
    Description,
}

impl Field {
    /// Resolution order when checking for missing columns.
    pub const ALL: [Field; 3] = [Field::Email, Field::Name, Field::Description];

    /// Header substrings accepted for this field, in priority order.
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Field::Email => &["email", "correo", "e-mail", "mail"],
            Field::Name => &["name", "nombre", "full name", "fullname"],
            Field::Description => &["description", "descripcion", "desc", "message", "mensaje"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Name => "name",
            Field::Description => "description",
        }
    }

    /// Index of the first header containing one of the synonyms.
    ///
    /// Synonyms are tried in order and the first one that matches any header
    /// wins, so `"email"` beats `"mail"` even when the `"mail"` header comes
    /// first.
    fn locate(&self, headers: &[String]) -> Option<usize> {
        self.synonyms()
            .iter()
            .find_map(|synonym| headers.iter().position(|header| header.contains(synonym)))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column index of each field within a data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub email: usize,
    pub name: usize,
    pub description: usize,
}

impl ColumnMapping {
    /// Resolve the mapping from a raw header row.
    ///
    /// Header cells are lowercased and trimmed before matching. The first
    /// unresolved field, checked in [`Field::ALL`] order, is reported.
    pub fn resolve<S: AsRef<str>>(header_row: &[S]) -> Result<Self, ParseError> {
        let headers: Vec<String> = header_row.iter().map(|h| normalize_header(h.as_ref())).collect();

        let mut indices = [0usize; 3];
        for (slot, field) in indices.iter_mut().zip(Field::ALL) {
            *slot = field
                .locate(&headers)
                .ok_or(ParseError::MissingColumn(field))?;
        }

        let [email, name, description] = indices;
        Ok(Self {
            email,
            name,
            description,
        })
    }

    pub fn index_of(&self, field: Field) -> usize {
        match field {
            Field::Email => self.email,
            Field::Name => self.name,
            Field::Description => self.description,
        }
    }
}

fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}
