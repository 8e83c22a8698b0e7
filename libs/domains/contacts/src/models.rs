use crate::error::{FieldError, ParseError};
use crate::validator::is_valid_email;
use serde::Serialize;

/// One recipient that passed every row-level check.
///
/// Fields are trimmed and non-empty, and the email has a `local@domain.tld`
/// shape. The only way to obtain a `Contact` is through validation, so
/// downstream code can rely on these guarantees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Contact {
    email: String,
    name: String,
    description: String,
}

impl Contact {
    /// Validate and build a contact. Values are trimmed first.
    ///
    /// Checks run in the order email, name, description and the first failure
    /// is returned.
    pub fn new(
        email: impl AsRef<str>,
        name: impl AsRef<str>,
        description: impl AsRef<str>,
    ) -> Result<Self, FieldError> {
        let email = email.as_ref().trim();
        let name = name.as_ref().trim();
        let description = description.as_ref().trim();

        if email.is_empty() {
            return Err(FieldError::EmptyEmail);
        }
        if !is_valid_email(email) {
            return Err(FieldError::InvalidEmail(email.to_string()));
        }
        if name.is_empty() {
            return Err(FieldError::EmptyName);
        }
        if description.is_empty() {
            return Err(FieldError::EmptyDescription);
        }

        Ok(Self {
            email: email.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Result of parsing a contact file.
///
/// `diagnostics` are advisory: they describe skipped rows and reader problems
/// but never remove valid rows from `records`. No records together with at
/// least one diagnostic means the file was rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseOutcome {
    pub records: Vec<Contact>,
    pub diagnostics: Vec<String>,
}

impl ParseOutcome {
    /// Outcome for a file rejected as a whole.
    pub fn rejected(error: &ParseError) -> Self {
        Self {
            records: Vec::new(),
            diagnostics: vec![error.to_string()],
        }
    }

    pub fn is_total_failure(&self) -> bool {
        self.records.is_empty() && !self.diagnostics.is_empty()
    }
}
