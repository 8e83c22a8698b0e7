//! Error types for email delivery.

use thiserror::Error;

/// A single send (or provider probe) failed.
///
/// The display text is what ends up in a dispatch report next to the
/// recipient, so it always names the provider and carries the provider's own
/// error body when there is one.
#[derive(Debug, Error)]
pub enum SendError {
    /// The provider answered with a non-success status.
    #[error("{provider} API error: {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// The request never produced a response.
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl SendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }
}

/// No usable provider could be built. Raised before any send is attempted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProviderConfigError {
    #[error("No email provider configured. Set GMAIL_ACCESS_TOKEN, or RESEND_API_KEY and RESEND_FROM_EMAIL")]
    NoProviderConfigured,

    #[error("Invalid sender address: {0}")]
    InvalidSender(String),
}
