//! Credential supply and provider selection.
//!
//! The dispatcher never looks credentials up itself: a caller hands it a
//! provider built from one ready-to-use [`Credentials`] value. Token refresh
//! is the supplier's business.

use crate::error::ProviderConfigError;
use crate::provider::{GmailProvider, Provider, ResendProvider};
use core_config::env_optional;
use domain_contacts::is_valid_email;
use std::fmt;
use tracing::info;

/// Sender used for Resend when `RESEND_FROM_EMAIL` is not set
pub const DEFAULT_FROM_EMAIL: &str = "noreply@yourdomain.com";

/// A credential for exactly one provider
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// OAuth2 bearer token for the user's mailbox
    Mailbox { access_token: String },
    /// Transactional API key plus the verified sender address
    Transactional { api_key: String, from_email: String },
}

// Keep secrets out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mailbox { .. } => f
                .debug_struct("Mailbox")
                .field("access_token", &"<redacted>")
                .finish(),
            Self::Transactional { from_email, .. } => f
                .debug_struct("Transactional")
                .field("api_key", &"<redacted>")
                .field("from_email", from_email)
                .finish(),
        }
    }
}

/// Yields a ready credential per dispatch request
pub trait CredentialSupplier {
    fn credentials(&self) -> Result<Credentials, ProviderConfigError>;
}

impl CredentialSupplier for Credentials {
    fn credentials(&self) -> Result<Credentials, ProviderConfigError> {
        Ok(self.clone())
    }
}

/// Reads credentials from the environment on every call
///
/// Precedence:
/// - `GMAIL_ACCESS_TOKEN` - mailbox provider
/// - `RESEND_API_KEY` + `RESEND_FROM_EMAIL` (optional) - transactional provider
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSupplier for EnvCredentials {
    fn credentials(&self) -> Result<Credentials, ProviderConfigError> {
        if let Some(access_token) = env_optional("GMAIL_ACCESS_TOKEN") {
            return Ok(Credentials::Mailbox { access_token });
        }

        if let Some(api_key) = env_optional("RESEND_API_KEY") {
            let from_email = env_optional("RESEND_FROM_EMAIL")
                .unwrap_or_else(|| DEFAULT_FROM_EMAIL.to_string());
            return Ok(Credentials::Transactional {
                api_key,
                from_email,
            });
        }

        Err(ProviderConfigError::NoProviderConfigured)
    }
}

impl Provider {
    /// Build the provider matching a credential
    pub fn from_credentials(credentials: Credentials) -> Result<Self, ProviderConfigError> {
        match credentials {
            Credentials::Mailbox { access_token } => {
                info!("Using Gmail provider");
                Ok(Provider::Mailbox(GmailProvider::new(access_token)))
            }
            Credentials::Transactional {
                api_key,
                from_email,
            } => {
                if !is_valid_email(&from_email) {
                    return Err(ProviderConfigError::InvalidSender(from_email));
                }
                info!(from = %from_email, "Using Resend provider");
                Ok(Provider::Transactional(ResendProvider::new(api_key, from_email)))
            }
        }
    }

    /// Ask a supplier for a credential and build the matching provider
    pub fn from_supplier(supplier: &impl CredentialSupplier) -> Result<Self, ProviderConfigError> {
        Self::from_credentials(supplier.credentials()?)
    }
}
