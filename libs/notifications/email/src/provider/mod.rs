//! Email provider implementations

pub mod gmail;
pub mod mock;
pub mod resend;

pub use gmail::GmailProvider;
pub use mock::{MockProvider, SentEmail};
pub use resend::ResendProvider;

use crate::error::SendError;
use async_trait::async_trait;
use reqwest::Response;
use serde::Deserialize;

/// Result of sending an email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResult {
    /// Provider-specific message ID, when the provider returned one
    pub message_id: Option<String>,
}

/// Trait for email providers
///
/// Implementations send exactly one HTML message per call and report any
/// non-success answer as a [`SendError`].
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send one HTML email
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<SendResult, SendError>;

    /// Check that the credential is accepted by the provider
    async fn health_check(&self) -> Result<(), SendError>;

    /// Get provider name
    fn name(&self) -> &'static str;
}

/// The provider chosen for one dispatch, picked once from the available
/// credentials.
pub enum Provider {
    /// OAuth mailbox API (Gmail)
    Mailbox(GmailProvider),
    /// Transactional email API (Resend)
    Transactional(ResendProvider),
}

#[async_trait]
impl EmailProvider for Provider {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<SendResult, SendError> {
        match self {
            Self::Mailbox(p) => p.send(to, subject, html_body).await,
            Self::Transactional(p) => p.send(to, subject, html_body).await,
        }
    }

    async fn health_check(&self) -> Result<(), SendError> {
        match self {
            Self::Mailbox(p) => p.health_check().await,
            Self::Transactional(p) => p.health_check().await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Mailbox(p) => p.name(),
            Self::Transactional(p) => p.name(),
        }
    }
}

/// Body both APIs return for an accepted message
#[derive(Debug, Deserialize)]
struct SentMessage {
    id: String,
}

/// Read the message id from an accepted response.
///
/// The status alone decides success; a body without an id only loses the id.
pub(crate) async fn accepted_message_id(provider: &'static str, response: Response) -> Option<String> {
    match response.json::<SentMessage>().await {
        Ok(sent) => Some(sent.id),
        Err(err) => {
            tracing::warn!(provider, error = %err, "Accepted response carried no message id");
            None
        }
    }
}

/// Turn a non-success response into [`SendError::Api`] carrying the body.
pub(crate) async fn error_for_status(
    provider: &'static str,
    response: Response,
) -> Result<Response, SendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::error!(provider, status = %status, error = %body, "Provider API error");

    Err(SendError::Api {
        provider,
        status: status.as_u16(),
        body,
    })
}
