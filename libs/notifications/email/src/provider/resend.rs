//! Resend transactional provider
//!
//! Sends emails via the Resend HTTP API from a fixed, verified sender address.

use crate::error::SendError;
use crate::provider::{accepted_message_id, error_for_status, EmailProvider, SendResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

/// Resend API endpoint
const RESEND_API_BASE: &str = "https://api.resend.com";
const PROVIDER: &str = "Resend";

/// Resend email provider
pub struct ResendProvider {
    api_key: String,
    from_email: String,
    base_url: String,
    client: Client,
}

impl ResendProvider {
    pub fn new(api_key: impl Into<String>, from_email: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            from_email: from_email.into(),
            base_url: RESEND_API_BASE.to_string(),
            client: Client::new(),
        }
    }

    /// Point the provider at another API host (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn from_email(&self) -> &str {
        &self.from_email
    }

    fn emails_url(&self) -> String {
        format!("{}/emails", self.base_url)
    }
}

/// Resend API request payload
#[derive(Debug, Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[async_trait]
impl EmailProvider for ResendProvider {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<SendResult, SendError> {
        let request = ResendRequest {
            from: &self.from_email,
            to: [to],
            subject,
            html: html_body,
        };

        debug!(to = %to, subject = %subject, "Sending email via Resend");

        let response = self
            .client
            .post(self.emails_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| SendError::Transport {
                provider: PROVIDER,
                source,
            })?;

        let response = error_for_status(PROVIDER, response).await?;
        let message_id = accepted_message_id(PROVIDER, response).await;

        debug!(message_id = ?message_id, to = %to, "Email sent successfully via Resend");

        Ok(SendResult { message_id })
    }

    async fn health_check(&self) -> Result<(), SendError> {
        let response = self
            .client
            .get(self.emails_url())
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|source| SendError::Transport {
                provider: PROVIDER,
                source,
            })?;

        error_for_status(PROVIDER, response).await.map(|_| ())
    }

    fn name(&self) -> &'static str {
        "resend"
    }
}
