//! Gmail mailbox provider
//!
//! Sends as the signed-in user through the Gmail REST API. The provider only
//! needs a valid OAuth2 access token with the `gmail.send` scope; obtaining
//! and refreshing that token happens outside this crate.

use crate::error::SendError;
use crate::provider::{accepted_message_id, error_for_status, EmailProvider, SendResult};
use async_trait::async_trait;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

const GMAIL_API_BASE: &str = "https://gmail.googleapis.com";
const SEND_PATH: &str = "/gmail/v1/users/me/messages/send";
const PROFILE_PATH: &str = "/gmail/v1/users/me/profile";
const PROVIDER: &str = "Gmail";

/// Gmail API provider authenticated with a bearer access token
pub struct GmailProvider {
    access_token: String,
    base_url: String,
    client: Client,
}

impl GmailProvider {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: GMAIL_API_BASE.to_string(),
            client: Client::new(),
        }
    }

    /// Point the provider at another API host (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the RFC 2822 message Gmail expects in the `raw` field
    pub fn build_raw_message(to: &str, subject: &str, html_body: &str) -> String {
        [
            format!("To: {}", to),
            format!("Subject: {}", encode_subject(subject)),
            "MIME-Version: 1.0".to_string(),
            "Content-Type: text/html; charset=UTF-8".to_string(),
            String::new(),
            html_body.to_string(),
        ]
        .join("\r\n")
    }
}

/// Encode a subject as a MIME encoded-word so non-ASCII text survives
pub fn encode_subject(subject: &str) -> String {
    format!("=?UTF-8?B?{}?=", STANDARD.encode(subject.as_bytes()))
}

/// Gmail API send request
#[derive(Debug, Serialize)]
struct GmailSendRequest {
    raw: String,
}

#[async_trait]
impl EmailProvider for GmailProvider {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<SendResult, SendError> {
        let raw_message = Self::build_raw_message(to, subject, html_body);
        let request = GmailSendRequest {
            raw: URL_SAFE_NO_PAD.encode(raw_message.as_bytes()),
        };

        debug!(to = %to, subject = %subject, "Sending email via Gmail");

        let response = self
            .client
            .post(format!("{}{}", self.base_url, SEND_PATH))
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|source| SendError::Transport {
                provider: PROVIDER,
                source,
            })?;

        let response = error_for_status(PROVIDER, response).await?;
        let message_id = accepted_message_id(PROVIDER, response).await;

        debug!(message_id = ?message_id, to = %to, "Email sent successfully via Gmail");

        Ok(SendResult { message_id })
    }

    async fn health_check(&self) -> Result<(), SendError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, PROFILE_PATH))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|source| SendError::Transport {
                provider: PROVIDER,
                source,
            })?;

        error_for_status(PROVIDER, response).await.map(|_| ())
    }

    fn name(&self) -> &'static str {
        "gmail"
    }
}
