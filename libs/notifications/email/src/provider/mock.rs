//! Mock email provider for tests and dry runs

use super::{EmailProvider, SendResult};
use crate::error::SendError;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// An email captured by [`MockProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Mock provider that captures sent emails instead of delivering them
#[derive(Clone, Default)]
pub struct MockProvider {
    sent_emails: Arc<Mutex<Vec<SentEmail>>>,
    attempts: Arc<Mutex<Vec<String>>>,
    failing_recipients: HashSet<String>,
    failure_message: Option<String>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock provider that always fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure_message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Fail only for the given recipient
    pub fn fail_for(mut self, recipient: impl Into<String>) -> Self {
        self.failing_recipients.insert(recipient.into());
        self
    }

    /// Successfully sent emails, in send order
    pub async fn sent_emails(&self) -> Vec<SentEmail> {
        self.sent_emails.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent_emails.lock().await.len()
    }

    /// Every recipient a send was attempted for, including failures
    pub async fn attempts(&self) -> Vec<String> {
        self.attempts.lock().await.clone()
    }

    pub async fn was_sent_to(&self, email: &str) -> bool {
        self.sent_emails
            .lock()
            .await
            .iter()
            .any(|e| e.to == email)
    }

    fn failure_for(&self, to: &str) -> Option<SendError> {
        let body = match &self.failure_message {
            Some(message) => message.clone(),
            None if self.failing_recipients.contains(to) => format!("rejected recipient {}", to),
            None => return None,
        };

        Some(SendError::Api {
            provider: "Mock",
            status: 500,
            body,
        })
    }
}

#[async_trait]
impl EmailProvider for MockProvider {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<SendResult, SendError> {
        let attempt = {
            let mut attempts = self.attempts.lock().await;
            attempts.push(to.to_string());
            attempts.len()
        };

        if let Some(err) = self.failure_for(to) {
            return Err(err);
        }

        self.sent_emails.lock().await.push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });

        Ok(SendResult {
            message_id: Some(format!("mock-{}", attempt)),
        })
    }

    async fn health_check(&self) -> Result<(), SendError> {
        match &self.failure_message {
            Some(message) => Err(SendError::Api {
                provider: "Mock",
                status: 503,
                body: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
