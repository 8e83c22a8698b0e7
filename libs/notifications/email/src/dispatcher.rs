//! BulkDispatcher - sends one personalized email per contact, one at a time
//!
//! Sends are strictly sequential: each one is awaited to completion before the
//! next starts, and a fixed pause separates consecutive attempts. With at most
//! one request in flight, that pause is the whole rate limiter.

use crate::error::SendError;
use crate::provider::{EmailProvider, SendResult};
use domain_contacts::Contact;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Pause between two consecutive send attempts
pub const DEFAULT_PACING: Duration = Duration::from_millis(100);

/// A recipient whose send failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryFailure {
    pub recipient: String,
    pub message: String,
}

/// Aggregated result of one bulk dispatch
///
/// `success_count + failure_count + skipped_count` always equals the number of
/// contacts submitted; `skipped_count` is non-zero only when a cancellable
/// dispatch was stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub success_count: usize,
    pub failure_count: usize,
    pub skipped_count: usize,
    pub failures: Vec<DeliveryFailure>,
}

impl DispatchOutcome {
    pub fn attempted(&self) -> usize {
        self.success_count + self.failure_count
    }

    pub fn total(&self) -> usize {
        self.attempted() + self.skipped_count
    }

    pub fn was_cancelled(&self) -> bool {
        self.skipped_count > 0
    }
}

/// Sends a batch of contacts through a single provider
pub struct BulkDispatcher<P: EmailProvider> {
    provider: P,
    pacing: Duration,
}

impl<P: EmailProvider> BulkDispatcher<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            pacing: DEFAULT_PACING,
        }
    }

    /// Override the pause between attempts
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    /// Send one email per contact, in order.
    ///
    /// A failed send is recorded against its recipient and the loop moves on;
    /// nothing a provider returns can stop the batch.
    pub async fn send_bulk<F>(&self, records: &[Contact], subject: &str, render_body: F) -> DispatchOutcome
    where
        F: Fn(&Contact) -> String,
    {
        self.run(records, subject, &render_body, None).await
    }

    /// Like [`send_bulk`](Self::send_bulk), but stops starting new sends once
    /// `shutdown` turns `true`.
    ///
    /// A send already in flight is awaited and accounted for. Contacts never
    /// attempted are counted in `skipped_count`.
    pub async fn send_bulk_until<F>(
        &self,
        records: &[Contact],
        subject: &str,
        render_body: F,
        shutdown: watch::Receiver<bool>,
    ) -> DispatchOutcome
    where
        F: Fn(&Contact) -> String,
    {
        self.run(records, subject, &render_body, Some(shutdown)).await
    }

    /// Send a single email; errors go straight back to the caller
    pub async fn send_single(&self, to: &str, subject: &str, html_body: &str) -> Result<SendResult, SendError> {
        self.provider.send(to, subject, html_body).await
    }

    #[instrument(
        skip_all,
        fields(provider = self.provider.name(), total = records.len())
    )]
    async fn run<F>(
        &self,
        records: &[Contact],
        subject: &str,
        render_body: &F,
        mut shutdown: Option<watch::Receiver<bool>>,
    ) -> DispatchOutcome
    where
        F: Fn(&Contact) -> String,
    {
        info!("Starting bulk email send to {} recipients", records.len());

        let mut outcome = DispatchOutcome::default();

        for (index, contact) in records.iter().enumerate() {
            if index > 0 {
                self.pause(shutdown.as_mut()).await;
            }

            if is_stopped(shutdown.as_ref()) {
                outcome.skipped_count = records.len() - index;
                warn!(skipped = outcome.skipped_count, "Bulk send stopped before completion");
                break;
            }

            let body = render_body(contact);
            match self.provider.send(contact.email(), subject, &body).await {
                Ok(result) => {
                    outcome.success_count += 1;
                    debug!(to = %contact.email(), message_id = ?result.message_id, "Email sent");
                }
                Err(err) => {
                    outcome.failure_count += 1;
                    warn!(to = %contact.email(), error = %err, "Email send failed");
                    outcome.failures.push(DeliveryFailure {
                        recipient: contact.email().to_string(),
                        message: err.to_string(),
                    });
                }
            }
        }

        info!(
            success = outcome.success_count,
            failed = outcome.failure_count,
            skipped = outcome.skipped_count,
            "Bulk send completed"
        );

        outcome
    }

    /// Wait out the pacing delay, returning early if shutdown is signalled
    async fn pause(&self, shutdown: Option<&mut watch::Receiver<bool>>) {
        if self.pacing.is_zero() {
            return;
        }

        match shutdown {
            Some(rx) => {
                tokio::select! {
                    _ = sleep(self.pacing) => {}
                    Ok(_) = rx.wait_for(|stop| *stop) => {}
                }
            }
            None => sleep(self.pacing).await,
        }
    }
}

fn is_stopped(shutdown: Option<&watch::Receiver<bool>>) -> bool {
    shutdown.is_some_and(|rx| *rx.borrow())
}
