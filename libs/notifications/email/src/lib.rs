//! Personalized bulk email delivery
//!
//! Takes validated contacts from `domain_contacts` and sends each one its own
//! HTML email through a single provider, pacing consecutive sends and
//! collecting per-recipient failures instead of aborting.
//!
//! ## Components
//!
//! - **Providers**: Gmail (OAuth mailbox), Resend (transactional API) and Mock
//! - **Credentials**: `CredentialSupplier` picks exactly one provider per dispatch
//! - **Templates**: `BodyTemplate` renders the default or a custom `{name}`/`{description}` body
//! - **Dispatcher**: `BulkDispatcher` runs the sequential, paced send loop
//!
//! ## Usage
//!
//! ```ignore
//! use email::{BodyTemplate, BulkDispatcher, EnvCredentials, Provider};
//!
//! let provider = Provider::from_supplier(&EnvCredentials)?;
//! let template = BodyTemplate::from_message(message.as_deref());
//! let outcome = BulkDispatcher::new(provider)
//!     .send_bulk(&parsed.records, "Your order", |c| template.render(c))
//!     .await;
//! println!("{} sent, {} failed", outcome.success_count, outcome.failure_count);
//! ```

pub mod credentials;
pub mod dispatcher;
pub mod error;
pub mod provider;
pub mod templates;

pub use credentials::{CredentialSupplier, Credentials, EnvCredentials, DEFAULT_FROM_EMAIL};
pub use dispatcher::{BulkDispatcher, DeliveryFailure, DispatchOutcome, DEFAULT_PACING};
pub use error::{ProviderConfigError, SendError};
pub use provider::{
    EmailProvider, GmailProvider, MockProvider, Provider, ResendProvider, SendResult, SentEmail,
};
pub use templates::{render_custom, render_default, BodyTemplate};
