//! Bulk Sender
//!
//! Reads a CSV or Excel contact list and sends each contact a personalized
//! email through Gmail or Resend, one message at a time.

use clap::{Parser, Subcommand};
use color_eyre::{Section, SectionExt};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use domain_contacts::{is_valid_email, Contact, ParseOutcome};
use email::{
    render_default, BodyTemplate, BulkDispatcher, DispatchOutcome, EmailProvider, EnvCredentials,
    MockProvider, Provider,
};
use eyre::{bail, Result, WrapErr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

mod config;
mod report;

use config::SenderConfig;
use report::SendReport;

const CREDENTIALS_HINT: &str =
    "Set GMAIL_ACCESS_TOKEN, or RESEND_API_KEY and RESEND_FROM_EMAIL";

#[derive(Parser)]
#[command(name = "bulk-sender")]
#[command(about = "Send personalized emails to every contact in a CSV or Excel file")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a contact file and show what would be sent
    Preview {
        /// Contact list (.csv, .xlsx or .xls)
        #[arg(short, long)]
        file: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send one email per valid contact
    Send {
        /// Contact list (.csv, .xlsx or .xls)
        #[arg(short, long)]
        file: PathBuf,

        /// Subject line shared by every email
        #[arg(short, long)]
        subject: String,

        /// Custom body; `{name}` and `{description}` are replaced per contact
        #[arg(short, long)]
        message: Option<String>,

        /// Pause between sends in milliseconds (overrides BULK_SENDER_PACING_MS)
        #[arg(long)]
        pacing_ms: Option<u64>,

        /// Render every email but deliver nothing
        #[arg(long)]
        dry_run: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send a single test email with sample data
    Test {
        /// Recipient address
        #[arg(short, long)]
        to: String,

        #[arg(short, long, default_value = "Test email")]
        subject: String,
    },

    /// Verify that a provider is configured and accepts its credential
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let environment = Environment::from_env();
    init_tracing(&environment);

    let config = SenderConfig::from_env().wrap_err("Invalid sender configuration")?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Preview { file, json } => {
            let parsed = parse_file(&file).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&parsed)?);
            } else {
                print!("{}", report::parse_summary(&parsed));
            }
        }

        Commands::Send {
            file,
            subject,
            message,
            pacing_ms,
            dry_run,
            json,
        } => {
            let subject = subject.trim();
            if subject.is_empty() {
                bail!("Subject is required");
            }

            let parsed = parse_file(&file).await?;
            for diagnostic in &parsed.diagnostics {
                warn!("{}", diagnostic);
            }
            if parsed.records.is_empty() {
                return Err(eyre::eyre!("No valid records found in {}", file.display()))
                    .with_section(|| parsed.diagnostics.join("\n").header("Diagnostics:"));
            }

            let template = BodyTemplate::from_message(message.as_deref());
            let pacing = config.pacing_override(pacing_ms);

            let (provider_name, outcome) = if dry_run {
                let provider = MockProvider::new();
                let name = provider.name();
                (name, dispatch(provider, &parsed, subject, &template, pacing).await)
            } else {
                let provider = configured_provider()?;
                let name = provider.name();
                (name, dispatch(provider, &parsed, subject, &template, pacing).await)
            };

            let file_name = file.display().to_string();
            let send_report = SendReport {
                file: &file_name,
                provider: provider_name,
                dry_run,
                diagnostics: &parsed.diagnostics,
                outcome: &outcome,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&send_report)?);
            } else {
                print!("{}", report::send_summary(&send_report));
            }
        }

        Commands::Test { to, subject } => {
            let to = to.trim();
            if !is_valid_email(to) {
                bail!("Invalid email address: {}", to);
            }

            let sample = Contact::new(to, "Test User", "This is a test email from the bulk sender.")?;
            let provider = configured_provider()?;
            let result = BulkDispatcher::new(provider)
                .send_single(sample.email(), &subject, &render_default(&sample))
                .await
                .wrap_err_with(|| format!("Failed to send test email to {}", to))?;

            match result.message_id {
                Some(id) => println!("Test email sent to {} (message id {})", to, id),
                None => println!("Test email sent to {}", to),
            }
        }

        Commands::Check => {
            let provider = configured_provider()?;
            provider
                .health_check()
                .await
                .wrap_err_with(|| format!("{} rejected the configured credential", provider.name()))?;

            println!("{} provider is configured and reachable", provider.name());
        }
    }

    Ok(())
}

async fn parse_file(path: &Path) -> Result<ParseOutcome> {
    let bytes = tokio::fs::read(path)
        .await
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(domain_contacts::parse(&bytes, &file_name))
}

fn configured_provider() -> Result<Provider> {
    Provider::from_supplier(&EnvCredentials)
        .wrap_err("Email provider is not available")
        .suggestion(CREDENTIALS_HINT)
}

/// Run a cancellable dispatch; Ctrl+C or SIGTERM stops before the next send.
async fn dispatch<P: EmailProvider>(
    provider: P,
    parsed: &ParseOutcome,
    subject: &str,
    template: &BodyTemplate,
    pacing: Duration,
) -> DispatchOutcome {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let signal_task = tokio::spawn(async move {
        if let Err(e) = shutdown_signal().await {
            error!("Error waiting for shutdown signal: {}", e);
            return;
        }
        let _ = shutdown_tx.send(true);
    });

    let outcome = BulkDispatcher::new(provider)
        .with_pacing(pacing)
        .send_bulk_until(&parsed.records, subject, |c| template.render(c), shutdown_rx)
        .await;

    signal_task.abort();
    outcome
}

async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = signal::ctrl_c() => {
                result?;
                info!("Received Ctrl+C, stopping after the current send...");
            }
            _ = terminate.recv() => {
                info!("Received SIGTERM, stopping after the current send...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await?;
        info!("Received Ctrl+C, stopping after the current send...");
    }

    Ok(())
}
