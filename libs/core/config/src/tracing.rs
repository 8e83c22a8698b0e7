use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Default directives when `RUST_LOG` is unset
const PRODUCTION_FILTER: &str = "warn";
const DEVELOPMENT_FILTER: &str = "info,email=debug,domain_contacts=debug,bulk_sender=debug";

/// Install color-eyre with a project-standard configuration.
///
/// Call this early in main() before any fallible operations. Safe to call
/// multiple times.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Filter directives for an environment, ignoring `RUST_LOG`
pub fn default_directives(environment: &Environment) -> &'static str {
    if environment.is_production() {
        PRODUCTION_FILTER
    } else {
        DEVELOPMENT_FILTER
    }
}

/// Initialize tracing with environment-aware output and error span capture.
///
/// - **Production** (`APP_ENV=production`): JSON lines, flattened events,
///   `warn` by default.
/// - **Development** (default): pretty output, `info` by default with the
///   mailing crates at `debug`.
///
/// `RUST_LOG` overrides the default filter in both modes. Logs go to stderr so
/// that command output on stdout stays machine-readable.
///
/// Repeated calls are ignored.
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(environment)));

    let registry = tracing_subscriber::registry()
        .with(tracing_error::ErrorLayer::default())
        .with(filter);

    let initialized = if environment.is_production() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .flatten_event(true),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .try_init()
    }
    .is_ok();

    if initialized {
        info!(environment = ?environment, "Tracing initialized");
    } else {
        debug!("Tracing already initialized");
    }
}
