//! Logging bootstrap.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset: `level` for the lexdesk crates,
/// `warn` for everything else.
#[must_use]
pub fn default_filter(level: &str) -> String {
    [
        "lexdesk",
        "lexdesk_runtime",
        "lexdesk_http",
        "lexdesk_services",
        "lexdesk_store",
        "lexdesk_table",
        "lexdesk_forms",
    ]
    .iter()
    .fold("warn".to_string(), |filter, krate| format!("{filter},{krate}={level}"))
}

/// Install the global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over `level`.
///
/// # Errors
///
/// Returns [`TryInitError`] if a global subscriber is already installed.
pub fn init_tracing(level: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(level))))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
}
