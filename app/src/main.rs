//! Lexdesk client core.
//!
//! Loads configuration, rehydrates the session, refreshes the reference-data
//! caches and reports what it found.

use anyhow::Context;
use lexdesk::{AppConfig, bootstrap, telemetry};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;
    telemetry::init_tracing(&config.log_level).context("installing tracing subscriber")?;

    info!(
        api = %config.api.base_url,
        storage = %config.storage.path.display(),
        "Starting Lexdesk client core"
    );

    let app = bootstrap(&config).context("bootstrapping client")?;

    if let Err(error) = app.load_reference_data(config.timeout() * 2).await {
        warn!(error = %error, "Reference data did not settle in time");
    }

    let (auth, reference) = app
        .store
        .state(|s| (s.auth.clone(), s.reference.clone()))
        .await;

    info!(
        authenticated = auth.is_authenticated(),
        user = auth.user.as_ref().and_then(|u| u.name.as_deref()).unwrap_or("-"),
        permissions = auth.permissions.len(),
        timezones = reference.timezones.items().len(),
        job_titles = reference.job_titles.items().len(),
        countries = reference.countries.items().len(),
        "Session ready"
    );

    for (name, list) in [
        ("timezones", &reference.timezones),
        ("job_titles", &reference.job_titles),
        ("countries", &reference.countries),
    ] {
        if let Some(error) = &list.error {
            warn!(list = name, error = %error, "Reference list failed to load");
        }
    }

    Ok(())
}
