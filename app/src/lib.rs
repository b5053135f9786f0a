//! # Lexdesk
//!
//! Process-level wiring of the Lexdesk client core: configuration, logging,
//! file-backed durable storage and startup.
//!
//! ```no_run
//! use lexdesk::{AppConfig, bootstrap, telemetry};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = AppConfig::from_env()?;
//! telemetry::init_tracing(&config.log_level)?;
//! let app = bootstrap(&config)?;
//! app.load_reference_data(config.timeout()).await?;
//! # Ok(())
//! # }
//! ```

/// Configuration
pub mod config;

/// Logging bootstrap
pub mod telemetry;

/// File-backed durable storage
pub mod storage;

/// In-process navigator
pub mod navigator;

/// Startup
pub mod bootstrap;

pub use bootstrap::{App, AppStore, BootstrapError, bootstrap, bootstrap_with};
pub use config::{AppConfig, ConfigError};
pub use navigator::MemoryNavigator;
pub use storage::{FileStorage, StorageError};
