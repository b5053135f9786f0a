//! Startup: storage, rehydration, HTTP client and the store runtime.

use crate::config::AppConfig;
use crate::navigator::MemoryNavigator;
use crate::storage::{FileStorage, StorageError};
use lexdesk_core::{DurableStorage, Navigator};
use lexdesk_http::{ApiError, HttpClient};
use lexdesk_runtime::Store;
use lexdesk_services::ReferenceKind;
use lexdesk_store::{
    AppAction, AppEnvironment, AppState, HttpReferenceSource, ReferenceAction, RootReducer,
    rehydrate, root_reducer,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// The application store
pub type AppStore = Store<AppState, AppAction, AppEnvironment, RootReducer>;

/// Errors during startup
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Durable storage could not be opened
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] ApiError),
}

/// A running client core.
#[derive(Clone)]
pub struct App {
    /// Application store
    pub store: AppStore,
    /// Authenticated HTTP client
    pub client: HttpClient,
    /// Durable storage
    pub storage: Arc<dyn DurableStorage>,
    /// Navigation surface
    pub navigator: Arc<dyn Navigator>,
}

impl App {
    /// Fetch every reference list and wait for all of them to settle.
    ///
    /// # Errors
    ///
    /// Returns [`lexdesk_runtime::StoreError`] if a fetch does not settle
    /// within `timeout`.
    pub async fn load_reference_data(&self, timeout: Duration) -> Result<(), lexdesk_runtime::StoreError> {
        let mut handles = Vec::with_capacity(ReferenceKind::ALL.len());
        for kind in ReferenceKind::ALL {
            handles.push(
                self.store
                    .send(AppAction::Reference(ReferenceAction::Fetch(kind)))
                    .await,
            );
        }
        for handle in &mut handles {
            handle.wait_with_timeout(timeout).await?;
        }
        Ok(())
    }
}

/// Build the client core from `config`.
///
/// Opens durable storage, rehydrates the persisted state (falling back to the
/// initial state), and wires the HTTP client so that a 401 anywhere also
/// clears the session in the store. Must be called inside a Tokio runtime.
///
/// # Errors
///
/// Returns [`BootstrapError`] if storage cannot be opened or the HTTP client
/// cannot be built.
pub fn bootstrap(config: &AppConfig) -> Result<App, BootstrapError> {
    let storage: Arc<dyn DurableStorage> = Arc::new(FileStorage::open(&config.storage.path)?);
    let navigator: Arc<dyn Navigator> = Arc::new(MemoryNavigator::new("/"));
    bootstrap_with(config, storage, navigator)
}

/// [`bootstrap`] with caller-supplied storage and navigation.
///
/// # Errors
///
/// Returns [`BootstrapError::Http`] if the HTTP client cannot be built.
pub fn bootstrap_with(
    config: &AppConfig,
    storage: Arc<dyn DurableStorage>,
    navigator: Arc<dyn Navigator>,
) -> Result<App, BootstrapError> {
    let state = rehydrate(storage.as_ref());
    tracing::info!(
        authenticated = state.auth.is_authenticated(),
        "Rehydrated application state"
    );

    let (unauthorized_tx, mut unauthorized_rx) = mpsc::unbounded_channel::<()>();
    let client = HttpClient::new(config.http_config(), Arc::clone(&storage), Arc::clone(&navigator))?
        .with_unauthorized_hook(Arc::new(move || {
            let _ = unauthorized_tx.send(());
        }));

    let environment = AppEnvironment::new(
        Arc::clone(&storage),
        Arc::new(HttpReferenceSource::new(client.clone())),
    );
    let store = Store::new(state, root_reducer(), environment);

    let session = store.clone();
    tokio::spawn(async move {
        while unauthorized_rx.recv().await.is_some() {
            tracing::debug!("Session rejected by the API, clearing auth");
            session.send(AppAction::ClearAuth).await;
        }
    });

    Ok(App {
        store,
        client,
        storage,
        navigator,
    })
}
