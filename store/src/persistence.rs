//! Persisting the session and reference caches across reloads.
//!
//! Only [`PersistedSlice`] is written: the auth state and the reference-data
//! caches. Layout is rebuilt from defaults on every start.

use crate::environment::AppEnvironment;
use crate::state::{AppState, AuthState, ReferenceData};
use lexdesk_core::{DurableStorage, Effect, PERSIST_KEY, Reducer, SmallVec, TOKEN_KEY};
use lexdesk_services::ReferenceKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format version of the persisted blob
pub const PERSIST_VERSION: u32 = 1;

/// Why a persisted blob was rejected
#[derive(Debug, Error)]
pub enum PersistError {
    /// Not valid JSON for the slice
    #[error("Malformed persisted state: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Written by an incompatible version
    #[error("Persisted state version {found} does not match {expected}")]
    VersionMismatch {
        /// Version in the blob
        found: u32,
        /// Version this build writes
        expected: u32,
    },
}

/// The whitelisted part of [`AppState`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedSlice {
    /// Format version
    pub version: u32,
    /// Session
    pub auth: AuthState,
    /// Lookup caches
    pub reference: ReferenceData,
}

impl PersistedSlice {
    /// Copy the persisted fields out of `state`
    #[must_use]
    pub fn capture(state: &AppState) -> Self {
        Self {
            version: PERSIST_VERSION,
            auth: state.auth.clone(),
            reference: state.reference.clone(),
        }
    }

    /// Serialize to the stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Malformed`] if serialization fails.
    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored blob.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] when the blob is corrupt or from another
    /// format version.
    pub fn from_json(raw: &str) -> Result<Self, PersistError> {
        let slice: Self = serde_json::from_str(raw)?;
        if slice.version != PERSIST_VERSION {
            return Err(PersistError::VersionMismatch {
                found: slice.version,
                expected: PERSIST_VERSION,
            });
        }
        Ok(slice)
    }

    /// Rebuild a full state. In-flight fetches did not survive the reload,
    /// so every `loading` flag is cleared.
    #[must_use]
    pub fn into_state(self) -> AppState {
        let mut reference = self.reference;
        for kind in ReferenceKind::ALL {
            reference.list_mut(kind).loading = false;
        }

        AppState {
            auth: self.auth,
            reference,
            ..AppState::default()
        }
    }
}

/// Load the initial state from `storage`.
///
/// A missing or unreadable blob yields [`AppState::default`]. A blob holding
/// a session whose token key has been purged (a 401 that landed before the
/// cleared session was persisted) is rehydrated signed out, and the cleared
/// slice is written back. The token key is then rewritten from the
/// rehydrated session so the two never disagree.
pub fn rehydrate(storage: &dyn DurableStorage) -> AppState {
    let state = match storage.get(PERSIST_KEY) {
        None => {
            tracing::debug!("No persisted state, starting fresh");
            AppState::default()
        },
        Some(raw) => match PersistedSlice::from_json(&raw) {
            Ok(mut slice) if slice.auth.token.is_some() && storage.get(TOKEN_KEY).is_none() => {
                tracing::info!("Persisted session was revoked, rehydrating signed out");
                slice.auth = AuthState::default();
                let state = slice.into_state();
                persist(&state, storage);
                state
            },
            Ok(slice) => {
                tracing::info!(
                    authenticated = slice.auth.token.is_some(),
                    "Rehydrated persisted state"
                );
                slice.into_state()
            },
            Err(error) => {
                tracing::warn!(error = %error, "Discarding persisted state");
                AppState::default()
            },
        },
    };

    match &state.auth.token {
        Some(token) => storage.set(TOKEN_KEY, token),
        None => storage.remove(TOKEN_KEY),
    }

    state
}

/// Write the persisted slice of `state` to `storage`.
pub fn persist(state: &AppState, storage: &dyn DurableStorage) {
    match PersistedSlice::capture(state).to_json() {
        Ok(json) => storage.set(PERSIST_KEY, &json),
        Err(error) => tracing::error!(error = %error, "Failed to serialize persisted state"),
    }
}

/// Wraps a root reducer and persists the whitelisted slice after every
/// transition that changed it.
#[derive(Debug, Clone)]
pub struct PersistingReducer<R> {
    inner: R,
}

impl<R> PersistingReducer<R> {
    /// Wrap `inner`
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }

    /// The wrapped reducer
    pub const fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R> Reducer for PersistingReducer<R>
where
    R: Reducer<State = AppState, Environment = AppEnvironment>,
{
    type State = AppState;
    type Action = R::Action;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let auth_before = state.auth.clone();
        let reference_before = state.reference.clone();

        let effects = self.inner.reduce(state, action, env);

        if state.auth != auth_before || state.reference != reference_before {
            persist(state, env.storage.as_ref());
        }

        effects
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::actions::AppAction;
    use crate::mocks::StaticReferenceSource;
    use crate::reducer::AppReducer;
    use lexdesk_testing::{MemoryStorage, ReducerTest};
    use std::sync::Arc;

    fn env(storage: &MemoryStorage) -> AppEnvironment {
        AppEnvironment::new(
            Arc::new(storage.clone()),
            Arc::new(StaticReferenceSource::new()),
        )
    }

    #[test]
    fn missing_blob_falls_back_to_initial_state() {
        let storage = MemoryStorage::with_entries([(TOKEN_KEY, "orphan")]);
        let state = rehydrate(&storage);

        assert_eq!(state, AppState::default());
        assert!(!storage.contains(TOKEN_KEY));
    }

    #[test]
    fn corrupt_blob_falls_back_to_initial_state() {
        let storage = MemoryStorage::with_entries([(PERSIST_KEY, "{not json")]);
        assert_eq!(rehydrate(&storage), AppState::default());

        let storage = MemoryStorage::with_entries([(
            PERSIST_KEY,
            r#"{"version":99,"auth":{},"reference":{}}"#,
        )]);
        assert_eq!(rehydrate(&storage), AppState::default());
    }

    #[test]
    fn persisted_session_is_restored_and_token_remirrored() {
        let mut state = AppState::default();
        state.auth.token = Some("kept".into());
        state.auth.role = Some("partner".into());
        state.reference.timezones.loading = true;

        let storage = MemoryStorage::with_entries([(TOKEN_KEY, "kept")]);
        persist(&state, &storage);

        let restored = rehydrate(&storage);
        assert_eq!(restored.auth, state.auth);
        assert!(!restored.reference.timezones.loading);
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("kept"));
    }

    #[test]
    fn purged_token_key_wins_over_persisted_session() {
        let mut state = AppState::default();
        state.auth.token = Some("expired".into());
        state.auth.role = Some("partner".into());
        state.reference.countries.fulfilled(Vec::new());

        let storage = MemoryStorage::new();
        persist(&state, &storage);
        assert!(!storage.contains(TOKEN_KEY));

        let restored = rehydrate(&storage);
        assert_eq!(restored.auth, AuthState::default());
        assert_eq!(restored.reference, state.reference);
        assert!(!storage.contains(TOKEN_KEY));

        let slice = PersistedSlice::from_json(&storage.get(PERSIST_KEY).unwrap()).unwrap();
        assert_eq!(slice.auth, AuthState::default());
        assert_eq!(rehydrate(&storage).auth, AuthState::default());
    }

    #[test]
    fn wrapper_persists_only_on_change() {
        let storage = MemoryStorage::new();

        ReducerTest::new(PersistingReducer::new(AppReducer::new()))
            .with_env(env(&storage))
            .given_state(AppState::default())
            .when_action(AppAction::ToggleHeader)
            .run();
        assert!(!storage.contains(PERSIST_KEY));

        ReducerTest::new(PersistingReducer::new(AppReducer::new()))
            .with_env(env(&storage))
            .given_state(AppState::default())
            .when_action(AppAction::SetAuthRole(Some("associate".into())))
            .run();

        let slice = PersistedSlice::from_json(&storage.get(PERSIST_KEY).unwrap()).unwrap();
        assert_eq!(slice.auth.role.as_deref(), Some("associate"));
    }
}
