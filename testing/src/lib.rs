//! # Lexdesk Testing
//!
//! Testing utilities and helpers for the Lexdesk client state architecture.
//!
//! This crate provides:
//! - In-memory doubles for the browser collaborators (`MemoryStorage`,
//!   `RecordingNavigator`)
//! - [`ReducerTest`], a Given/When/Then harness for reducers
//! - Effect assertion helpers
//!
//! ## Example
//!
//! ```ignore
//! use lexdesk_testing::{MemoryStorage, ReducerTest, assertions};
//!
//! let storage = MemoryStorage::new();
//! ReducerTest::new(AppReducer::new())
//!     .with_env(AppEnvironment::for_tests(storage.clone()))
//!     .given_state(AppState::default())
//!     .when_action(AppAction::SetAuthToken(Some("t".into())))
//!     .then_state(|s| assert_eq!(s.auth.token.as_deref(), Some("t")))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("t"));
//! ```


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use lexdesk_core::environment::{DurableStorage, Navigator};
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex, PoisonError};

    /// In-memory durable storage
    ///
    /// Clones share the same underlying map, so a test can keep one handle
    /// and give another to the code under test.
    #[derive(Debug, Clone, Default)]
    pub struct MemoryStorage {
        entries: Arc<Mutex<BTreeMap<String, String>>>,
        writes: Arc<Mutex<usize>>,
    }

    impl MemoryStorage {
        /// Create empty storage
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create storage pre-seeded with entries
        #[must_use]
        pub fn with_entries<I, K, V>(entries: I) -> Self
        where
            I: IntoIterator<Item = (K, V)>,
            K: Into<String>,
            V: Into<String>,
        {
            let storage = Self::new();
            {
                let mut map = storage.entries.lock().unwrap_or_else(PoisonError::into_inner);
                for (k, v) in entries {
                    map.insert(k.into(), v.into());
                }
            }
            storage
        }

        /// Whether `key` currently holds a value
        #[must_use]
        pub fn contains(&self, key: &str) -> bool {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .contains_key(key)
        }

        /// Number of `set`/`remove` calls observed so far
        #[must_use]
        pub fn write_count(&self) -> usize {
            *self.writes.lock().unwrap_or_else(PoisonError::into_inner)
        }

        fn record_write(&self) {
            *self.writes.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        }
    }

    impl DurableStorage for MemoryStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned()
        }

        fn set(&self, key: &str, value: &str) {
            self.record_write();
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.to_string(), value.to_string());
        }

        fn remove(&self, key: &str) {
            self.record_write();
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(key);
        }
    }

    /// Navigator that records redirects instead of performing them
    #[derive(Debug, Clone)]
    pub struct RecordingNavigator {
        path: Arc<Mutex<String>>,
        redirects: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingNavigator {
        /// Create a navigator positioned at `path`
        #[must_use]
        pub fn at(path: impl Into<String>) -> Self {
            Self {
                path: Arc::new(Mutex::new(path.into())),
                redirects: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Every redirect target, oldest first
        #[must_use]
        pub fn redirects(&self) -> Vec<String> {
            self.redirects
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn current_path(&self) -> String {
            self.path
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        fn redirect(&self, path: &str) {
            self.redirects
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(path.to_string());
            *self.path.lock().unwrap_or_else(PoisonError::into_inner) = path.to_string();
        }
    }
}

/// Install a test log subscriber (idempotent)
///
/// Honours `RUST_LOG`; output is captured by the test harness.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub use mocks::{MemoryStorage, RecordingNavigator};
