//! # Lexdesk Runtime
//!
//! Runs a [`Reducer`] against live state.
//!
//! A [`Store`] owns the state behind an async lock. [`Store::send`] reduces
//! one action under the write lock, then starts the returned effects on the
//! Tokio runtime. An action produced by a finished effect is broadcast to
//! subscribers and sent back through the same reducer.
//!
//! ## Example
//!
//! ```ignore
//! use lexdesk_runtime::Store;
//!
//! let store = Store::new(AppState::default(), root_reducer(), environment);
//!
//! store
//!     .send_and_wait(AppAction::Reference(ReferenceAction::Fetch(kind)), Duration::from_secs(5))
//!     .await?;
//!
//! let loaded = store.state(|s| s.reference.timezones.items().len()).await;
//! ```
//!
//! ## Ordering
//!
//! Transitions are serialized by the state lock in the order `send` takes
//! it. Effect futures run concurrently and feed their actions back in
//! completion order, so a reducer that issues overlapping requests has to
//! discard stale answers itself.

use lexdesk_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{RwLock, broadcast, watch};

/// Store errors
pub mod error {
    use thiserror::Error;

    /// Failure waiting on a [`Store`](crate::Store)
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Effects were still running when the deadline passed
        #[error("Timed out waiting for effects to settle")]
        Timeout,
    }
}

pub use error::StoreError;

/// Feedback actions kept for slow subscribers
const BROADCAST_CAPACITY: usize = 64;

/// Count of effects still running for one `send`, shared by every effect
/// in its cascade.
#[derive(Clone)]
struct Inflight {
    running: Arc<AtomicUsize>,
    settled: Arc<watch::Sender<()>>,
}

impl Inflight {
    fn new() -> (Self, watch::Receiver<()>) {
        let (settled, rx) = watch::channel(());
        (
            Self {
                running: Arc::new(AtomicUsize::new(0)),
                settled: Arc::new(settled),
            },
            rx,
        )
    }

    fn count(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    fn start(&self) -> Started {
        self.running.fetch_add(1, Ordering::SeqCst);
        Started(self.clone())
    }
}

/// Marks one effect finished when dropped, including on panic.
struct Started(Inflight);

impl Drop for Started {
    fn drop(&mut self) {
        if self.0.running.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.0.settled.send(());
        }
    }
}

async fn settle(inflight: &Inflight, settled: &mut watch::Receiver<()>) {
    while inflight.count() > 0 {
        if settled.changed().await.is_err() {
            break;
        }
    }
}

/// Completion handle returned by [`Store::send`].
///
/// Tracking cascades: effects of actions fed back by an effect count
/// against the same handle, so [`wait`](Self::wait) returns once the whole
/// chain (request, response, follow-up request) has settled.
///
/// ```ignore
/// let mut handle = store.send(TableAction::Mount).await;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// assert!(!store.state(|s| s.status.is_loading()).await);
/// ```
pub struct EffectHandle {
    inflight: Inflight,
    settled: watch::Receiver<()>,
}

impl EffectHandle {
    /// Effects of this send still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inflight.count()
    }

    /// Wait until every effect has settled
    pub async fn wait(&mut self) {
        settle(&self.inflight, &mut self.settled).await;
    }

    /// [`wait`](Self::wait) with a deadline
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if effects are still running after
    /// `timeout`.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending", &self.pending())
            .finish()
    }
}

/// The store runtime
pub mod store {
    use super::{
        Arc, BROADCAST_CAPACITY, Duration, Effect, EffectHandle, Inflight, Instant, Reducer, RwLock,
        StoreError, broadcast, settle,
    };

    /// Live state driven by a reducer.
    ///
    /// Cloning yields another handle to the same state, reducer and
    /// environment.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        feedback: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Store starting from `initial_state`
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            let (feedback, _) = broadcast::channel(BROADCAST_CAPACITY);
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                feedback,
            }
        }

        /// Reduce `action` and start its effects.
        ///
        /// Returns once the state transition is applied; the handle tracks
        /// the effects.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> EffectHandle {
            let (inflight, settled) = Inflight::new();
            self.reduce(action, &inflight).await;
            EffectHandle { inflight, settled }
        }

        /// [`send`](Self::send) and wait for the effects to settle
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::Timeout`] if effects are still running after
        /// `timeout`.
        pub async fn send_and_wait(&self, action: A, timeout: Duration) -> Result<(), StoreError> {
            self.send(action).await.wait_with_timeout(timeout).await
        }

        /// Actions produced by effects, as they are fed back.
        ///
        /// Actions passed to [`send`](Self::send) directly are not broadcast.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.feedback.subscribe()
        }

        /// Read the current state
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&*self.state.read().await)
        }

        async fn reduce(&self, action: A, inflight: &Inflight) {
            metrics::counter!("store.actions.total").increment(1);

            let effects = {
                let mut state = self.state.write().await;
                let _span = tracing::debug_span!("reduce").entered();

                let started = Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(started.elapsed().as_secs_f64());

                tracing::trace!(effects = effects.len(), "Reduced action");
                effects
            };

            for effect in effects {
                self.run(effect, inflight);
            }
        }

        /// Start one effect, counted against `inflight`.
        ///
        /// Groups in a `Sequential` effect run one at a time, each waiting
        /// for its own cascade to settle before the next starts.
        fn run(&self, effect: Effect<A>, inflight: &Inflight) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    let started = inflight.start();
                    let store = self.clone();

                    tokio::spawn(async move {
                        let started = started;
                        if let Some(action) = fut.await {
                            let _ = store.feedback.send(action.clone());
                            store.reduce(action, &started.0).await;
                        }
                    });
                },
                Effect::Parallel(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.run(effect, inflight);
                    }
                },
                Effect::Sequential(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);
                    let started = inflight.start();
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _started = started;
                        for effect in effects {
                            let (step, mut settled) = Inflight::new();
                            store.run(effect, &step);
                            settle(&step, &mut settled).await;
                        }
                    });
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                feedback: self.feedback.clone(),
            }
        }
    }
}

pub use store::Store;

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use lexdesk_core::{SmallVec, smallvec};

    #[derive(Debug, Clone, Default)]
    struct PageState {
        loading: bool,
        rows: Vec<&'static str>,
        log: Vec<&'static str>,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum PageAction {
        Load,
        Loaded(Vec<&'static str>),
        LoadTwice,
        Note(&'static str),
    }

    struct PageReducer;

    fn after(ms: u64, action: PageAction) -> Effect<PageAction> {
        Effect::Future(Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Some(action)
        }))
    }

    impl Reducer for PageReducer {
        type State = PageState;
        type Action = PageAction;
        type Environment = ();

        fn reduce(&self, state: &mut PageState, action: PageAction, (): &()) -> SmallVec<[Effect<PageAction>; 4]> {
            match action {
                PageAction::Load => {
                    state.loading = true;
                    smallvec![after(5, PageAction::Loaded(vec!["a", "b"]))]
                },
                PageAction::Loaded(rows) => {
                    state.loading = false;
                    state.rows = rows;
                    smallvec![after(5, PageAction::Note("rendered"))]
                },
                PageAction::LoadTwice => smallvec![Effect::chain(vec![
                    after(20, PageAction::Note("slow")),
                    after(0, PageAction::Note("fast")),
                ])],
                PageAction::Note(note) => {
                    state.log.push(note);
                    smallvec![]
                },
            }
        }
    }

    #[tokio::test]
    async fn send_applies_transition_before_effects() {
        let store = Store::new(PageState::default(), PageReducer, ());
        let handle = store.send(PageAction::Load).await;

        assert!(store.state(|s| s.loading).await);
        assert_eq!(handle.pending(), 1);
    }

    #[tokio::test]
    async fn handle_waits_for_the_whole_cascade() {
        let store = Store::new(PageState::default(), PageReducer, ());
        store
            .send_and_wait(PageAction::Load, Duration::from_secs(2))
            .await
            .unwrap();

        let state = store.state(Clone::clone).await;
        assert!(!state.loading);
        assert_eq!(state.rows, vec!["a", "b"]);
        assert_eq!(state.log, vec!["rendered"]);
    }

    #[tokio::test]
    async fn sequential_effects_keep_order() {
        let store = Store::new(PageState::default(), PageReducer, ());
        store
            .send_and_wait(PageAction::LoadTwice, Duration::from_secs(2))
            .await
            .unwrap();

        assert_eq!(store.state(|s| s.log.clone()).await, vec!["slow", "fast"]);
    }

    #[tokio::test]
    async fn feedback_actions_are_broadcast() {
        let store = Store::new(PageState::default(), PageReducer, ());
        let mut feedback = store.subscribe_actions();

        store
            .send_and_wait(PageAction::Load, Duration::from_secs(2))
            .await
            .unwrap();

        assert_eq!(feedback.recv().await.unwrap(), PageAction::Loaded(vec!["a", "b"]));
        assert_eq!(feedback.recv().await.unwrap(), PageAction::Note("rendered"));
    }

    #[tokio::test]
    async fn timeout_is_reported() {
        let store = Store::new(PageState::default(), PageReducer, ());
        let result = store
            .send_and_wait(PageAction::LoadTwice, Duration::from_millis(1))
            .await;

        assert_eq!(result, Err(StoreError::Timeout));
    }
}
