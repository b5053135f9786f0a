//! # Lexdesk Core
//!
//! Core traits and types for the Lexdesk client state architecture.
//!
//! Every stateful piece of the client (session store, table controllers,
//! forms) is expressed with the same small vocabulary:
//!
//! - **State**: Owned, `Clone`-able data for one feature
//! - **Action**: Closed tagged union of everything that can happen to it
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Description of asynchronous work (never executed here)
//! - **Environment**: Injected collaborators (durable storage, navigation)
//!
//! ## Example
//!
//! ```
//! use lexdesk_core::{Effect, Reducer, SmallVec, smallvec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct LoaderState {
//!     loading: bool,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum LoaderAction {
//!     Show,
//!     Hide,
//! }
//!
//! struct LoaderReducer;
//!
//! impl Reducer for LoaderReducer {
//!     type State = LoaderState;
//!     type Action = LoaderAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut LoaderState,
//!         action: LoaderAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<LoaderAction>; 4]> {
//!         state.loading = matches!(action, LoaderAction::Show);
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = LoaderState::default();
//! let _ = LoaderReducer.reduce(&mut state, LoaderAction::Show, &());
//! assert!(state.loading);
//! ```

pub use smallvec::{SmallVec, smallvec};

/// Reducer composition utilities
pub mod composition;

/// Declarative macros for effect construction
pub mod effect_macros;

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They never await and never fail; anything asynchronous is returned as an
/// [`Effect`](crate::effect::Effect) for the runtime to execute.
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Implementations must leave `state` untouched for actions they do
        /// not handle, so callers can rely on "no mutation" meaning "no change".
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are values returned from reducers. The runtime executes them and
/// feeds any produced action back into the reducer.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Arc;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Returns `true` for [`Effect::None`]
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }

    impl<Action> Effect<Action>
    where
        Action: Send + 'static,
    {
        /// Lift this effect into a parent action type
        ///
        /// Used when a child reducer is embedded in a parent: every action the
        /// child's effects produce is wrapped by `f` before it reaches the
        /// parent reducer.
        #[must_use]
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            B: Send + 'static,
            F: Fn(Action) -> B + Send + Sync + 'static,
        {
            self.map_shared(&Arc::new(f))
        }

        fn map_shared<B, F>(self, f: &Arc<F>) -> Effect<B>
        where
            B: Send + 'static,
            F: Fn(Action) -> B + Send + Sync + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => {
                    Effect::Parallel(effects.into_iter().map(|e| e.map_shared(f)).collect())
                },
                Effect::Sequential(effects) => {
                    Effect::Sequential(effects.into_iter().map(|e| e.map_shared(f)).collect())
                },
                Effect::Future(fut) => {
                    let f = Arc::clone(f);
                    Effect::Future(Box::pin(async move { fut.await.map(|a| f(a)) }))
                },
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// The browser collaborators the client depends on are abstracted here so
/// reducers can be exercised with in-memory doubles.
pub mod environment {
    /// Key under which the bearer token is mirrored in durable storage.
    pub const TOKEN_KEY: &str = "token";

    /// Key under which the persisted store slices are serialized.
    pub const PERSIST_KEY: &str = "persist:root";

    /// Durable key/value storage that survives reloads
    ///
    /// All operations are synchronous: reducers write through to storage
    /// inline with the state transition that requires it.
    ///
    /// Implementations must not panic. A failed write is logged by the
    /// implementation and otherwise ignored.
    pub trait DurableStorage: Send + Sync {
        /// Read a value
        fn get(&self, key: &str) -> Option<String>;

        /// Write a value, replacing any previous one
        fn set(&self, key: &str, value: &str);

        /// Delete a value (no-op when absent)
        fn remove(&self, key: &str);
    }

    /// Navigation surface used for authentication redirects
    pub trait Navigator: Send + Sync {
        /// Current navigation path (e.g. `/matters`)
        fn current_path(&self) -> String;

        /// Navigate to `path`
        fn redirect(&self, path: &str);
    }
}

/// Boxed, sendable future used for injected async collaborators
pub type BoxFuture<'a, T> = futures::future::BoxFuture<'a, T>;

// Re-export the core vocabulary
pub use effect::Effect;
pub use environment::{DurableStorage, Navigator, PERSIST_KEY, TOKEN_KEY};
pub use reducer::Reducer;
