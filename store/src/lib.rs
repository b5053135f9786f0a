//! # Lexdesk Store
//!
//! Application-wide state: the signed-in session, layout chrome and cached
//! reference data, reduced from a closed set of [`AppAction`]s.
//!
//! # Architecture
//!
//! ```text
//! PersistingReducer                     writes PersistedSlice on change
//!   └─ AppReducer
//!        ├─ SessionReducer              auth + layout, token write-through
//!        └─ combine_reducers
//!             ├─ scope(firm_lookups)    timezones, job titles
//!             └─ scope(geography)       countries
//! ```
//!
//! Start-up is explicit: call [`rehydrate`] to build the initial state from
//! durable storage, then hand it to the runtime store together with
//! [`root_reducer`].

pub mod actions;
pub mod environment;
pub mod mocks;
pub mod permissions;
pub mod persistence;
pub mod reducer;
pub mod reference;
pub mod state;

pub use actions::{AppAction, AuthData, ReferenceAction};
pub use environment::{AppEnvironment, HttpReferenceSource, ReferenceSource};
pub use permissions::check_permission;
pub use persistence::{PersistError, PersistedSlice, PersistingReducer, persist, rehydrate};
pub use reducer::{AppReducer, SessionReducer};
pub use reference::ReferenceReducer;
pub use state::{AppState, AuthState, LayoutState, LayoutStyle, ReferenceData, ReferenceList};

/// The reducer the application store runs
pub type RootReducer = PersistingReducer<AppReducer>;

/// Build the application's root reducer
#[must_use]
pub fn root_reducer() -> RootReducer {
    PersistingReducer::new(AppReducer::new())
}
