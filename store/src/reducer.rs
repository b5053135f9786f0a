//! Session, layout and root reducers.

use crate::actions::{AppAction, AuthData};
use crate::environment::AppEnvironment;
use crate::reference::ReferenceReducer;
use crate::state::{AppState, AuthState, ReferenceData};
use lexdesk_core::composition::{BoxedReducer, CombinedReducer, combine_reducers, scope_reducer};
use lexdesk_core::{DurableStorage, Effect, Reducer, SmallVec, TOKEN_KEY, smallvec};
use lexdesk_services::Permission;

/// Boxed reducer over the root state
pub type BoxedAppReducer = BoxedReducer<AppState, AppAction, AppEnvironment>;

/// Handles the session and layout actions.
///
/// The only side effect is the token mirror: every transition that changes
/// `auth.token` writes the same value to durable storage in the same step.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionReducer;

impl Reducer for SessionReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let storage = env.storage.as_ref();

        match action {
            // ═══════════════════════════════════════════════════════════════
            // Session
            // ═══════════════════════════════════════════════════════════════
            AppAction::SetAuthUser(user) => state.auth.user = user,
            AppAction::SetAuthToken(token) => mirror_token(&mut state.auth, token, storage),
            AppAction::SetAuthRole(role) => state.auth.role = role,
            AppAction::SetAuthPermissions(permissions) => {
                state.auth.permissions = dedupe_permissions(permissions);
            },
            AppAction::SetAuthData(data) => merge_auth_data(&mut state.auth, data, storage),
            AppAction::SetLoginEmail(email) => state.auth.login_email = email,
            AppAction::ClearAuth => {
                state.auth = AuthState::default();
                storage.remove(TOKEN_KEY);
                tracing::info!("Session cleared");
            },

            // ═══════════════════════════════════════════════════════════════
            // Layout
            // ═══════════════════════════════════════════════════════════════
            AppAction::ToggleHeader => {
                state.layout.header_collapsed = !state.layout.header_collapsed;
            },
            AppAction::SetLayoutStyle(style) => state.layout.style = style,
            AppAction::SetPageLoader(loading) => state.layout.page_loading = loading,

            // Owned by the reference reducers
            AppAction::Reference(_) => {},
        }

        smallvec![]
    }
}

fn mirror_token(auth: &mut AuthState, token: Option<String>, storage: &dyn DurableStorage) {
    match &token {
        Some(token) => storage.set(TOKEN_KEY, token),
        None => storage.remove(TOKEN_KEY),
    }
    auth.token = token;
}

fn merge_auth_data(auth: &mut AuthState, data: AuthData, storage: &dyn DurableStorage) {
    if let Some(user) = data.user {
        auth.user = Some(user);
    }
    if let Some(token) = data.token {
        mirror_token(auth, Some(token), storage);
    }
    if let Some(role) = data.role {
        auth.role = Some(role);
    }
    if let Some(permissions) = data.permissions {
        auth.permissions = dedupe_permissions(permissions);
    }
}

/// Keep one entry per module; a later entry replaces an earlier one in place.
fn dedupe_permissions(permissions: Vec<Permission>) -> Vec<Permission> {
    let mut unique: Vec<Permission> = Vec::with_capacity(permissions.len());
    for permission in permissions {
        match unique
            .iter_mut()
            .find(|p| p.module_name == permission.module_name)
        {
            Some(existing) => *existing = permission,
            None => unique.push(permission),
        }
    }
    unique
}

fn reference_data(state: &mut AppState) -> &mut ReferenceData {
    &mut state.reference
}

/// Root reducer.
///
/// Session and layout actions go to [`SessionReducer`]; everything else is
/// forwarded to the two scoped reference reducers. An action nobody
/// consumes leaves the state untouched.
pub struct AppReducer {
    session: SessionReducer,
    reference: CombinedReducer<AppState, AppAction, AppEnvironment>,
}

impl AppReducer {
    /// Build the root reducer
    #[must_use]
    pub fn new() -> Self {
        let reducers: Vec<BoxedAppReducer> = vec![
            Box::new(scope_reducer(
                ReferenceReducer::firm_lookups(),
                reference_data,
                AppAction::into_reference,
                AppAction::Reference,
            )),
            Box::new(scope_reducer(
                ReferenceReducer::geography(),
                reference_data,
                AppAction::into_reference,
                AppAction::Reference,
            )),
        ];

        Self {
            session: SessionReducer,
            reference: combine_reducers(reducers),
        }
    }
}

impl Default for AppReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AppAction::Reference(_) => self.reference.reduce(state, action, env),
            other => self.session.reduce(state, other, env),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ReferenceAction;
    use crate::mocks::StaticReferenceSource;
    use crate::state::LayoutStyle;
    use lexdesk_services::{PermissionActions, ReferenceKind, UserProfile};
    use lexdesk_testing::{MemoryStorage, ReducerTest, assertions};
    use std::sync::Arc;

    fn env(storage: &MemoryStorage) -> AppEnvironment {
        AppEnvironment::new(
            Arc::new(storage.clone()),
            Arc::new(StaticReferenceSource::new()),
        )
    }

    fn grant(module: &str, read: bool) -> Permission {
        Permission {
            module_name: module.to_string(),
            actions: PermissionActions {
                read,
                ..PermissionActions::default()
            },
        }
    }

    #[test]
    fn set_token_writes_through() {
        let storage = MemoryStorage::new();
        ReducerTest::new(AppReducer::new())
            .with_env(env(&storage))
            .given_state(AppState::default())
            .when_action(AppAction::SetAuthToken(Some("abc".into())))
            .then_state(|state| assert_eq!(state.auth.token.as_deref(), Some("abc")))
            .then_effects(assertions::assert_no_effects)
            .run();

        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("abc"));
    }

    #[test]
    fn set_auth_data_then_clear_round_trips() {
        let storage = MemoryStorage::new();
        let user = UserProfile {
            id: "u1".into(),
            ..UserProfile::default()
        };

        ReducerTest::new(AppReducer::new())
            .with_env(env(&storage))
            .given_state(AppState::default())
            .when_action(AppAction::SetLoginEmail(Some("ada@firm.test".into())))
            .when_action(AppAction::SetAuthData(AuthData {
                token: Some("T".into()),
                user: Some(user),
                ..AuthData::default()
            }))
            .when_action(AppAction::ClearAuth)
            .then_state(|state| assert_eq!(state.auth, AuthState::default()))
            .run();

        assert!(!storage.contains(TOKEN_KEY));
    }

    #[test]
    fn set_auth_data_without_token_leaves_storage_alone() {
        let storage = MemoryStorage::new();
        ReducerTest::new(AppReducer::new())
            .with_env(env(&storage))
            .given_state(AppState::default())
            .when_action(AppAction::SetAuthData(AuthData {
                role: Some("admin".into()),
                ..AuthData::default()
            }))
            .then_state(|state| {
                assert_eq!(state.auth.role.as_deref(), Some("admin"));
                assert!(state.auth.token.is_none());
            })
            .run();

        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn permissions_keep_one_entry_per_module() {
        let storage = MemoryStorage::new();
        ReducerTest::new(AppReducer::new())
            .with_env(env(&storage))
            .given_state(AppState::default())
            .when_action(AppAction::SetAuthPermissions(vec![
                grant("contacts", false),
                grant("matters", true),
                grant("contacts", true),
            ]))
            .then_state(|state| {
                let modules: Vec<_> = state
                    .auth
                    .permissions
                    .iter()
                    .map(|p| (p.module_name.as_str(), p.actions.read))
                    .collect();
                assert_eq!(modules, vec![("contacts", true), ("matters", true)]);
            })
            .run();
    }

    #[test]
    fn layout_actions() {
        let storage = MemoryStorage::new();
        ReducerTest::new(AppReducer::new())
            .with_env(env(&storage))
            .given_state(AppState::default())
            .when_action(AppAction::ToggleHeader)
            .when_action(AppAction::SetLayoutStyle(LayoutStyle::Horizontal))
            .when_action(AppAction::SetPageLoader(true))
            .then_state(|state| {
                assert!(state.layout.header_collapsed);
                assert_eq!(state.layout.style, LayoutStyle::Horizontal);
                assert!(state.layout.page_loading);
            })
            .run();
    }

    #[test]
    fn reference_actions_reach_both_scoped_reducers() {
        let storage = MemoryStorage::new();
        ReducerTest::new(AppReducer::new())
            .with_env(env(&storage))
            .given_state(AppState::default())
            .when_action(AppAction::Reference(ReferenceAction::Pending(
                ReferenceKind::Countries,
            )))
            .when_action(AppAction::Reference(ReferenceAction::Fetch(
                ReferenceKind::JobTitles,
            )))
            .then_state(|state| {
                assert!(state.reference.countries.loading);
                assert!(state.reference.job_titles.loading);
                assert!(!state.reference.timezones.loading);
                assert_eq!(state.auth, AuthState::default());
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn foreign_reference_slices_are_untouched() {
        let storage = MemoryStorage::new();
        let reducer = AppReducer::new();
        let environment = env(&storage);

        let mut state = AppState::default();
        state.reference.countries.fulfilled(Vec::new());
        let before = state.clone();

        let effects = reducer.reduce(
            &mut state,
            AppAction::Reference(ReferenceAction::Rejected(
                ReferenceKind::Timezones,
                "down".into(),
            )),
            &environment,
        );

        assert_eq!(state.reference.countries, before.reference.countries);
        assert_eq!(state.reference.timezones.error.as_deref(), Some("down"));
        assert_eq!(state.auth, before.auth);
        assertions::assert_no_effects(&effects);
    }
}
