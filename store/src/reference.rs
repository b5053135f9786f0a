//! Reference-data reducers.
//!
//! The caches are split between two independently scoped reducers, each
//! owning a fixed set of [`ReferenceKind`]s and ignoring the rest:
//!
//! - [`ReferenceReducer::firm_lookups`]: timezones and job titles
//! - [`ReferenceReducer::geography`]: countries

use crate::actions::ReferenceAction;
use crate::environment::AppEnvironment;
use crate::state::ReferenceData;
use lexdesk_core::{Effect, Reducer, SmallVec, async_effect, smallvec};
use lexdesk_services::ReferenceKind;
use std::sync::Arc;

/// Reducer for the reference-data kinds it owns.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceReducer {
    name: &'static str,
    owned: &'static [ReferenceKind],
}

impl ReferenceReducer {
    /// Timezones and job titles
    #[must_use]
    pub const fn firm_lookups() -> Self {
        Self {
            name: "firm_lookups",
            owned: &[ReferenceKind::Timezones, ReferenceKind::JobTitles],
        }
    }

    /// Countries
    #[must_use]
    pub const fn geography() -> Self {
        Self {
            name: "geography",
            owned: &[ReferenceKind::Countries],
        }
    }

    fn owns(&self, kind: ReferenceKind) -> bool {
        self.owned.contains(&kind)
    }
}

impl Reducer for ReferenceReducer {
    type State = ReferenceData;
    type Action = ReferenceAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ReferenceAction::Fetch(kind) if self.owns(kind) => {
                state.list_mut(kind).pending();
                tracing::debug!(reducer = self.name, ?kind, "Fetching reference data");

                let source = Arc::clone(&env.reference);
                smallvec![async_effect! {
                    Some(match source.fetch(kind).await {
                        Ok(items) => ReferenceAction::Fulfilled(kind, items),
                        Err(error) => {
                            tracing::warn!(?kind, error = %error, "Reference fetch failed");
                            ReferenceAction::Rejected(kind, error.message())
                        },
                    })
                }]
            },
            ReferenceAction::Pending(kind) if self.owns(kind) => {
                state.list_mut(kind).pending();
                smallvec![]
            },
            ReferenceAction::Fulfilled(kind, items) if self.owns(kind) => {
                state.list_mut(kind).fulfilled(items);
                smallvec![]
            },
            ReferenceAction::Rejected(kind, message) if self.owns(kind) => {
                state.list_mut(kind).rejected(message);
                smallvec![]
            },
            ReferenceAction::Reset => {
                for kind in self.owned {
                    *state.list_mut(*kind) = crate::state::ReferenceList::default();
                }
                smallvec![]
            },
            // Kinds owned by the other reducer
            _ => smallvec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::StaticReferenceSource;
    use lexdesk_services::LabelValue;
    use lexdesk_testing::{MemoryStorage, ReducerTest, assertions};
    use serde_json::json;

    fn env() -> AppEnvironment {
        AppEnvironment::new(
            Arc::new(MemoryStorage::new()),
            Arc::new(StaticReferenceSource::new()),
        )
    }

    fn utc() -> LabelValue {
        LabelValue {
            label: "UTC".into(),
            value: json!("UTC"),
        }
    }

    #[test]
    fn fetch_marks_pending_and_issues_request() {
        ReducerTest::new(ReferenceReducer::firm_lookups())
            .with_env(env())
            .given_state(ReferenceData::default())
            .when_action(ReferenceAction::Fetch(ReferenceKind::Timezones))
            .then_state(|state| {
                assert!(state.timezones.loading);
                assert!(!state.job_titles.loading);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn foreign_kinds_are_ignored() {
        ReducerTest::new(ReferenceReducer::geography())
            .with_env(env())
            .given_state(ReferenceData::default())
            .when_action(ReferenceAction::Fetch(ReferenceKind::Timezones))
            .when_action(ReferenceAction::Fulfilled(ReferenceKind::JobTitles, vec![utc()]))
            .then_state(|state| assert_eq!(state, &ReferenceData::default()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn fulfilled_replaces_and_rejected_empties() {
        ReducerTest::new(ReferenceReducer::firm_lookups())
            .with_env(env())
            .given_state(ReferenceData::default())
            .when_action(ReferenceAction::Pending(ReferenceKind::JobTitles))
            .when_action(ReferenceAction::Fulfilled(ReferenceKind::Timezones, vec![utc()]))
            .when_action(ReferenceAction::Rejected(
                ReferenceKind::JobTitles,
                "Server unavailable".into(),
            ))
            .then_state(|state| {
                assert_eq!(state.timezones.items(), &[utc()]);
                assert_eq!(state.job_titles.data, Some(Vec::new()));
                assert_eq!(state.job_titles.error.as_deref(), Some("Server unavailable"));
                assert!(!state.job_titles.loading);
            })
            .run();
    }

    #[test]
    fn reset_only_touches_owned_kinds() {
        let mut given = ReferenceData::default();
        given.timezones.fulfilled(vec![utc()]);
        given.countries.fulfilled(vec![utc()]);

        ReducerTest::new(ReferenceReducer::geography())
            .with_env(env())
            .given_state(given)
            .when_action(ReferenceAction::Reset)
            .then_state(|state| {
                assert_eq!(state.countries, crate::state::ReferenceList::default());
                assert_eq!(state.timezones.items().len(), 1);
            })
            .run();
    }
}
