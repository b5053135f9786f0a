//! Building one reducer out of several.
//!
//! The root store is assembled from small reducers that each own a slice of
//! the state:
//!
//! - [`scope_reducer`] embeds a child reducer into a parent. A lens picks
//!   the child's state, `extract` picks the parent actions it owns and
//!   `embed` lifts the actions its effects produce back to the parent type.
//! - [`combine_reducers`] runs several reducers over the same state and
//!   action, in registration order, and concatenates their effects.

use crate::SmallVec;
use crate::effect::Effect;
use crate::reducer::Reducer;
use std::fmt;
use std::marker::PhantomData;

/// Type-erased reducer, the element type of [`combine_reducers`]
pub type BoxedReducer<S, A, E> = Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Run `reducers` one after another on the same state and action.
///
/// Every reducer sees the state as left by the ones before it and receives
/// its own clone of the action.
///
/// # Examples
///
/// ```
/// use lexdesk_core::composition::{BoxedReducer, combine_reducers};
/// use lexdesk_core::{Effect, Reducer, SmallVec, smallvec};
///
/// #[derive(Default)]
/// struct Layout {
///     header_collapsed: bool,
///     page_loading: bool,
/// }
///
/// #[derive(Clone)]
/// enum LayoutAction {
///     ToggleHeader,
///     SetPageLoader(bool),
/// }
///
/// struct Header;
/// struct Loader;
///
/// impl Reducer for Header {
///     type State = Layout;
///     type Action = LayoutAction;
///     type Environment = ();
///
///     fn reduce(&self, state: &mut Layout, action: LayoutAction, (): &()) -> SmallVec<[Effect<LayoutAction>; 4]> {
///         if let LayoutAction::ToggleHeader = action {
///             state.header_collapsed = !state.header_collapsed;
///         }
///         smallvec![]
///     }
/// }
///
/// impl Reducer for Loader {
///     type State = Layout;
///     type Action = LayoutAction;
///     type Environment = ();
///
///     fn reduce(&self, state: &mut Layout, action: LayoutAction, (): &()) -> SmallVec<[Effect<LayoutAction>; 4]> {
///         if let LayoutAction::SetPageLoader(on) = action {
///             state.page_loading = on;
///         }
///         smallvec![]
///     }
/// }
///
/// let members: Vec<BoxedReducer<Layout, LayoutAction, ()>> = vec![Box::new(Header), Box::new(Loader)];
/// let layout = combine_reducers(members);
/// let mut state = Layout::default();
/// let _ = layout.reduce(&mut state, LayoutAction::SetPageLoader(true), &());
/// assert!(state.page_loading);
/// assert!(!state.header_collapsed);
/// ```
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<BoxedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    A: Clone,
{
    CombinedReducer { reducers }
}

/// Reducers run in sequence. See [`combine_reducers`].
pub struct CombinedReducer<S, A, E> {
    reducers: Vec<BoxedReducer<S, A, E>>,
}

impl<S, A, E> CombinedReducer<S, A, E> {
    /// Number of member reducers
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// `true` when there are no member reducers
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> fmt::Debug for CombinedReducer<S, A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedReducer")
            .field("reducers", &self.reducers.len())
            .finish()
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    A: Clone,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(&self, state: &mut S, action: A, env: &E) -> SmallVec<[Effect<A>; 4]> {
        self.reducers
            .iter()
            .flat_map(|reducer| reducer.reduce(state, action.clone(), env))
            .collect()
    }
}

/// Embed `reducer` into a parent state and action type.
///
/// Parent actions for which `extract` returns `None` are ignored and leave
/// the state untouched.
///
/// # Examples
///
/// ```
/// use lexdesk_core::composition::scope_reducer;
/// use lexdesk_core::{Effect, Reducer, SmallVec, smallvec};
///
/// #[derive(Default)]
/// struct Countries {
///     loading: bool,
/// }
///
/// enum CountriesAction {
///     Fetch,
/// }
///
/// struct CountriesReducer;
///
/// impl Reducer for CountriesReducer {
///     type State = Countries;
///     type Action = CountriesAction;
///     type Environment = ();
///
///     fn reduce(&self, state: &mut Countries, _: CountriesAction, (): &()) -> SmallVec<[Effect<CountriesAction>; 4]> {
///         state.loading = true;
///         smallvec![]
///     }
/// }
///
/// #[derive(Default)]
/// struct Root {
///     countries: Countries,
///     token: Option<String>,
/// }
///
/// enum RootAction {
///     Countries(CountriesAction),
///     ClearAuth,
/// }
///
/// let scoped = scope_reducer(
///     CountriesReducer,
///     |root: &mut Root| &mut root.countries,
///     |action: RootAction| match action {
///         RootAction::Countries(inner) => Some(inner),
///         RootAction::ClearAuth => None,
///     },
///     RootAction::Countries,
/// );
///
/// let mut root = Root::default();
/// let _ = scoped.reduce(&mut root, RootAction::ClearAuth, &());
/// assert!(!root.countries.loading);
/// let _ = scoped.reduce(&mut root, RootAction::Countries(CountriesAction::Fetch), &());
/// assert!(root.countries.loading);
/// ```
pub const fn scope_reducer<S, SubS, A, SubA, E, R>(
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<SubA>,
    embed: fn(SubA) -> A,
) -> ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    ScopedReducer {
        reducer,
        state,
        extract,
        embed,
        env: PhantomData,
    }
}

/// A child reducer seen through a lens. See [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<SubA>,
    embed: fn(SubA) -> A,
    env: PhantomData<fn() -> E>,
}

impl<S, SubS, A, SubA, E, R> Reducer for ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
    A: Send + 'static,
    SubA: Send + 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(&self, state: &mut S, action: A, env: &E) -> SmallVec<[Effect<A>; 4]> {
        let Some(owned) = (self.extract)(action) else {
            return SmallVec::new();
        };

        let embed = self.embed;
        self.reducer
            .reduce((self.state)(state), owned, env)
            .into_iter()
            .map(|effect| effect.map(embed))
            .collect()
    }
}
