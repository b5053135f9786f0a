//! Store actions.

use crate::state::LayoutStyle;
use lexdesk_services::{AuthPayload, LabelValue, Permission, ReferenceKind, UserProfile};

/// Bulk session update.
///
/// Every `Some` field overwrites the corresponding session field; `None`
/// fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthData {
    /// New profile
    pub user: Option<UserProfile>,
    /// New token, written through to durable storage
    pub token: Option<String>,
    /// New role
    pub role: Option<String>,
    /// New grants
    pub permissions: Option<Vec<Permission>>,
}

impl From<AuthPayload> for AuthData {
    fn from(payload: AuthPayload) -> Self {
        Self {
            user: payload.user,
            token: Some(payload.token),
            role: payload.role,
            permissions: Some(payload.permissions),
        }
    }
}

/// Reference-data fetch lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceAction {
    /// Start fetching `kind`; marks it pending and issues the request
    Fetch(ReferenceKind),
    /// Fetch of `kind` started
    Pending(ReferenceKind),
    /// Fetch of `kind` succeeded
    Fulfilled(ReferenceKind, Vec<LabelValue>),
    /// Fetch of `kind` failed with a message
    Rejected(ReferenceKind, String),
    /// Restore every cache to its initial state
    Reset,
}

/// Every action the application store accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Replace the profile
    SetAuthUser(Option<UserProfile>),
    /// Replace the token (`None` clears it)
    SetAuthToken(Option<String>),
    /// Replace the role
    SetAuthRole(Option<String>),
    /// Replace the grants
    SetAuthPermissions(Vec<Permission>),
    /// Merge several session fields at once
    SetAuthData(AuthData),
    /// Remember the email between login steps
    SetLoginEmail(Option<String>),
    /// Sign out locally
    ClearAuth,
    /// Collapse or expand the header
    ToggleHeader,
    /// Switch navigation layout
    SetLayoutStyle(LayoutStyle),
    /// Show or hide the global page loader
    SetPageLoader(bool),
    /// Reference-data caches
    Reference(ReferenceAction),
}

impl AppAction {
    /// The reference-data action, if this is one
    #[must_use]
    pub fn into_reference(self) -> Option<ReferenceAction> {
        match self {
            Self::Reference(action) => Some(action),
            _ => None,
        }
    }
}
