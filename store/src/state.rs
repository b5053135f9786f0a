//! Application state types.
//!
//! All types are `Clone` so the runtime can hand out snapshots, and
//! `PartialEq` so "nothing changed" can be detected by comparison.

use lexdesk_services::{LabelValue, Permission, ReferenceKind, UserProfile};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════════════════

/// Session state of the signed-in user.
///
/// `token` is mirrored into durable storage by the reducer on every
/// transition that changes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthState {
    /// Profile, set on login/verify and cleared on logout
    pub user: Option<UserProfile>,
    /// Bearer credential
    pub token: Option<String>,
    /// Role tag
    pub role: Option<String>,
    /// Grants, at most one entry per module
    pub permissions: Vec<Permission>,
    /// Email carried from the password step to OTP verification
    pub login_email: Option<String>,
}

impl AuthState {
    /// Whether a session token is held
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Layout
// ═══════════════════════════════════════════════════════════════════════

/// Navigation layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStyle {
    /// Sidebar navigation
    #[default]
    Vertical,
    /// Top-bar navigation
    Horizontal,
}

/// Chrome state. Not persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutState {
    /// Header collapsed
    pub header_collapsed: bool,
    /// Navigation layout
    pub style: LayoutStyle,
    /// Global page-loading indicator
    pub page_loading: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// Reference data
// ═══════════════════════════════════════════════════════════════════════

/// One cached lookup list and its fetch lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceList {
    /// Options, `None` until the first fetch settles
    pub data: Option<Vec<LabelValue>>,
    /// A fetch is in flight
    pub loading: bool,
    /// Message of the last failed fetch
    pub error: Option<String>,
}

impl ReferenceList {
    /// Fetch started. Prior data stays visible.
    pub fn pending(&mut self) {
        self.loading = true;
    }

    /// Fetch succeeded; replaces data wholesale.
    pub fn fulfilled(&mut self, items: Vec<LabelValue>) {
        self.data = Some(items);
        self.loading = false;
        self.error = None;
    }

    /// Fetch failed; data becomes empty.
    pub fn rejected(&mut self, message: String) {
        self.data = Some(Vec::new());
        self.loading = false;
        self.error = Some(message);
    }

    /// Options, or an empty slice before the first fetch
    #[must_use]
    pub fn items(&self) -> &[LabelValue] {
        self.data.as_deref().unwrap_or_default()
    }
}

/// All cached lookup lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReferenceData {
    /// Timezones
    pub timezones: ReferenceList,
    /// Job titles
    pub job_titles: ReferenceList,
    /// Countries
    pub countries: ReferenceList,
}

impl ReferenceData {
    /// The list cached for `kind`
    #[must_use]
    pub const fn list(&self, kind: ReferenceKind) -> &ReferenceList {
        match kind {
            ReferenceKind::Timezones => &self.timezones,
            ReferenceKind::JobTitles => &self.job_titles,
            ReferenceKind::Countries => &self.countries,
        }
    }

    /// Mutable access to the list cached for `kind`
    pub const fn list_mut(&mut self, kind: ReferenceKind) -> &mut ReferenceList {
        match kind {
            ReferenceKind::Timezones => &mut self.timezones,
            ReferenceKind::JobTitles => &mut self.job_titles,
            ReferenceKind::Countries => &mut self.countries,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Root
// ═══════════════════════════════════════════════════════════════════════

/// Root application state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Session
    pub auth: AuthState,
    /// Chrome
    pub layout: LayoutState,
    /// Lookup caches
    pub reference: ReferenceData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn option(label: &str) -> LabelValue {
        LabelValue {
            label: label.to_string(),
            value: json!(label),
        }
    }

    #[test]
    fn reference_list_lifecycle() {
        let mut list = ReferenceList::default();
        assert!(list.items().is_empty());

        list.pending();
        assert!(list.loading);

        list.fulfilled(vec![option("UTC")]);
        assert_eq!(list.items().len(), 1);
        assert!(!list.loading);

        list.pending();
        list.fulfilled(vec![option("GMT"), option("CET")]);
        assert_eq!(list.items(), &[option("GMT"), option("CET")]);

        list.rejected("boom".into());
        assert_eq!(list.data, Some(Vec::new()));
        assert_eq!(list.error.as_deref(), Some("boom"));
    }

    #[test]
    fn reference_data_addresses_by_kind() {
        let mut data = ReferenceData::default();
        data.list_mut(ReferenceKind::Countries).pending();
        assert!(data.countries.loading);
        assert!(!data.list(ReferenceKind::Timezones).loading);
    }
}
