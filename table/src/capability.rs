//! Row-action capabilities.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Whether a row action is available.
#[derive(Clone)]
pub enum Capability {
    /// Same answer for every row
    Always(bool),
    /// Decided per row from its data
    PerRow(Arc<dyn Fn(&Value) -> bool + Send + Sync>),
}

impl Capability {
    /// Capability decided per row
    #[must_use]
    pub fn per_row<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::PerRow(Arc::new(predicate))
    }

    /// Evaluate for `row`. A per-row predicate is never called without a
    /// row; it is `false` instead.
    #[must_use]
    pub fn evaluate(&self, row: Option<&Value>) -> bool {
        match (self, row) {
            (Self::Always(enabled), _) => *enabled,
            (Self::PerRow(predicate), Some(row)) => predicate(row),
            (Self::PerRow(_), None) => false,
        }
    }

    /// Whether the action can apply to any row of the entity
    #[must_use]
    pub const fn enabled_for_entity(&self) -> bool {
        match self {
            Self::Always(enabled) => *enabled,
            Self::PerRow(_) => true,
        }
    }
}

impl Default for Capability {
    fn default() -> Self {
        Self::Always(false)
    }
}

impl From<bool> for Capability {
    fn from(enabled: bool) -> Self {
        Self::Always(enabled)
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always(enabled) => f.debug_tuple("Always").field(enabled).finish(),
            Self::PerRow(_) => f.write_str("PerRow(<fn>)"),
        }
    }
}

/// A row-level action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    /// Open the edit page
    Edit,
    /// Delete, after confirmation
    Delete,
    /// Restore from the recycle bin
    Restore,
    /// Open the permissions editor
    Permissions,
}

/// Capabilities of every row action for one entity type.
#[derive(Debug, Clone, Default)]
pub struct RowCapabilities {
    /// Edit
    pub edit: Capability,
    /// Delete
    pub delete: Capability,
    /// Restore
    pub restore: Capability,
    /// Permissions
    pub permissions: Capability,
}

impl RowCapabilities {
    /// Capability of `action`
    #[must_use]
    pub const fn get(&self, action: RowAction) -> &Capability {
        match action {
            RowAction::Edit => &self.edit,
            RowAction::Delete => &self.delete,
            RowAction::Restore => &self.restore,
            RowAction::Permissions => &self.permissions,
        }
    }

    /// Whether any action could apply to some row
    #[must_use]
    pub fn any_enabled(&self) -> bool {
        [&self.edit, &self.delete, &self.restore, &self.permissions]
            .into_iter()
            .any(Capability::enabled_for_entity)
    }

    /// Visible actions for `row`, in menu order
    #[must_use]
    pub fn menu_for(&self, row: Option<&Value>) -> RowMenu {
        RowMenu {
            edit: self.edit.evaluate(row),
            delete: self.delete.evaluate(row),
            restore: self.restore.evaluate(row),
            permissions: self.permissions.evaluate(row),
        }
    }
}

/// Which entries the action menu of one row shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowMenu {
    /// Edit
    pub edit: bool,
    /// Delete
    pub delete: bool,
    /// Restore
    pub restore: bool,
    /// Permissions
    pub permissions: bool,
}

impl RowMenu {
    /// Whether `action` is shown
    #[must_use]
    pub const fn shows(&self, action: RowAction) -> bool {
        match action {
            RowAction::Edit => self.edit,
            RowAction::Delete => self.delete,
            RowAction::Restore => self.restore,
            RowAction::Permissions => self.permissions,
        }
    }

    /// Whether the menu is empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.edit || self.delete || self.restore || self.permissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn per_row_is_false_without_a_row_and_never_called() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let capability = Capability::per_row(move |row| {
            counter.fetch_add(1, Ordering::SeqCst);
            row["deletable"] == json!(true)
        });

        assert!(!capability.evaluate(None));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(capability.evaluate(Some(&json!({"deletable": true}))));
        assert!(!capability.evaluate(Some(&json!({"deletable": false}))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn static_capability_ignores_row() {
        assert!(Capability::Always(true).evaluate(None));
        assert!(!Capability::from(false).evaluate(Some(&json!({}))));
    }

    #[test]
    fn entity_level_enablement() {
        let none = RowCapabilities::default();
        assert!(!none.any_enabled());

        let per_row = RowCapabilities {
            restore: Capability::per_row(|_| false),
            ..RowCapabilities::default()
        };
        assert!(per_row.any_enabled());
        assert!(per_row.menu_for(Some(&json!({}))).is_empty());
    }

    #[test]
    fn menu_for_row() {
        let capabilities = RowCapabilities {
            edit: true.into(),
            delete: Capability::per_row(|row| row["locked"] != json!(true)),
            ..RowCapabilities::default()
        };

        let menu = capabilities.menu_for(Some(&json!({"locked": true})));
        assert!(menu.shows(RowAction::Edit));
        assert!(!menu.shows(RowAction::Delete));

        let menu = capabilities.menu_for(None);
        assert!(menu.edit);
        assert!(!menu.delete);
    }
}
