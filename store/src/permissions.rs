//! Permission checks used to gate UI affordances.

use lexdesk_services::{Permission, PermissionAction};

/// Whether `permissions` grant `action` on `module_name`.
///
/// Pure: the answer depends only on the arguments. A module with no entry
/// grants nothing.
#[must_use]
pub fn check_permission(
    permissions: &[Permission],
    module_name: &str,
    action: PermissionAction,
) -> bool {
    permissions
        .iter()
        .find(|p| p.module_name == module_name)
        .is_some_and(|p| p.actions.allows(action))
}
