//! Backend data shapes shared by the store and the pages.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Signed-in user's profile.
///
/// Only the fields the client relies on are typed; everything else the
/// backend sends is kept in `extra` and written back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User id
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Login email
    #[serde(default)]
    pub email: Option<String>,
    /// Firm the user belongs to
    #[serde(default)]
    pub firm_id: Option<String>,
    /// Profile image URL
    #[serde(default)]
    pub profile_image: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A CRUD-style action that can be granted on a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    /// Create records
    Create,
    /// View records
    Read,
    /// Edit records
    Update,
    /// Delete records
    Delete,
    /// Restore deleted records
    Restore,
    /// Manage other users' permissions
    Permissions,
}

/// Grants for one module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionActions {
    /// Create records
    #[serde(default)]
    pub create: bool,
    /// View records
    #[serde(default)]
    pub read: bool,
    /// Edit records
    #[serde(default)]
    pub update: bool,
    /// Delete records
    #[serde(default)]
    pub delete: bool,
    /// Restore deleted records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore: Option<bool>,
    /// Manage permissions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<bool>,
}

impl PermissionActions {
    /// Whether `action` is granted. Optional grants default to denied.
    #[must_use]
    pub fn allows(&self, action: PermissionAction) -> bool {
        match action {
            PermissionAction::Create => self.create,
            PermissionAction::Read => self.read,
            PermissionAction::Update => self.update,
            PermissionAction::Delete => self.delete,
            PermissionAction::Restore => self.restore.unwrap_or(false),
            PermissionAction::Permissions => self.permissions.unwrap_or(false),
        }
    }
}

/// Permission entry, one per module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    /// Module name, e.g. `contacts`
    pub module_name: String,
    /// Granted actions
    #[serde(default)]
    pub actions: PermissionActions,
}

/// Option for a select control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelValue {
    /// Text shown to the user
    pub label: String,
    /// Value submitted
    pub value: Value,
}

impl LabelValue {
    /// Build an option from a backend record.
    ///
    /// Records already shaped `{label, value}` are taken as-is; otherwise the
    /// label comes from `name` or `title` and the value from `id` or `_id`.
    #[must_use]
    pub fn from_record(record: &Value) -> Option<Self> {
        let field = |keys: &[&str]| keys.iter().find_map(|k| record.get(*k)).cloned();

        let label = field(&["label", "name", "title"])?;
        let label = match label {
            Value::String(s) => s,
            other => other.to_string(),
        };
        let value = field(&["value", "id", "_id"]).unwrap_or_else(|| Value::String(label.clone()));

        Some(Self { label, value })
    }
}

/// Result of a successful login or OTP verification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    /// Bearer token
    pub token: String,
    /// Profile of the signed-in user
    #[serde(default)]
    pub user: Option<UserProfile>,
    /// Role tag
    #[serde(default)]
    pub role: Option<String>,
    /// Module grants
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// Result of the password step of login.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginStep {
    /// Email the OTP was sent to
    #[serde(default)]
    pub email: String,
    /// Server message to show
    #[serde(default)]
    pub message: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profile_keeps_unknown_fields() {
        let profile: UserProfile = serde_json::from_value(json!({
            "id": 17,
            "name": "Ada",
            "firmId": "f-1",
            "timezone": "Europe/London"
        }))
        .unwrap();

        assert_eq!(profile.id, "17");
        assert_eq!(profile.firm_id.as_deref(), Some("f-1"));
        assert_eq!(profile.extra.get("timezone"), Some(&json!("Europe/London")));

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["timezone"], json!("Europe/London"));
    }

    #[test]
    fn permission_defaults_optional_grants_to_denied() {
        let permission: Permission = serde_json::from_value(json!({
            "moduleName": "contacts",
            "actions": {"create": true, "read": true, "update": false, "delete": false}
        }))
        .unwrap();

        assert!(permission.actions.allows(PermissionAction::Create));
        assert!(!permission.actions.allows(PermissionAction::Restore));
        assert!(!permission.actions.allows(PermissionAction::Permissions));
    }

    #[test]
    fn label_value_from_varied_records() {
        assert_eq!(
            LabelValue::from_record(&json!({"label": "UTC", "value": "UTC"})),
            Some(LabelValue {
                label: "UTC".into(),
                value: json!("UTC")
            })
        );
        assert_eq!(
            LabelValue::from_record(&json!({"id": 4, "name": "Partner"})),
            Some(LabelValue {
                label: "Partner".into(),
                value: json!(4)
            })
        );
        assert_eq!(LabelValue::from_record(&json!({"id": 4})), None);
    }
}
