use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Field id the server uses for entries that describe the record itself
/// rather than one of its columns.
pub const WHOLE_RECORD_FIELD: &str = "__all__";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedBy {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    #[serde(deserialize_with = "id_string")]
    pub record_id: String,
    pub field_id: String,
    #[serde(default)]
    pub field_name: Option<String>,
    #[serde(default)]
    pub before_value: Option<serde_json::Value>,
    #[serde(default)]
    pub after_value: Option<serde_json::Value>,
    pub action: HistoryAction,
    #[serde(default)]
    pub changed_by: Option<ChangedBy>,
    pub changed_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn is_whole_record(&self) -> bool {
        self.field_id == WHOLE_RECORD_FIELD
    }

    /// Column label shown to the user: the field name when the server sent
    /// one, the raw field id otherwise.
    pub fn field_label(&self) -> &str {
        match self.field_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.field_id,
        }
    }
}

/// One decoded page of the history endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    #[serde(default)]
    pub records: Vec<HistoryEntry>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

// Record and user ids arrive as numbers from some deployments and as strings
// from others.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_camel_case_entry() {
        let entry: HistoryEntry = serde_json::from_value(json!({
            "id": 7,
            "recordId": 42,
            "fieldId": "fld_status",
            "fieldName": "Status",
            "beforeValue": "Todo",
            "afterValue": "Done",
            "action": "update",
            "changedBy": { "userId": 3, "name": "Alice" },
            "changedAt": "2026-10-18T09:30:00Z"
        }))
        .expect("decode entry");

        assert_eq!(entry.record_id, "42");
        assert_eq!(entry.action, HistoryAction::Update);
        assert_eq!(entry.field_label(), "Status");
        let actor = entry.changed_by.expect("actor");
        assert_eq!(actor.user_id.as_deref(), Some("3"));
        assert_eq!(actor.email, None);
    }

    #[test]
    fn missing_optional_fields_decode_as_none() {
        let entry: HistoryEntry = serde_json::from_value(json!({
            "id": 1,
            "recordId": "rec-1",
            "fieldId": "__all__",
            "action": "create",
            "changedAt": "2026-01-02T03:04:05.000Z"
        }))
        .expect("decode entry");

        assert!(entry.is_whole_record());
        assert!(entry.before_value.is_none());
        assert!(entry.after_value.is_none());
        assert!(entry.changed_by.is_none());
        assert_eq!(entry.field_label(), "__all__");
    }

    #[test]
    fn explicit_null_value_is_absent() {
        let entry: HistoryEntry = serde_json::from_value(json!({
            "id": 1,
            "recordId": "rec-1",
            "fieldId": "fld_a",
            "beforeValue": null,
            "afterValue": [1, 2],
            "action": "update",
            "changedAt": "2026-01-02T03:04:05Z"
        }))
        .expect("decode entry");

        assert!(entry.before_value.is_none());
        assert_eq!(entry.after_value, Some(json!([1, 2])));
    }

    #[test]
    fn rejects_unknown_action() {
        let result = serde_json::from_value::<HistoryEntry>(json!({
            "id": 1,
            "recordId": "rec-1",
            "fieldId": "fld_a",
            "action": "merge",
            "changedAt": "2026-01-02T03:04:05Z"
        }));
        assert!(result.is_err());
    }
}
