//! Builders shared by unit tests.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::domain::{ChangedBy, HistoryAction, HistoryEntry};

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

pub fn entry(id: i64) -> HistoryEntry {
    HistoryEntry {
        id,
        record_id: "rec-1".to_string(),
        field_id: "fld_status".to_string(),
        field_name: Some("Status".to_string()),
        before_value: None,
        after_value: None,
        action: HistoryAction::Update,
        changed_by: None,
        changed_at: at(2026, 10, 18, 9, 0),
    }
}

pub fn update(id: i64, changed_at: DateTime<Utc>, before: Value, after: Value) -> HistoryEntry {
    HistoryEntry {
        changed_at,
        before_value: Some(before),
        after_value: Some(after),
        ..entry(id)
    }
}

pub fn actor(name: Option<&str>, email: Option<&str>, user_id: Option<&str>) -> ChangedBy {
    ChangedBy {
        user_id: user_id.map(str::to_string),
        name: name.map(str::to_string),
        email: email.map(str::to_string),
    }
}
