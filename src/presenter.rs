//! Turns the flat entry list held by the store into day groups of render
//! descriptors. Everything here is a pure function of its inputs: the same
//! entries, time zone, locale and "now" always give the same output.

use std::collections::HashMap;
use std::fmt::Display;

use chrono::{DateTime, Datelike, Locale, TimeZone, Utc};
use serde_json::Value;

use crate::domain::{ChangedBy, HistoryAction, HistoryEntry};
use crate::i18n::{keys, Catalog};

pub const EMPTY_VALUE: &str = "—";
pub const SYSTEM_ACTOR: &str = "System";
pub const CHANGE_ARROW: &str = "→";

const CLOCK_24H: &str = "%H:%M";
const CLOCK_12H: &str = "%I:%M %p";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryShape {
    RecordCreated,
    RecordDeleted,
    FieldSet {
        field: String,
        after: String,
    },
    FieldChanged {
        field: String,
        before: String,
        after: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub id: i64,
    pub shape: EntryShape,
    pub actor: String,
    pub timestamp: String,
}

impl EntryView {
    /// Plain-text rendering of the entry, e.g. `Status changed: Todo → Done`.
    pub fn headline(&self, catalog: &Catalog) -> String {
        match &self.shape {
            EntryShape::RecordCreated => format!(
                "{} {} {}",
                catalog.t(keys::RECORD_CREATED),
                catalog.t(keys::BY),
                self.actor
            ),
            EntryShape::RecordDeleted => format!(
                "{} {} {}",
                catalog.t(keys::RECORD_DELETED),
                catalog.t(keys::BY),
                self.actor
            ),
            EntryShape::FieldSet { field, after } => {
                format!("{} {}: {}", field, catalog.t(keys::FIELD_CREATED), after)
            }
            EntryShape::FieldChanged {
                field,
                before,
                after,
            } => format!(
                "{} {}: {} {} {}",
                field,
                catalog.t(keys::FIELD_UPDATED),
                before,
                CHANGE_ARROW,
                after
            ),
        }
    }

    pub fn is_banner(&self) -> bool {
        matches!(
            self.shape,
            EntryShape::RecordCreated | EntryShape::RecordDeleted
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayGroup {
    pub label: String,
    pub items: Vec<EntryView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup<'a> {
    pub label: String,
    pub entries: Vec<&'a HistoryEntry>,
}

pub fn format_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => EMPTY_VALUE.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(format_array_item)
            .collect::<Vec<_>>()
            .join(", "),
        Some(obj @ Value::Object(_)) => obj.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
    }
}

fn format_array_item(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => item.to_string(),
    }
}

/// Who made a change. A missing actor means the platform did it; an actor
/// with no usable identifier is an unknown person.
pub fn attribution(changed_by: Option<&ChangedBy>, catalog: &Catalog) -> String {
    let Some(actor) = changed_by else {
        return SYSTEM_ACTOR.to_string();
    };
    [&actor.name, &actor.email, &actor.user_id]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| catalog.t(keys::UNKNOWN_USER))
        .to_string()
}

pub fn classify(entry: &HistoryEntry) -> EntryShape {
    match entry.action {
        HistoryAction::Create if entry.is_whole_record() => EntryShape::RecordCreated,
        HistoryAction::Create => EntryShape::FieldSet {
            field: entry.field_label().to_string(),
            after: format_value(entry.after_value.as_ref()),
        },
        HistoryAction::Update => EntryShape::FieldChanged {
            field: entry.field_label().to_string(),
            before: format_value(entry.before_value.as_ref()),
            after: format_value(entry.after_value.as_ref()),
        },
        HistoryAction::Delete => EntryShape::RecordDeleted,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldOrder {
    MonthFirst,
    DayFirst { dotted: bool },
    YearFirst,
}

/// Day-label and timestamp patterns for one locale. Field order and the
/// hour clock are read off the locale's own `%x` and `%X` output; month
/// names come from `format_localized`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DatePatterns {
    day: String,
    time: String,
    time_with_year: String,
}

impl DatePatterns {
    fn for_locale(locale: Locale) -> Self {
        // Every field of 2001-02-03 15:04 prints differently
        let sample = Utc.with_ymd_and_hms(2001, 2, 3, 15, 4, 0).single();
        let (order, twelve_hour) = match sample {
            Some(sample) => (
                field_order(&sample.format_localized("%x", locale).to_string()),
                uses_twelve_hour_clock(
                    &sample.format_localized("%X", locale).to_string(),
                    &sample.format_localized("%p", locale).to_string(),
                ),
            ),
            None => (FieldOrder::MonthFirst, false),
        };
        let clock = if twelve_hour { CLOCK_12H } else { CLOCK_24H };

        match order {
            FieldOrder::MonthFirst => Self {
                day: "%B %-d, %Y".to_string(),
                time: format!("%b %-d, {}", clock),
                time_with_year: format!("%b %-d, %Y, {}", clock),
            },
            FieldOrder::DayFirst { dotted: true } => Self {
                day: "%-d. %B %Y".to_string(),
                time: format!("%-d. %b, {}", clock),
                time_with_year: format!("%-d. %b %Y, {}", clock),
            },
            FieldOrder::DayFirst { dotted: false } => Self {
                day: "%-d %B %Y".to_string(),
                time: format!("%-d %b, {}", clock),
                time_with_year: format!("%-d %b %Y, {}", clock),
            },
            FieldOrder::YearFirst => Self {
                day: "%Y %B %-d".to_string(),
                time: format!("%b %-d, {}", clock),
                time_with_year: format!("%Y %b %-d, {}", clock),
            },
        }
    }
}

/// Reads the field order from a locale's rendering of 2001-02-03.
fn field_order(short_date: &str) -> FieldOrder {
    let day = short_date.find("03");
    let month = short_date.find("02");
    let year = short_date.find("2001").or_else(|| short_date.find("01"));

    match (day, month, year) {
        (Some(d), Some(m), Some(y)) if y < d && y < m => FieldOrder::YearFirst,
        (Some(d), Some(m), _) if m < d => FieldOrder::MonthFirst,
        (Some(d), _, _) => FieldOrder::DayFirst {
            dotted: short_date[d + 2..].starts_with('.'),
        },
        // Locales with native digits or spelled-out months
        _ => FieldOrder::DayFirst { dotted: false },
    }
}

/// A locale uses the 12-hour clock when its time of 15:04 does not show
/// `15` and it has AM/PM markers to tell the halves apart.
fn uses_twelve_hour_clock(short_time: &str, am_pm: &str) -> bool {
    !short_time.contains("15") && !am_pm.trim().is_empty()
}

pub struct Presenter<Tz: TimeZone> {
    tz: Tz,
    locale: Locale,
    patterns: DatePatterns,
    current_year: i32,
}

impl<Tz> Presenter<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    pub fn new(tz: Tz, locale: Locale, now: DateTime<Utc>) -> Self {
        let current_year = now.with_timezone(&tz).year();
        Self {
            tz,
            locale,
            patterns: DatePatterns::for_locale(locale),
            current_year,
        }
    }

    /// Long calendar-day label, e.g. `March 5, 2026` or `5. März 2026`.
    pub fn day_label(&self, at: &DateTime<Utc>) -> String {
        at.with_timezone(&self.tz)
            .format_localized(&self.patterns.day, self.locale)
            .to_string()
    }

    pub fn format_timestamp(&self, at: &DateTime<Utc>) -> String {
        let local = at.with_timezone(&self.tz);
        let format = if local.year() == self.current_year {
            &self.patterns.time
        } else {
            &self.patterns.time_with_year
        };
        local.format_localized(format, self.locale).to_string()
    }

    /// Stable partition of `entries` by calendar day: groups appear in the
    /// order their day is first seen and keep the input order inside.
    pub fn group_by_day<'a>(&self, entries: &'a [HistoryEntry]) -> Vec<DayGroup<'a>> {
        let mut groups: Vec<DayGroup<'a>> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for entry in entries {
            let label = self.day_label(&entry.changed_at);
            match index.get(&label) {
                Some(&i) => groups[i].entries.push(entry),
                None => {
                    index.insert(label.clone(), groups.len());
                    groups.push(DayGroup {
                        label,
                        entries: vec![entry],
                    });
                }
            }
        }

        groups
    }

    pub fn view(&self, entry: &HistoryEntry, catalog: &Catalog) -> EntryView {
        EntryView {
            id: entry.id,
            shape: classify(entry),
            actor: attribution(entry.changed_by.as_ref(), catalog),
            timestamp: self.format_timestamp(&entry.changed_at),
        }
    }

    pub fn present(&self, entries: &[HistoryEntry], catalog: &Catalog) -> Vec<DisplayGroup> {
        self.group_by_day(entries)
            .into_iter()
            .map(|group| DisplayGroup {
                label: group.label,
                items: group
                    .entries
                    .into_iter()
                    .map(|entry| self.view(entry, catalog))
                    .collect(),
            })
            .collect()
    }
}
