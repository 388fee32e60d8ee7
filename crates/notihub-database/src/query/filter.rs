//! Conjunctive filter stage.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use notihub_core::types::filter::{FilterCondition, FilterSpec};
use notihub_entity::Notification;

/// Keep the records that satisfy every filter. An empty filter list keeps all.
pub fn apply<'a>(records: Vec<&'a Notification>, filters: &[FilterSpec]) -> Vec<&'a Notification> {
    if filters.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| filters.iter().all(|spec| matches(record, spec)))
        .collect()
}

/// Whether one record satisfies one filter.
pub fn matches(record: &Notification, spec: &FilterSpec) -> bool {
    let Some(value) = record.field(&spec.field) else {
        return false;
    };
    match &spec.condition {
        FilterCondition::Daytime(range) => {
            calendar_day(&value).is_some_and(|day| range.contains(day))
        }
        FilterCondition::List(allowed) => allowed.contains(value.as_ref()),
    }
}

/// Calendar date of a timestamp, in the timestamp's own offset.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` (or space separated)
/// and a bare `YYYY-MM-DD`.
pub fn calendar_day(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
            return Some(ts.date());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}
