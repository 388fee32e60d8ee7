//! Filter specifications for the notification query pipeline.
//!
//! Filters arrive as JSON in the `filter` query parameter. The wire shape is
//! kept in [`RawFilterSpec`] and validated into a typed [`FilterSpec`] before
//! any record is touched, so malformed filters never reach a store.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// Wire kind name for calendar-day range filters.
pub const KIND_DAYTIME: &str = "daytime";
/// Wire kind name for value-set membership filters.
pub const KIND_LIST: &str = "list";

/// A filter exactly as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFilterSpec {
    /// Record field the filter applies to.
    pub field: String,
    /// `"daytime"` or `"list"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Kind-specific payload.
    #[serde(default)]
    pub value: Value,
}

/// Inclusive calendar-day bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaytimeRange {
    /// First day included.
    pub from: NaiveDate,
    /// Last day included.
    pub to: NaiveDate,
}

impl DaytimeRange {
    /// Whether `day` lies within the range.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from <= day && day <= self.to
    }
}

/// The typed condition a filter checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterCondition {
    /// The field's timestamp falls on a day inside the range.
    Daytime(DaytimeRange),
    /// The field's value is one of the set members (exact match).
    List(BTreeSet<String>),
}

/// A validated filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    /// Record field the filter applies to.
    pub field: String,
    /// Condition the field must satisfy.
    pub condition: FilterCondition,
}

impl FilterSpec {
    /// Build a calendar-day range filter.
    pub fn daytime(field: impl Into<String>, from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            field: field.into(),
            condition: FilterCondition::Daytime(DaytimeRange { from, to }),
        }
    }

    /// Build a value-set membership filter.
    pub fn list<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            condition: FilterCondition::List(values.into_iter().map(Into::into).collect()),
        }
    }

    /// Parse the `filter` request parameter.
    ///
    /// Accepts a JSON array of specs, a single spec object, or an empty
    /// object / blank string meaning "no filters".
    pub fn parse_list(input: &str) -> Result<Vec<Self>, AppError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let value: Value = serde_json::from_str(trimmed)
            .map_err(|e| AppError::bad_filter(format!("Filter is not valid JSON: {e}")))?;

        let raws: Vec<RawFilterSpec> = match value {
            Value::Array(_) => serde_json::from_value(value)
                .map_err(|e| AppError::bad_filter(format!("Malformed filter list: {e}")))?,
            Value::Object(ref map) if map.is_empty() => Vec::new(),
            Value::Object(_) => vec![
                serde_json::from_value(value)
                    .map_err(|e| AppError::bad_filter(format!("Malformed filter: {e}")))?,
            ],
            other => {
                return Err(AppError::bad_filter(format!(
                    "Filter must be an object or an array, got {other}"
                )));
            }
        };

        raws.into_iter().map(Self::try_from).collect()
    }
}

impl TryFrom<RawFilterSpec> for FilterSpec {
    type Error = AppError;

    fn try_from(raw: RawFilterSpec) -> Result<Self, Self::Error> {
        if raw.field.trim().is_empty() {
            return Err(AppError::bad_filter("Filter field must not be empty"));
        }

        let condition = match raw.kind.as_str() {
            KIND_DAYTIME => FilterCondition::Daytime(parse_range(&raw.field, &raw.value)?),
            KIND_LIST => FilterCondition::List(parse_set(&raw.field, &raw.value)?),
            other => {
                return Err(AppError::bad_filter(format!(
                    "Unknown filter type '{other}' for field '{}'",
                    raw.field
                )));
            }
        };

        Ok(Self {
            field: raw.field,
            condition,
        })
    }
}

fn parse_range(field: &str, value: &Value) -> Result<DaytimeRange, AppError> {
    let bound = |name: &str| -> Result<NaiveDate, AppError> {
        let text = value.get(name).and_then(Value::as_str).ok_or_else(|| {
            AppError::bad_filter(format!("Daytime filter on '{field}' needs a '{name}' date"))
        })?;
        NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| {
            AppError::bad_filter(format!("Invalid '{name}' date '{text}' on '{field}': {e}"))
        })
    };

    let range = DaytimeRange {
        from: bound("from")?,
        to: bound("to")?,
    };
    if range.from > range.to {
        return Err(AppError::bad_filter(format!(
            "Daytime filter on '{field}' has 'from' after 'to'"
        )));
    }
    Ok(range)
}

fn parse_set(field: &str, value: &Value) -> Result<BTreeSet<String>, AppError> {
    let items = value.as_array().ok_or_else(|| {
        AppError::bad_filter(format!("List filter on '{field}' needs an array value"))
    })?;
    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                AppError::bad_filter(format!("List filter on '{field}' accepts strings only"))
            })
        })
        .collect()
}
