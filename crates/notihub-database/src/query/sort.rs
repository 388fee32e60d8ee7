//! Ordering stage.

use notihub_core::types::sorting::{SortDirection, SortField};
use notihub_entity::Notification;

/// Order records by `sort.field` compared as text; absent fields compare as
/// the empty string. Ascending order is stable and descending order is its
/// exact reverse.
pub fn apply<'a>(records: Vec<&'a Notification>, sort: &SortField) -> Vec<&'a Notification> {
    let mut keyed: Vec<(String, &'a Notification)> = records
        .into_iter()
        .map(|record| {
            let key = record
                .field(&sort.field)
                .map(|v| v.into_owned())
                .unwrap_or_default();
            (key, record)
        })
        .collect();

    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    if sort.direction == SortDirection::Desc {
        keyed.reverse();
    }
    keyed.into_iter().map(|(_, record)| record).collect()
}
