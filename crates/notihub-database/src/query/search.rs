//! Free-text search stage.

use notihub_entity::Notification;

/// Keep records where `text` occurs (case-sensitively) in at least one of
/// `fields`. `None` or empty text keeps everything.
pub fn apply<'a>(
    records: Vec<&'a Notification>,
    text: Option<&str>,
    fields: &[String],
) -> Vec<&'a Notification> {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return records;
    };
    records
        .into_iter()
        .filter(|record| {
            fields.iter().any(|field| {
                record
                    .field(field)
                    .is_some_and(|value| value.contains(text))
            })
        })
        .collect()
}
