//! Page slicing stage.

use notihub_core::types::pagination::{PageMeta, PageRequest, PageResult};
use notihub_entity::Notification;

/// Cut the requested page out of an already ordered result.
pub fn apply(records: Vec<&Notification>, page: &PageRequest) -> PageResult<Notification> {
    let meta = PageMeta::compute(page, records.len() as u64);
    let data = if meta.is_empty() {
        Vec::new()
    } else {
        // `from` is 1-based and never exceeds `records.len()`.
        let skip = (meta.from - 1) as usize;
        let take = meta.len() as usize;
        records.into_iter().skip(skip).take(take).cloned().collect()
    };
    PageResult { meta, data }
}
