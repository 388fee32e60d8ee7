//! The read/count query pipeline.
//!
//! Stages are plain functions over borrowed records and always run in the
//! order filter, search, sort, paginate. Every store backend loads a
//! snapshot of one user's records and hands it to [`QueryPipeline`], so
//! all backends answer the same query identically.

pub mod filter;
pub mod paginate;
pub mod search;
pub mod sort;

use notihub_core::error::AppError;
use notihub_core::result::AppResult;
use notihub_core::types::pagination::PageResult;
use notihub_core::types::query::NotificationQuery;
use notihub_entity::Notification;

/// Composes the pipeline stages with the configured searchable fields.
#[derive(Debug, Clone)]
pub struct QueryPipeline {
    searchable_fields: Vec<String>,
}

impl QueryPipeline {
    /// Create a pipeline searching the given fields.
    pub fn new(searchable_fields: Vec<String>) -> Self {
        Self { searchable_fields }
    }

    /// Fields consulted by free-text search.
    pub fn searchable_fields(&self) -> &[String] {
        &self.searchable_fields
    }

    /// Records that pass the filters and the search, in input order.
    pub fn matching<'a>(
        &self,
        records: &'a [Notification],
        query: &NotificationQuery,
    ) -> Vec<&'a Notification> {
        let filtered = filter::apply(records.iter().collect(), &query.filters);
        search::apply(filtered, query.search_text(), &self.searchable_fields)
    }

    /// Run the full pipeline.
    ///
    /// Returns `NotFound` when nothing passes the filters and the search.
    pub fn execute(
        &self,
        records: &[Notification],
        query: &NotificationQuery,
    ) -> AppResult<PageResult<Notification>> {
        let matched = self.matching(records, query);
        if matched.is_empty() {
            return Err(AppError::not_found("No notifications match the query"));
        }
        let sorted = sort::apply(matched, &query.sort);
        Ok(paginate::apply(sorted, &query.page))
    }

    /// Number of records passing the filters and the search.
    pub fn count(&self, records: &[Notification], query: &NotificationQuery) -> u64 {
        self.matching(records, query).len() as u64
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use notihub_core::error::ErrorKind;
    use notihub_core::types::filter::FilterSpec;
    use notihub_core::types::id::UserId;
    use notihub_core::types::pagination::PageRequest;
    use notihub_core::types::sorting::SortField;
    use serde_json::Map;

    pub(crate) fn owner() -> UserId {
        "2593ede0-2301-4480-a452-752f03dcfab0"
            .parse()
            .expect("valid uuid")
    }

    pub(crate) fn record(uuid: &str, name: &str, created_at: &str) -> Notification {
        record_for(owner(), uuid, name, created_at)
    }

    pub(crate) fn record_for(
        user: UserId,
        uuid: &str,
        name: &str,
        created_at: &str,
    ) -> Notification {
        Notification {
            id: 0,
            user_uuid: user,
            category: "new_rank".to_string(),
            uuid: uuid.to_string(),
            name: name.to_string(),
            description: String::new(),
            created_at: created_at.to_string(),
            object_uuid: String::new(),
            task_uuid: None,
            extra: Map::new(),
        }
    }

    fn pipeline() -> QueryPipeline {
        QueryPipeline::new(vec!["name".to_string(), "description".to_string()])
    }

    #[test]
    fn test_stages_compose_in_order() {
        let records = vec![
            record("a", "alpha one", "2022-10-01T10:00:00Z"),
            record("b", "alpha two", "2022-10-03T10:00:00Z"),
            record("c", "beta", "2022-10-02T10:00:00Z"),
            record("d", "alpha three", "2022-10-09T10:00:00Z"),
        ];
        let query = NotificationQuery::new(SortField::desc("created_at"), PageRequest::new(1, 1))
            .with_filters(
                FilterSpec::parse_list(
                    r#"{"field":"created_at","type":"daytime","value":{"from":"2022-10-01","to":"2022-10-05"}}"#,
                )
                .expect("valid filter"),
            )
            .with_search("alpha");

        let page = pipeline().execute(&records, &query).expect("matches");
        assert_eq!(page.meta.total, 2);
        assert_eq!(page.meta.last_page, 2);
        assert_eq!(page.data[0].uuid, "b");
        assert_eq!(pipeline().count(&records, &query), 2);
    }

    #[test]
    fn test_no_match_is_not_found() {
        let records = vec![record("a", "alpha", "2022-10-01")];
        let query = NotificationQuery::default().with_search("omega");
        let err = pipeline().execute(&records, &query).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(pipeline().count(&records, &query), 0);
    }

    #[test]
    fn test_page_past_end_is_not_an_error() {
        let records = vec![record("a", "alpha", "2022-10-01")];
        let mut query = NotificationQuery::default();
        query.page = PageRequest::new(5, 10);
        let page = pipeline().execute(&records, &query).expect("non-empty match");
        assert!(page.data.is_empty());
        assert_eq!(page.meta.total, 1);
    }
}
