//! The read/count request handed to a store.

use super::filter::FilterSpec;
use super::pagination::PageRequest;
use super::sorting::SortField;

/// Everything a read needs besides the owning user.
///
/// `count` uses only `filters` and `search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationQuery {
    /// Conjunctive filters.
    pub filters: Vec<FilterSpec>,
    /// Free-text search; `None` or empty matches everything.
    pub search: Option<String>,
    /// Ordering applied before pagination.
    pub sort: SortField,
    /// Page to return.
    pub page: PageRequest,
}

impl NotificationQuery {
    /// A query with no filters or search, sorted by `sort` and returning `page`.
    pub fn new(sort: SortField, page: PageRequest) -> Self {
        Self {
            filters: Vec::new(),
            search: None,
            sort,
            page,
        }
    }

    /// Add filters.
    pub fn with_filters(mut self, filters: Vec<FilterSpec>) -> Self {
        self.filters = filters;
        self
    }

    /// Set the search text.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// The search text, treating blank input as absent.
    pub fn search_text(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }
}

impl Default for NotificationQuery {
    fn default() -> Self {
        Self::new(SortField::desc("created_at"), PageRequest::default())
    }
}
