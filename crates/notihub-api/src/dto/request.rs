//! Query-string DTOs.

use serde::{Deserialize, Serialize};

use notihub_core::config::QueryConfig;
use notihub_core::error::AppError;
use notihub_core::types::filter::FilterSpec;
use notihub_core::types::id::UserId;
use notihub_core::types::pagination::PageRequest;
use notihub_core::types::query::NotificationQuery;
use notihub_core::types::sorting::{SortDirection, SortField};

/// Query parameters of the list and count endpoints.
///
/// Every field arrives as text so that malformed values produce the
/// "Wrong request" envelope instead of an extractor rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationParams {
    /// Owner whose notifications are read. Required.
    pub user_uuid: Option<String>,
    /// Page number, 1-based.
    pub page: Option<String>,
    /// Page size.
    pub per_page: Option<String>,
    /// JSON filter list, single filter object, or `{}`.
    pub filter: Option<String>,
    /// Free-text search.
    pub search: Option<String>,
    /// Field to sort by.
    pub sort_by: Option<String>,
    /// `asc` or `desc`, case-insensitive.
    pub order: Option<String>,
}

impl NotificationParams {
    /// The owning user.
    pub fn user(&self) -> Result<UserId, AppError> {
        let raw = present(&self.user_uuid)
            .ok_or_else(|| AppError::bad_request("Request has empty user_uuid parameter"))?;
        let user: UserId = raw
            .parse()
            .map_err(|e| AppError::bad_request(format!("Invalid user_uuid '{raw}': {e}")))?;
        if user.is_nil() {
            return Err(AppError::bad_request("user_uuid must not be nil"));
        }
        Ok(user)
    }

    /// Build the query for a list request.
    pub fn list_query(&self, defaults: &QueryConfig) -> Result<NotificationQuery, AppError> {
        let page = positive(&self.page, "page")?.unwrap_or(1);
        let per_page = positive(&self.per_page, "per_page")?.unwrap_or(defaults.default_per_page);

        let field = present(&self.sort_by)
            .map(str::to_string)
            .unwrap_or_else(|| defaults.default_sort_by.clone());
        let direction = match present(&self.order) {
            Some(order) => order.parse::<SortDirection>()?,
            None => defaults.default_sort_order,
        };

        self.query_with(SortField::new(field, direction), PageRequest::new(page, per_page))
    }

    /// Build a query from the filter and search parameters with an explicit
    /// sort and page. Counts pass [`PageRequest::all`].
    pub fn query_with(
        &self,
        sort: SortField,
        page: PageRequest,
    ) -> Result<NotificationQuery, AppError> {
        let filters = match self.filter.as_deref() {
            Some(raw) => FilterSpec::parse_list(raw)?,
            None => Vec::new(),
        };
        let mut query = NotificationQuery::new(sort, page).with_filters(filters);
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.with_search(search);
        }
        Ok(query)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn positive(value: &Option<String>, name: &str) -> Result<Option<u64>, AppError> {
    let Some(raw) = present(value) else {
        return Ok(None);
    };
    match raw.parse::<u64>() {
        Ok(n) if n >= 1 => Ok(Some(n)),
        _ => Err(AppError::bad_request(format!(
            "{name} must be an integer of at least 1, got '{raw}'"
        ))),
    }
}
