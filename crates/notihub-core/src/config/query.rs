//! Query pipeline defaults.

use serde::{Deserialize, Serialize};

use crate::types::sorting::SortDirection;

/// Defaults and fixed settings for the read/count pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Fields matched by free-text search. Never taken from the request.
    #[serde(default = "default_searchable_fields")]
    pub searchable_fields: Vec<String>,
    /// Page size used when the request has no `per_page`.
    #[serde(default = "default_per_page")]
    pub default_per_page: u64,
    /// Sort field used when the request has no `sort_by`.
    #[serde(default = "default_sort_by")]
    pub default_sort_by: String,
    /// Sort direction used when the request has no `order`.
    #[serde(default = "default_sort_order")]
    pub default_sort_order: SortDirection,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            searchable_fields: default_searchable_fields(),
            default_per_page: default_per_page(),
            default_sort_by: default_sort_by(),
            default_sort_order: default_sort_order(),
        }
    }
}

fn default_searchable_fields() -> Vec<String> {
    vec!["name".to_string(), "description".to_string()]
}

fn default_per_page() -> u64 {
    10
}

fn default_sort_by() -> String {
    "created_at".to_string()
}

fn default_sort_order() -> SortDirection {
    SortDirection::Desc
}
