//! Response DTOs.

use serde::{Deserialize, Serialize};

use notihub_core::types::pagination::{PageMeta, PageResult};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful.
    pub success: bool,
    /// Pagination metadata, present on list responses only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
    /// Response data.
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            meta: None,
            data,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Creates a successful list response carrying pagination metadata.
    pub fn page(result: PageResult<T>) -> Self {
        Self {
            success: true,
            meta: Some(result.meta),
            data: result.data,
        }
    }
}

/// Count response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// Number of matching notifications.
    pub count: u64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Configured store backend.
    pub backend: String,
}
