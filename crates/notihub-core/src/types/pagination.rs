//! Pagination types for list queries.

use serde::{Deserialize, Serialize};

/// Requested page (both fields 1-based and at least 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub per_page: u64,
}

impl PageRequest {
    /// Create a new page request, raising zero values to 1.
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// A single page holding every matching record.
    pub fn all() -> Self {
        Self::new(1, u64::MAX)
    }

    /// Number of items preceding this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Page size used.
    pub per_page: u64,
    /// Page number returned.
    pub current_page: u64,
    /// 1-based position of the first returned item, or 0 when the page is empty.
    pub from: u64,
    /// 1-based position of the last returned item, or 0 when the page is empty.
    pub to: u64,
    /// Number of the final page, at least 1.
    pub last_page: u64,
    /// Number of items across all pages.
    pub total: u64,
}

impl PageMeta {
    /// Compute metadata for `request` over a result of `total` items.
    pub fn compute(request: &PageRequest, total: u64) -> Self {
        let per_page = request.per_page.max(1);
        let last_page = total.div_ceil(per_page).max(1);
        let offset = request.offset();

        let (from, to) = if offset < total {
            (offset + 1, offset.saturating_add(per_page).min(total))
        } else {
            (0, 0)
        };

        Self {
            per_page,
            current_page: request.page,
            from,
            to,
            last_page,
            total,
        }
    }

    /// Number of items on the described page.
    pub fn len(&self) -> u64 {
        if self.to == 0 { 0 } else { self.to - self.from + 1 }
    }

    /// Whether the described page holds no items.
    pub fn is_empty(&self) -> bool {
        self.to == 0
    }
}

/// One page of results plus its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult<T> {
    /// Pagination metadata.
    pub meta: PageMeta,
    /// The items on this page.
    pub data: Vec<T>,
}

impl<T> PageResult<T> {
    /// An empty result for `request`.
    pub fn empty(request: &PageRequest) -> Self {
        Self {
            meta: PageMeta::compute(request, 0),
            data: Vec::new(),
        }
    }

    /// Transform every item while keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            meta: self.meta,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}
