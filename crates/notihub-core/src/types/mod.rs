//! Core type definitions shared across the NotiHub workspace.

pub mod filter;
pub mod id;
pub mod pagination;
pub mod query;
pub mod sorting;

pub use filter::{DaytimeRange, FilterCondition, FilterSpec, RawFilterSpec};
pub use id::*;
pub use pagination::{PageMeta, PageRequest, PageResult};
pub use query::NotificationQuery;
pub use sorting::{SortDirection, SortField};
