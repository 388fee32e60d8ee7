//! Notification store contract and its backends.

pub mod journal;
pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use notihub_core::config::{QueryConfig, StoreBackend, StoreConfig};
use notihub_core::error::AppError;
use notihub_core::result::AppResult;
use notihub_core::types::id::UserId;
use notihub_core::types::pagination::PageResult;
use notihub_core::types::query::NotificationQuery;
use notihub_entity::Notification;

use crate::query::QueryPipeline;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Durable, per-user collection of notifications.
///
/// Every operation is scoped to one user; records of other users are never
/// visible. After [`close`](NotificationStore::close) succeeds, every call
/// (including a second `close`) fails with `Closed`.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Persist a batch for `user` atomically.
    ///
    /// Records already stored under the same `(user_uuid, uuid)` are skipped.
    /// Returns the number of newly stored records.
    async fn write(&self, records: Vec<Notification>, user: UserId) -> AppResult<usize>;

    /// Filtered, searched, sorted and paginated records of `user`.
    ///
    /// `NotFound` when nothing passes the filters and the search.
    async fn read(&self, user: UserId, query: &NotificationQuery)
    -> AppResult<PageResult<Notification>>;

    /// Number of records of `user` passing the filters and the search.
    async fn count(&self, user: UserId, query: &NotificationQuery) -> AppResult<u64>;

    /// Release the backing resources.
    async fn close(&self) -> AppResult<()>;
}

/// Open the backend selected by configuration.
pub async fn open_store(
    store: &StoreConfig,
    query: &QueryConfig,
) -> AppResult<Arc<dyn NotificationStore>> {
    let pipeline = QueryPipeline::new(query.searchable_fields.clone());
    info!(backend = %store.backend, "Opening notification store");

    let opened: Arc<dyn NotificationStore> = match store.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new(pipeline)),
        StoreBackend::File => Arc::new(MemoryStore::open_journaled(&store.data_dir, pipeline).await?),
        StoreBackend::Postgres => Arc::new(PostgresStore::open(&store.database, pipeline).await?),
    };
    Ok(opened)
}

/// Reject a nil user scope.
pub(crate) fn require_user(user: UserId) -> AppResult<()> {
    if user.is_nil() {
        return Err(AppError::bad_request("A user scope is required"));
    }
    Ok(())
}

/// Check that every record belongs to `user`.
pub(crate) fn validate_batch(records: &[Notification], user: UserId) -> AppResult<()> {
    require_user(user)?;
    if let Some(stray) = records.iter().find(|r| r.user_uuid != user) {
        return Err(AppError::bad_request(format!(
            "Notification '{}' belongs to user {} but was written for {user}",
            stray.uuid, stray.user_uuid
        )));
    }
    Ok(())
}
