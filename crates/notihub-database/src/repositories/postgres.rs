//! PostgreSQL notification store.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use notihub_core::config::DatabaseConfig;
use notihub_core::error::{AppError, ErrorKind};
use notihub_core::result::AppResult;
use notihub_core::types::id::UserId;
use notihub_core::types::pagination::PageResult;
use notihub_core::types::query::NotificationQuery;
use notihub_entity::Notification;

use super::{NotificationStore, require_user, validate_batch};
use crate::connection::DatabasePool;
use crate::query::QueryPipeline;
use crate::schema::ensure_schema;

/// Notification store keeping each record as a JSONB row.
///
/// Writes hold an exclusive table lock for the length of their transaction,
/// which serializes id assignment. Reads fetch one user's rows in a single
/// statement and run the shared query pipeline in memory.
#[derive(Debug)]
pub struct PostgresStore {
    db: DatabasePool,
    pipeline: QueryPipeline,
    closed: AtomicBool,
}

impl PostgresStore {
    /// Connect and make sure the table exists.
    pub async fn open(config: &DatabaseConfig, pipeline: QueryPipeline) -> AppResult<Self> {
        let db = DatabasePool::connect(config).await?;
        ensure_schema(db.pool()).await?;
        info!("PostgreSQL notification store ready");
        Ok(Self {
            db,
            pipeline,
            closed: AtomicBool::new(false),
        })
    }

    fn ensure_open(&self) -> AppResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(AppError::closed("Notification store is closed"));
        }
        Ok(())
    }

    /// A `close` racing an operation surfaces as a closed pool; report it as
    /// `Closed` rather than a storage fault.
    fn db_error(&self, context: &str, e: sqlx::Error) -> AppError {
        let closed = self.closed.load(Ordering::Acquire) || matches!(e, sqlx::Error::PoolClosed);
        let kind = if closed {
            ErrorKind::Closed
        } else {
            ErrorKind::Persistence
        };
        AppError::with_source(kind, format!("{context}: {e}"), e)
    }

    async fn load(&self, user: UserId) -> AppResult<Vec<Notification>> {
        require_user(user)?;
        self.ensure_open()?;

        let payloads: Vec<Value> =
            sqlx::query_scalar("SELECT payload FROM notifications WHERE user_uuid = $1 ORDER BY id")
                .bind(user.into_uuid())
                .fetch_all(self.db.pool())
                .await
                .map_err(|e| self.db_error("Failed to load notifications", e))?;

        payloads
            .into_iter()
            .map(|payload| serde_json::from_value(payload).map_err(AppError::from))
            .collect()
    }
}

#[async_trait]
impl NotificationStore for PostgresStore {
    async fn write(&self, records: Vec<Notification>, user: UserId) -> AppResult<usize> {
        validate_batch(&records, user)?;
        self.ensure_open()?;

        let mut tx = self
            .db
            .pool()
            .begin()
            .await
            .map_err(|e| self.db_error("Failed to begin transaction", e))?;

        sqlx::query("LOCK TABLE notifications IN EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await
            .map_err(|e| self.db_error("Failed to lock notifications table", e))?;

        let next_id: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(id) + 1, 0) FROM notifications")
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| self.db_error("Failed to read next notification id", e))?;

        let mut seen = HashSet::new();
        let mut written: i64 = 0;
        for mut record in records {
            if !seen.insert(record.uuid.clone()) {
                continue;
            }
            record.id = (next_id + written) as u64;
            let payload = serde_json::to_value(&record)?;

            let result = sqlx::query(
                "INSERT INTO notifications (id, user_uuid, uuid, payload, created_at) \
                 VALUES ($1, $2, $3, $4, $5) ON CONFLICT (user_uuid, uuid) DO NOTHING",
            )
            .bind(next_id + written)
            .bind(user.into_uuid())
            .bind(&record.uuid)
            .bind(payload)
            .bind(&record.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| self.db_error("Failed to insert notification", e))?;

            written += result.rows_affected() as i64;
        }

        tx.commit()
            .await
            .map_err(|e| self.db_error("Failed to commit notifications", e))?;

        debug!(user = %user, written, "Notifications stored");
        Ok(written as usize)
    }

    async fn read(
        &self,
        user: UserId,
        query: &NotificationQuery,
    ) -> AppResult<PageResult<Notification>> {
        let records = self.load(user).await?;
        self.pipeline.execute(&records, query)
    }

    async fn count(&self, user: UserId, query: &NotificationQuery) -> AppResult<u64> {
        let records = self.load(user).await?;
        Ok(self.pipeline.count(&records, query))
    }

    async fn close(&self) -> AppResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(AppError::closed("Notification store is already closed"));
        }
        self.db.close().await;
        Ok(())
    }
}
