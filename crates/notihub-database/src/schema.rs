//! Table bootstrap for the PostgreSQL backend.

use sqlx::PgPool;
use tracing::info;

use notihub_core::error::{AppError, ErrorKind};

const CREATE_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS notifications (
    id          BIGINT PRIMARY KEY,
    user_uuid   UUID   NOT NULL,
    uuid        TEXT   NOT NULL,
    payload     JSONB  NOT NULL,
    created_at  TEXT   NOT NULL,
    UNIQUE (user_uuid, uuid)
)";

const CREATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS notifications_user_id_idx ON notifications (user_uuid, id)";

/// Create the notifications table and its index when missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), AppError> {
    for statement in [CREATE_TABLE, CREATE_INDEX] {
        sqlx::query(statement).execute(pool).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Persistence,
                format!("Failed to prepare notifications table: {e}"),
                e,
            )
        })?;
    }
    info!("Notifications table ready");
    Ok(())
}
