//! In-memory notification store, optionally backed by a journal.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use notihub_core::error::AppError;
use notihub_core::result::AppResult;
use notihub_core::types::id::UserId;
use notihub_core::types::pagination::PageResult;
use notihub_core::types::query::NotificationQuery;
use notihub_entity::Notification;

use super::journal::Journal;
use super::{NotificationStore, require_user, validate_batch};
use crate::query::QueryPipeline;

/// Notification store holding every partition in process memory.
///
/// Each user's partition is an `Arc<Vec<_>>` replaced copy-on-write, so a
/// reader clones the `Arc` under the read lock and runs the query pipeline
/// on an immutable snapshot without blocking writers.
#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
    pipeline: QueryPipeline,
}

#[derive(Debug, Default)]
struct StoreState {
    partitions: HashMap<UserId, Arc<Vec<Notification>>>,
    identities: HashSet<(UserId, String)>,
    next_id: u64,
    journal: Option<Journal>,
    closed: bool,
}

impl StoreState {
    fn ensure_open(&self) -> AppResult<()> {
        if self.closed {
            return Err(AppError::closed("Notification store is closed"));
        }
        Ok(())
    }

    /// Drop already-stored and repeated records, then number the rest.
    fn prepare(&self, records: Vec<Notification>) -> Vec<Notification> {
        let mut seen = HashSet::new();
        let mut fresh = Vec::with_capacity(records.len());
        for mut record in records {
            let key = (record.user_uuid, record.uuid.clone());
            if self.identities.contains(&key) || !seen.insert(key) {
                continue;
            }
            record.id = self.next_id + fresh.len() as u64;
            fresh.push(record);
        }
        fresh
    }

    /// Make a numbered batch visible. Identities already published are
    /// skipped, so a batch journaled twice restores once.
    fn publish(&mut self, batch: Vec<Notification>) -> usize {
        let mut published = 0;
        for record in batch {
            self.next_id = self.next_id.max(record.id + 1);
            if !self
                .identities
                .insert((record.user_uuid, record.uuid.clone()))
            {
                continue;
            }
            Arc::make_mut(self.partitions.entry(record.user_uuid).or_default()).push(record);
            published += 1;
        }
        published
    }
}

impl MemoryStore {
    /// Create an empty store that keeps nothing across restarts.
    pub fn new(pipeline: QueryPipeline) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            pipeline,
        }
    }

    /// Open a store backed by the journal in `dir`, replaying its contents.
    pub async fn open_journaled(dir: impl AsRef<Path>, pipeline: QueryPipeline) -> AppResult<Self> {
        let (journal, batches) = Journal::open(dir).await?;

        let mut state = StoreState::default();
        let mut restored = 0usize;
        for batch in batches {
            restored += state.publish(batch);
        }
        state.journal = Some(journal);

        info!(
            records = restored,
            users = state.partitions.len(),
            next_id = state.next_id,
            "Notification store restored from journal"
        );
        Ok(Self {
            state: RwLock::new(state),
            pipeline,
        })
    }

    async fn snapshot(&self, user: UserId) -> AppResult<Option<Arc<Vec<Notification>>>> {
        require_user(user)?;
        let state = self.state.read().await;
        state.ensure_open()?;
        Ok(state.partitions.get(&user).cloned())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn write(&self, records: Vec<Notification>, user: UserId) -> AppResult<usize> {
        validate_batch(&records, user)?;

        let mut state = self.state.write().await;
        state.ensure_open()?;

        let fresh = state.prepare(records);
        if fresh.is_empty() {
            return Ok(0);
        }
        if let Some(journal) = state.journal.as_mut() {
            journal.append(&fresh).await?;
        }

        let written = state.publish(fresh);
        debug!(user = %user, written, "Notifications stored");
        Ok(written)
    }

    async fn read(
        &self,
        user: UserId,
        query: &NotificationQuery,
    ) -> AppResult<PageResult<Notification>> {
        match self.snapshot(user).await? {
            Some(records) => self.pipeline.execute(&records, query),
            None => Err(AppError::not_found("User has no notifications")),
        }
    }

    async fn count(&self, user: UserId, query: &NotificationQuery) -> AppResult<u64> {
        Ok(self
            .snapshot(user)
            .await?
            .map_or(0, |records| self.pipeline.count(&records, query)))
    }

    async fn close(&self) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.ensure_open()?;
        state.closed = true;
        if let Some(mut journal) = state.journal.take() {
            journal.sync().await?;
        }
        info!("Notification store closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::tests::{owner, record, record_for};
    use notihub_core::error::ErrorKind;
    use notihub_core::types::pagination::{PageMeta, PageRequest};
    use notihub_core::types::sorting::SortField;

    fn store() -> MemoryStore {
        MemoryStore::new(QueryPipeline::new(vec![
            "name".to_string(),
            "description".to_string(),
        ]))
    }

    fn all() -> NotificationQuery {
        NotificationQuery::new(SortField::asc("id"), PageRequest::all())
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let store = store();
        let mut alice = record("X", "alice", "2022-10-02T12:43:46Z");
        alice.description = "d".to_string();
        alice.category = "cat1".to_string();
        assert_eq!(store.write(vec![alice], owner()).await.expect("write"), 1);

        let query = NotificationQuery::new(SortField::desc("created_at"), PageRequest::new(1, 10));
        let page = store.read(owner(), &query).await.expect("read");
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, 0);
        assert_eq!(page.data[0].name, "alice");
        assert_eq!(
            page.meta,
            PageMeta {
                per_page: 10,
                current_page: 1,
                from: 1,
                to: 1,
                last_page: 1,
                total: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_ids_follow_write_order_across_users() {
        let store = store();
        let other = UserId::new();
        store
            .write(vec![record("a", "a", "2022-10-01"), record("b", "b", "2022-10-01")], owner())
            .await
            .expect("write");
        store
            .write(vec![record_for(other, "c", "c", "2022-10-01")], other)
            .await
            .expect("write");

        let mine = store.read(owner(), &all()).await.expect("read");
        let ids: Vec<_> = mine.data.iter().map(|n| n.id).collect();
        assert_eq!(ids, [0, 1]);
        let theirs = store.read(other, &all()).await.expect("read");
        assert_eq!(theirs.data[0].id, 2);
    }

    #[tokio::test]
    async fn test_rewrite_is_idempotent() {
        let store = store();
        let batch = vec![record("a", "a", "2022-10-01"), record("a", "dup", "2022-10-01")];
        assert_eq!(store.write(batch.clone(), owner()).await.expect("write"), 1);
        assert_eq!(store.write(batch, owner()).await.expect("write"), 0);
        assert_eq!(store.count(owner(), &all()).await.expect("count"), 1);
    }

    #[tokio::test]
    async fn test_users_are_partitioned() {
        let store = store();
        store
            .write(vec![record("a", "mine", "2022-10-01")], owner())
            .await
            .expect("write");

        let stranger = UserId::new();
        let err = store.read(stranger, &all()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(store.count(stranger, &all()).await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_rejects_foreign_records_and_nil_user() {
        let store = store();
        let err = store
            .write(vec![record("a", "a", "2022-10-01")], UserId::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadRequest);

        let nil = UserId::from_uuid(uuid::Uuid::nil());
        let err = store.count(nil, &all()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadRequest);

        // A rejected batch publishes nothing.
        assert_eq!(store.count(owner(), &all()).await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_closed_store_rejects_everything() {
        let store = store();
        store.close().await.expect("first close");

        let err = store.close().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Closed);
        let err = store
            .write(vec![record("a", "a", "2022-10-01")], owner())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Closed);
        assert!(store.read(owner(), &all()).await.unwrap_err().is(ErrorKind::Closed));
        assert!(store.count(owner(), &all()).await.unwrap_err().is(ErrorKind::Closed));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_never_see_partial_batches() {
        let store = Arc::new(store());
        let mut writers = Vec::new();
        for w in 0..8 {
            let store = Arc::clone(&store);
            writers.push(tokio::spawn(async move {
                for b in 0..10 {
                    let batch = (0..5)
                        .map(|i| record(&format!("{w}-{b}-{i}"), "n", "2022-10-01"))
                        .collect();
                    store.write(batch, owner()).await.expect("write");
                }
            }));
        }
        let reader = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                for _ in 0..200 {
                    let count = store.count(owner(), &all()).await.expect("count");
                    assert_eq!(count % 5, 0);
                    tokio::task::yield_now().await;
                }
            })
        };
        for writer in writers {
            writer.await.expect("writer");
        }
        reader.await.expect("reader");

        let page = store.read(owner(), &all()).await.expect("read");
        assert_eq!(page.meta.total, 400);
        assert_eq!(store.count(owner(), &all()).await.expect("count"), page.meta.total);
        let mut ids: Vec<_> = page.data.iter().map(|n| n.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..400).collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn test_journal_restores_records_and_ids() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pipeline = QueryPipeline::new(vec!["name".to_string()]);
        {
            let store = MemoryStore::open_journaled(dir.path(), pipeline.clone())
                .await
                .expect("open");
            store
                .write(vec![record("a", "a", "2022-10-01"), record("b", "b", "2022-10-02")], owner())
                .await
                .expect("write");
            store.close().await.expect("close");
        }

        let store = MemoryStore::open_journaled(dir.path(), pipeline)
            .await
            .expect("reopen");
        assert_eq!(store.write(vec![record("a", "a", "2022-10-01")], owner()).await.expect("dup"), 0);
        assert_eq!(
            store.write(vec![record("c", "c", "2022-10-03")], owner()).await.expect("write"),
            1
        );

        let page = store.read(owner(), &all()).await.expect("read");
        let ids: Vec<_> = page.data.iter().map(|n| (n.id, n.uuid.as_str())).collect();
        assert_eq!(ids, [(0, "a"), (1, "b"), (2, "c")]);
    }

    #[tokio::test]
    async fn test_acknowledged_write_survives_stray_fragment() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(crate::repositories::journal::JOURNAL_FILE);
        let pipeline = QueryPipeline::new(vec!["name".to_string()]);
        {
            let store = MemoryStore::open_journaled(dir.path(), pipeline.clone())
                .await
                .expect("open");
            store
                .write(vec![record("a", "a", "2022-10-01")], owner())
                .await
                .expect("write a");

            let mut bytes = std::fs::read(&path).expect("read");
            bytes.extend_from_slice(br#"[{"id":1,"user_"#);
            std::fs::write(&path, &bytes).expect("write fragment");

            store
                .write(vec![record("b", "b", "2022-10-02")], owner())
                .await
                .expect("write b");
        }

        let store = MemoryStore::open_journaled(dir.path(), pipeline)
            .await
            .expect("reopen");
        assert_eq!(store.count(owner(), &all()).await.expect("count"), 2);
    }

    #[tokio::test]
    async fn test_replay_skips_batch_journaled_twice() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(crate::repositories::journal::JOURNAL_FILE);
        let mut entry = record("a", "a", "2022-10-01");
        entry.id = 0;
        let line = serde_json::to_string(&vec![entry]).expect("json");
        std::fs::write(&path, format!("{line}\n{line}\n")).expect("write");

        let store = MemoryStore::open_journaled(dir.path(), QueryPipeline::new(Vec::new()))
            .await
            .expect("open");
        assert_eq!(store.count(owner(), &all()).await.expect("count"), 1);
        assert_eq!(
            store.write(vec![record("b", "b", "2022-10-02")], owner()).await.expect("write"),
            1
        );
        let page = store.read(owner(), &all()).await.expect("read");
        let ids: Vec<_> = page.data.iter().map(|n| n.id).collect();
        assert_eq!(ids, [0, 1]);
    }
}
