//! Save, extract and count notifications.

use std::sync::Arc;

use tracing::info;

use notihub_core::error::ErrorKind;
use notihub_core::result::AppResult;
use notihub_core::traits::{AuditEvent, AuditSink};
use notihub_core::types::id::UserId;
use notihub_core::types::pagination::PageResult;
use notihub_core::types::query::NotificationQuery;
use notihub_database::NotificationStore;
use notihub_entity::Notification;

use crate::context::RequestContext;

/// Mediates between the transport and the record store.
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    audit: Arc<dyn AuditSink>,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService").finish_non_exhaustive()
    }
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(store: Arc<dyn NotificationStore>, audit: Arc<dyn AuditSink>) -> Self {
        Self { store, audit }
    }

    /// Store a batch that may mix several owners.
    ///
    /// Records are grouped by `user_uuid` in order of first appearance and
    /// each group is written atomically. A failing group stops the save;
    /// groups written before it stay stored.
    pub async fn save(&self, ctx: &RequestContext, records: Vec<Notification>) -> AppResult<usize> {
        let mut stored = 0;
        for (user, group) in group_by_user(records) {
            let submitted = group.len();
            match self.store.write(group, user).await {
                Ok(written) => {
                    stored += written;
                    self.emit(ctx, AuditEvent::info(
                        Some(user),
                        format!(
                            "{} saved {written} of {submitted} notifications",
                            ctx.caller_label()
                        ),
                    ));
                }
                Err(e) => {
                    self.emit(ctx, AuditEvent::error(
                        Some(user),
                        format!("{} failed to save notifications: {e}", ctx.caller_label()),
                    ));
                    return Err(e);
                }
            }
        }
        info!(stored, "Notification batch saved");
        Ok(stored)
    }

    /// One page of `user`'s notifications. No match yields an empty page.
    pub async fn extract(
        &self,
        ctx: &RequestContext,
        user: UserId,
        query: &NotificationQuery,
    ) -> AppResult<PageResult<Notification>> {
        match self.store.read(user, query).await {
            Ok(page) => {
                self.emit(ctx, AuditEvent::info(
                    Some(user),
                    format!(
                        "{} extracted {} of {} notifications",
                        ctx.caller_label(),
                        page.data.len(),
                        page.meta.total
                    ),
                ));
                Ok(page)
            }
            Err(e) if e.is(ErrorKind::NotFound) => {
                self.emit(ctx, AuditEvent::info(
                    Some(user),
                    format!("{} extracted no notifications", ctx.caller_label()),
                ));
                Ok(PageResult::empty(&query.page))
            }
            Err(e) => {
                self.emit(ctx, AuditEvent::error(
                    Some(user),
                    format!("{} failed to extract notifications: {e}", ctx.caller_label()),
                ));
                Err(e)
            }
        }
    }

    /// Number of `user`'s notifications matching the filters and search.
    pub async fn count(
        &self,
        ctx: &RequestContext,
        user: UserId,
        query: &NotificationQuery,
    ) -> AppResult<u64> {
        let result = self.store.count(user, query).await;
        let event = match &result {
            Ok(count) => AuditEvent::info(
                Some(user),
                format!("{} counted {count} notifications", ctx.caller_label()),
            ),
            Err(e) => AuditEvent::error(
                Some(user),
                format!("{} failed to count notifications: {e}", ctx.caller_label()),
            ),
        };
        self.emit(ctx, event);
        result
    }

    /// Events carry the time the request arrived, not the time they were emitted.
    fn emit(&self, ctx: &RequestContext, event: AuditEvent) {
        self.audit.record(event.at(ctx.request_time));
    }

    /// Close the underlying store.
    pub async fn shutdown(&self) -> AppResult<()> {
        self.store.close().await
    }
}

fn group_by_user(records: Vec<Notification>) -> Vec<(UserId, Vec<Notification>)> {
    let mut groups: Vec<(UserId, Vec<Notification>)> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|(user, _)| *user == record.user_uuid) {
            Some((_, group)) => group.push(record),
            None => groups.push((record.user_uuid, vec![record])),
        }
    }
    groups
}
