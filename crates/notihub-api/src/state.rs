//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use notihub_auth::Authorizer;
use notihub_core::config::AppConfig;
use notihub_core::traits::AuditSink;
use notihub_database::NotificationStore;
use notihub_service::NotificationService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Route-level authorization checks
    pub authorizer: Arc<Authorizer>,
    /// Notification service
    pub notification_service: Arc<NotificationService>,
}

impl AppState {
    /// Wire the state around an opened store.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn NotificationStore>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        let authorizer = Arc::new(Authorizer::new(&config.auth));
        Self {
            config: Arc::new(config),
            authorizer,
            notification_service: Arc::new(NotificationService::new(store, audit)),
        }
    }
}
