//! Server lifecycle: serve the router until shutdown, then close the store.

use std::future::Future;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

use notihub_core::error::AppError;

use crate::router::build_router;
use crate::state::AppState;

/// Serve `state` on `listener` until `shutdown` resolves.
///
/// Open connections get `server.shutdown_grace_seconds` to finish once the
/// signal fires. The notification store is closed afterwards, so the
/// process releases it exactly once.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let grace = Duration::from_secs(state.config.server.shutdown_grace_seconds);
    let service = state.notification_service.clone();
    let app = build_router(state);

    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "NotiHub server listening");
    }

    let (signalled_tx, mut signalled_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown.await;
        info!("Shutdown signal received, draining connections");
        let _ = signalled_tx.send(true);
    });

    let grace_timer = async move {
        if signalled_rx.wait_for(|signalled| *signalled).await.is_ok() {
            tokio::time::sleep(grace).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server.into_future() => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = grace_timer => {
            warn!(grace_seconds = grace.as_secs(), "Grace period elapsed, dropping open connections");
        }
    }

    service.shutdown().await?;
    info!("NotiHub server shut down");
    Ok(())
}
