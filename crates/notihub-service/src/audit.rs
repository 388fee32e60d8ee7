//! Audit sink that writes to the tracing pipeline.

use tracing::{error, info};

use notihub_core::traits::{AuditEvent, AuditSeverity, AuditSink};

/// Emits each audit event as a `tracing` event on the `audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        let user = event.user.map(|u| u.to_string()).unwrap_or_default();
        let at = event.timestamp.to_rfc3339();
        match event.severity {
            AuditSeverity::Info => {
                info!(target: "audit", user = %user, at = %at, "{}", event.message)
            }
            AuditSeverity::Error => {
                error!(target: "audit", user = %user, at = %at, "{}", event.message)
            }
        }
    }
}
