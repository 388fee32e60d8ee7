//! Audit sink abstraction.
//!
//! The service layer reports every save/extract/count outcome through an
//! [`AuditSink`]. Recording is fire-and-forget: a sink must never fail the
//! operation that produced the event.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::id::UserId;

/// Severity of an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditSeverity {
    /// Normal outcome.
    Info,
    /// The operation failed.
    Error,
}

/// A single audit record.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
    /// Outcome severity.
    pub severity: AuditSeverity,
    /// User the operation was scoped to, when known.
    pub user: Option<UserId>,
    /// Human-readable description.
    pub message: String,
}

impl AuditEvent {
    /// An informational event stamped with the current time.
    pub fn info(user: Option<UserId>, message: impl Into<String>) -> Self {
        Self::at_now(AuditSeverity::Info, user, message)
    }

    /// An error event stamped with the current time.
    pub fn error(user: Option<UserId>, message: impl Into<String>) -> Self {
        Self::at_now(AuditSeverity::Error, user, message)
    }

    /// Restamp the event, e.g. with the time its request arrived.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    fn at_now(severity: AuditSeverity, user: Option<UserId>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            severity,
            user,
            message: message.into(),
        }
    }
}

/// Destination for audit events.
pub trait AuditSink: Send + Sync + 'static {
    /// Record an event. Must not block on slow I/O or panic.
    fn record(&self, event: AuditEvent);
}
