//! # notihub-service
//!
//! Service layer for NotiHub. [`NotificationService`] sits between the HTTP
//! handlers and the record store: it splits incoming batches per owner,
//! turns an empty read into an empty page, and reports every outcome to an
//! audit sink.
//!
//! Services follow constructor injection; all dependencies are provided at
//! construction time via `Arc` references.

pub mod audit;
pub mod context;
pub mod notification;

pub use audit::TracingAuditSink;
pub use context::RequestContext;
pub use notification::NotificationService;
