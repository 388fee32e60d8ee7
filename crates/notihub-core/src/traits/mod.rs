//! Core traits defined in `notihub-core` and implemented by other crates.

pub mod audit;

pub use audit::{AuditEvent, AuditSeverity, AuditSink};
