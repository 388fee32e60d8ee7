//! # notihub-entity
//!
//! Domain entity models for NotiHub. A [`notification::Notification`] is
//! the only stored record type; it is immutable once written.

pub mod notification;

pub use notification::Notification;
