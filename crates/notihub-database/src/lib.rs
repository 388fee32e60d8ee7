//! # notihub-database
//!
//! Record store backends for NotiHub notifications and the query pipeline
//! they share. Three backends implement [`NotificationStore`]: an in-memory
//! store, the same store backed by a JSON-lines journal, and PostgreSQL.

pub mod connection;
pub mod query;
pub mod repositories;
pub mod schema;

pub use connection::DatabasePool;
pub use query::QueryPipeline;
pub use repositories::{NotificationStore, open_store};
