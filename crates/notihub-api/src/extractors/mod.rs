//! Custom Axum extractors.

pub mod credentials;
pub mod query;

pub use credentials::RequestCredentials;
pub use query::ApiQuery;
