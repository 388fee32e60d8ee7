//! # notihub-api
//!
//! HTTP API layer for NotiHub built on Axum.
//!
//! Provides the batch write, list and count endpoints, middleware (request
//! logging, tracing, CORS), extractors, DTOs, and error mapping to the
//! `{"success":false,"error":[..]}` envelope.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::serve;
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
