//! # notihub-core
//!
//! Core crate for NotiHub. Contains configuration schemas, typed
//! identifiers, filter/pagination/sorting/query types, the audit sink
//! trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other NotiHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
