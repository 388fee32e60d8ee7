//! Application identity checks for internal callers.

pub mod signature;

pub use signature::AppSigner;
