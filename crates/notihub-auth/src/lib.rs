//! # notihub-auth
//!
//! Caller authorization for NotiHub.
//!
//! ## Modules
//!
//! - `app` — application identity checks (`APPID` / `APPSIGNATURE` headers)
//! - `jwt` — user bearer token issuing and validation
//! - `authorizer` — the internal and external checks the API applies per route

pub mod app;
pub mod authorizer;
pub mod jwt;

pub use app::AppSigner;
pub use authorizer::{Authorizer, Caller, Credentials};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
