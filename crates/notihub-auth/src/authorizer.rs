//! Route-level authorization.
//!
//! Two checks exist. The internal check guards batch writes and accepts
//! registered applications only. The external check guards reads and counts
//! and accepts either a bearer token for the requested user or a registered
//! application.

use tracing::debug;

use notihub_core::config::AuthConfig;
use notihub_core::error::AppError;
use notihub_core::types::id::UserId;

use crate::app::AppSigner;
use crate::jwt::JwtDecoder;

/// Raw credentials pulled from request headers.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// `APPID` header.
    pub app_id: Option<String>,
    /// `APPSIGNATURE` header.
    pub app_signature: Option<String>,
    /// Token from `Authorization: Bearer <token>`.
    pub bearer: Option<String>,
}

/// Who a request was authorized as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// Authorization is disabled.
    Anonymous,
    /// A registered application.
    App(String),
    /// A user holding a bearer token.
    User(UserId),
}

/// Applies the internal and external checks.
#[derive(Debug, Clone)]
pub struct Authorizer {
    enabled: bool,
    apps: AppSigner,
    tokens: JwtDecoder,
}

impl Authorizer {
    /// Build from configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            enabled: config.enabled,
            apps: AppSigner::new(&config.apps),
            tokens: JwtDecoder::new(config),
        }
    }

    /// Whether checks are enforced.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Authorize an application submitting `body`.
    pub fn internal(&self, credentials: &Credentials, body: &[u8]) -> Result<Caller, AppError> {
        if !self.enabled {
            return Ok(Caller::Anonymous);
        }
        self.app(credentials, body)?
            .ok_or_else(|| AppError::unauthorized("Missing APPID or APPSIGNATURE header"))
    }

    /// Authorize a read scoped to `user`.
    pub fn external(&self, credentials: &Credentials, user: UserId) -> Result<Caller, AppError> {
        if !self.enabled {
            return Ok(Caller::Anonymous);
        }

        if let Some(token) = credentials.bearer.as_deref() {
            let claims = self.tokens.decode(token)?;
            if claims.user_id() != user {
                return Err(AppError::unauthorized(
                    "Token does not grant access to this user",
                ));
            }
            return Ok(Caller::User(user));
        }

        self.app(credentials, b"")?
            .ok_or_else(|| AppError::unauthorized("Missing credentials"))
    }

    fn app(&self, credentials: &Credentials, body: &[u8]) -> Result<Option<Caller>, AppError> {
        let (Some(app_id), Some(signature)) = (
            credentials.app_id.as_deref(),
            credentials.app_signature.as_deref(),
        ) else {
            return Ok(None);
        };
        self.apps.verify(app_id, signature, body)?;
        debug!(app_id, "Application authorized");
        Ok(Some(Caller::App(app_id.to_string())))
    }
}
