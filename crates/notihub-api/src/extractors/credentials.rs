//! `RequestCredentials` extractor: collects the authorization headers.
//!
//! Extraction never fails; the handler decides which check applies once it
//! knows the body and the requested user.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use notihub_auth::Credentials;

/// Header carrying the calling application's identity.
pub const APP_ID_HEADER: &str = "appid";
/// Header carrying the application signature.
pub const APP_SIGNATURE_HEADER: &str = "appsignature";

/// Credentials presented with the request.
#[derive(Debug, Clone, Default)]
pub struct RequestCredentials(pub Credentials);

impl std::ops::Deref for RequestCredentials {
    type Target = Credentials;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RequestCredentials
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(from_headers(&parts.headers)))
    }
}

fn from_headers(headers: &HeaderMap) -> Credentials {
    let text = |name| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
    };

    Credentials {
        app_id: text(APP_ID_HEADER),
        app_signature: text(APP_SIGNATURE_HEADER),
        bearer: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string()),
    }
}
