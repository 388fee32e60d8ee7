//! Caller authorization configuration.

use serde::{Deserialize, Serialize};

/// Authorization settings for internal (application) and external (user) callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// When `false`, every request is treated as authorized.
    #[serde(default)]
    pub enabled: bool,
    /// Secret key for verifying user bearer tokens (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Applications allowed to submit notification batches.
    #[serde(default)]
    pub apps: Vec<AppCredential>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            jwt_secret: default_jwt_secret(),
            apps: Vec::new(),
        }
    }
}

/// A registered calling application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppCredential {
    /// Value expected in the `APPID` header.
    pub app_id: String,
    /// Shared secret used to compute `APPSIGNATURE`.
    pub secret: String,
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}
