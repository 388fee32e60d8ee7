//! `APPSIGNATURE` computation and verification.
//!
//! A signature is the lowercase hex SHA-256 digest of the application
//! secret immediately followed by the raw request body.

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use notihub_core::config::AppCredential;
use notihub_core::error::AppError;

/// Registry of known applications and their shared secrets.
#[derive(Clone, Default)]
pub struct AppSigner {
    secrets: HashMap<String, String>,
}

impl std::fmt::Debug for AppSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSigner")
            .field("apps", &self.secrets.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AppSigner {
    /// Build the registry from configured credentials.
    pub fn new(apps: &[AppCredential]) -> Self {
        Self {
            secrets: apps
                .iter()
                .map(|app| (app.app_id.clone(), app.secret.clone()))
                .collect(),
        }
    }

    /// Compute the signature `secret` produces over `body`.
    pub fn sign(secret: &str, body: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hasher.update(body);
        format!("{:x}", hasher.finalize())
    }

    /// Check that `signature` was produced by `app_id` over `body`.
    pub fn verify(&self, app_id: &str, signature: &str, body: &[u8]) -> Result<(), AppError> {
        let secret = self
            .secrets
            .get(app_id)
            .ok_or_else(|| AppError::unauthorized(format!("Unknown application '{app_id}'")))?;

        let expected = Self::sign(secret, body);
        if constant_time_eq(expected.as_bytes(), signature.trim().to_ascii_lowercase().as_bytes()) {
            Ok(())
        } else {
            Err(AppError::unauthorized("Application signature mismatch"))
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
