//! Application configuration for linkstash.
//!
//! All configuration comes from environment variables, read once at startup.
//! The admin credential and the token signing secret are both required; a
//! missing value is a `Configuration` error, never a degraded mode.

use std::env;
use zeroize::Zeroize;

use crate::services::credential_verifier::CredentialVerifier;
use crate::types::errors::Error;

/// Default SQLite database path.
const DEFAULT_DB_PATH: &str = "linkstash.db";

/// Default listen address.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8710";

/// Resolved application configuration, passed explicitly into [`crate::app::App`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SHA-256 hex digest of the admin password. A plaintext
    /// `LINKSTASH_ADMIN_PASSWORD` is digested at load time and scrubbed.
    pub admin_secret_sha256: String,
    /// HMAC signing secret for session tokens.
    pub token_secret: String,
    pub db_path: String,
    pub bind_addr: String,
}

impl AppConfig {
    /// Loads configuration from the environment.
    ///
    /// * `LINKSTASH_ADMIN_PASSWORD` (plaintext) or
    ///   `LINKSTASH_ADMIN_PASSWORD_SHA256` (64-char hex) — one required; the
    ///   digest form wins when both are set.
    /// * `LINKSTASH_TOKEN_SECRET` — required, non-empty.
    /// * `LINKSTASH_DB` — optional, defaults to `linkstash.db`.
    /// * `LINKSTASH_BIND` — optional, defaults to `127.0.0.1:8710`.
    pub fn from_env() -> Result<Self, Error> {
        let admin_secret_sha256 = Self::admin_digest_from_env()?;

        let token_secret = env::var("LINKSTASH_TOKEN_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::Configuration("LINKSTASH_TOKEN_SECRET must be set".to_string())
            })?;

        Ok(Self {
            admin_secret_sha256,
            token_secret,
            db_path: env::var("LINKSTASH_DB").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string()),
            bind_addr: env::var("LINKSTASH_BIND").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        })
    }

    fn admin_digest_from_env() -> Result<String, Error> {
        if let Ok(hex) = env::var("LINKSTASH_ADMIN_PASSWORD_SHA256") {
            if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(Error::Configuration(
                    "LINKSTASH_ADMIN_PASSWORD_SHA256 must be a 64-character hex digest".to_string(),
                ));
            }
            return Ok(hex.to_ascii_lowercase());
        }

        match env::var("LINKSTASH_ADMIN_PASSWORD") {
            Ok(mut password) if !password.is_empty() => {
                let digest = CredentialVerifier::sha256_hex(password.as_bytes());
                password.zeroize();
                Ok(digest)
            }
            _ => Err(Error::Configuration(
                "LINKSTASH_ADMIN_PASSWORD or LINKSTASH_ADMIN_PASSWORD_SHA256 must be set"
                    .to_string(),
            )),
        }
    }

    /// A config for tests: in-memory-style defaults with the given secrets.
    pub fn for_tests(admin_password: &str, token_secret: &str) -> Self {
        Self {
            admin_secret_sha256: CredentialVerifier::sha256_hex(admin_password.as_bytes()),
            token_secret: token_secret.to_string(),
            db_path: ":memory:".to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}
