//! Admin credential verification for linkstash.
//!
//! The verifier holds the SHA-256 hex digest of the single admin secret and
//! checks submitted passwords against it in constant time. It is read-only;
//! seeding the stored credential row is a separate, explicit step done at
//! startup.

use ring::constant_time;
use ring::digest::{digest, SHA256};
use rusqlite::Connection;
use std::time::{SystemTime, UNIX_EPOCH};
use zeroize::Zeroize;

use crate::types::errors::Error;

/// Trait defining credential verification operations.
pub trait CredentialVerifierTrait {
    /// Checks a submitted secret against the configured admin credential.
    ///
    /// Fails closed: when no credential is configured, every input verifies
    /// false.
    fn verify(&self, secret: &str) -> bool;

    /// Whether an admin credential is configured at all.
    fn is_configured(&self) -> bool;
}

/// Credential verifier holding the stored digest of the admin secret.
pub struct CredentialVerifier {
    secret_sha256: Option<String>,
}

impl CredentialVerifier {
    /// A verifier with no credential configured. `verify` always returns false.
    pub fn unconfigured() -> Self {
        Self { secret_sha256: None }
    }

    /// Builds a verifier from an already-computed SHA-256 hex digest.
    pub fn from_digest(hex_digest: &str) -> Self {
        Self {
            secret_sha256: Some(hex_digest.to_ascii_lowercase()),
        }
    }

    /// Builds a verifier from a plaintext admin password.
    ///
    /// The plaintext is digested immediately and the local copy scrubbed.
    pub fn from_password(password: &str) -> Self {
        let mut buf = password.as_bytes().to_vec();
        let hex = Self::sha256_hex(&buf);
        buf.zeroize();
        Self {
            secret_sha256: Some(hex),
        }
    }

    /// Loads the verifier from the single stored credential row.
    ///
    /// A missing row yields an unconfigured verifier, which fails closed.
    pub fn from_database(conn: &Connection) -> Result<Self, Error> {
        let stored: Option<String> = conn
            .query_row(
                "SELECT secret_sha256 FROM admin_credential WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(Error::from(other)),
            })?;

        Ok(Self {
            secret_sha256: stored.map(|s| s.to_ascii_lowercase()),
        })
    }

    /// Writes the digest into the single credential row, replacing any
    /// previous value and preserving `created_at`.
    pub fn store_digest(conn: &Connection, hex_digest: &str) -> Result<(), Error> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        conn.execute(
            "INSERT INTO admin_credential (id, secret_sha256, created_at, updated_at) \
             VALUES (1, ?1, ?2, ?2) \
             ON CONFLICT(id) DO UPDATE SET secret_sha256 = excluded.secret_sha256, updated_at = excluded.updated_at",
            rusqlite::params![hex_digest.to_ascii_lowercase(), now],
        )?;
        Ok(())
    }

    /// SHA-256 of `input`, lowercase hex.
    pub fn sha256_hex(input: &[u8]) -> String {
        let d = digest(&SHA256, input);
        let mut out = String::with_capacity(d.as_ref().len() * 2);
        for byte in d.as_ref() {
            out.push_str(&format!("{:02x}", byte));
        }
        out
    }
}

impl CredentialVerifierTrait for CredentialVerifier {
    fn verify(&self, secret: &str) -> bool {
        let stored = match &self.secret_sha256 {
            Some(s) => s,
            None => return false,
        };
        let computed = Self::sha256_hex(secret.as_bytes());
        constant_time::verify_slices_are_equal(computed.as_bytes(), stored.as_bytes()).is_ok()
    }

    fn is_configured(&self) -> bool {
        self.secret_sha256.is_some()
    }
}
