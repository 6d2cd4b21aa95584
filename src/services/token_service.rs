//! Session token issue/validate for linkstash.
//!
//! Tokens are `base64url(claims JSON) + "." + base64url(HMAC-SHA256)` signed
//! with the server-held secret. A token is valid from issuance until its
//! expiration timestamp and permanently expired after it; there is no
//! revocation list, so logout is client-side discard only.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use ring::hmac;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::auth::{Principal, TokenClaims, ADMIN_SUBJECT};
use crate::types::errors::Error;

/// Session token lifetime: 7 days.
pub const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Trait defining token issue/validate operations.
pub trait TokenServiceTrait {
    /// Issues a token for the admin principal expiring in [`TOKEN_TTL_SECS`].
    ///
    /// Fails with `Error::Configuration` when no signing secret is
    /// configured; never falls back to an unsigned token.
    fn issue(&self) -> Result<String, Error>;

    /// Issues a token with an explicit expiration timestamp.
    fn issue_expiring_at(&self, exp: i64) -> Result<String, Error>;

    /// Verifies signature and expiration, returning the decoded principal.
    ///
    /// Returns `None` for malformed tokens, bad signatures, expired claims,
    /// or a missing signing secret. Never panics on untrusted input.
    fn validate(&self, token: &str) -> Option<Principal>;
}

/// Token service holding the HMAC signing key.
pub struct TokenService {
    key: Option<hmac::Key>,
}

impl TokenService {
    /// Creates a token service from the signing secret.
    ///
    /// An empty secret leaves the service unconfigured: `issue` fails and
    /// `validate` rejects everything.
    pub fn new(signing_secret: &str) -> Self {
        if signing_secret.is_empty() {
            Self { key: None }
        } else {
            Self {
                key: Some(hmac::Key::new(hmac::HMAC_SHA256, signing_secret.as_bytes())),
            }
        }
    }

    /// A token service with no signing secret configured.
    pub fn unconfigured() -> Self {
        Self { key: None }
    }

    /// Returns the current UNIX timestamp in seconds.
    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

impl TokenServiceTrait for TokenService {
    fn issue(&self) -> Result<String, Error> {
        self.issue_expiring_at(Self::now() + TOKEN_TTL_SECS)
    }

    fn issue_expiring_at(&self, exp: i64) -> Result<String, Error> {
        let key = self.key.as_ref().ok_or_else(|| {
            Error::Configuration("token signing secret is not configured".to_string())
        })?;

        let claims = TokenClaims {
            sub: ADMIN_SUBJECT.to_string(),
            iat: Self::now(),
            exp,
        };
        let claims_json = serde_json::to_vec(&claims)
            .map_err(|e| Error::Database(format!("token claims encoding failed: {}", e)))?;

        let payload = URL_SAFE_NO_PAD.encode(claims_json);
        let signature = hmac::sign(key, payload.as_bytes());
        Ok(format!("{}.{}", payload, URL_SAFE_NO_PAD.encode(signature.as_ref())))
    }

    fn validate(&self, token: &str) -> Option<Principal> {
        let key = self.key.as_ref()?;

        let (payload, signature_b64) = token.split_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature_b64).ok()?;
        hmac::verify(key, payload.as_bytes(), &signature).ok()?;

        // Signature checked; the claims are now trusted input.
        let claims_json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let claims: TokenClaims = serde_json::from_slice(&claims_json).ok()?;

        if claims.sub != ADMIN_SUBJECT {
            return None;
        }
        if claims.exp <= Self::now() {
            return None;
        }

        Some(Principal {
            subject: claims.sub,
        })
    }
}
