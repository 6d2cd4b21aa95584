use serde::{Deserialize, Serialize};

/// The fixed subject encoded into every session token (single-admin model).
pub const ADMIN_SUBJECT: &str = "admin";

/// The authenticated identity decoded from a valid session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub subject: String,
}

/// Claims carried inside a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    /// Issued-at, UNIX seconds.
    pub iat: i64,
    /// Expiration, UNIX seconds. Tokens are valid until this instant and
    /// permanently expired after it; there is no revocation list.
    pub exp: i64,
}
