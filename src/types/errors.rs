use std::fmt;

/// Unified error type for the linkstash core.
///
/// Every fallible operation in the stores, auth services, and handler layer
/// returns this enum. The handler layer maps variants to HTTP status codes;
/// see `api_handler::error_status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required field is missing or empty, or a payload is malformed.
    Validation(String),
    /// The requested record does not exist.
    NotFound(String),
    /// Bad password or a missing/invalid/expired token.
    Auth(String),
    /// The caller is known but not allowed to see this resource.
    Forbidden(String),
    /// A required configuration value (admin credential, signing secret) is absent.
    Configuration(String),
    /// The backing store failed.
    Database(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(msg) => write!(f, "Validation error: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::Auth(msg) => write!(f, "Authentication error: {}", msg),
            Error::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            Error::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            Error::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Database(e.to_string())
    }
}
