//! App core for linkstash.
//!
//! Central struct holding the database and auth services. The admin
//! credential and signing secret arrive via an explicit [`AppConfig`];
//! there is no global mutable admin state.

use crate::config::AppConfig;
use crate::database::Database;
use crate::services::credential_verifier::{CredentialVerifier, CredentialVerifierTrait};
use crate::services::token_service::TokenService;
use crate::types::errors::Error;

/// Central application struct holding the database and auth services.
///
/// BookmarkStore and CategoryStore are created on-demand via `db.connection()`
/// because they borrow the connection with a lifetime parameter. The `App`
/// owns the `Database` outright; the server layer shares the whole `App`
/// behind a `Mutex`, which keeps the non-`Sync` connection single-user.
pub struct App {
    pub db: Database,
    pub credential_verifier: CredentialVerifier,
    pub token_service: TokenService,
}

impl App {
    /// Opens the database at the configured path and initializes auth services.
    ///
    /// Seeds the single admin credential row from the configured digest, then
    /// loads the verifier back from the stored row.
    pub fn new(config: &AppConfig) -> Result<Self, Error> {
        let db = Database::open(&config.db_path)?;
        Self::with_database(db, config)
    }

    /// Like [`App::new`] but backed by an in-memory database. Used in tests.
    pub fn in_memory(config: &AppConfig) -> Result<Self, Error> {
        let db = Database::open_in_memory()?;
        Self::with_database(db, config)
    }

    fn with_database(db: Database, config: &AppConfig) -> Result<Self, Error> {
        CredentialVerifier::store_digest(db.connection(), &config.admin_secret_sha256)?;
        let credential_verifier = CredentialVerifier::from_database(db.connection())?;
        if !credential_verifier.is_configured() {
            return Err(Error::Configuration(
                "admin credential could not be loaded".to_string(),
            ));
        }

        let token_service = TokenService::new(&config.token_secret);

        Ok(Self {
            db,
            credential_verifier,
            token_service,
        })
    }
}
