//! Request dispatch for the linkstash HTTP API.
//!
//! Extracted from `api_server.rs` so it can be unit-tested without a socket.
//! Each function takes the `App` plus already-extracted request pieces
//! (Authorization header value, parsed path id, JSON body) and returns
//! `Result<Value, Error>`; the server layer wraps results in the response
//! envelope and maps errors to status codes via [`error_status`].

use serde_json::{json, Value};

use crate::app::App;
use crate::services::credential_verifier::CredentialVerifierTrait;
use crate::services::token_service::TokenServiceTrait;
use crate::stores::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use crate::stores::category_store::{CategoryStore, CategoryStoreTrait};
use crate::types::auth::Principal;
use crate::types::bookmark::{BookmarkFilter, NewBookmark};
use crate::types::category::NewCategory;
use crate::types::errors::Error;
use crate::types::export::ImportPayload;

/// HTTP status code for an error variant.
pub fn error_status(err: &Error) -> u16 {
    match err {
        Error::Validation(_) => 400,
        Error::Auth(_) => 401,
        Error::Forbidden(_) => 403,
        Error::NotFound(_) => 404,
        Error::Configuration(_) | Error::Database(_) => 500,
    }
}

/// Success envelope: `{"success": true, "data": ...}`.
pub fn success_envelope(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

/// Error envelope: `{"success": false, "message": ...}`.
pub fn error_envelope(err: &Error) -> Value {
    json!({ "success": false, "message": err.to_string() })
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    authorization?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolves the request's principal from the Authorization header, if any.
pub fn authenticate(app: &App, authorization: Option<&str>) -> Option<Principal> {
    bearer_token(authorization).and_then(|token| app.token_service.validate(token))
}

fn require_auth(app: &App, authorization: Option<&str>) -> Result<Principal, Error> {
    authenticate(app, authorization)
        .ok_or_else(|| Error::Auth("a valid bearer token is required".to_string()))
}

/// Parses the `category_id` query value. An absent or empty value means no
/// category filter; anything else must be an integer.
pub fn parse_category_id(raw: Option<&str>) -> Result<Option<i64>, Error> {
    match raw {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| Error::Validation(format!("invalid category_id: {}", s))),
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, Error> {
    serde_json::to_value(value).map_err(|e| Error::Database(format!("serialization failed: {}", e)))
}

// ─── Auth ───

/// `POST /auth/login`
pub fn login(app: &App, body: &Value) -> Result<Value, Error> {
    let password = body
        .get("password")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::Validation("password is required".to_string()))?;

    if !app.credential_verifier.verify(password) {
        return Err(Error::Auth("invalid password".to_string()));
    }

    let token = app.token_service.issue()?;
    Ok(json!({ "token": token }))
}

/// `GET /auth/verify` — answers a question rather than gating anything, so it
/// is always a 200 with a boolean.
pub fn verify(app: &App, authorization: Option<&str>) -> Value {
    json!({ "valid": authenticate(app, authorization).is_some() })
}

// ─── Bookmarks ───

/// `GET /bookmarks` — private rows are visible only with a valid token.
pub fn list_bookmarks(
    app: &App,
    authorization: Option<&str>,
    category_id: Option<i64>,
) -> Result<Value, Error> {
    let include_private = authenticate(app, authorization).is_some();
    let store = BookmarkStore::new(app.db.connection());
    let bookmarks = store.get_all(&BookmarkFilter {
        include_private,
        category_id,
    })?;
    to_value(&bookmarks)
}

/// `GET /bookmarks/:id`
pub fn get_bookmark(app: &App, authorization: Option<&str>, id: i64) -> Result<Value, Error> {
    let store = BookmarkStore::new(app.db.connection());
    let bookmark = store.get_by_id(id)?;

    if bookmark.is_private && authenticate(app, authorization).is_none() {
        return Err(Error::Forbidden(format!("bookmark {} is private", id)));
    }
    to_value(&bookmark)
}

/// `POST /bookmarks`
pub fn create_bookmark(app: &App, authorization: Option<&str>, body: &Value) -> Result<Value, Error> {
    require_auth(app, authorization)?;
    let fields: NewBookmark = serde_json::from_value(body.clone())
        .map_err(|e| Error::Validation(format!("invalid bookmark payload: {}", e)))?;

    let mut store = BookmarkStore::new(app.db.connection());
    to_value(&store.create(&fields)?)
}

/// `PUT /bookmarks/:id` — full replace of the mutable fields.
pub fn update_bookmark(
    app: &App,
    authorization: Option<&str>,
    id: i64,
    body: &Value,
) -> Result<Value, Error> {
    require_auth(app, authorization)?;
    let fields: NewBookmark = serde_json::from_value(body.clone())
        .map_err(|e| Error::Validation(format!("invalid bookmark payload: {}", e)))?;

    let mut store = BookmarkStore::new(app.db.connection());
    to_value(&store.update(id, &fields)?)
}

/// `DELETE /bookmarks/:id`
pub fn delete_bookmark(app: &App, authorization: Option<&str>, id: i64) -> Result<Value, Error> {
    require_auth(app, authorization)?;
    let mut store = BookmarkStore::new(app.db.connection());
    if !store.delete(id)? {
        return Err(Error::NotFound(format!("bookmark {} does not exist", id)));
    }
    Ok(json!({ "deleted": true }))
}

/// `GET /bookmarks/export`
pub fn export_bookmarks(app: &App, authorization: Option<&str>) -> Result<Value, Error> {
    require_auth(app, authorization)?;
    let store = BookmarkStore::new(app.db.connection());
    to_value(&store.export()?)
}

/// `POST /bookmarks/import`
pub fn import_bookmarks(app: &App, authorization: Option<&str>, body: &Value) -> Result<Value, Error> {
    require_auth(app, authorization)?;
    let payload: ImportPayload = serde_json::from_value(body.clone())
        .map_err(|e| Error::Validation(format!("invalid import payload: {}", e)))?;

    let mut store = BookmarkStore::new(app.db.connection());
    let imported = store.import(&payload)?;
    Ok(json!({ "imported": imported }))
}

// ─── Categories ───

/// `GET /categories`
pub fn list_categories(app: &App) -> Result<Value, Error> {
    let store = CategoryStore::new(app.db.connection());
    to_value(&store.get_all()?)
}

/// `GET /categories/:id`
pub fn get_category(app: &App, id: i64) -> Result<Value, Error> {
    let store = CategoryStore::new(app.db.connection());
    to_value(&store.get_by_id(id)?)
}

/// `POST /categories`
pub fn create_category(app: &App, authorization: Option<&str>, body: &Value) -> Result<Value, Error> {
    require_auth(app, authorization)?;
    let fields: NewCategory = serde_json::from_value(body.clone())
        .map_err(|e| Error::Validation(format!("invalid category payload: {}", e)))?;

    let mut store = CategoryStore::new(app.db.connection());
    to_value(&store.create(&fields)?)
}

/// `PUT /categories/:id`
pub fn update_category(
    app: &App,
    authorization: Option<&str>,
    id: i64,
    body: &Value,
) -> Result<Value, Error> {
    require_auth(app, authorization)?;
    let fields: NewCategory = serde_json::from_value(body.clone())
        .map_err(|e| Error::Validation(format!("invalid category payload: {}", e)))?;

    let mut store = CategoryStore::new(app.db.connection());
    to_value(&store.update(id, &fields)?)
}

/// `DELETE /categories/:id`
pub fn delete_category(app: &App, authorization: Option<&str>, id: i64) -> Result<Value, Error> {
    require_auth(app, authorization)?;
    let mut store = CategoryStore::new(app.db.connection());
    if !store.delete(id)? {
        return Err(Error::NotFound(format!("category {} does not exist", id)));
    }
    Ok(json!({ "deleted": true }))
}
