//! linkstash API server — the HTTP surface over the core contract.
//!
//! Thin axum wrappers around `linkstash::api_handler`: each route extracts
//! the Authorization header, path id, query, and JSON body, then delegates.
//! All dispatch logic lives in the library so it stays testable without a
//! socket.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use linkstash::api_handler as api;
use linkstash::app::App;
use linkstash::config::AppConfig;
use linkstash::types::errors::Error;

type SharedApp = Arc<Mutex<App>>;

fn lock_app(app: &SharedApp) -> Result<MutexGuard<'_, App>, Error> {
    app.lock()
        .map_err(|e| Error::Database(format!("app lock poisoned: {}", e)))
}

fn auth_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok())
}

fn body_value(body: Option<Json<Value>>) -> Value {
    body.map(|Json(v)| v).unwrap_or(Value::Null)
}

fn respond(result: Result<Value, Error>) -> Response {
    respond_with(result, StatusCode::OK)
}

fn respond_with(result: Result<Value, Error>, ok_status: StatusCode) -> Response {
    match result {
        Ok(data) => (ok_status, Json(api::success_envelope(data))).into_response(),
        Err(err) => {
            let status = StatusCode::from_u16(api::error_status(&err))
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            if status.is_server_error() {
                error!("request failed: {}", err);
            }
            (status, Json(api::error_envelope(&err))).into_response()
        }
    }
}

// ─── Auth ───

async fn login(State(app): State<SharedApp>, body: Option<Json<Value>>) -> Response {
    let result = lock_app(&app).and_then(|app| api::login(&app, &body_value(body)));
    respond(result)
}

async fn verify(State(app): State<SharedApp>, headers: HeaderMap) -> Response {
    let result = lock_app(&app).map(|app| api::verify(&app, auth_header(&headers)));
    respond(result)
}

// ─── Bookmarks ───

async fn list_bookmarks(
    State(app): State<SharedApp>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let result = lock_app(&app).and_then(|app| {
        let category_id = api::parse_category_id(query.get("category_id").map(String::as_str))?;
        api::list_bookmarks(&app, auth_header(&headers), category_id)
    });
    respond(result)
}

async fn get_bookmark(
    State(app): State<SharedApp>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let result = lock_app(&app).and_then(|app| api::get_bookmark(&app, auth_header(&headers), id));
    respond(result)
}

async fn create_bookmark(
    State(app): State<SharedApp>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let result = lock_app(&app)
        .and_then(|app| api::create_bookmark(&app, auth_header(&headers), &body_value(body)));
    respond_with(result, StatusCode::CREATED)
}

async fn update_bookmark(
    State(app): State<SharedApp>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    body: Option<Json<Value>>,
) -> Response {
    let result = lock_app(&app)
        .and_then(|app| api::update_bookmark(&app, auth_header(&headers), id, &body_value(body)));
    respond(result)
}

async fn delete_bookmark(
    State(app): State<SharedApp>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let result =
        lock_app(&app).and_then(|app| api::delete_bookmark(&app, auth_header(&headers), id));
    respond(result)
}

async fn export_bookmarks(State(app): State<SharedApp>, headers: HeaderMap) -> Response {
    let result = lock_app(&app).and_then(|app| api::export_bookmarks(&app, auth_header(&headers)));
    respond(result)
}

async fn import_bookmarks(
    State(app): State<SharedApp>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let result = lock_app(&app)
        .and_then(|app| api::import_bookmarks(&app, auth_header(&headers), &body_value(body)));
    respond(result)
}

// ─── Categories ───

async fn list_categories(State(app): State<SharedApp>) -> Response {
    let result = lock_app(&app).and_then(|app| api::list_categories(&app));
    respond(result)
}

async fn get_category(State(app): State<SharedApp>, Path(id): Path<i64>) -> Response {
    let result = lock_app(&app).and_then(|app| api::get_category(&app, id));
    respond(result)
}

async fn create_category(
    State(app): State<SharedApp>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let result = lock_app(&app)
        .and_then(|app| api::create_category(&app, auth_header(&headers), &body_value(body)));
    respond_with(result, StatusCode::CREATED)
}

async fn update_category(
    State(app): State<SharedApp>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    body: Option<Json<Value>>,
) -> Response {
    let result = lock_app(&app)
        .and_then(|app| api::update_category(&app, auth_header(&headers), id, &body_value(body)));
    respond(result)
}

async fn delete_category(
    State(app): State<SharedApp>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let result =
        lock_app(&app).and_then(|app| api::delete_category(&app, auth_header(&headers), id));
    respond(result)
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "not found" })),
    )
        .into_response()
}

fn build_router(app: SharedApp) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/verify", get(verify))
        .route("/bookmarks", get(list_bookmarks).post(create_bookmark))
        .route("/bookmarks/export", get(export_bookmarks))
        .route("/bookmarks/import", post(import_bookmarks))
        .route(
            "/bookmarks/:id",
            get(get_bookmark).put(update_bookmark).delete(delete_bookmark),
        )
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
        .fallback(not_found)
        .with_state(app)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let app = match App::new(&config) {
        Ok(a) => Arc::new(Mutex::new(a)),
        Err(e) => {
            error!("failed to initialize: {}", e);
            std::process::exit(1);
        }
    };

    let router = build_router(app);

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("failed to bind {}: {}", config.bind_addr, e);
            std::process::exit(1);
        }
    };

    info!(addr = %config.bind_addr, db = %config.db_path, "linkstash API listening");

    if let Err(e) = axum::serve(listener, router).await {
        error!("server error: {}", e);
        std::process::exit(1);
    }
}
