//! # jobify-api: Axum API Service for Jobify
//!
//! Job application tracker: accounts, cookie sessions, and CRUD over the
//! caller's job applications, with a static frontend served for every path
//! the API does not claim.
//!
//! ## API Surface
//!
//! | Prefix               | Module               | Guards                          |
//! |----------------------|----------------------|---------------------------------|
//! | `/api/v1/auth/*`     | [`routes::auth`]     | none                            |
//! | `/api/v1/users/*`    | [`routes::users`]    | session; admin / demo per route |
//! | `/api/v1/jobs/*`     | [`routes::jobs`]     | session; demo on writes         |
//! | `/api/v1/openapi.json` | [`openapi`]        | none                            |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → authenticate_user → check_for_test_user | require_permissions → Handler
//! ```
//!
//! Unmatched requests fall through to the static directory, then to a
//! `404 {"msg":"not found"}`.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::handler::HandlerWithoutStateExt;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::routes::Message;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let public = ServeDir::new(&state.config.public_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(not_found.into_service());

    Router::new()
        .route("/api/v1/test", get(test_route))
        .merge(routes::auth::router())
        .merge(routes::users::router(&state))
        .merge(routes::jobs::router(&state))
        .merge(openapi::router())
        .fallback_service(public)
        .method_not_allowed_fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /api/v1/test: Connectivity check used by the frontend.
async fn test_route() -> Json<Message> {
    Json(Message::new("test route"))
}

async fn not_found() -> (StatusCode, Json<Message>) {
    (StatusCode::NOT_FOUND, Json(Message::new("not found")))
}
