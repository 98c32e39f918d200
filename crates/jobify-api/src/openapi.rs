//! # OpenAPI Document Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI document,
//! served at `/api/v1/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::SESSION_COOKIE;
use crate::state::AppState;

/// Assembled OpenAPI document for the whole API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Jobify API",
        version = "0.1.0",
        description = "Job application tracker with cookie-based sessions.",
        license(name = "MIT")
    ),
    paths(
        // Auth
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        // Users
        crate::routes::users::current_user,
        crate::routes::users::app_stats,
        crate::routes::users::update_user,
        // Jobs
        crate::routes::jobs::list_jobs,
        crate::routes::jobs::create_job,
        crate::routes::jobs::show_stats,
        crate::routes::jobs::get_job,
        crate::routes::jobs::update_job,
        crate::routes::jobs::delete_job,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::routes::Message,
        crate::state::PublicUser,
        crate::state::JobRecord,
        crate::routes::auth::RegisterRequest,
        crate::routes::auth::LoginRequest,
        crate::routes::users::CurrentUserResponse,
        crate::routes::users::AppStats,
        crate::routes::users::UpdateUserRequest,
        crate::routes::jobs::JobRequest,
        crate::routes::jobs::JobResponse,
        crate::routes::jobs::JobMutationResponse,
        crate::routes::jobs::JobListResponse,
        crate::routes::jobs::JobStatsResponse,
        crate::routes::jobs::DefaultStats,
        crate::routes::jobs::MonthlyApplication,
    )),
    modifiers(&SessionCookieAuth),
    tags(
        (name = "auth", description = "Registration and sessions"),
        (name = "users", description = "Profiles and admin stats"),
        (name = "jobs", description = "Job applications"),
    )
)]
pub struct ApiDoc;

/// Registers the `cookie_auth` scheme referenced by protected paths.
struct SessionCookieAuth;

impl Modify for SessionCookieAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "cookie_auth",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
    }
}

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/openapi.json", get(openapi_json))
}

/// GET /api/v1/openapi.json: Return the generated OpenAPI document.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
