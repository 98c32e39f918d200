//! # User Routes
//!
//! The caller's own profile and the admin statistics view. Every route here
//! requires a session.
//!
//! ## Endpoints
//!
//! - `GET /api/v1/users/current-user`: profile of the caller
//! - `GET /api/v1/users/admin/app-stats`: account and job counts (admin only)
//! - `PATCH /api/v1/users/update-user`: edit the caller's profile (not for the demo account)

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, patch};
use axum::{Json, Router};
use chrono::Utc;
use jobify_auth::authorize_permissions;
use jobify_core::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{authenticate_user, check_for_test_user, require_permissions};
use crate::error::AppError;
use crate::extractors::{extract_validated_json, is_blank, CurrentUser, Validate};
use crate::routes::auth::{email_problems, normalize_email, required};
use crate::routes::Message;
use crate::state::{AppState, PublicUser};

// ── Request/Response DTOs ───────────────────────────────────────────

/// Profile of the authenticated caller.
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentUserResponse {
    pub user: PublicUser,
}

/// Application-wide counts.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppStats {
    pub users: usize,
    pub jobs: usize,
}

/// Request to edit the caller's profile. The password cannot be changed here.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub last_name: Option<String>,
    pub location: Option<String>,
}

impl Validate for UpdateUserRequest {
    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if is_blank(&self.name) {
            problems.push("name is required".to_string());
        }
        email_problems(&self.email, &mut problems);
        if is_blank(&self.last_name) {
            problems.push("last name is required".to_string());
        }
        if is_blank(&self.location) {
            problems.push("location is required".to_string());
        }
        problems
    }
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the users router. All routes sit behind session authentication.
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/users/current-user", get(current_user))
        .route(
            "/api/v1/users/admin/app-stats",
            get(app_stats).route_layer(from_fn_with_state(
                authorize_permissions([Role::Admin]),
                require_permissions,
            )),
        )
        .route(
            "/api/v1/users/update-user",
            patch(update_user).route_layer(from_fn(check_for_test_user)),
        )
        .route_layer(from_fn_with_state(state.clone(), authenticate_user))
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /api/v1/users/current-user: Profile of the caller.
#[utoipa::path(
    get,
    path = "/api/v1/users/current-user",
    responses(
        (status = 200, description = "Caller profile", body = CurrentUserResponse),
        (status = 401, description = "No valid session", body = crate::error::ErrorBody),
        (status = 404, description = "Account no longer exists", body = crate::error::ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "users"
)]
pub async fn current_user(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> Result<Json<CurrentUserResponse>, AppError> {
    state
        .users
        .get(&identity.subject_id)
        .map(|user| {
            Json(CurrentUserResponse {
                user: user.to_public(),
            })
        })
        .ok_or_else(|| AppError::NotFound(format!("no user with id {}", identity.subject_id)))
}

/// GET /api/v1/users/admin/app-stats: Account and job counts.
#[utoipa::path(
    get,
    path = "/api/v1/users/admin/app-stats",
    responses(
        (status = 200, description = "Application stats", body = AppStats),
        (status = 401, description = "No valid session", body = crate::error::ErrorBody),
        (status = 403, description = "Caller is not an admin", body = crate::error::ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "users"
)]
pub async fn app_stats(State(state): State<AppState>) -> Json<AppStats> {
    Json(AppStats {
        users: state.users.len(),
        jobs: state.jobs.len(),
    })
}

/// PATCH /api/v1/users/update-user: Edit the caller's profile.
#[utoipa::path(
    patch,
    path = "/api/v1/users/update-user",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated", body = Message),
        (status = 400, description = "Validation error, email taken, or demo account", body = crate::error::ErrorBody),
        (status = 401, description = "No valid session", body = crate::error::ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<Message>, AppError> {
    let req = extract_validated_json(body)?;
    let email = normalize_email(req.email);
    let id = identity.subject_id;

    state.users.with_write(|users| {
        if users.values().any(|u| u.email == email && u.id != id) {
            return Err(AppError::BadRequest("email already exists".to_string()));
        }
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("no user with id {id}")))?;
        user.name = required(req.name);
        user.email = email.clone();
        user.last_name = required(req.last_name);
        user.location = required(req.location);
        user.updated_at = Utc::now();
        Ok(())
    })?;

    tracing::info!(user_id = %id, "profile updated");
    Ok(Json(Message::new("update user")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn router_builds_successfully() {
        let state = AppState::new(AppConfig::with_secret("test"));
        let _router = router(&state);
    }

    #[test]
    fn update_request_ignores_password_field() {
        let json = r#"{
            "name": "john",
            "email": "john@example.com",
            "lastName": "smith",
            "location": "earth",
            "password": "newpassword"
        }"#;
        let req: UpdateUserRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn update_request_reports_missing_fields() {
        let req = UpdateUserRequest {
            name: Some("john".into()),
            email: Some("bad".into()),
            last_name: None,
            location: Some(" ".into()),
        };
        assert_eq!(
            req.validate().unwrap_err(),
            "invalid email format,last name is required,location is required"
        );
    }
}
