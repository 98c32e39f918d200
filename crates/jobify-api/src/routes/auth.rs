//! # Auth Routes
//!
//! Account registration and cookie session management. None of these routes
//! require an existing session.
//!
//! ## Endpoints
//!
//! - `POST /api/v1/auth/register`: create an account
//! - `POST /api/v1/auth/login`: check credentials, set the session cookie
//! - `GET /api/v1/auth/logout`: expire the session cookie

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use jobify_auth::{hash_password, verify_password, DEMO_USER_ID};
use jobify_core::{RecordId, Role};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::{logout_cookie, session_cookie};
use crate::error::AppError;
use crate::extractors::{extract_validated_json, is_blank, is_valid_email, Validate};
use crate::routes::Message;
use crate::state::{AppState, UserRecord};

/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 8;

// ── Request DTOs ────────────────────────────────────────────────────

/// Request to create an account.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub last_name: Option<String>,
    pub location: Option<String>,
}

impl Validate for RegisterRequest {
    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if is_blank(&self.name) {
            problems.push("name is required".to_string());
        }
        email_problems(&self.email, &mut problems);
        match self.password.as_deref() {
            None | Some("") => problems.push("password is required".to_string()),
            Some(p) if p.chars().count() < MIN_PASSWORD_LEN => problems
                .push(format!("password must be at least {MIN_PASSWORD_LEN} characters long")),
            Some(_) => {}
        }
        if is_blank(&self.location) {
            problems.push("location is required".to_string());
        }
        if is_blank(&self.last_name) {
            problems.push("last name is required".to_string());
        }
        problems
    }
}

/// Request to start a session.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Validate for LoginRequest {
    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        email_problems(&self.email, &mut problems);
        if self.password.as_deref().map_or(true, str::is_empty) {
            problems.push("password is required".to_string());
        }
        problems
    }
}

/// Shared email checks for register, login and profile update.
pub(crate) fn email_problems(email: &Option<String>, problems: &mut Vec<String>) {
    if is_blank(email) {
        problems.push("email is required".to_string());
    } else if !email.as_deref().map_or(false, is_valid_email) {
        problems.push("invalid email format".to_string());
    }
}

/// Emails are stored and compared trimmed and lowercased.
pub(crate) fn normalize_email(email: Option<String>) -> String {
    email.unwrap_or_default().trim().to_lowercase()
}

/// A validated required field, trimmed.
pub(crate) fn required(value: Option<String>) -> String {
    value.unwrap_or_default().trim().to_string()
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/logout", get(logout))
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /api/v1/auth/register: Create an account.
///
/// The first account registered (not counting the demo account) becomes an
/// admin; every later one is a regular user.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = Message),
        (status = 400, description = "Validation error or email taken", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let req = extract_validated_json(body)?;
    let email = normalize_email(req.email);
    let password_hash = hash_password(req.password.as_deref().unwrap_or_default())?;
    let now = Utc::now();

    let user = state.users.try_insert_with(|existing| {
        if existing.values().any(|u| u.email == email) {
            return Err(AppError::BadRequest("email already exists".to_string()));
        }
        let is_first_account = existing.keys().all(|id| id.as_str() == DEMO_USER_ID);
        let id = RecordId::generate();
        let record = UserRecord {
            id: id.clone(),
            name: required(req.name),
            email: email.clone(),
            password_hash,
            last_name: required(req.last_name),
            location: required(req.location),
            role: if is_first_account { Role::Admin } else { Role::User },
            created_at: now,
            updated_at: now,
        };
        Ok((id, record))
    })?;

    tracing::info!(user_id = %user.id, role = %user.role, "account registered");
    Ok((StatusCode::CREATED, Json(Message::new("user created"))))
}

/// POST /api/v1/auth/login: Check credentials and set the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = Message),
        (status = 400, description = "Validation error", body = crate::error::ErrorBody),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<Message>), AppError> {
    let req = extract_validated_json(body)?;
    let email = normalize_email(req.email);
    let password = req.password.unwrap_or_default();

    let user = match state.users.find(|u| u.email == email) {
        Some(user) if verify_password(&password, &user.password_hash)? => user,
        _ => {
            tracing::warn!("login rejected: invalid credentials");
            return Err(AppError::Unauthenticated("invalid credentials".to_string()));
        }
    };

    let token = state.issuer.issue(&user.id, user.role)?;
    tracing::info!(user_id = %user.id, "session started");
    Ok((
        jar.add(session_cookie(token, &state)),
        Json(Message::new("user logged in")),
    ))
}

/// GET /api/v1/auth/logout: Expire the session cookie.
#[utoipa::path(
    get,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Logged out; session cookie expired", body = Message),
    ),
    tag = "auth"
)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Message>) {
    (
        jar.add(logout_cookie(&state)),
        Json(Message::new("user logged out!")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request(password: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some("john".into()),
            email: Some("john@example.com".into()),
            password: Some(password.into()),
            last_name: Some("smith".into()),
            location: Some("earth".into()),
        }
    }

    #[test]
    fn router_builds_successfully() {
        let _router = router();
    }

    #[test]
    fn register_request_deserializes_camel_case() {
        let json = r#"{
            "name": "john",
            "email": "john@example.com",
            "password": "secret123",
            "lastName": "smith",
            "location": "earth"
        }"#;
        let req: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.last_name.as_deref(), Some("smith"));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn register_short_password_rejected() {
        assert_eq!(
            register_request("short").validate().unwrap_err(),
            "password must be at least 8 characters long"
        );
    }

    #[test]
    fn register_reports_every_missing_field() {
        let req = RegisterRequest {
            name: None,
            email: None,
            password: None,
            last_name: None,
            location: None,
        };
        assert_eq!(
            req.validate().unwrap_err(),
            "name is required,email is required,password is required,location is required,last name is required"
        );
    }

    #[test]
    fn login_requires_valid_email_and_password() {
        let req = LoginRequest {
            email: Some("nope".into()),
            password: Some(String::new()),
        };
        assert_eq!(
            req.validate().unwrap_err(),
            "invalid email format,password is required"
        );
    }

    #[test]
    fn emails_normalize() {
        assert_eq!(
            normalize_email(Some("  John@Example.COM ".into())),
            "john@example.com"
        );
    }
}
