//! # Authentication & Authorization Middleware
//!
//! Axum wiring for the guard chain in `jobify-auth`.
//!
//! ## Session Cookie
//!
//! The session token travels in the `token` cookie, set at login with
//! `HttpOnly`, `Path=/`, a max-age equal to the token lifetime, and `Secure`
//! in production. Logout overwrites it with `logout` and expires it.
//!
//! ## Layering
//!
//! ```text
//! authenticate_user (router route_layer)
//!   └─ check_for_test_user   (mutating handlers only)
//!   └─ require_permissions   (admin handlers only)
//!        └─ handler
//! ```
//!
//! Each middleware short-circuits with an [`AppError`] on failure.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use jobify_auth::{GuardError, IdentityContext, RoleGuard};

use crate::error::AppError;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Value written over the session cookie at logout.
const LOGGED_OUT: &str = "logout";

/// Authenticate the request from its session cookie and attach the
/// [`IdentityContext`] to the request extensions.
pub async fn authenticate_user(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar.get(SESSION_COOKIE).map(|cookie| cookie.value());
    let identity = jobify_auth::authenticate(token, &state.verifier)?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Refuse the request if the caller is the demo account.
///
/// Must run inside [`authenticate_user`].
pub async fn check_for_test_user(request: Request, next: Next) -> Result<Response, AppError> {
    let identity = attached_identity(&request)?;
    jobify_auth::check_for_test_user(identity)?;
    Ok(next.run(request).await)
}

/// Refuse the request unless the caller's role is permitted by `guard`.
///
/// Must run inside [`authenticate_user`]. Register with
/// `from_fn_with_state(authorize_permissions([..]), require_permissions)`.
pub async fn require_permissions(
    State(guard): State<RoleGuard>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = attached_identity(&request)?;
    guard.check(identity)?;
    Ok(next.run(request).await)
}

fn attached_identity(request: &Request) -> Result<&IdentityContext, GuardError> {
    request
        .extensions()
        .get::<IdentityContext>()
        .ok_or(GuardError::MissingCredential)
}

/// Cookie carrying a freshly issued session token.
pub fn session_cookie(token: String, state: &AppState) -> Cookie<'static> {
    let max_age = time::Duration::seconds(state.issuer.lifetime().num_seconds());
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .path("/")
        .max_age(max_age)
        .secure(state.config.environment.is_production())
        .build()
}

/// Cookie that replaces and immediately expires the session.
pub fn logout_cookie(state: &AppState) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, LOGGED_OUT))
        .http_only(true)
        .path("/")
        .max_age(time::Duration::ZERO)
        .expires(time::OffsetDateTime::now_utc())
        .secure(state.config.environment.is_production())
        .build()
}
