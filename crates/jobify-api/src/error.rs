//! # API Error Types
//!
//! The single place where failures become HTTP responses. Every error maps to
//! a fixed status code and a `{"msg": "..."}` body; internal details are
//! logged and never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jobify_auth::{GuardError, GuardErrorKind, PasswordError, TokenError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Message returned for every 500.
pub const INTERNAL_MESSAGE: &str = "Something went wrong, try again later";

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub msg: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or invalid input, or a demo-account write (400).
    #[error("{0}")]
    BadRequest(String),

    /// Missing or invalid session, or bad login (401).
    #[error("{0}")]
    Unauthenticated(String),

    /// Authenticated but not allowed (403).
    #[error("{0}")]
    Unauthorized(String),

    /// Resource not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Unauthorized(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let msg = match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                INTERNAL_MESSAGE.to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody { msg })).into_response()
    }
}

impl From<GuardError> for AppError {
    fn from(err: GuardError) -> Self {
        let msg = err.to_string();
        match err.kind() {
            GuardErrorKind::Unauthenticated => Self::Unauthenticated(msg),
            GuardErrorKind::BadRequest => Self::BadRequest(msg),
            GuardErrorKind::Unauthorized => Self::Unauthorized(msg),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        Self::Internal(err.to_string())
    }
}
