//! # Custom Extractors & Validation
//!
//! Provides the [`Validate`] trait for request DTOs, helpers that turn axum
//! rejections into `400 {"msg"}` responses, and the [`CurrentUser`] extractor.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::Json;
use jobify_auth::{GuardError, IdentityContext};

use crate::error::AppError;

/// Trait for request types that check business rules beyond what serde does.
pub trait Validate {
    /// Return every problem found, in field order. Empty means valid.
    fn problems(&self) -> Vec<String>;

    /// Validate, joining all problems with `,` into one message.
    fn validate(&self) -> Result<(), String> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join(","))
        }
    }
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::BadRequest)?;
    Ok(value)
}

/// Extract query parameters, mapping parse errors to [`AppError::BadRequest`].
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    result
        .map(|Query(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// `true` when the field is absent or only whitespace.
pub fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Loose structural email check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !domain.starts_with('.'),
        None => false,
    }
}

/// The authenticated caller, as attached by the authentication middleware.
///
/// Rejects with 401 when no identity is present, i.e. when the route was
/// registered without the authentication layer.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub IdentityContext);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityContext>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| GuardError::MissingCredential.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        name: Option<String>,
        email: Option<String>,
    }

    impl Validate for Sample {
        fn problems(&self) -> Vec<String> {
            let mut problems = Vec::new();
            if is_blank(&self.name) {
                problems.push("name is required".to_string());
            }
            if is_blank(&self.email) {
                problems.push("email is required".to_string());
            }
            problems
        }
    }

    #[test]
    fn validate_joins_problems_with_comma() {
        let sample = Sample {
            name: None,
            email: Some("   ".into()),
        };
        assert_eq!(
            sample.validate().unwrap_err(),
            "name is required,email is required"
        );
    }

    #[test]
    fn validate_passes_when_complete() {
        let sample = Sample {
            name: Some("john".into()),
            email: Some("john@example.com".into()),
        };
        assert!(sample.validate().is_ok());
    }

    #[test]
    fn email_check() {
        assert!(is_valid_email("john@example.com"));
        assert!(is_valid_email("  john.doe+jobs@mail.example.co  "));
        assert!(!is_valid_email("john"));
        assert!(!is_valid_email("john@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("john@example"));
        assert!(!is_valid_email("john@.com"));
        assert!(!is_valid_email("jo hn@example.com"));
        assert!(!is_valid_email("john@exa@mple.com"));
    }
}
