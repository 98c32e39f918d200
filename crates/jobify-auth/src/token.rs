//! # Session Tokens
//!
//! HS256 JSON Web Tokens carrying the account id and role. The server holds
//! one secret for the life of the process; [`TokenIssuer`] signs at login and
//! [`TokenVerifier`] checks every authenticated request.
//!
//! ## Claims
//!
//! ```text
//! { "userId": "<24 hex>", "role": "user" | "admin", "iat": <secs>, "exp": <secs> }
//! ```
//!
//! Expiry is enforced with zero leeway. Verification is deterministic, so a
//! failure is final and never retried.

use chrono::{Duration, Utc};
use jobify_core::{RecordId, Role};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Decoded session claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Account the token was issued to.
    pub user_id: RecordId,
    /// Role at the time of login.
    pub role: Role,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Errors from signing or verifying a session token.
#[derive(Error, Debug)]
pub enum TokenError {
    /// Signature mismatch, malformed token, bad claims, or expired.
    #[error("invalid credential: {0}")]
    InvalidCredential(#[source] jsonwebtoken::errors::Error),

    /// The claims could not be signed.
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Signs session tokens with the server secret.
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    lifetime: Duration,
}

impl TokenIssuer {
    /// Create an issuer whose tokens expire `lifetime` after issue.
    pub fn new(secret: &[u8], lifetime: Duration) -> Self {
        Self {
            key: EncodingKey::from_secret(secret),
            lifetime,
        }
    }

    /// Token lifetime, also used as the cookie max-age.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Sign a token for the given account.
    pub fn issue(&self, user_id: &RecordId, role: Role) -> Result<String, TokenError> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            user_id: user_id.clone(),
            role,
            iat,
            exp: iat.saturating_add(self.lifetime.num_seconds()),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.key).map_err(TokenError::Signing)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("key", &"[REDACTED]")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

/// Verifies session tokens against the server secret.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Create a verifier for HS256 tokens signed with `secret`.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Verify the signature and expiry and return the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::InvalidCredential)
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("key", &"[REDACTED]")
            .finish()
    }
}
