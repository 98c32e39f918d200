//! # Request Guards
//!
//! The three checks a protected route runs, in order:
//!
//! 1. [`authenticate`] turns the session cookie into an [`IdentityContext`].
//! 2. [`check_for_test_user`] rejects the demo account on mutating routes.
//! 3. [`RoleGuard::check`] (built by [`authorize_permissions`]) restricts a
//!    route to a fixed set of roles.
//!
//! Which routes get guards 2 and 3 is decided at route registration. Each
//! failure is a [`GuardError`] with a stable kind and a fixed message.

use std::collections::HashSet;

use jobify_core::Role;
use thiserror::Error;

use crate::identity::IdentityContext;
use crate::token::TokenVerifier;

/// Coarse classification used by the HTTP layer to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardErrorKind {
    /// No valid session.
    Unauthenticated,
    /// Request refused for the demo account.
    BadRequest,
    /// Authenticated, but the role is not permitted.
    Unauthorized,
}

/// Guard failure. The message is what the client sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// No session cookie on the request.
    #[error("Authentication failed")]
    MissingCredential,

    /// Session cookie present but rejected. The verifier's reason is dropped.
    #[error("authentication invalid")]
    InvalidCredential,

    /// The demo account attempted a write.
    #[error("Demo User. Read Only!")]
    DemoAccountReadOnly,

    /// The caller's role is not in the route's permitted set.
    #[error("Unauthorized to access this route")]
    RoleNotPermitted,
}

impl GuardError {
    /// Classify this failure.
    pub fn kind(&self) -> GuardErrorKind {
        match self {
            Self::MissingCredential | Self::InvalidCredential => GuardErrorKind::Unauthenticated,
            Self::DemoAccountReadOnly => GuardErrorKind::BadRequest,
            Self::RoleNotPermitted => GuardErrorKind::Unauthorized,
        }
    }
}

/// Authenticate a request from its session token, if any.
pub fn authenticate(
    token: Option<&str>,
    verifier: &TokenVerifier,
) -> Result<IdentityContext, GuardError> {
    let token = token.ok_or(GuardError::MissingCredential)?;
    match verifier.verify(token) {
        Ok(claims) => Ok(IdentityContext::from_claims(claims)),
        Err(err) => {
            tracing::warn!(reason = %err, "authentication failed: session token rejected");
            Err(GuardError::InvalidCredential)
        }
    }
}

/// Reject the demo account. Attach only to routes that mutate state.
pub fn check_for_test_user(identity: &IdentityContext) -> Result<(), GuardError> {
    if identity.is_restricted_demo_account {
        tracing::debug!(subject = %identity.subject_id, "demo account write refused");
        return Err(GuardError::DemoAccountReadOnly);
    }
    Ok(())
}

/// A role check fixed at route registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGuard {
    permitted: HashSet<Role>,
}

impl RoleGuard {
    /// Pass if the caller's role is in the permitted set.
    pub fn check(&self, identity: &IdentityContext) -> Result<(), GuardError> {
        if self.permits(identity.role) {
            Ok(())
        } else {
            tracing::debug!(
                subject = %identity.subject_id,
                role = %identity.role,
                "role not permitted for route"
            );
            Err(GuardError::RoleNotPermitted)
        }
    }

    /// Whether `role` is permitted.
    pub fn permits(&self, role: Role) -> bool {
        self.permitted.contains(&role)
    }
}

/// Build a [`RoleGuard`] for the given roles.
///
/// An empty set permits nobody.
pub fn authorize_permissions(roles: impl IntoIterator<Item = Role>) -> RoleGuard {
    RoleGuard {
        permitted: roles.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::DEMO_USER_ID;
    use crate::token::TokenIssuer;
    use chrono::Duration;
    use jobify_core::RecordId;
    use proptest::prelude::*;

    const SECRET: &[u8] = b"guard-secret";

    fn token_for(user_id: &str, role: Role) -> String {
        TokenIssuer::new(SECRET, Duration::hours(1))
            .issue(&RecordId::parse(user_id).unwrap(), role)
            .unwrap()
    }

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(SECRET)
    }

    #[test]
    fn missing_token_is_authentication_failed() {
        let err = authenticate(None, &verifier()).unwrap_err();
        assert_eq!(err, GuardError::MissingCredential);
        assert_eq!(err.kind(), GuardErrorKind::Unauthenticated);
        assert_eq!(err.to_string(), "Authentication failed");
    }

    #[test]
    fn badly_signed_token_is_authentication_invalid() {
        let token = TokenIssuer::new(b"someone-else", Duration::hours(1))
            .issue(&RecordId::generate(), Role::Admin)
            .unwrap();
        let err = authenticate(Some(&token), &verifier()).unwrap_err();
        assert_eq!(err, GuardError::InvalidCredential);
        assert_eq!(err.to_string(), "authentication invalid");
    }

    #[test]
    fn expired_token_is_authentication_invalid() {
        let token = TokenIssuer::new(SECRET, Duration::minutes(-1))
            .issue(&RecordId::generate(), Role::User)
            .unwrap();
        let err = authenticate(Some(&token), &verifier()).unwrap_err();
        assert_eq!(err.to_string(), "authentication invalid");
        assert_eq!(err.kind(), GuardErrorKind::Unauthenticated);
    }

    #[test]
    fn valid_token_yields_identity() {
        let token = token_for("64d0a1b2c3d4e5f601234567", Role::User);
        let identity = authenticate(Some(&token), &verifier()).unwrap();
        assert_eq!(identity.subject_id.as_str(), "64d0a1b2c3d4e5f601234567");
        assert_eq!(identity.role, Role::User);
        assert!(!identity.is_restricted_demo_account);
    }

    #[test]
    fn demo_account_write_is_bad_request() {
        let token = token_for(DEMO_USER_ID, Role::User);
        let identity = authenticate(Some(&token), &verifier()).unwrap();
        assert!(identity.is_restricted_demo_account);

        let err = check_for_test_user(&identity).unwrap_err();
        assert_eq!(err.kind(), GuardErrorKind::BadRequest);
        assert_eq!(err.to_string(), "Demo User. Read Only!");
    }

    #[test]
    fn non_demo_account_passes_write_guard() {
        let token = token_for("64d0a1b2c3d4e5f601234567", Role::User);
        let identity = authenticate(Some(&token), &verifier()).unwrap();
        assert!(check_for_test_user(&identity).is_ok());
    }

    #[test]
    fn role_guard_rejects_unlisted_role() {
        let token = token_for("64d0a1b2c3d4e5f601234567", Role::User);
        let identity = authenticate(Some(&token), &verifier()).unwrap();

        let err = authorize_permissions([Role::Admin]).check(&identity).unwrap_err();
        assert_eq!(err.kind(), GuardErrorKind::Unauthorized);
        assert_eq!(err.to_string(), "Unauthorized to access this route");
    }

    #[test]
    fn role_guard_accepts_any_listed_role() {
        let guard = authorize_permissions([Role::User, Role::Admin]);
        for role in [Role::User, Role::Admin] {
            let token = token_for("64d0a1b2c3d4e5f601234567", role);
            let identity = authenticate(Some(&token), &verifier()).unwrap();
            assert!(guard.check(&identity).is_ok());
        }
    }

    #[test]
    fn empty_role_guard_permits_nobody() {
        let guard = authorize_permissions(Vec::<Role>::new());
        assert!(!guard.permits(Role::User));
        assert!(!guard.permits(Role::Admin));
    }

    #[test]
    fn guard_chain_is_idempotent() {
        let token = token_for(DEMO_USER_ID, Role::User);
        let run = || {
            authenticate(Some(&token), &verifier())
                .and_then(|identity| check_for_test_user(&identity).map(|()| identity))
        };
        assert_eq!(run(), run());
    }

    proptest! {
        #[test]
        fn role_outside_permitted_set_is_unauthorized(admin_only in any::<bool>(), is_admin in any::<bool>()) {
            let permitted = if admin_only { vec![Role::Admin] } else { vec![Role::User] };
            let role = if is_admin { Role::Admin } else { Role::User };
            let identity = IdentityContext {
                subject_id: RecordId::generate(),
                role,
                is_restricted_demo_account: false,
            };
            let guard = authorize_permissions(permitted.clone());
            let result = guard.check(&identity);
            prop_assert_eq!(result.is_ok(), guard.permits(role));
            if permitted.contains(&role) {
                prop_assert!(result.is_ok());
            } else {
                prop_assert_eq!(result, Err(GuardError::RoleNotPermitted));
            }
        }

        #[test]
        fn garbage_tokens_never_authenticate(token in "\\PC{0,64}") {
            let err = authenticate(Some(&token), &verifier()).unwrap_err();
            prop_assert_eq!(err, GuardError::InvalidCredential);
        }
    }
}
