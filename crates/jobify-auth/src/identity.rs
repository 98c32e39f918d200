//! # Identity Context
//!
//! The per-request view of who is calling. Built fresh by
//! [`crate::authenticate`] from verified claims and dropped with the request.

use jobify_core::{RecordId, Role};

use crate::token::Claims;

/// Id of the seeded demo account. Sessions for this account are read-only.
pub const DEMO_USER_ID: &str = "64c3f98392873b35a871ad31";

/// Identity of the authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    /// Account id from the token.
    pub subject_id: RecordId,
    /// Role from the token.
    pub role: Role,
    /// Set when `subject_id` is [`DEMO_USER_ID`].
    pub is_restricted_demo_account: bool,
}

impl IdentityContext {
    /// Build a context from verified claims, deriving the demo flag.
    pub fn from_claims(claims: Claims) -> Self {
        let is_restricted_demo_account = claims.user_id.as_str() == DEMO_USER_ID;
        Self {
            subject_id: claims.user_id,
            role: claims.role,
            is_restricted_demo_account,
        }
    }

    /// Whether the caller is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether the caller may act on a record owned by `owner`.
    ///
    /// Admins may act on any record; everyone else only on their own.
    pub fn can_access(&self, owner: &RecordId) -> bool {
        self.is_admin() || &self.subject_id == owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(user_id: &str, role: Role) -> Claims {
        Claims {
            user_id: RecordId::parse(user_id).unwrap(),
            role,
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn demo_account_is_flagged() {
        let ctx = IdentityContext::from_claims(claims(DEMO_USER_ID, Role::User));
        assert!(ctx.is_restricted_demo_account);
        assert_eq!(ctx.subject_id.as_str(), DEMO_USER_ID);
    }

    #[test]
    fn uppercase_demo_id_is_still_flagged() {
        let ctx = IdentityContext::from_claims(claims("64C3F98392873B35A871AD31", Role::User));
        assert!(ctx.is_restricted_demo_account);
    }

    #[test]
    fn other_accounts_are_not_flagged() {
        let ctx = IdentityContext::from_claims(claims("64d0a1b2c3d4e5f601234567", Role::Admin));
        assert!(!ctx.is_restricted_demo_account);
        assert!(ctx.is_admin());
    }

    #[test]
    fn owner_and_admin_can_access() {
        let owner = RecordId::parse("64d0a1b2c3d4e5f601234567").unwrap();
        let other = RecordId::parse("64d0a1b2c3d4e5f601234568").unwrap();

        let user = IdentityContext::from_claims(claims(owner.as_str(), Role::User));
        assert!(user.can_access(&owner));
        assert!(!user.can_access(&other));

        let admin = IdentityContext::from_claims(claims(other.as_str(), Role::Admin));
        assert!(admin.can_access(&owner));
    }
}
