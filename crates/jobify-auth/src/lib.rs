//! # jobify-auth: Session Tokens and the Request Guard Chain
//!
//! Framework-free building blocks for authenticating and authorizing API
//! requests. The HTTP layer in `jobify-api` reads the cookie and calls into
//! these functions; nothing here touches a request type.
//!
//! ## Guard Chain
//!
//! ```text
//! cookie ─► authenticate ─► IdentityContext ─► check_for_test_user ─► RoleGuard::check ─► handler
//!               │                                   │                      │
//!               ▼                                   ▼                      ▼
//!        Unauthenticated                        BadRequest            Unauthorized
//! ```
//!
//! Every guard is a pure function of its input and the process-wide
//! [`TokenVerifier`]. The first failure short-circuits the rest.

pub mod guard;
pub mod identity;
pub mod password;
pub mod token;

pub use guard::{
    authenticate, authorize_permissions, check_for_test_user, GuardError, GuardErrorKind,
    RoleGuard,
};
pub use identity::{IdentityContext, DEMO_USER_ID};
pub use password::{hash_password, verify_password, PasswordError};
pub use token::{Claims, TokenError, TokenIssuer, TokenVerifier};
