#![deny(missing_docs)]

//! # jobify-core: Foundational Types for Jobify
//!
//! Every other crate in the workspace depends on this one. It has no internal
//! crate dependencies.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** A [`RecordId`] is validated at
//!    construction; a string that is not a 24-character hex id never becomes one.
//!
//! 2. **Closed enums for enumerated fields.** [`Role`], [`JobStatus`] and
//!    [`JobType`] serialize to the exact wire strings the frontend sends
//!    (`"admin"`, `"interview"`, `"full-time"`), and parsing anything else is a
//!    [`ValidationError`].

pub mod error;
pub mod identity;
pub mod job;
pub mod role;

pub use error::ValidationError;
pub use identity::RecordId;
pub use job::{JobSort, JobStatus, JobType};
pub use role::Role;
