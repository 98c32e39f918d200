//! # Record Identifiers
//!
//! Users and jobs are keyed by a [`RecordId`]: 12 bytes rendered as 24
//! lowercase hex characters. The first four bytes are the creation time in
//! seconds since the Unix epoch (big-endian) and the remaining eight are
//! random, so ids sort roughly by creation time.
//!
//! The format is the one the frontend already stores in links and the one the
//! seeded demo account uses, which is why ids are not UUIDs.

use std::fmt;
use std::str::FromStr;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;

const ID_BYTES: usize = 12;

/// A validated 24-character lowercase hex record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Generate a fresh id stamped with the current time.
    pub fn generate() -> Self {
        let mut bytes = [0u8; ID_BYTES];
        let secs = chrono::Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        OsRng.fill_bytes(&mut bytes[4..]);
        Self(hex::encode(bytes))
    }

    /// Parse an id, accepting either hex case. The stored form is lowercase.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let decoded = hex::decode(s).map_err(|_| ValidationError::InvalidRecordId(s.to_string()))?;
        if decoded.len() != ID_BYTES {
            return Err(ValidationError::InvalidRecordId(s.to_string()));
        }
        Ok(Self(hex::encode(decoded)))
    }

    /// Access the hex form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}
