//! # Job Enumerations
//!
//! Closed sets for a job's status and type, plus the sort orders the job
//! listing accepts. Wire strings match what the frontend selects offer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;

/// Where an application stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Invited to interview.
    Interview,
    /// Turned down.
    Declined,
    /// Submitted, no answer yet.
    #[default]
    Pending,
}

impl JobStatus {
    /// All statuses, in the order stats are reported.
    pub const ALL: [JobStatus; 3] = [Self::Pending, Self::Interview, Self::Declined];

    /// Return the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interview => "interview",
            Self::Declined => "declined",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidJobStatus(s.to_string()))
    }
}

/// Kind of position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    /// Full-time employment.
    #[default]
    FullTime,
    /// Part-time employment.
    PartTime,
    /// Internship.
    Internship,
}

impl JobType {
    /// All job types.
    pub const ALL: [JobType; 3] = [Self::FullTime, Self::PartTime, Self::Internship];

    /// Return the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
            Self::Internship => "internship",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|job_type| job_type.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidJobType(s.to_string()))
    }
}

/// Ordering for the job listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum JobSort {
    /// Most recently created first.
    #[default]
    #[serde(rename = "newest")]
    Newest,
    /// Oldest first.
    #[serde(rename = "oldest")]
    Oldest,
    /// Position ascending.
    #[serde(rename = "a-z")]
    AToZ,
    /// Position descending.
    #[serde(rename = "z-a")]
    ZToA,
}

impl JobSort {
    /// All sort options.
    pub const ALL: [JobSort; 4] = [Self::Newest, Self::Oldest, Self::AToZ, Self::ZToA];

    /// Return the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::AToZ => "a-z",
            Self::ZToA => "z-a",
        }
    }
}

impl FromStr for JobSort {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidSort(s.to_string()))
    }
}
