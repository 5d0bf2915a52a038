//! Incident status filter values

use crate::error::RcaError;
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an incident, as accepted by the `status` query filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusType {
    New,
    Ongoing,
    Paused,
    Resolved,
    Closed,
}

impl StatusType {
    /// Every status, in the order the API documents them
    pub const fn all() -> &'static [StatusType] {
        &[
            StatusType::New,
            StatusType::Ongoing,
            StatusType::Paused,
            StatusType::Resolved,
            StatusType::Closed,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusType::New => "new",
            StatusType::Ongoing => "ongoing",
            StatusType::Paused => "paused",
            StatusType::Resolved => "resolved",
            StatusType::Closed => "closed",
        }
    }
}

impl FromStr for StatusType {
    type Err = RcaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(StatusType::New),
            "ongoing" => Ok(StatusType::Ongoing),
            "paused" => Ok(StatusType::Paused),
            "resolved" => Ok(StatusType::Resolved),
            "closed" => Ok(StatusType::Closed),
            other => Err(RcaError::invalid_input_field(
                format!("invalid status type: {}", other),
                "STATUS_TYPES",
            )),
        }
    }
}

impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
