use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Products expiring in fewer than this many days are `Urgent`.
pub const URGENT_THRESHOLD_DAYS: i64 = 30;

/// Products expiring in fewer than this many days (but not urgently) are `Warning`.
pub const WARNING_THRESHOLD_DAYS: i64 = 90;

/// Urgency bucket derived from days-to-expiry.
///
/// Never stored on a record: it is recomputed from the report date at read
/// time, so the same stored product can land in a different bucket on a
/// different day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpiryStatus {
    /// Expiry date is in the past.
    Expired,
    /// Expires within 30 days.
    Urgent,
    /// Expires within 90 days.
    Warning,
    /// At least 90 days of shelf life left.
    Safe,
}

/// Classify a days-to-expiry value into an urgency bucket.
///
/// The thresholds use strict less-than comparisons: day 30 exactly is
/// `Warning`, not `Urgent`, and day 90 exactly is `Safe`, not `Warning`.
/// Total over all integers.
pub fn classify(days: i64) -> ExpiryStatus {
    if days < 0 {
        ExpiryStatus::Expired
    } else if days < URGENT_THRESHOLD_DAYS {
        ExpiryStatus::Urgent
    } else if days < WARNING_THRESHOLD_DAYS {
        ExpiryStatus::Warning
    } else {
        ExpiryStatus::Safe
    }
}

impl ExpiryStatus {
    /// All four buckets, in reporting order.
    pub const ALL: &'static [ExpiryStatus] = &[
        Self::Expired,
        Self::Urgent,
        Self::Warning,
        Self::Safe,
    ];

    /// Returns the undecorated wire label (`EXPIRED`, `URGENT`, ...).
    ///
    /// This is the value stored in exports; any emoji or color decoration is
    /// a presentation concern and never serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expired => "EXPIRED",
            Self::Urgent => "URGENT",
            Self::Warning => "WARNING",
            Self::Safe => "SAFE",
        }
    }
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid status label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    invalid: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid status '{}'. Valid values: {}",
            self.invalid,
            ExpiryStatus::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for ExpiryStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EXPIRED" => Ok(Self::Expired),
            "URGENT" => Ok(Self::Urgent),
            "WARNING" => Ok(Self::Warning),
            "SAFE" => Ok(Self::Safe),
            _ => Err(ParseStatusError {
                invalid: s.to_string(),
            }),
        }
    }
}
