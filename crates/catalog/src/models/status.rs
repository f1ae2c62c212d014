use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

/// Reading status of a catalog record.
///
/// The discriminant is what gets persisted, so the values are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i64)]
pub enum ReadingStatus {
    PlanToRead = 0,
    Reading = 1,
    Completed = 2,
    OnHold = 3,
    Dropped = 4,
}

impl ReadingStatus {
    /// Every status, in discriminant order. Handy for iterating aggregates.
    pub const ALL: [ReadingStatus; 5] = [
        ReadingStatus::PlanToRead,
        ReadingStatus::Reading,
        ReadingStatus::Completed,
        ReadingStatus::OnHold,
        ReadingStatus::Dropped,
    ];

    /// Returns the human-readable label for the status.
    pub fn label(&self) -> &'static str {
        match self {
            ReadingStatus::PlanToRead => "Plan to Read",
            ReadingStatus::Reading => "Reading",
            ReadingStatus::Completed => "Completed",
            ReadingStatus::OnHold => "On Hold",
            ReadingStatus::Dropped => "Dropped",
        }
    }

    /// Returns the accent color (hex) associated with the status.
    pub fn color(&self) -> &'static str {
        match self {
            ReadingStatus::PlanToRead => "#6B7280",
            ReadingStatus::Reading => "#10B981",
            ReadingStatus::Completed => "#3B82F6",
            ReadingStatus::OnHold => "#F59E0B",
            ReadingStatus::Dropped => "#EF4444",
        }
    }
}

impl From<ReadingStatus> for i64 {
    fn from(status: ReadingStatus) -> Self {
        status as i64
    }
}
impl TryFrom<i64> for ReadingStatus {
    type Error = Error;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::PlanToRead,
            1 => Self::Reading,
            2 => Self::Completed,
            3 => Self::OnHold,
            4 => Self::Dropped,
            _ => exn::bail!(ErrorKind::InvalidData("reading status")),
        })
    }
}

impl FromStr for ReadingStatus {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sanitized: String = s.chars().filter(|c| c.is_ascii_alphanumeric()).collect::<String>().to_lowercase();
        Ok(match sanitized.as_str() {
            "plantoread" | "planned" => Self::PlanToRead,
            "reading" => Self::Reading,
            "completed" | "complete" => Self::Completed,
            "onhold" | "paused" => Self::OnHold,
            "dropped" => Self::Dropped,
            _ => exn::bail!(ErrorKind::InvalidData("reading status")),
        })
    }
}

impl Display for ReadingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.label())
    }
}
