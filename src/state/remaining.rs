//! Remaining time until the target

use std::fmt;

use serde::{Deserialize, Serialize};

pub const MS_PER_DAY: i64 = 86_400_000;
pub const MS_PER_HOUR: i64 = 3_600_000;
pub const MS_PER_MINUTE: i64 = 60_000;
pub const MS_PER_SECOND: i64 = 1_000;

/// Whole days, hours, minutes and seconds left. Never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remaining {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Remaining {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Decompose a millisecond difference, clamping anything at or below zero
    pub fn from_millis(difference: i64) -> Self {
        if difference <= 0 {
            return Self::zero();
        }

        Self {
            days: (difference / MS_PER_DAY) as u64,
            hours: ((difference % MS_PER_DAY) / MS_PER_HOUR) as u64,
            minutes: ((difference % MS_PER_HOUR) / MS_PER_MINUTE) as u64,
            seconds: ((difference % MS_PER_MINUTE) / MS_PER_SECOND) as u64,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    pub fn total_seconds(&self) -> u64 {
        self.days * 86_400 + self.hours * 3_600 + self.minutes * 60 + self.seconds
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}
