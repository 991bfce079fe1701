//! Whole-second spend time values and their human-readable format.

use super::ParseSpendTimeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;

/// Wall-clock time spent on a task or project, in whole seconds.
///
/// Displays as `"{h} hrs {m} mins {s} secs"`. Hours never roll over into
/// days. Serializes as the same string and parses it back on
/// deserialization.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct SpendTime(u64);

impl SpendTime {
    /// A zero-length spend time.
    pub const ZERO: Self = Self(0);

    /// Creates a spend time from whole seconds.
    #[must_use]
    pub const fn from_seconds(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Returns the total number of seconds.
    #[must_use]
    pub const fn as_seconds(self) -> u64 {
        self.0
    }

    /// Returns the whole hours component.
    #[must_use]
    pub const fn hours(self) -> u64 {
        self.0.div_euclid(SECONDS_PER_HOUR)
    }

    /// Returns the minutes left after removing whole hours.
    #[must_use]
    pub const fn minutes(self) -> u64 {
        self.0.rem_euclid(SECONDS_PER_HOUR).div_euclid(SECONDS_PER_MINUTE)
    }

    /// Returns the seconds left after removing whole minutes.
    #[must_use]
    pub const fn seconds(self) -> u64 {
        self.0.rem_euclid(SECONDS_PER_MINUTE)
    }
}

impl Add for SpendTime {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for SpendTime {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for SpendTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hrs {} mins {} secs",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}

impl FromStr for SpendTime {
    type Err = ParseSpendTimeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseSpendTimeError(value.to_owned());
        let tokens: Vec<&str> = value.split_whitespace().collect();
        let &[hours, "hrs", minutes, "mins", seconds, "secs"] = tokens.as_slice() else {
            return Err(invalid());
        };
        let parse = |token: &str| token.parse::<u64>().map_err(|_| invalid());
        let (hours, minutes, seconds) = (parse(hours)?, parse(minutes)?, parse(seconds)?);

        let total = hours
            .checked_mul(SECONDS_PER_HOUR)
            .and_then(|acc| acc.checked_add(minutes.checked_mul(SECONDS_PER_MINUTE)?))
            .and_then(|acc| acc.checked_add(seconds))
            .ok_or_else(invalid)?;
        Ok(Self(total))
    }
}

impl TryFrom<String> for SpendTime {
    type Error = ParseSpendTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SpendTime> for String {
    fn from(spend: SpendTime) -> Self {
        spend.to_string()
    }
}
