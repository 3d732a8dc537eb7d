//! Reporting period (year and month) of the checkouts dataset.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};

/// A reporting month. Orders chronologically: by year, then by month.
///
/// The string form is `"YYYY/M"` (no zero padding), which is what charts
/// use as their x-axis label. Comparison always works on the numeric
/// fields, never on the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Period {
    year: i32,
    month: u8,
}

/// Error returned when a [`Period`] cannot be built or parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPeriodError {
    /// Month outside `1..=12`.
    #[error("invalid month {0}: expected 1-12")]
    Month(u32),

    /// Label not of the form `YYYY/M`.
    #[error("invalid period label {0:?}: expected YYYY/M")]
    Label(String),
}

impl Period {
    /// First month the dataset has data for (May 2005).
    pub const EARLIEST: Self = Self {
        year: 2005,
        month: 5,
    };

    /// Creates a period.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPeriodError::Month`] if `month` is not in `1..=12`.
    pub const fn new(year: i32, month: u8) -> Result<Self, InvalidPeriodError> {
        if month >= 1 && month <= 12 {
            Ok(Self { year, month })
        } else {
            Err(InvalidPeriodError::Month(month as u32))
        }
    }

    /// The period containing `date`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month() as u8,
        }
    }

    /// Year component.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Month component, `1`-`12`.
    #[must_use]
    pub const fn month(self) -> u8 {
        self.month
    }

    /// The month before this one.
    #[must_use]
    pub const fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Latest period a user may select on `today`: the previous calendar
    /// month, since the current one is still being reported.
    #[must_use]
    pub fn latest_selectable(today: NaiveDate) -> Self {
        Self::containing(today).previous()
    }

    /// Whether this period lies within [`Self::EARLIEST`] and
    /// [`Self::latest_selectable`] for `today`, inclusive.
    #[must_use]
    pub fn is_selectable(self, today: NaiveDate) -> bool {
        self >= Self::EARLIEST && self <= Self::latest_selectable(today)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = InvalidPeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label_error = || InvalidPeriodError::Label(s.to_string());
        let (year, month) = s.split_once('/').ok_or_else(label_error)?;
        let year = year.parse::<i32>().map_err(|_| label_error())?;
        let month = month.parse::<u8>().map_err(|_| label_error())?;
        Self::new(year, month)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

impl TryFrom<String> for Period {
    type Error = InvalidPeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
