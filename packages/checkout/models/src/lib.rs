#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Checkout record, filter criteria, sort and popularity types.
//!
//! [`CheckoutRecord`] mirrors one row of the library "Checkouts by Title"
//! open dataset exactly as the Socrata API returns it: every column is a
//! string. Typed accessors validate the numeric columns on demand so that a
//! malformed row surfaces as a [`RecordFieldError`] at the point where the
//! value is actually needed.

pub mod criteria;
pub mod display;
pub mod period;
pub mod popularity;
pub mod sort;

use serde::{Deserialize, Serialize};

pub use criteria::{FilterCriteria, MaterialTypeFilter};
pub use period::{InvalidPeriodError, Period};
pub use popularity::{PopularityChart, PopularityPoint, PopularitySeries};
pub use sort::{SortColumn, SortDirection, SortSpec};

/// Placeholder title the catalog uses for rows it could not resolve.
pub const UNKNOWN_TITLE: &str = "<Unknown Title>";

/// Marker the catalog embeds in titles of uncataloged items.
pub const UNCATALOGED_MARKER: &str = "Uncataloged";

/// Errors raised when a numeric column of a [`CheckoutRecord`] is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordFieldError {
    /// The column is missing or is not a base-10 non-negative integer.
    #[error("field `{field}` is not numeric: {value:?}")]
    NotNumeric {
        /// Wire name of the column.
        field: &'static str,
        /// The offending raw value.
        value: String,
    },

    /// The checkout month is outside `1..=12`.
    #[error("checkout month {value} is out of range 1-12")]
    MonthOutOfRange {
        /// The parsed month value.
        value: u32,
    },
}

/// One row of the checkouts dataset: a title's checkout count for a
/// reporting month.
///
/// Records are never mutated after they are fetched. Optional columns are
/// `None` when the API omits them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRecord {
    /// Title of the work.
    #[serde(default)]
    pub title: String,
    /// Media category (e.g. `"BOOK"`, `"VIDEODISC"`).
    #[serde(rename = "materialtype", default)]
    pub material_type: String,
    /// Checkout count as delivered by the API (base-10 digits).
    #[serde(default)]
    pub checkouts: String,
    /// Reporting month, `1`-`12`.
    #[serde(rename = "checkoutmonth", default)]
    pub checkout_month: String,
    /// Reporting year.
    #[serde(rename = "checkoutyear", default)]
    pub checkout_year: String,
    /// Comma-separated subject tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subjects: Option<String>,
    /// Author or other creator, possibly with trailing punctuation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    /// Publisher, possibly with trailing punctuation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Publication year, often decorated (e.g. `"[2016]"`, `"c2015."`).
    #[serde(rename = "publicationyear", default, skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<String>,
    /// `"Physical"` or `"Digital"`.
    #[serde(rename = "usageclass", default, skip_serializing_if = "Option::is_none")]
    pub usage_class: Option<String>,
    /// Circulation system the checkout was recorded in.
    #[serde(rename = "checkouttype", default, skip_serializing_if = "Option::is_none")]
    pub checkout_type: Option<String>,
}

impl CheckoutRecord {
    /// Parses the checkout count.
    ///
    /// # Errors
    ///
    /// Returns [`RecordFieldError::NotNumeric`] if the column is not a
    /// base-10 non-negative integer.
    pub fn checkout_count(&self) -> Result<u32, RecordFieldError> {
        parse_numeric("checkouts", &self.checkouts)
    }

    /// Parses the reporting month.
    ///
    /// # Errors
    ///
    /// Returns [`RecordFieldError`] if the column is not numeric or is
    /// outside `1..=12`.
    pub fn month(&self) -> Result<u8, RecordFieldError> {
        let value = parse_numeric("checkoutmonth", &self.checkout_month)?;
        u8::try_from(value)
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or(RecordFieldError::MonthOutOfRange { value })
    }

    /// Parses the reporting year.
    ///
    /// # Errors
    ///
    /// Returns [`RecordFieldError::NotNumeric`] if the column is not numeric.
    pub fn year(&self) -> Result<i32, RecordFieldError> {
        self.checkout_year
            .parse::<i32>()
            .map_err(|_| RecordFieldError::NotNumeric {
                field: "checkoutyear",
                value: self.checkout_year.clone(),
            })
    }

    /// Parses the reporting period from the month and year columns.
    ///
    /// # Errors
    ///
    /// Returns [`RecordFieldError`] if either column is invalid.
    pub fn period(&self) -> Result<Period, RecordFieldError> {
        let month = self.month()?;
        let year = self.year()?;
        Period::new(year, month).map_err(|_| RecordFieldError::MonthOutOfRange {
            value: u32::from(month),
        })
    }

    /// Returns `false` for placeholder rows that must never be shown: the
    /// [`UNKNOWN_TITLE`] placeholder and anything marked
    /// [`UNCATALOGED_MARKER`].
    #[must_use]
    pub fn is_catalogued(&self) -> bool {
        self.title != UNKNOWN_TITLE && !self.title.contains(UNCATALOGED_MARKER)
    }

    /// Creator with a single trailing non-alphanumeric character removed.
    #[must_use]
    pub fn creator_display(&self) -> Option<String> {
        self.creator.as_deref().map(display::trim_trailing_symbol)
    }

    /// Publisher with a single trailing non-alphanumeric character removed.
    #[must_use]
    pub fn publisher_display(&self) -> Option<String> {
        self.publisher.as_deref().map(display::trim_trailing_symbol)
    }

    /// Publication year reduced to its digits.
    #[must_use]
    pub fn publication_year_display(&self) -> Option<String> {
        self.publication_year.as_deref().map(display::digits_only)
    }

    /// Subject tags split out of the comma-separated `subjects` column.
    #[must_use]
    pub fn subject_tags(&self) -> Vec<&str> {
        self.subjects
            .as_deref()
            .map(display::subject_tags)
            .unwrap_or_default()
    }
}

fn parse_numeric(field: &'static str, value: &str) -> Result<u32, RecordFieldError> {
    value.parse::<u32>().map_err(|_| RecordFieldError::NotNumeric {
        field,
        value: value.to_string(),
    })
}
