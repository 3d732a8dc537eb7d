#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the library checkouts server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the dashboard's view types to allow independent evolution of the
//! API contract.

use library_checkouts_checkout_models::{
    FilterCriteria, InvalidPeriodError, MaterialTypeFilter, Period, SortSpec,
};
use library_checkouts_dashboard::{View, VisibleRow};
use serde::{Deserialize, Serialize};

/// A row of the results table as returned by the API, with the detail
/// fields cleaned up for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRow {
    /// Stable row identity.
    pub key: String,
    /// Material type.
    pub material_type: String,
    /// Checkout count, as reported.
    pub checkouts: String,
    /// Title.
    pub title: String,
    /// Reporting period.
    pub period: Option<Period>,
    /// Subject tags.
    pub subjects: Vec<String>,
    /// Creator without trailing punctuation.
    pub creator: Option<String>,
    /// Publisher without trailing punctuation.
    pub publisher: Option<String>,
    /// Publication year digits.
    pub publication_year: Option<String>,
}

impl From<&VisibleRow> for ApiRow {
    fn from(row: &VisibleRow) -> Self {
        let record = &row.record;
        Self {
            key: row.key.clone(),
            material_type: record.material_type.clone(),
            checkouts: record.checkouts.clone(),
            title: record.title.clone(),
            period: record.period().ok(),
            subjects: record
                .subject_tags()
                .into_iter()
                .map(str::to_string)
                .collect(),
            creator: record.creator_display(),
            publisher: record.publisher_display(),
            publication_year: record.publication_year_display(),
        }
    }
}

/// The dashboard's results pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ApiView {
    /// No month selected yet.
    AwaitingPeriod,
    /// Rows are being fetched.
    #[serde(rename_all = "camelCase")]
    Loading {
        /// Period being fetched.
        period: Period,
    },
    /// Rows are available; `rows` may be empty.
    #[serde(rename_all = "camelCase")]
    Ready {
        /// Criteria in effect.
        criteria: FilterCriteria,
        /// Sort in effect.
        sort: SortSpec,
        /// Visible rows.
        rows: Vec<ApiRow>,
        /// Rows fetched for the period before filtering.
        loaded: usize,
        /// Diagnostic when the period fetch failed.
        notice: Option<String>,
    },
}

impl From<&View> for ApiView {
    fn from(view: &View) -> Self {
        match view {
            View::AwaitingPeriod => Self::AwaitingPeriod,
            View::Loading { period } => Self::Loading { period: *period },
            View::Ready(results) => Self::Ready {
                criteria: results.criteria.clone(),
                sort: results.sort,
                rows: results.rows.iter().map(ApiRow::from).collect(),
                loaded: results.loaded,
                notice: results.notice.clone(),
            },
        }
    }
}

/// Query parameters for the checkouts endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutQueryParams {
    /// Reporting year.
    pub year: i32,
    /// Reporting month (1-12).
    pub month: u8,
    /// Title search.
    pub title: Option<String>,
    /// Subject search.
    pub subject: Option<String>,
    /// Creator search.
    pub creator: Option<String>,
    /// Publisher search.
    pub publisher: Option<String>,
    /// Material type, or `All`.
    #[serde(rename = "type")]
    pub material_type: Option<String>,
}

impl CheckoutQueryParams {
    /// Builds the criteria snapshot these parameters describe.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPeriodError`] if the month is out of range.
    pub fn into_criteria(self) -> Result<FilterCriteria, InvalidPeriodError> {
        Ok(FilterCriteria {
            title: self.title.unwrap_or_default(),
            subject: self.subject.unwrap_or_default(),
            creator: self.creator.unwrap_or_default(),
            publisher: self.publisher.unwrap_or_default(),
            material_type: self
                .material_type
                .as_deref()
                .map(MaterialTypeFilter::from_selection)
                .unwrap_or_default(),
            period: Period::new(self.year, self.month)?,
        })
    }
}

/// Query parameters for the popularity endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularityQueryParams {
    /// Exact title.
    pub title: String,
    /// Year of the period to highlight.
    pub year: Option<i32>,
    /// Month of the period to highlight.
    pub month: Option<u8>,
}

impl PopularityQueryParams {
    /// The period to highlight, if both parts are given.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPeriodError`] if the month is out of range.
    pub fn highlight(&self) -> Result<Option<Period>, InvalidPeriodError> {
        match (self.year, self.month) {
            (Some(year), Some(month)) => Period::new(year, month).map(Some),
            _ => Ok(None),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
    /// Whether retrying the same request may succeed.
    pub retryable: bool,
}
