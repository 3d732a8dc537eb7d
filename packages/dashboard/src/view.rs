//! Snapshots of what the dashboard currently shows.

use library_checkouts_checkout_models::{CheckoutRecord, FilterCriteria, Period, SortSpec};

/// What the results pane should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// No month has been chosen yet.
    AwaitingPeriod,
    /// Rows for `period` are being fetched.
    Loading {
        /// Period being fetched.
        period: Period,
    },
    /// Filtered and sorted rows are available. An empty `rows` is the
    /// "no results for these filters" state.
    Ready(Results),
}

impl View {
    /// The results, if the view is [`View::Ready`].
    #[must_use]
    pub const fn results(&self) -> Option<&Results> {
        match self {
            Self::Ready(results) => Some(results),
            Self::AwaitingPeriod | Self::Loading { .. } => None,
        }
    }
}

/// Visible rows together with the criteria and sort that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Results {
    /// Criteria the rows were filtered with.
    pub criteria: FilterCriteria,
    /// Sort the rows are ordered by.
    pub sort: SortSpec,
    /// Visible rows in display order.
    pub rows: Vec<VisibleRow>,
    /// Number of rows fetched for the period before filtering.
    pub loaded: usize,
    /// Diagnostic shown when the rows are empty because the period fetch
    /// failed or a loaded record could not be filtered.
    pub notice: Option<String>,
}

/// A row of the results table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    /// Stable identity for the UI: `"{month}-{year}-{title}-{index}"`.
    pub key: String,
    /// The record shown.
    pub record: CheckoutRecord,
}

impl VisibleRow {
    pub(crate) fn new(index: usize, record: CheckoutRecord) -> Self {
        let key = format!(
            "{}-{}-{}-{index}",
            record.checkout_month, record.checkout_year, record.title
        );
        Self { key, record }
    }
}
