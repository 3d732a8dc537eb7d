//! Per-title popularity time series.

use serde::{Deserialize, Serialize};

use crate::Period;

/// Checkout count of a title in one reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularityPoint {
    /// Reporting period, serialized as `"YYYY/M"`.
    pub period: Period,
    /// Checkouts in that period.
    pub checkouts: u32,
}

/// Chronologically ascending checkout counts of one title, with at most
/// one point per period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularitySeries {
    /// Title the series was built for.
    pub title: String,
    /// Points in strictly increasing period order.
    pub points: Vec<PopularityPoint>,
}

impl PopularitySeries {
    /// Whether the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Checkouts recorded for `period`, if any.
    #[must_use]
    pub fn checkouts_in(&self, period: Period) -> Option<u32> {
        self.points
            .binary_search_by_key(&period, |point| point.period)
            .ok()
            .map(|idx| self.points[idx].checkouts)
    }
}

/// A popularity series ready for plotting, with the period of the row the
/// user expanded marked for a reference line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularityChart {
    /// The plotted series.
    pub series: PopularitySeries,
    /// Period to highlight, usually the one currently being browsed.
    pub highlight: Option<Period>,
}
