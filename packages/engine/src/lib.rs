#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory filter, sort and popularity aggregation over checkout records.
//!
//! Every function here is pure and synchronous: inputs are borrowed and
//! never mutated, results are new collections. Numeric columns are
//! validated as they are used, and an invalid value aborts the whole
//! operation with an [`EngineError`] rather than being coerced.

pub mod filter;
pub mod popularity;
pub mod sort;

use std::collections::BTreeSet;

use library_checkouts_checkout_models::{CheckoutRecord, RecordFieldError};

pub use filter::{filter_records, matches};
pub use popularity::popularity_series;
pub use sort::sort_records;

/// Errors that can occur while filtering, sorting or aggregating.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A record carries a value that cannot be interpreted.
    #[error("invalid record {title:?}: {source}")]
    InvalidRecord {
        /// Title of the offending record.
        title: String,
        /// What was wrong with it.
        #[source]
        source: RecordFieldError,
    },
}

impl EngineError {
    pub(crate) fn invalid(record: &CheckoutRecord, source: RecordFieldError) -> Self {
        Self::InvalidRecord {
            title: record.title.clone(),
            source,
        }
    }
}

/// Distinct material types present in `records`, sorted ascending.
#[must_use]
pub fn material_types(records: &[CheckoutRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|record| !record.material_type.is_empty())
        .map(|record| record.material_type.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use library_checkouts_checkout_models::CheckoutRecord;

    pub fn record(
        title: &str,
        material_type: &str,
        checkouts: &str,
        month: u8,
        year: i32,
    ) -> CheckoutRecord {
        CheckoutRecord {
            title: title.to_string(),
            material_type: material_type.to_string(),
            checkouts: checkouts.to_string(),
            checkout_month: month.to_string(),
            checkout_year: year.to_string(),
            ..CheckoutRecord::default()
        }
    }
}
