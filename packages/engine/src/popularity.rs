//! Per-title popularity aggregation.

use library_checkouts_checkout_models::{CheckoutRecord, PopularityPoint, PopularitySeries};

use crate::EngineError;

/// Builds the checkout time series of `title` from `records`.
///
/// Only records whose title equals `title` exactly are used. Points are
/// ordered by year and then month, compared numerically. When several
/// records report the same period, the one with the highest checkout count
/// is kept.
///
/// # Errors
///
/// Returns [`EngineError::InvalidRecord`] if a selected record has a
/// non-numeric checkout count or an invalid month or year.
pub fn popularity_series(
    title: &str,
    records: &[CheckoutRecord],
) -> Result<PopularitySeries, EngineError> {
    let mut points = records
        .iter()
        .filter(|record| record.title == title)
        .map(|record| {
            let period = record
                .period()
                .map_err(|e| EngineError::invalid(record, e))?;
            let checkouts = record
                .checkout_count()
                .map_err(|e| EngineError::invalid(record, e))?;
            Ok(PopularityPoint { period, checkouts })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    points.sort_by(|a, b| {
        a.period
            .cmp(&b.period)
            .then_with(|| b.checkouts.cmp(&a.checkouts))
    });
    let selected = points.len();
    points.dedup_by_key(|point| point.period);

    if points.len() < selected {
        log::debug!(
            "Collapsed {} duplicate periods for {title:?}",
            selected - points.len()
        );
    }

    Ok(PopularitySeries {
        title: title.to_string(),
        points,
    })
}
