//! Multi-predicate record filter.

use library_checkouts_checkout_models::{CheckoutRecord, FilterCriteria};

use crate::EngineError;

/// Criteria with the text matchers lowercased once up front.
struct Matcher<'a> {
    criteria: &'a FilterCriteria,
    title: String,
    subject: String,
    creator: String,
    publisher: String,
}

impl<'a> Matcher<'a> {
    fn new(criteria: &'a FilterCriteria) -> Self {
        Self {
            criteria,
            title: criteria.title.to_lowercase(),
            subject: criteria.subject.to_lowercase(),
            creator: criteria.creator.to_lowercase(),
            publisher: criteria.publisher.to_lowercase(),
        }
    }

    fn matches(&self, record: &CheckoutRecord) -> Result<bool, EngineError> {
        if !record.is_catalogued() {
            return Ok(false);
        }

        let period = record
            .period()
            .map_err(|e| EngineError::invalid(record, e))?;
        if period != self.criteria.period {
            return Ok(false);
        }

        Ok(contains_ignore_case(Some(record.title.as_str()), &self.title)
            && contains_ignore_case(record.subjects.as_deref(), &self.subject)
            && contains_ignore_case(record.creator.as_deref(), &self.creator)
            && contains_ignore_case(record.publisher.as_deref(), &self.publisher)
            && self.criteria.material_type.matches(&record.material_type))
    }
}

/// An empty needle always matches. A non-empty needle never matches a
/// missing or empty field.
fn contains_ignore_case(field: Option<&str>, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    field
        .filter(|value| !value.is_empty())
        .is_some_and(|value| value.to_lowercase().contains(needle))
}

/// Whether `record` satisfies every constraint in `criteria`.
///
/// Placeholder titles (see
/// [`CheckoutRecord::is_catalogued`]) never match, whatever the criteria.
///
/// # Errors
///
/// Returns [`EngineError::InvalidRecord`] if the record's month or year
/// cannot be parsed.
pub fn matches(record: &CheckoutRecord, criteria: &FilterCriteria) -> Result<bool, EngineError> {
    Matcher::new(criteria).matches(record)
}

/// Selects the records matching `criteria`, preserving their order.
///
/// # Errors
///
/// Returns [`EngineError::InvalidRecord`] for the first catalogued record
/// whose month or year cannot be parsed.
pub fn filter_records(
    records: &[CheckoutRecord],
    criteria: &FilterCriteria,
) -> Result<Vec<CheckoutRecord>, EngineError> {
    let matcher = Matcher::new(criteria);
    let mut filtered = Vec::new();

    for record in records {
        if matcher.matches(record)? {
            filtered.push(record.clone());
        }
    }

    log::debug!(
        "Filter kept {}/{} records for {}",
        filtered.len(),
        records.len(),
        criteria.period
    );

    Ok(filtered)
}
