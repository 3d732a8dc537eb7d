//! Filter criteria collected from the dashboard's search fields.

use serde::{Deserialize, Serialize};

use crate::Period;

/// Sentinel selection meaning "any material type".
pub const ALL_TYPES: &str = "All";

/// Material type constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MaterialTypeFilter {
    /// No constraint.
    #[default]
    All,
    /// Exact, case-sensitive match on the record's material type.
    Only(String),
}

impl MaterialTypeFilter {
    /// Interprets a type selector value. Empty and [`ALL_TYPES`] both mean
    /// no constraint.
    #[must_use]
    pub fn from_selection(selection: &str) -> Self {
        if selection.is_empty() || selection == ALL_TYPES {
            Self::All
        } else {
            Self::Only(selection.to_string())
        }
    }

    /// Whether `material_type` satisfies this constraint.
    #[must_use]
    pub fn matches(&self, material_type: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == material_type,
        }
    }
}

impl From<String> for MaterialTypeFilter {
    fn from(value: String) -> Self {
        Self::from_selection(&value)
    }
}

impl From<MaterialTypeFilter> for String {
    fn from(filter: MaterialTypeFilter) -> Self {
        match filter {
            MaterialTypeFilter::All => ALL_TYPES.to_string(),
            MaterialTypeFilter::Only(value) => value,
        }
    }
}

/// Immutable snapshot of every filter the user has set.
///
/// Text fields are case-insensitive substring matchers; an empty string
/// places no constraint. The period is always required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Substring searched in the title.
    pub title: String,
    /// Substring searched in the subjects list.
    pub subject: String,
    /// Substring searched in the creator.
    pub creator: String,
    /// Substring searched in the publisher.
    pub publisher: String,
    /// Material type constraint.
    #[serde(rename = "type")]
    pub material_type: MaterialTypeFilter,
    /// Reporting period a record must belong to.
    pub period: Period,
}

impl FilterCriteria {
    /// Criteria that only constrain the period.
    #[must_use]
    pub fn for_period(period: Period) -> Self {
        Self {
            title: String::new(),
            subject: String::new(),
            creator: String::new(),
            publisher: String::new(),
            material_type: MaterialTypeFilter::All,
            period,
        }
    }

    /// Returns a copy with the material type constraint removed.
    #[must_use]
    pub fn with_all_types(self) -> Self {
        Self {
            material_type: MaterialTypeFilter::All,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sentinel_and_empty_mean_no_constraint() {
        assert_eq!(MaterialTypeFilter::from_selection("All"), MaterialTypeFilter::All);
        assert_eq!(MaterialTypeFilter::from_selection(""), MaterialTypeFilter::All);
        assert!(MaterialTypeFilter::All.matches("BOOK"));
    }

    #[test]
    fn only_matches_exactly() {
        let filter = MaterialTypeFilter::from_selection("BOOK");
        assert!(filter.matches("BOOK"));
        assert!(!filter.matches("book"));
        assert!(!filter.matches("EBOOK"));
    }

    #[test]
    fn criteria_deserialize_from_camel_case() {
        let criteria: FilterCriteria = serde_json::from_value(serde_json::json!({
            "title": "moby",
            "subject": "",
            "creator": "",
            "publisher": "",
            "type": "All",
            "period": "2020/1"
        }))
        .unwrap();

        assert_eq!(criteria.material_type, MaterialTypeFilter::All);
        assert_eq!(criteria.period, Period::new(2020, 1).unwrap());
    }
}
