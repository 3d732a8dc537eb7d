//! Table sort selection.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Column the results table can be sorted by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum SortColumn {
    /// Material type, ties broken by checkouts.
    Type,
    /// Checkout count, ties broken by title.
    Checkouts,
    /// Title, ties broken by checkouts.
    Title,
}

impl SortColumn {
    /// Every column in table order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Type, Self::Checkouts, Self::Title]
    }
}

/// Sort direction.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum SortDirection {
    /// Smallest first.
    #[serde(rename = "asc")]
    #[strum(serialize = "asc")]
    Ascending,
    /// Largest first.
    #[default]
    #[serde(rename = "desc")]
    #[strum(serialize = "desc")]
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Applies this direction to an ascending comparison result.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Current sort selection of the results table.
///
/// Starts with no column and a descending direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    /// Selected column, `None` until the user picks one.
    pub column: Option<SortColumn>,
    /// Direction applied to the selected column.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Spec after the user selects `column`: re-selecting the current column
    /// toggles the direction, selecting another column sorts it descending.
    #[must_use]
    pub fn select(self, column: SortColumn) -> Self {
        let direction = match self.column {
            Some(current) if current == column => self.direction.reversed(),
            _ => SortDirection::Descending,
        };
        Self {
            column: Some(column),
            direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_selection_sorts_descending() {
        let spec = SortSpec::default().select(SortColumn::Title);
        assert_eq!(spec.column, Some(SortColumn::Title));
        assert_eq!(spec.direction, SortDirection::Descending);
    }

    #[test]
    fn reselecting_toggles_direction() {
        let spec = SortSpec::default().select(SortColumn::Checkouts);
        let spec = spec.select(SortColumn::Checkouts);
        assert_eq!(spec.direction, SortDirection::Ascending);
        let spec = spec.select(SortColumn::Checkouts);
        assert_eq!(spec.direction, SortDirection::Descending);
    }

    #[test]
    fn switching_column_resets_to_descending() {
        let spec = SortSpec::default()
            .select(SortColumn::Checkouts)
            .select(SortColumn::Checkouts);
        assert_eq!(spec.direction, SortDirection::Ascending);

        let spec = spec.select(SortColumn::Type);
        assert_eq!(spec.column, Some(SortColumn::Type));
        assert_eq!(spec.direction, SortDirection::Descending);
    }

    #[test]
    fn parses_column_and_direction_names() {
        assert_eq!("Type".parse::<SortColumn>().unwrap(), SortColumn::Type);
        assert_eq!("title".parse::<SortColumn>().unwrap(), SortColumn::Title);
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Ascending);
        assert_eq!(SortDirection::Descending.to_string(), "desc");
    }
}
