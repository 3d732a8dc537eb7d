//! Comparator-based table sorting.
//!
//! Each column has a comparator taking the overall [`SortDirection`]. The
//! tie-break rules are deliberately asymmetric:
//!
//! * **Checkouts**: count in the given direction, ties by title ascending
//!   whatever the direction.
//! * **Type** / **Title**: the column in the given direction, ties by the
//!   checkouts comparator evaluated with the *reversed* direction and then
//!   flipped again by the outer direction. Equal-key runs therefore always
//!   come out with the highest checkout count first, and equal counts fall
//!   back to title in the outer direction.

use std::cmp::Ordering;

use library_checkouts_checkout_models::{CheckoutRecord, SortColumn, SortDirection, SortSpec};

use crate::EngineError;

/// A record paired with its validated checkout count.
struct SortKey<'a> {
    record: &'a CheckoutRecord,
    checkouts: u32,
}

impl<'a> SortKey<'a> {
    fn new(record: &'a CheckoutRecord) -> Result<Self, EngineError> {
        let checkouts = record
            .checkout_count()
            .map_err(|e| EngineError::invalid(record, e))?;
        Ok(Self { record, checkouts })
    }
}

type Comparator = fn(&SortKey<'_>, &SortKey<'_>, SortDirection) -> Ordering;

fn by_checkouts(a: &SortKey<'_>, b: &SortKey<'_>, direction: SortDirection) -> Ordering {
    direction
        .apply(a.checkouts.cmp(&b.checkouts))
        .then_with(|| a.record.title.cmp(&b.record.title))
}

fn by_material_type(a: &SortKey<'_>, b: &SortKey<'_>, direction: SortDirection) -> Ordering {
    direction.apply(
        a.record
            .material_type
            .cmp(&b.record.material_type)
            .then_with(|| by_checkouts(a, b, direction.reversed())),
    )
}

fn by_title(a: &SortKey<'_>, b: &SortKey<'_>, direction: SortDirection) -> Ordering {
    direction.apply(
        a.record
            .title
            .cmp(&b.record.title)
            .then_with(|| by_checkouts(a, b, direction.reversed())),
    )
}

const fn comparator(column: SortColumn) -> Comparator {
    match column {
        SortColumn::Type => by_material_type,
        SortColumn::Checkouts => by_checkouts,
        SortColumn::Title => by_title,
    }
}

/// Returns `records` ordered by `spec`. With no column selected the input
/// order is kept.
///
/// The sort is stable: records equal under both the primary key and the
/// tie-break keep their relative input order.
///
/// # Errors
///
/// Returns [`EngineError::InvalidRecord`] if any record's checkout count is
/// not numeric.
pub fn sort_records(
    records: &[CheckoutRecord],
    spec: SortSpec,
) -> Result<Vec<CheckoutRecord>, EngineError> {
    let Some(column) = spec.column else {
        return Ok(records.to_vec());
    };

    let mut keys = records
        .iter()
        .map(SortKey::new)
        .collect::<Result<Vec<_>, _>>()?;

    let compare = comparator(column);
    keys.sort_by(|a, b| compare(a, b, spec.direction));

    log::debug!(
        "Sorted {} records by {column} {}",
        keys.len(),
        spec.direction
    );

    Ok(keys.into_iter().map(|key| key.record.clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    fn spec(column: SortColumn, direction: SortDirection) -> SortSpec {
        SortSpec {
            column: Some(column),
            direction,
        }
    }

    fn summary(records: &[CheckoutRecord]) -> Vec<(&str, &str, &str)> {
        records
            .iter()
            .map(|r| {
                (
                    r.material_type.as_str(),
                    r.checkouts.as_str(),
                    r.title.as_str(),
                )
            })
            .collect()
    }

    #[test]
    fn checkouts_ties_break_by_title_ascending_in_both_directions() {
        let records = vec![
            record("Charlie", "BOOK", "60", 1, 2020),
            record("Alpha", "BOOK", "60", 1, 2020),
            record("Delta", "BOOK", "90", 1, 2020),
            record("Bravo", "BOOK", "60", 1, 2020),
            record("Echo", "BOOK", "55", 1, 2020),
        ];

        let ascending =
            sort_records(&records, spec(SortColumn::Checkouts, SortDirection::Ascending)).unwrap();
        let descending =
            sort_records(&records, spec(SortColumn::Checkouts, SortDirection::Descending)).unwrap();

        let titles = |rows: &[CheckoutRecord]| {
            rows.iter().map(|r| r.title.clone()).collect::<Vec<_>>()
        };
        assert_eq!(
            titles(&ascending),
            vec!["Echo", "Alpha", "Bravo", "Charlie", "Delta"]
        );
        assert_eq!(
            titles(&descending),
            vec!["Delta", "Alpha", "Bravo", "Charlie", "Echo"]
        );
    }

    #[test]
    fn type_descending_breaks_ties_by_reversed_checkouts_composite() {
        let records = vec![
            record("Small", "book", "5", 1, 2020),
            record("Big", "book", "15", 1, 2020),
            record("Film", "dvd", "10", 1, 2020),
        ];

        let sorted =
            sort_records(&records, spec(SortColumn::Type, SortDirection::Descending)).unwrap();

        assert_eq!(
            summary(&sorted),
            vec![
                ("dvd", "10", "Film"),
                ("book", "15", "Big"),
                ("book", "5", "Small"),
            ]
        );
    }

    #[test]
    fn type_ascending_still_puts_higher_checkouts_first_within_a_type() {
        let records = vec![
            record("Small", "book", "5", 1, 2020),
            record("Film", "dvd", "10", 1, 2020),
            record("Big", "book", "15", 1, 2020),
        ];

        let sorted =
            sort_records(&records, spec(SortColumn::Type, SortDirection::Ascending)).unwrap();

        assert_eq!(
            summary(&sorted),
            vec![
                ("book", "15", "Big"),
                ("book", "5", "Small"),
                ("dvd", "10", "Film"),
            ]
        );
    }

    #[test]
    fn type_with_equal_checkouts_orders_titles_in_outer_direction() {
        let records = vec![
            record("Alpha", "book", "7", 1, 2020),
            record("Bravo", "book", "7", 1, 2020),
        ];

        let ascending =
            sort_records(&records, spec(SortColumn::Type, SortDirection::Ascending)).unwrap();
        let descending =
            sort_records(&records, spec(SortColumn::Type, SortDirection::Descending)).unwrap();

        assert_eq!(ascending[0].title, "Alpha");
        assert_eq!(descending[0].title, "Bravo");
    }

    #[test]
    fn title_sort_breaks_duplicate_titles_by_checkouts_descending() {
        let records = vec![
            record("Dune", "BOOK", "50", 1, 2020),
            record("Alpha", "BOOK", "70", 1, 2020),
            record("Dune", "EBOOK", "80", 1, 2020),
        ];

        let ascending =
            sort_records(&records, spec(SortColumn::Title, SortDirection::Ascending)).unwrap();
        let descending =
            sort_records(&records, spec(SortColumn::Title, SortDirection::Descending)).unwrap();

        assert_eq!(
            summary(&ascending),
            vec![
                ("BOOK", "70", "Alpha"),
                ("EBOOK", "80", "Dune"),
                ("BOOK", "50", "Dune"),
            ]
        );
        assert_eq!(
            summary(&descending),
            vec![
                ("EBOOK", "80", "Dune"),
                ("BOOK", "50", "Dune"),
                ("BOOK", "70", "Alpha"),
            ]
        );
    }

    #[test]
    fn fully_equal_records_keep_input_order() {
        let mut first = record("Same", "BOOK", "60", 1, 2020);
        first.creator = Some("First".to_string());
        let mut second = record("Same", "BOOK", "60", 1, 2020);
        second.creator = Some("Second".to_string());
        let records = vec![first, second];

        for column in SortColumn::all() {
            for direction in [SortDirection::Ascending, SortDirection::Descending] {
                let sorted = sort_records(&records, spec(*column, direction)).unwrap();
                assert_eq!(sorted, records, "{column} {direction}");
            }
        }
    }

    #[test]
    fn sorting_is_a_permutation() {
        let records = vec![
            record("C", "EBOOK", "61", 1, 2020),
            record("A", "BOOK", "99", 1, 2020),
            record("B", "BOOK", "61", 1, 2020),
            record("A", "AUDIOBOOK", "50", 1, 2020),
        ];

        for column in SortColumn::all() {
            let mut sorted =
                sort_records(&records, spec(*column, SortDirection::Descending)).unwrap();
            let mut expected = records.clone();
            let key = |r: &CheckoutRecord| (r.title.clone(), r.material_type.clone());
            sorted.sort_by_key(key);
            expected.sort_by_key(key);
            assert_eq!(sorted, expected);
        }
    }

    #[test]
    fn no_column_keeps_input_order() {
        let records = vec![
            record("B", "BOOK", "not a number", 1, 2020),
            record("A", "BOOK", "60", 1, 2020),
        ];

        assert_eq!(sort_records(&records, SortSpec::default()).unwrap(), records);
    }

    #[test]
    fn non_numeric_checkouts_fail_fast() {
        let records = vec![
            record("Good", "BOOK", "60", 1, 2020),
            record("Bad", "BOOK", "sixty", 1, 2020),
        ];

        let err =
            sort_records(&records, spec(SortColumn::Title, SortDirection::Ascending)).unwrap_err();

        assert!(matches!(err, EngineError::InvalidRecord { ref title, .. } if title == "Bad"));
    }
}
