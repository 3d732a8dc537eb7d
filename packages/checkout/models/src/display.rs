//! Display clean-up for the free-text catalog columns.
//!
//! Catalog records carry cataloguing punctuation (`"Melville, Herman,"`,
//! `"[2003]"`). These helpers are for presentation only; filtering always
//! runs against the raw values.

use std::sync::LazyLock;

use regex::Regex;

/// A single trailing character that is not ASCII alphanumeric.
static TRAILING_SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]$").expect("valid regex"));

/// Any non-digit character.
static NON_DIGIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9]").expect("valid regex"));

/// Separator between entries of the `subjects` column.
const SUBJECT_SEPARATOR: &str = ", ";

/// Removes one trailing non-alphanumeric character, if present.
#[must_use]
pub fn trim_trailing_symbol(value: &str) -> String {
    TRAILING_SYMBOL_RE.replace(value, "").into_owned()
}

/// Keeps only the ASCII digits of `value`.
#[must_use]
pub fn digits_only(value: &str) -> String {
    NON_DIGIT_RE.replace_all(value, "").into_owned()
}

/// Splits a `subjects` column into its tags.
#[must_use]
pub fn subject_tags(subjects: &str) -> Vec<&str> {
    subjects
        .split(SUBJECT_SEPARATOR)
        .filter(|tag| !tag.is_empty())
        .collect()
}
