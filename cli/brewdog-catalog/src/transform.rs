//! Client side ordering and filtering of a fetched page.
//!
//! Nothing here talks to the catalog: sorting and searching only ever reshape
//! the records of the page that is already loaded.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Beer;

/// Fields a search term is matched against.
pub const SEARCHABLE_COLUMNS: [SortColumn; 3] = [
    SortColumn::Name,
    SortColumn::Description,
    SortColumn::Tagline,
];

/// A column the table can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    #[default]
    Name,
    Description,
    Tagline,
    Abv,
}

impl SortColumn {
    /// All columns in display order.
    pub const ALL: [SortColumn; 4] = [
        SortColumn::Name,
        SortColumn::Description,
        SortColumn::Tagline,
        SortColumn::Abv,
    ];

    /// Column header text.
    pub fn title(self) -> &'static str {
        match self {
            SortColumn::Name => "Name",
            SortColumn::Description => "Description",
            SortColumn::Tagline => "Tagline",
            SortColumn::Abv => "ABV",
        }
    }

    fn key(self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::Description => "description",
            SortColumn::Tagline => "tagline",
            SortColumn::Abv => "abv",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown column '{0}', expected one of: name, description, tagline, abv")]
pub struct UnknownColumn(String);

impl FromStr for SortColumn {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortColumn::ALL
            .into_iter()
            .find(|column| column.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownColumn(s.to_string()))
    }
}

/// Ordering direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort direction '{0}', expected 'asc' or 'desc'")]
pub struct UnknownDirection(String);

impl FromStr for SortDirection {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(UnknownDirection(s.to_string())),
        }
    }
}

/// Search input as the filter sees it: trimmed and lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchText(String);

impl SearchText {
    pub fn new(raw: &str) -> Self {
        SearchText(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any searchable field of `beer` contains this text, ignoring case.
    pub fn matches(&self, beer: &Beer) -> bool {
        self.is_empty() || contains_ignore_case(beer, &self.0)
    }
}

fn contains_ignore_case(beer: &Beer, needle_lowercase: &str) -> bool {
    SEARCHABLE_COLUMNS
        .iter()
        .any(|column| beer.field(*column).to_lowercase().contains(needle_lowercase))
}

/// Compare two records by the text of `column`.
///
/// Values are compared as strings, ABV included.
pub fn compare(a: &Beer, b: &Beer, column: SortColumn) -> Ordering {
    a.field(column).cmp(b.field(column))
}

/// Return a copy of `records` ordered by `column`.
///
/// The sort is stable: records with equal keys keep their relative input
/// order in both directions.
pub fn sort(records: &[Beer], column: SortColumn, direction: SortDirection) -> Vec<Beer> {
    let mut sorted = records.to_vec();
    match direction {
        SortDirection::Asc => sorted.sort_by(|a, b| compare(a, b, column)),
        SortDirection::Desc => sorted.sort_by(|a, b| compare(a, b, column).reverse()),
    }
    sorted
}

/// Keep the records where any of name, description or tagline contains
/// `search_text` case-insensitively. An empty `search_text` keeps everything.
pub fn filter(records: Vec<Beer>, search_text: &str) -> Vec<Beer> {
    if search_text.is_empty() {
        return records;
    }
    let needle = search_text.to_lowercase();
    records
        .into_iter()
        .filter(|beer| contains_ignore_case(beer, &needle))
        .collect()
}

/// Order and filter a loaded page.
///
/// Sorting happens first, filtering runs on the sorted sequence. `records` is
/// left untouched.
pub fn transform(
    records: &[Beer],
    column: SortColumn,
    direction: SortDirection,
    search_text: &str,
) -> Vec<Beer> {
    let sorted = sort(records, column, direction);
    filter(sorted, search_text)
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::types::beer;

    fn names(beers: &[Beer]) -> Vec<&str> {
        beers.iter().map(|beer| beer.name.as_str()).collect()
    }

    fn abvs(beers: &[Beer]) -> Vec<&str> {
        beers.iter().map(|beer| beer.abv.as_str()).collect()
    }

    fn sample() -> Vec<Beer> {
        vec![
            beer(
                1,
                "Buzz",
                "A Real Bitter Experience.",
                "A light, crisp and bitter IPA.",
                "4.5",
            ),
            beer(
                2,
                "Trashy Blonde",
                "You Know You Shouldn't",
                "A titillating, neurotic, peroxide punk of a Pale Ale.",
                "4.1",
            ),
            beer(
                3,
                "Berliner Weisse With Yuzu - B-Sides",
                "Japanese Citrus Berliner Weisse.",
                "Japanese citrus fruit intensifies the sour nature of this German classic.",
                "4.2",
            ),
            beer(
                4,
                "Hello My Name Is Mette-Marit",
                "India Pale Ale",
                "We brewed this for the Norwegian market.",
                "8.2",
            ),
        ]
    }

    #[test]
    fn sorts_by_name_ascending_by_default() {
        let sorted = transform(
            &sample(),
            SortColumn::default(),
            SortDirection::default(),
            "",
        );
        assert_eq!(names(&sorted), [
            "Berliner Weisse With Yuzu - B-Sides",
            "Buzz",
            "Hello My Name Is Mette-Marit",
            "Trashy Blonde"
        ]);
    }

    #[test]
    fn abv_sorts_as_text() {
        let records = vec![
            beer(1, "Buzz", "", "", "4.5"),
            beer(2, "Trashy Blonde", "", "", "4.1"),
        ];
        let sorted = sort(&records, SortColumn::Abv, SortDirection::Asc);
        assert_eq!(abvs(&sorted), ["4.1", "4.5"]);

        let records = vec![beer(1, "a", "", "", "9.0"), beer(2, "b", "", "", "10.0")];
        let sorted = sort(&records, SortColumn::Abv, SortDirection::Asc);
        assert_eq!(abvs(&sorted), ["10.0", "9.0"]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let records = vec![
            beer(1, "Same", "", "", "5"),
            beer(2, "Same", "", "", "5"),
            beer(3, "Other", "", "", "5"),
            beer(4, "Same", "", "", "5"),
        ];
        let ids = |beers: Vec<Beer>| beers.iter().map(|b| b.id).collect::<Vec<_>>();

        assert_eq!(
            ids(sort(&records, SortColumn::Name, SortDirection::Asc)),
            [3, 1, 2, 4]
        );
        assert_eq!(
            ids(sort(&records, SortColumn::Name, SortDirection::Desc)),
            [1, 2, 4, 3]
        );
        // repeated sorts are deterministic
        let once = sort(&records, SortColumn::Abv, SortDirection::Asc);
        let twice = sort(&once, SortColumn::Abv, SortDirection::Asc);
        assert_eq!(ids(once), ids(twice));
    }

    #[test]
    fn search_matches_tagline_case_insensitively() {
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let found = transform(&sample(), SortColumn::Abv, direction, "pale");
            assert!(
                found.iter().any(|b| b.name == "Hello My Name Is Mette-Marit"),
                "expected tagline match for {direction}"
            );
            // "Trashy Blonde" matches through its description
            assert!(found.iter().any(|b| b.name == "Trashy Blonde"));
            assert_eq!(found.len(), 2);
        }
    }

    #[test]
    fn search_matches_description() {
        let found = transform(&sample(), SortColumn::Name, SortDirection::Asc, "ipa");
        assert_eq!(names(&found), ["Buzz"]);
    }

    #[test]
    fn search_is_case_insensitive_on_both_sides() {
        let found = transform(&sample(), SortColumn::Name, SortDirection::Asc, "JAPANESE");
        assert_eq!(names(&found), ["Berliner Weisse With Yuzu - B-Sides"]);
    }

    #[test]
    fn filter_runs_after_sort() {
        let found = transform(&sample(), SortColumn::Name, SortDirection::Desc, "a");
        let expected = sort(&sample(), SortColumn::Name, SortDirection::Desc)
            .into_iter()
            .filter(|b| SearchText::new("a").matches(b))
            .collect::<Vec<_>>();
        assert_eq!(found, expected);
    }

    #[test]
    fn empty_records_yield_empty_result() {
        assert!(transform(&[], SortColumn::Tagline, SortDirection::Desc, "buzz").is_empty());
    }

    #[test]
    fn input_is_not_mutated() {
        let records = sample();
        let before = records.clone();
        let _ = transform(&records, SortColumn::Abv, SortDirection::Desc, "ale");
        assert_eq!(records, before);
    }

    #[test]
    fn search_text_is_normalized() {
        let search = SearchText::new("  India PALE ");
        assert_eq!(search.as_str(), "india pale");
        assert!(search.matches(&sample()[3]));
        assert!(SearchText::new("   ").is_empty());
    }

    #[test]
    fn parse_columns_and_directions() {
        assert_eq!("ABV".parse::<SortColumn>(), Ok(SortColumn::Abv));
        assert_eq!("tagline".parse::<SortColumn>(), Ok(SortColumn::Tagline));
        assert!("ibu".parse::<SortColumn>().is_err());
        assert_eq!("Desc".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert!("up".parse::<SortDirection>().is_err());
        for column in SortColumn::ALL {
            assert_eq!(column.to_string().parse::<SortColumn>(), Ok(column));
        }
    }

    fn unique_records() -> impl Strategy<Value = Vec<Beer>> {
        proptest::collection::hash_set("[a-zA-Z0-9 ]{1,12}", 0..10).prop_map(|keys| {
            keys.into_iter()
                .enumerate()
                .map(|(id, key)| beer(id as u64, &key, &key, &key, &key))
                .collect()
        })
    }

    fn any_column() -> impl Strategy<Value = SortColumn> {
        proptest::sample::select(SortColumn::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn descending_is_reversed_ascending(records in unique_records(), column in any_column()) {
            let mut ascending = sort(&records, column, SortDirection::Asc);
            ascending.reverse();
            let descending = sort(&records, column, SortDirection::Desc);
            prop_assert_eq!(ascending, descending);
        }

        #[test]
        fn filtering_is_idempotent(records in unique_records(), search in "[a-z]{0,3}") {
            let once = filter(records, &search);
            let twice = filter(once.clone(), &search);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn empty_search_keeps_sorted_records(records in unique_records(), column in any_column()) {
            let sorted = sort(&records, column, SortDirection::Asc);
            prop_assert_eq!(transform(&records, column, SortDirection::Asc, ""), sorted);
        }

        #[test]
        fn result_is_subset_of_input(records in unique_records(), search in "[a-z]{0,2}") {
            let ids = records.iter().map(|b| b.id).sorted().collect::<Vec<_>>();
            let found = transform(&records, SortColumn::Name, SortDirection::Asc, &search);
            prop_assert!(found.iter().all(|b| ids.binary_search(&b.id).is_ok()));
        }
    }
}
