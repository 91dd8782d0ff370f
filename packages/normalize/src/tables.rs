//! Fixed rule tables for street name normalization.
//!
//! These are read-only process-wide constants. The abbreviation list is
//! deliberately short: it covers the suffixes that actually occur in the
//! film-permit feed rather than the full USPS Publication 28 table.

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Suffix abbreviations expanded when they appear as an embedded or
/// trailing token (never leading, where `st` means "saint").
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("st", "street"),
    ("ave", "avenue"),
    ("ct", "court"),
    ("blvd", "boulevard"),
    ("sq", "square"),
    ("rd", "road"),
    ("ln", "lane"),
    ("expy", "expressway"),
    ("pkwy", "parkway"),
    ("pl", "place"),
    ("dr", "drive"),
];

/// Spelled-out ordinals rewritten to digit form so that "Third Avenue"
/// and "3 Avenue" land on the same canonical name.
pub const SPELLED_ORDINALS: &[(&str, &str)] = &[
    ("first", "1st"),
    ("second", "2nd"),
    ("third", "3rd"),
    ("fourth", "4th"),
    ("fifth", "5th"),
    ("sixth", "6th"),
    ("seventh", "7th"),
    ("eighth", "8th"),
    ("ninth", "9th"),
    ("tenth", "10th"),
    ("eleventh", "11th"),
    ("twelfth", "12th"),
];

/// Fragments naming a dead end rather than a cross street. A parking-held
/// fragment containing any of these has no resolvable block geometry.
pub const NULL_STREET_MARKERS: &[&str] = &["dead road", "dead end", "dead rd"];

/// Real-world aliases that the mechanical steps cannot derive. Applied
/// last, as a whole-string replacement on the fully-processed name.
pub static SPECIAL_CASES: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    BTreeMap::from([
        (
            "brooklyn bridge boulevard",
            "adams street - brooklyn bridge boulevard",
        ),
        ("laguardia place", "la guardia place"),
        (
            "north powell jr boulevard",
            "adam clayton powell jr. boulevard",
        ),
        (
            "adam clayton powell jr boulevard",
            "adam clayton powell jr. boulevard",
        ),
        ("avenue of the americas", "6th avenue"),
        ("fort green place", "fort greene place"),
        (
            "west 106th street",
            "west 106th street / duke ellington",
        ),
        (
            "adam clayton powell boulevard",
            "adam clayton powell jr. boulevard",
        ),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviations_are_lowercase() {
        for (abbr, full) in ABBREVIATIONS {
            assert_eq!(*abbr, abbr.to_lowercase());
            assert_eq!(*full, full.to_lowercase());
        }
    }

    #[test]
    fn special_case_values_are_stable() {
        // Values must themselves be fixed points of normalization; spot
        // check that none of them contain an expandable abbreviation token.
        for value in SPECIAL_CASES.values() {
            for (abbr, _) in ABBREVIATIONS {
                assert!(
                    !value.contains(&format!(" {abbr} ")) && !value.ends_with(&format!(" {abbr}")),
                    "special case value {value:?} contains abbreviation {abbr:?}"
                );
            }
        }
    }
}
