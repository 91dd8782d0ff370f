//! Parsing of the raw "parking held" field into block descriptors.
//!
//! A parking-held field holds one or more comma-joined fragments, each of
//! the shape `"Main St between Cross A and Cross B"`. Fragments that do not
//! match that shape (dead ends, missing "between", too many cross streets)
//! parse to `None` rather than failing: the feed is free text, and an
//! unparsable fragment just means the block has no resolvable geometry.

use regex::Regex;
use std::sync::LazyLock;

use permit_map_permit_models::BlockDescriptor;

use crate::street::normalize;
use crate::tables::NULL_STREET_MARKERS;

static BETWEEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i) between ").expect("valid regex"));
static AND: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i) and ").expect("valid regex"));

/// Parses a raw parking-held field into one entry per comma-joined
/// fragment, preserving fragment order.
///
/// Callers must treat `None` entries as "unresolvable, skip for geometry";
/// they still count toward the permit's block sequence.
#[must_use]
pub fn parse_parking_held(raw_field: &str) -> Vec<Option<BlockDescriptor>> {
    raw_field.split(", ").map(parse_fragment).collect()
}

/// Parses a single fragment into a block descriptor.
fn parse_fragment(fragment: &str) -> Option<BlockDescriptor> {
    let fragment = title_case(fragment);
    let lower = fragment.to_lowercase();
    if NULL_STREET_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
    {
        return None;
    }

    let parts: Vec<&str> = BETWEEN.split(&fragment).collect();
    let [main, crosses] = parts.as_slice() else {
        return None;
    };

    let crosses: Vec<&str> = AND.split(crosses).collect();
    let [cross_1, cross_2] = crosses.as_slice() else {
        return None;
    };

    Some(BlockDescriptor {
        main: normalize(main),
        cross_1: normalize(cross_1),
        cross_2: normalize(cross_2),
    })
}

/// Rebuilds a fragment with every whitespace-separated word capitalized
/// (first letter upper, rest lower), collapsing runs of whitespace.
fn title_case(fragment: &str) -> String {
    fragment
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
    })
}
