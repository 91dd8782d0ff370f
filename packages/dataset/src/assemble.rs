//! Wide-to-long assembly of permits into flat rows.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use permit_map_permit_models::{Permit, is_zip_sentinel};

use crate::explode::explode_zip_codes;

/// One row per permit × block, carrying the permit's scalar attributes
/// plus the block's three street names.
///
/// Rows for unparsable blocks keep `None` street fields: they still count
/// for date/category aggregation, they are just excluded from any
/// geometry join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitBlockRow {
    /// The permit's id.
    pub permit_id: String,
    /// Position of this block within the permit's parking-held field.
    pub block_index: usize,
    /// When the shoot starts.
    pub start_datetime: NaiveDateTime,
    /// When the shoot ends.
    pub end_datetime: NaiveDateTime,
    /// When the permit was entered.
    pub entered_on: NaiveDateTime,
    /// Production category.
    pub category: String,
    /// Production subcategory.
    pub subcategory: String,
    /// Country of origin.
    pub origin: String,
    /// Borough string from the feed.
    pub borough: String,
    /// The permit's zip codes (not exploded at this level).
    pub zip_codes: Vec<String>,
    /// Main street, if the block parsed.
    pub main: Option<String>,
    /// First cross street, if the block parsed.
    pub cross_1: Option<String>,
    /// Second cross street, if the block parsed.
    pub cross_2: Option<String>,
}

impl PermitBlockRow {
    /// Returns `true` if this row has street names to join geometry on.
    #[must_use]
    pub const fn has_block(&self) -> bool {
        self.main.is_some()
    }
}

/// A distinct-permit count for one ZIP code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZipPermitCount {
    /// The ZIP code.
    pub zip_code: String,
    /// Number of distinct permits touching that ZIP.
    pub permit_count: usize,
}

/// Materializes one row per permit × block, preserving permit order and
/// block order within each permit.
#[must_use]
pub fn block_rows(permits: &[Permit]) -> Vec<PermitBlockRow> {
    permits
        .iter()
        .flat_map(|permit| {
            permit
                .blocks
                .iter()
                .enumerate()
                .map(|(block_index, block)| PermitBlockRow {
                    permit_id: permit.id.clone(),
                    block_index,
                    start_datetime: permit.start_datetime,
                    end_datetime: permit.end_datetime,
                    entered_on: permit.entered_on,
                    category: permit.category.clone(),
                    subcategory: permit.subcategory.clone(),
                    origin: permit.origin.clone(),
                    borough: permit.borough.clone(),
                    zip_codes: permit.zip_codes.clone(),
                    main: block.as_ref().map(|b| b.main.clone()),
                    cross_1: block.as_ref().map(|b| b.cross_1.clone()),
                    cross_2: block.as_ref().map(|b| b.cross_2.clone()),
                })
        })
        .collect()
}

/// Counts distinct permits per ZIP code: the ZIP fan-out with the feed's
/// missing-value sentinels dropped, grouped by ZIP. Output is sorted by
/// ZIP code.
#[must_use]
pub fn permit_counts_by_zip(permits: &[Permit]) -> Vec<ZipPermitCount> {
    let mut permits_by_zip: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for row in explode_zip_codes(permits) {
        if is_zip_sentinel(&row.zip_code) {
            continue;
        }
        permits_by_zip
            .entry(row.zip_code)
            .or_default()
            .insert(row.permit_id);
    }

    permits_by_zip
        .into_iter()
        .map(|(zip_code, ids)| ZipPermitCount {
            zip_code,
            permit_count: ids.len(),
        })
        .collect()
}
